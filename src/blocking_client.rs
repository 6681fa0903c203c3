use std::time::Duration;

use reqwest::{Method, Url};
use serde_json::Value;

use crate::client::ensure_trailing_slash;
use crate::models::WireModel;
use crate::{ApiError, Error};

/// Generic blocking JSON REST client.
///
/// This is the synchronous counterpart of [`crate::ApiClient`].
#[derive(Debug)]
pub struct BlockingApiClient {
    base_url: Url,
    authorization_token: Option<String>,
    timeout: Option<Duration>,
    http: reqwest::blocking::Client,
}

impl BlockingApiClient {
    /// Creates a new client with the given base URL.
    ///
    /// The URL is normalized to include a trailing slash, so relative endpoint
    /// paths join correctly.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, Error> {
        let parsed = Url::parse(base_url.as_ref())
            .map_err(|_| Error::InvalidBaseUrl(base_url.as_ref().to_owned()))?;

        Ok(Self {
            base_url: ensure_trailing_slash(parsed),
            authorization_token: None,
            timeout: None,
            http: reqwest::blocking::Client::new(),
        })
    }

    /// Returns a new client with a bearer token attached to all requests.
    #[must_use]
    pub fn with_authorization_token(mut self, token: impl Into<String>) -> Self {
        self.authorization_token = Some(token.into());
        self
    }

    /// Returns a new client that aborts requests taking longer than `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends a `GET` request and parses the response as JSON.
    pub fn get_json(&self, path: &str) -> Result<Value, Error> {
        self.request_json(Method::GET, path, None)
    }

    /// Sends a request and parses the response as JSON.
    ///
    /// Use [`Self::request_json_with_query`] when query parameters are needed.
    pub fn request_json(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, Error> {
        self.request_json_with_query(method, path, &[], body)
    }

    /// Sends a request with query parameters and parses the response as JSON.
    ///
    /// Returns [`Value::Null`] for successful responses with an empty body.
    pub fn request_json_with_query(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<Value, Error> {
        let payload = self.request_text(method, path, query, body)?;

        if payload.trim().is_empty() {
            Ok(Value::Null)
        } else {
            Ok(serde_json::from_str(&payload)?)
        }
    }

    /// Sends a request and decodes the response body as model `M`.
    pub fn request_model<M: WireModel>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<M, Error> {
        let payload = self.request_text(method, path, query, body)?;
        Ok(M::decode(payload.as_bytes())?)
    }

    /// Sends a request and returns the raw body of a successful response.
    ///
    /// Non-success statuses are mapped with [`ApiError::from_response`].
    pub fn request_text(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<String, Error> {
        let url = self.build_url(path)?;
        tracing::debug!(%method, %url, "sending request");

        let mut request = self
            .http
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");

        if !query.is_empty() {
            request = request.query(query);
        }

        if let Some(token) = &self.authorization_token {
            request = request.bearer_auth(token);
        }

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        if let Some(json_body) = body {
            request = request.json(&json_body);
        }

        let response = request.send()?;
        let status = response.status();
        let payload = response.text()?;
        tracing::debug!(%status, len = payload.len(), "received response");

        if !status.is_success() {
            let error = ApiError::from_response(status.as_u16(), payload.as_bytes());
            tracing::warn!(%status, %error, "request rejected");
            return Err(error.into());
        }

        Ok(payload)
    }

    fn build_url(&self, path: &str) -> Result<Url, Error> {
        let relative = path.trim_start_matches('/');
        self.base_url
            .join(relative)
            .map_err(|_| Error::InvalidPath(path.to_owned()))
    }
}
