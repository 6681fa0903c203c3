use thiserror::Error;

use crate::models::{self, WireModel};
use crate::registry::ModelNotFound;

/// Errors returned by client operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Base URL is not a valid absolute URL.
    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),

    /// Endpoint path could not be joined to the base URL.
    #[error("invalid endpoint path '{0}'")]
    InvalidPath(String),

    /// The requested `OpenAPI` operation id is not present in the generated catalog.
    #[error("unknown OpenAPI operation '{0}'")]
    UnknownOperation(String),

    /// A required path template parameter was not provided.
    #[error("missing required path parameter '{parameter}' for operation '{operation_id}'")]
    MissingPathParameter {
        operation_id: String,
        parameter: String,
    },

    /// The operation does not declare a model for its successful response.
    #[error("operation '{0}' has no response model")]
    NoResponseModel(String),

    /// HTTP transport-layer request failure.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Response body could not be parsed as JSON.
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The node answered with a non-success status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A successful response body did not match its model.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    ModelNotFound(#[from] ModelNotFound),
}

/// Model decoding failure.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Payload is not valid JSON, misses a required field or has a field of the wrong type.
    #[error("malformed {model} payload: {source}")]
    Malformed {
        model: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Payload parsed but a field violates the model's invariants.
    #[error("invalid field '{field}' in {model}: {reason}")]
    InvalidField {
        model: &'static str,
        field: &'static str,
        reason: String,
    },
}

impl DecodeError {
    pub(crate) fn malformed(model: &'static str, source: serde_json::Error) -> Self {
        Self::Malformed { model, source }
    }

    pub(crate) fn invalid(
        model: &'static str,
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            model,
            field,
            reason: reason.into(),
        }
    }

    /// Name of the model that failed to decode.
    pub fn model(&self) -> &'static str {
        match self {
            Self::Malformed { model, .. } | Self::InvalidField { model, .. } => model,
        }
    }
}

/// Typed failure derived from a non-success HTTP response.
///
/// Built with [`ApiError::from_response`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 4xx response other than an application error.
    #[error("client error {status}{}", describe(.reason.as_deref()))]
    Client {
        status: u16,
        reason: Option<String>,
        body: String,
    },

    /// 5xx response.
    #[error("server error {status}{}", describe(.reason.as_deref()))]
    Server {
        status: u16,
        reason: Option<String>,
        body: String,
    },

    /// Application-level error reported by the node in an `Error` body.
    #[error("node rejected request ({code}): {message}")]
    Remote { code: u16, message: String },

    /// Response could not be interpreted: unexpected status or undecodable error body.
    #[error("unexpected response {status}: {body}")]
    Protocol { status: u16, body: String },
}

impl ApiError {
    /// Status used by the node for application errors carrying an `Error` body.
    pub const APPLICATION_ERROR_STATUS: u16 = 400;

    /// Maps an HTTP status code and raw body to an [`ApiError`].
    ///
    /// - `400` with an `Error` body becomes [`ApiError::Remote`], any other
    ///   `400` body becomes [`ApiError::Protocol`].
    /// - Other 4xx become [`ApiError::Client`], 5xx become [`ApiError::Server`];
    ///   `reason` is filled in when the body is an `Error`.
    /// - Any other status is a [`ApiError::Protocol`].
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let reason = models::Error::decode(body)
            .ok()
            .map(|error| error.reason().to_owned());
        let body = String::from_utf8_lossy(body).into_owned();

        match status {
            _ if status == Self::APPLICATION_ERROR_STATUS => match reason {
                Some(message) => Self::Remote {
                    code: status,
                    message,
                },
                None => Self::Protocol { status, body },
            },
            400..=499 => Self::Client {
                status,
                reason,
                body,
            },
            500..=599 => Self::Server {
                status,
                reason,
                body,
            },
            _ => Self::Protocol { status, body },
        }
    }

    /// HTTP status code of the response.
    pub fn status(&self) -> u16 {
        match self {
            Self::Client { status, .. }
            | Self::Server { status, .. }
            | Self::Protocol { status, .. } => *status,
            Self::Remote { code, .. } => *code,
        }
    }

    /// Reason reported by the node, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Client { reason, .. } | Self::Server { reason, .. } => reason.as_deref(),
            Self::Remote { message, .. } => Some(message),
            Self::Protocol { .. } => None,
        }
    }
}

fn describe(reason: Option<&str>) -> String {
    reason
        .map(|reason| format!(": {reason}"))
        .unwrap_or_default()
}
