use reqwest::Method;
use serde_json::Value;
use url::form_urlencoded::byte_serialize;

use crate::models::{Balance, Block, Ping, SpendTx, Top, Transactions, Tx, WireModel};
use crate::registry::{self, Model, ModelDecoder};
use crate::{ApiClient, BlockingApiClient, Error};

/// Metadata for one `OpenAPI` operation.
///
/// Values are generated from `openapi/swagger.json` at build time.
#[derive(Clone, Copy, Debug)]
pub struct OperationDefinition {
    /// Stable `OpenAPI` operation identifier.
    pub operation_id: &'static str,
    /// Uppercase HTTP method (for example `GET`, `POST`).
    pub method: &'static str,
    /// Path template, potentially containing `{param}` placeholders.
    pub path_template: &'static str,
    /// Required path parameter names extracted from `path_template`.
    pub path_params: &'static [&'static str],
    /// Registered model expected as the request body, if any.
    pub request_model: Option<&'static str>,
    /// Registered model of a successful response body, if any.
    pub response_model: Option<&'static str>,
}

// Generated file contract (`$OUT_DIR/openapi_operations.rs`):
// 1. `OPENAPI_DEFAULT_SERVER_URL: &str`
//    - `schemes[0]://host/basePath` from `openapi/swagger.json`.
// 2. `OPENAPI_OPERATIONS: &[OperationDefinition]`
//    - One entry per operation with `operation_id`, `method` (uppercase),
//      `path_template`, `path_params` and the `$ref` names of the body and
//      `200` response schemas.
//
// This contract is produced by `build.rs` and consumed by this module via `include!`.
include!(concat!(env!("OUT_DIR"), "/openapi_operations.rs"));

/// Async Epoch API client backed by the `OpenAPI` operation registry.
///
/// Offers typed calls for every Epoch operation and generic calls by
/// `operation_id`.
#[derive(Clone, Debug)]
pub struct EpochClient {
    inner: ApiClient,
}

impl EpochClient {
    /// Creates a client with an explicit base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, Error> {
        Ok(Self {
            inner: ApiClient::new(base_url)?,
        })
    }

    /// Creates a client using the server URL from the `OpenAPI` spec.
    pub fn from_openapi_default_server() -> Result<Self, Error> {
        Self::new(openapi_default_server_url())
    }

    /// Wraps an already configured transport.
    pub fn from_api_client(inner: ApiClient) -> Self {
        Self { inner }
    }

    /// Returns a new client with a bearer token attached to all requests.
    #[must_use]
    pub fn with_authorization_token(mut self, token: impl Into<String>) -> Self {
        self.inner = self.inner.with_authorization_token(token);
        self
    }

    /// Returns a new client that aborts requests taking longer than `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.inner = self.inner.with_timeout(timeout);
        self
    }

    /// Returns all operations discovered from the `OpenAPI` spec.
    pub fn operations() -> &'static [OperationDefinition] {
        OPENAPI_OPERATIONS
    }

    /// Sends a request using a raw path and method.
    ///
    /// This bypasses operation-id lookup but keeps client configuration.
    pub async fn request_json_with_query(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<Value, Error> {
        self.inner
            .request_json_with_query(method, path, query, body)
            .await
    }

    /// Calls an endpoint by `OpenAPI` `operation_id`.
    ///
    /// `path_params` replaces `{param}` segments in the operation path template.
    /// Missing required parameters return [`Error::MissingPathParameter`].
    pub async fn call_operation(
        &self,
        operation_id: &str,
        path_params: &[(&str, &str)],
        query: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<Value, Error> {
        let (method, path) = prepare(operation_id, path_params)?;
        self.inner
            .request_json_with_query(method, &path, query, body)
            .await
    }

    /// Calls an endpoint by `operation_id` and decodes the response through
    /// the model registry.
    pub async fn call_model(
        &self,
        operation_id: &str,
        path_params: &[(&str, &str)],
        query: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<Model, Error> {
        let decode = response_decoder(operation_id)?;
        let (method, path) = prepare(operation_id, path_params)?;
        let payload = self.inner.request_text(method, &path, query, body).await?;
        Ok(decode(payload.as_bytes())?)
    }

    /// Current head of the chain.
    pub async fn top(&self) -> Result<Top, Error> {
        self.typed("getTop", &[], None).await
    }

    pub async fn block_by_height(&self, height: u64) -> Result<Block, Error> {
        let height = height.to_string();
        self.typed("getBlockByHeight", &[("height", height.as_str())], None)
            .await
    }

    pub async fn block_by_hash(&self, hash: &str) -> Result<Block, Error> {
        self.typed("getBlockByHash", &[("hash", hash)], None).await
    }

    /// Submits a mined block.
    pub async fn post_block(&self, block: &Block) -> Result<(), Error> {
        self.send("postBlock", &[], Some(block.to_value())).await
    }

    pub async fn balance(&self, account_pubkey: &str) -> Result<Balance, Error> {
        self.typed(
            "getAccountBalance",
            &[("account_pubkey", account_pubkey)],
            None,
        )
        .await
    }

    /// Transactions waiting in the node's mempool.
    pub async fn transactions(&self) -> Result<Transactions, Error> {
        self.typed("getTransactions", &[], None).await
    }

    pub async fn post_tx(&self, tx: &Tx) -> Result<(), Error> {
        self.send("postTx", &[], Some(tx.to_value())).await
    }

    /// Sends our chain view and receives the node's in return.
    pub async fn ping(&self, ping: &Ping) -> Result<Ping, Error> {
        self.typed("postPing", &[], Some(ping.to_value())).await
    }

    /// Asks the node to create and sign a spend from its own account.
    pub async fn post_spend_tx(&self, spend: &SpendTx) -> Result<(), Error> {
        self.send("postSpendTx", &[], Some(spend.to_value())).await
    }

    async fn typed<M: WireModel>(
        &self,
        operation_id: &str,
        path_params: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<M, Error> {
        let (method, path) = prepare(operation_id, path_params)?;
        self.inner.request_model(method, &path, &[], body).await
    }

    async fn send(
        &self,
        operation_id: &str,
        path_params: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<(), Error> {
        let (method, path) = prepare(operation_id, path_params)?;
        self.inner.request_text(method, &path, &[], body).await?;
        Ok(())
    }
}

/// Blocking Epoch API client backed by the `OpenAPI` operation registry.
///
/// This is the synchronous counterpart of [`EpochClient`].
#[derive(Debug)]
pub struct BlockingEpochClient {
    inner: BlockingApiClient,
}

impl BlockingEpochClient {
    /// Creates a client with an explicit base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, Error> {
        Ok(Self {
            inner: BlockingApiClient::new(base_url)?,
        })
    }

    /// Creates a client using the server URL from the `OpenAPI` spec.
    pub fn from_openapi_default_server() -> Result<Self, Error> {
        Self::new(openapi_default_server_url())
    }

    /// Wraps an already configured transport.
    pub fn from_api_client(inner: BlockingApiClient) -> Self {
        Self { inner }
    }

    /// Returns a new client with a bearer token attached to all requests.
    #[must_use]
    pub fn with_authorization_token(mut self, token: impl Into<String>) -> Self {
        self.inner = self.inner.with_authorization_token(token);
        self
    }

    /// Returns a new client that aborts requests taking longer than `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.inner = self.inner.with_timeout(timeout);
        self
    }

    /// Returns all operations discovered from the `OpenAPI` spec.
    pub fn operations() -> &'static [OperationDefinition] {
        OPENAPI_OPERATIONS
    }

    /// Sends a request using a raw path and method.
    ///
    /// This bypasses operation-id lookup but keeps client configuration.
    pub fn request_json_with_query(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<Value, Error> {
        self.inner
            .request_json_with_query(method, path, query, body)
    }

    /// Calls an endpoint by `OpenAPI` `operation_id`.
    ///
    /// `path_params` replaces `{param}` segments in the operation path template.
    /// Missing required parameters return [`Error::MissingPathParameter`].
    pub fn call_operation(
        &self,
        operation_id: &str,
        path_params: &[(&str, &str)],
        query: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<Value, Error> {
        let (method, path) = prepare(operation_id, path_params)?;
        self.inner
            .request_json_with_query(method, &path, query, body)
    }

    /// Calls an endpoint by `operation_id` and decodes the response through
    /// the model registry.
    pub fn call_model(
        &self,
        operation_id: &str,
        path_params: &[(&str, &str)],
        query: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<Model, Error> {
        let decode = response_decoder(operation_id)?;
        let (method, path) = prepare(operation_id, path_params)?;
        let payload = self.inner.request_text(method, &path, query, body)?;
        Ok(decode(payload.as_bytes())?)
    }

    /// Current head of the chain.
    pub fn top(&self) -> Result<Top, Error> {
        self.typed("getTop", &[], None)
    }

    pub fn block_by_height(&self, height: u64) -> Result<Block, Error> {
        let height = height.to_string();
        self.typed("getBlockByHeight", &[("height", height.as_str())], None)
    }

    pub fn block_by_hash(&self, hash: &str) -> Result<Block, Error> {
        self.typed("getBlockByHash", &[("hash", hash)], None)
    }

    /// Submits a mined block.
    pub fn post_block(&self, block: &Block) -> Result<(), Error> {
        self.send("postBlock", &[], Some(block.to_value()))
    }

    pub fn balance(&self, account_pubkey: &str) -> Result<Balance, Error> {
        self.typed(
            "getAccountBalance",
            &[("account_pubkey", account_pubkey)],
            None,
        )
    }

    /// Transactions waiting in the node's mempool.
    pub fn transactions(&self) -> Result<Transactions, Error> {
        self.typed("getTransactions", &[], None)
    }

    pub fn post_tx(&self, tx: &Tx) -> Result<(), Error> {
        self.send("postTx", &[], Some(tx.to_value()))
    }

    /// Sends our chain view and receives the node's in return.
    pub fn ping(&self, ping: &Ping) -> Result<Ping, Error> {
        self.typed("postPing", &[], Some(ping.to_value()))
    }

    /// Asks the node to create and sign a spend from its own account.
    pub fn post_spend_tx(&self, spend: &SpendTx) -> Result<(), Error> {
        self.send("postSpendTx", &[], Some(spend.to_value()))
    }

    fn typed<M: WireModel>(
        &self,
        operation_id: &str,
        path_params: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<M, Error> {
        let (method, path) = prepare(operation_id, path_params)?;
        self.inner.request_model(method, &path, &[], body)
    }

    fn send(
        &self,
        operation_id: &str,
        path_params: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<(), Error> {
        let (method, path) = prepare(operation_id, path_params)?;
        self.inner.request_text(method, &path, &[], body)?;
        Ok(())
    }
}

/// Returns the default server URL from the `OpenAPI` spec.
pub fn openapi_default_server_url() -> &'static str {
    OPENAPI_DEFAULT_SERVER_URL
}

fn prepare(operation_id: &str, path_params: &[(&str, &str)]) -> Result<(Method, String), Error> {
    let operation = find_operation(operation_id)?;
    let rendered_path = render_path(operation, path_params)?;
    let method = parse_method(operation)?;
    Ok((method, rendered_path))
}

fn response_decoder(operation_id: &str) -> Result<ModelDecoder, Error> {
    let operation = find_operation(operation_id)?;
    let name = operation
        .response_model
        .ok_or_else(|| Error::NoResponseModel(operation_id.to_owned()))?;
    Ok(registry::lookup(name)?.decode)
}

fn find_operation(operation_id: &str) -> Result<&'static OperationDefinition, Error> {
    OPENAPI_OPERATIONS
        .iter()
        .find(|op| op.operation_id == operation_id)
        .ok_or_else(|| Error::UnknownOperation(operation_id.to_owned()))
}

fn parse_method(operation: &OperationDefinition) -> Result<Method, Error> {
    Method::from_bytes(operation.method.as_bytes())
        .map_err(|_| Error::UnknownOperation(operation.operation_id.to_owned()))
}

fn render_path(
    operation: &OperationDefinition,
    path_params: &[(&str, &str)],
) -> Result<String, Error> {
    let mut rendered = operation.path_template.to_owned();

    for required_param in operation.path_params {
        let value = path_params
            .iter()
            .find(|(name, _)| name == required_param)
            .map(|(_, value)| *value)
            .ok_or_else(|| Error::MissingPathParameter {
                operation_id: operation.operation_id.to_owned(),
                parameter: (*required_param).to_owned(),
            })?;

        let placeholder = format!("{{{required_param}}}");
        rendered = rendered.replace(&placeholder, &encode_path_segment(value));
    }

    Ok(rendered)
}

fn encode_path_segment(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::{
        EpochClient, find_operation, openapi_default_server_url, render_path, response_decoder,
    };
    use crate::Error;
    use crate::models::fixtures;
    use crate::registry;

    #[test]
    fn operation_catalog_covers_the_epoch_api() {
        let mut ids: Vec<_> = EpochClient::operations()
            .iter()
            .map(|op| op.operation_id)
            .collect();
        ids.sort_unstable();
        assert_eq!(
            ids,
            [
                "getAccountBalance",
                "getBlockByHash",
                "getBlockByHeight",
                "getTop",
                "getTransactions",
                "postBlock",
                "postPing",
                "postSpendTx",
                "postTx",
            ]
        );
    }

    #[test]
    fn default_server_comes_from_swagger() {
        assert_eq!(openapi_default_server_url(), "http://localhost:3013/v1");
    }

    #[test]
    fn catalog_models_are_registered() {
        for op in EpochClient::operations() {
            for name in op.request_model.iter().chain(op.response_model.iter()) {
                assert!(
                    registry::lookup(name).is_ok(),
                    "{} references unregistered model {name}",
                    op.operation_id
                );
            }
        }
    }

    #[test]
    fn catalog_records_body_and_response_models() {
        let ping = find_operation("postPing").expect("operation exists");
        assert_eq!(ping.method, "POST");
        assert_eq!(ping.request_model, Some("Ping"));
        assert_eq!(ping.response_model, Some("Ping"));

        let post_tx = find_operation("postTx").expect("operation exists");
        assert_eq!(post_tx.request_model, Some("Tx"));
        assert_eq!(post_tx.response_model, None);
    }

    #[test]
    fn render_path_replaces_required_path_params() {
        let op = find_operation("getBlockByHeight").expect("operation exists");
        assert_eq!(op.path_params, ["height"]);
        let path = render_path(op, &[("height", "42")]).expect("path renders");
        assert_eq!(path, "/block/height/42");
    }

    #[test]
    fn render_path_encodes_identifier_separator() {
        let op = find_operation("getAccountBalance").expect("operation exists");
        let path = render_path(op, &[("account_pubkey", fixtures::SENDER)]).expect("renders");
        assert_eq!(
            path,
            "/account/balance/ak%243DDiCtDLpQ19tqZshWZvpJwVZYXJrru593Q2JqnV3HN7aWk5h"
        );
    }

    #[test]
    fn render_path_reports_missing_parameter() {
        let op = find_operation("getBlockByHash").expect("operation exists");
        let error = render_path(op, &[]).expect_err("missing parameter should error");
        match error {
            Error::MissingPathParameter {
                operation_id,
                parameter,
            } => {
                assert_eq!(operation_id, "getBlockByHash");
                assert_eq!(parameter, "hash");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn response_decoder_requires_a_response_model() {
        let error = response_decoder("postSpendTx").expect_err("no response model");
        assert!(matches!(error, Error::NoResponseModel(id) if id == "postSpendTx"));

        let error = response_decoder("getPeers").expect_err("unknown operation");
        assert!(matches!(error, Error::UnknownOperation(_)));

        let decode = response_decoder("getTop").expect("top has a model");
        let payload = format!(r#"{{"hash":"{}","height":3}}"#, fixtures::BLOCK_HASH);
        let model = decode(payload.as_bytes()).expect("valid top");
        assert_eq!(model.name(), "Top");
    }
}
