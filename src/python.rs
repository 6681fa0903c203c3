use std::str::FromStr;
use std::sync::Mutex;

use pyo3::exceptions::{PyKeyError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use reqwest::Method;
use serde_json::Value;

use crate::models::WireModel;
use crate::{BlockingEpochClient, Error, registry};

#[pyclass(name = "OperationDefinition", get_all)]
pub struct PyOperationDefinition {
    pub operation_id: String,
    pub method: String,
    pub path_template: String,
    pub path_params: Vec<String>,
    pub request_model: Option<String>,
    pub response_model: Option<String>,
}

#[pyclass(name = "Client")]
pub struct PyClient {
    inner: Mutex<BlockingEpochClient>,
}

#[pymethods]
impl PyClient {
    #[new]
    #[pyo3(signature = (base_url=None, access_token=None, timeout_secs=None))]
    fn new(
        base_url: Option<String>,
        access_token: Option<String>,
        timeout_secs: Option<f64>,
    ) -> PyResult<Self> {
        let mut client = match base_url {
            Some(url) => BlockingEpochClient::new(url).map_err(to_py_value_error)?,
            None => BlockingEpochClient::from_openapi_default_server().map_err(to_py_value_error)?,
        };
        if let Some(value) = access_token {
            client = client.with_authorization_token(value);
        }
        if let Some(secs) = timeout_secs {
            let timeout = std::time::Duration::try_from_secs_f64(secs).map_err(to_py_value_error)?;
            client = client.with_timeout(timeout);
        }

        Ok(Self {
            inner: Mutex::new(client),
        })
    }

    #[staticmethod]
    fn operations() -> Vec<PyOperationDefinition> {
        BlockingEpochClient::operations()
            .iter()
            .map(|op| PyOperationDefinition {
                operation_id: op.operation_id.to_owned(),
                method: op.method.to_owned(),
                path_template: op.path_template.to_owned(),
                path_params: op
                    .path_params
                    .iter()
                    .map(|value| (*value).to_owned())
                    .collect(),
                request_model: op.request_model.map(str::to_owned),
                response_model: op.response_model.map(str::to_owned),
            })
            .collect()
    }

    fn get(&self, path: &str) -> PyResult<String> {
        self.request("GET", path, None, None)
    }

    #[pyo3(signature = (method, path, query_json=None, body_json=None))]
    fn request(
        &self,
        method: &str,
        path: &str,
        query_json: Option<String>,
        body_json: Option<String>,
    ) -> PyResult<String> {
        let parsed_method = Method::from_str(method)
            .map_err(|e| PyValueError::new_err(format!("invalid HTTP method: {e}")))?;
        let query_pairs = parse_map_arg(query_json)?;
        let borrowed_query: Vec<(&str, &str)> = query_pairs
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();
        let body = parse_body_arg(body_json)?;

        let value = self.with_client(|client| {
            client.request_json_with_query(parsed_method, path, &borrowed_query, body)
        })?;
        Ok(value.to_string())
    }

    #[pyo3(signature = (operation_id, path_params_json=None, query_json=None, body_json=None))]
    fn call_operation(
        &self,
        operation_id: &str,
        path_params_json: Option<String>,
        query_json: Option<String>,
        body_json: Option<String>,
    ) -> PyResult<String> {
        let path_pairs = parse_map_arg(path_params_json)?;
        let borrowed_path: Vec<(&str, &str)> = path_pairs
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();
        let query_pairs = parse_map_arg(query_json)?;
        let borrowed_query: Vec<(&str, &str)> = query_pairs
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();
        let body = parse_body_arg(body_json)?;

        let value = self.with_client(|client| {
            client.call_operation(operation_id, &borrowed_path, &borrowed_query, body)
        })?;
        Ok(value.to_string())
    }

    fn top(&self) -> PyResult<String> {
        self.with_client(|client| client.top().map(|top| top.to_value().to_string()))
    }

    fn block_by_height(&self, height: u64) -> PyResult<String> {
        self.with_client(|client| {
            client
                .block_by_height(height)
                .map(|block| block.to_value().to_string())
        })
    }

    fn block_by_hash(&self, hash: &str) -> PyResult<String> {
        self.with_client(|client| {
            client
                .block_by_hash(hash)
                .map(|block| block.to_value().to_string())
        })
    }

    fn balance(&self, account_pubkey: &str) -> PyResult<String> {
        self.with_client(|client| {
            client
                .balance(account_pubkey)
                .map(|balance| balance.to_value().to_string())
        })
    }

    fn transactions(&self) -> PyResult<String> {
        self.with_client(|client| client.transactions().map(|txs| txs.to_value().to_string()))
    }
}

impl PyClient {
    fn with_client<T>(
        &self,
        call: impl FnOnce(&BlockingEpochClient) -> Result<T, Error>,
    ) -> PyResult<T> {
        let client = self
            .inner
            .lock()
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
        call(&client).map_err(to_py_runtime_error)
    }
}

/// Names of all registered models.
#[pyfunction]
fn model_names() -> Vec<&'static str> {
    registry::names().collect()
}

/// Validates `json` as model `name` and returns its canonical encoding.
#[pyfunction]
fn decode_model(name: &str, json: &str) -> PyResult<String> {
    let entry = registry::lookup(name).map_err(|e| PyKeyError::new_err(e.to_string()))?;
    let model = (entry.decode)(json.as_bytes()).map_err(to_py_value_error)?;
    Ok(model.to_value().to_string())
}

#[pymodule]
fn epoch_client(_py: Python<'_>, module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_class::<PyOperationDefinition>()?;
    module.add_class::<PyClient>()?;
    module.add_function(wrap_pyfunction!(model_names, module)?)?;
    module.add_function(wrap_pyfunction!(decode_model, module)?)?;
    Ok(())
}

fn to_py_value_error(error: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(error.to_string())
}

fn to_py_runtime_error(error: impl std::fmt::Display) -> PyErr {
    PyRuntimeError::new_err(error.to_string())
}

fn parse_body_arg(body_json: Option<String>) -> PyResult<Option<Value>> {
    body_json
        .map(|raw| serde_json::from_str(&raw).map_err(to_py_value_error))
        .transpose()
}

fn parse_map_arg(raw_json: Option<String>) -> PyResult<Vec<(String, String)>> {
    let Some(raw_json) = raw_json else {
        return Ok(Vec::new());
    };

    let value: Value = serde_json::from_str(&raw_json).map_err(to_py_value_error)?;
    let object = value
        .as_object()
        .ok_or_else(|| PyValueError::new_err("expected a JSON object"))?;

    Ok(object
        .iter()
        .map(|(key, value)| {
            let rendered = match value.as_str() {
                Some(as_str) => as_str.to_owned(),
                None => value.to_string(),
            };
            (key.to_owned(), rendered)
        })
        .collect())
}
