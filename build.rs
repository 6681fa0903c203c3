//! Generates the operation catalog consumed by `src/openapi_client.rs`.
//!
//! Reads `openapi/swagger.json` (Swagger 2.0) and writes
//! `$OUT_DIR/openapi_operations.rs` with `OPENAPI_DEFAULT_SERVER_URL` and
//! `OPENAPI_OPERATIONS`.

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde_json::Value;

const SPEC_PATH: &str = "openapi/swagger.json";
const METHODS: [&str; 7] = ["get", "put", "post", "delete", "options", "head", "patch"];

fn main() {
    println!("cargo:rerun-if-changed={SPEC_PATH}");

    let raw = fs::read_to_string(SPEC_PATH)
        .unwrap_or_else(|err| panic!("failed to read {SPEC_PATH}: {err}"));
    let spec: Value = serde_json::from_str(&raw)
        .unwrap_or_else(|err| panic!("failed to parse {SPEC_PATH}: {err}"));

    let mut generated = String::new();
    writeln!(
        generated,
        "pub(crate) const OPENAPI_DEFAULT_SERVER_URL: &str = {:?};",
        default_server_url(&spec)
    )
    .expect("write to string");

    generated.push_str(
        "pub(crate) static OPENAPI_OPERATIONS: &[OperationDefinition] = &[\n",
    );

    let paths = spec
        .get("paths")
        .and_then(Value::as_object)
        .unwrap_or_else(|| panic!("{SPEC_PATH} has no `paths` object"));

    for (path_template, item) in paths {
        for method in METHODS {
            let Some(operation) = item.get(method) else {
                continue;
            };
            let operation_id = operation
                .get("operationId")
                .and_then(Value::as_str)
                .unwrap_or_else(|| panic!("{method} {path_template} has no operationId"));

            let path_params = extract_path_params(path_template);
            let request_model = operation
                .get("parameters")
                .and_then(Value::as_array)
                .and_then(|params| {
                    params
                        .iter()
                        .find(|param| param.get("in").and_then(Value::as_str) == Some("body"))
                })
                .and_then(|param| param.get("schema"))
                .and_then(schema_ref_name);
            let response_model = operation
                .pointer("/responses/200/schema")
                .and_then(schema_ref_name);

            writeln!(
                generated,
                "    OperationDefinition {{ operation_id: {operation_id:?}, method: {:?}, \
                 path_template: {path_template:?}, path_params: &{path_params:?}, \
                 request_model: {request_model:?}, response_model: {response_model:?} }},",
                method.to_ascii_uppercase(),
            )
            .expect("write to string");
        }
    }

    generated.push_str("];\n");

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    fs::write(Path::new(&out_dir).join("openapi_operations.rs"), generated)
        .expect("failed to write generated operation catalog");
}

/// Swagger 2.0 servers are `schemes[0]://host/basePath`.
fn default_server_url(spec: &Value) -> String {
    let scheme = spec
        .pointer("/schemes/0")
        .and_then(Value::as_str)
        .unwrap_or("http");
    let host = spec
        .get("host")
        .and_then(Value::as_str)
        .unwrap_or("localhost");
    let base_path = spec.get("basePath").and_then(Value::as_str).unwrap_or("");
    format!("{scheme}://{host}{base_path}")
}

fn extract_path_params(template: &str) -> Vec<String> {
    let mut params = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        params.push(rest[start + 1..start + len].to_owned());
        rest = &rest[start + len + 1..];
    }
    params
}

fn schema_ref_name(schema: &Value) -> Option<String> {
    schema
        .get("$ref")
        .and_then(Value::as_str)
        .and_then(|reference| reference.rsplit('/').next())
        .map(str::to_owned)
}
