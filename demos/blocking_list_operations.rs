//! List generated `OpenAPI` operations from the Rust client.
//!
//! Run:
//! `cargo run --example blocking_list_operations`

use epoch_client::{BlockingEpochClient, openapi_default_server_url};

fn main() {
    println!("Default OpenAPI server: {}", openapi_default_server_url());

    let operations = BlockingEpochClient::operations();
    println!("Loaded {} operations", operations.len());

    for operation in operations {
        println!(
            "- {:<6} {:<36} ({}) -> {}",
            operation.method,
            operation.path_template,
            operation.operation_id,
            operation.response_model.unwrap_or("-")
        );
    }
}
