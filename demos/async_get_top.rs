//! Fetch the top of the chain and the block behind it with the async `EpochClient`.
//!
//! Run:
//! `cargo run --example async_get_top`
//!
//! Optional env vars:
//! - `EPOCH_BASE_URL` (defaults to `OpenAPI` server URL)

use epoch_client::EpochClient;
use epoch_client::models::WireModel;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = match std::env::var("EPOCH_BASE_URL").ok() {
        Some(url) => EpochClient::new(url)?,
        None => EpochClient::from_openapi_default_server()?,
    };

    let top = client.top().await?;
    println!("top: height {} hash {}", top.height(), top.hash());

    let block = client.block_by_hash(top.hash()).await?;
    println!("{}", serde_json::to_string_pretty(&block.to_value())?);
    Ok(())
}
