//! Look up an account balance, telling "unknown account" apart from other failures.
//!
//! Run:
//! `cargo run --example async_get_balance -- ak$...`
//!
//! Optional env vars:
//! - `EPOCH_BASE_URL` (defaults to `OpenAPI` server URL)

use epoch_client::{ApiError, EpochClient, Error};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let account = std::env::args()
        .nth(1)
        .ok_or("usage: async_get_balance <account_pubkey>")?;

    let client = match std::env::var("EPOCH_BASE_URL").ok() {
        Some(url) => EpochClient::new(url)?,
        None => EpochClient::from_openapi_default_server()?,
    };

    match client.balance(&account).await {
        Ok(balance) => println!("{account}: {}", balance.balance()),
        Err(Error::Api(ApiError::Client { status: 404, .. })) => {
            println!("{account} has no balance yet");
        }
        Err(Error::Api(ApiError::Remote { message, .. })) => {
            println!("node rejected the key: {message}");
        }
        Err(other) => return Err(other.into()),
    }
    Ok(())
}
