//! Fetch a block by height with the `BlockingEpochClient` and resolve its transactions.
//!
//! Run:
//! `cargo run --example blocking_get_block`
//!
//! Optional env vars:
//! - `EPOCH_BASE_URL` (defaults to `OpenAPI` server URL)
//! - `EPOCH_BLOCK_HEIGHT` (defaults to `0`)

use epoch_client::{BlockingEpochClient, Model};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let height: u64 = std::env::var("EPOCH_BLOCK_HEIGHT")
        .unwrap_or_else(|_| "0".to_owned())
        .parse()?;

    let client = match std::env::var("EPOCH_BASE_URL").ok() {
        Some(url) => BlockingEpochClient::new(url)?,
        None => BlockingEpochClient::from_openapi_default_server()?,
    };

    let block = client.block_by_height(height)?;
    println!(
        "block {} (prev {}) with {} transactions",
        block.height(),
        block.prev_hash(),
        block.transactions().len()
    );

    for tx in block.transactions() {
        match tx.payload() {
            Ok(Model::SpendTx(spend)) => println!(
                "- spend {} to {} (fee {})",
                spend.amount(),
                spend.recipient_pubkey(),
                spend.fee()
            ),
            Ok(other) => println!("- {}", other.name()),
            Err(_) => println!("- {} (not modelled)", tx.tx_type()),
        }
    }
    Ok(())
}
