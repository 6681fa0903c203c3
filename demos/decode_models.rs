//! Decode payloads by model name through the registry, without a node.
//!
//! Run:
//! `cargo run --example decode_models`

use epoch_client::registry;

fn main() {
    let payloads = [
        ("Error", r#"{"reason":"bad nonce"}"#),
        ("Balance", r#"{"balance":1000,"extra":true}"#),
        ("Top", r#"{"height":3}"#),
        ("Peer", r"{}"),
    ];

    for (name, payload) in payloads {
        match registry::decode(name, payload.as_bytes()) {
            Ok(model) => println!("{name}: {}", model.to_value()),
            Err(error) => println!("{name}: {error}"),
        }
    }

    let names: Vec<_> = registry::names().collect();
    println!("registered: {}", names.join(", "));
}
