//! Closed name → constructor table of the API models.
//!
//! [`MODELS`] lists every model in a fixed order. New models are appended;
//! existing entries are never renamed or removed.

use serde_json::Value;
use thiserror::Error;

use crate::DecodeError;
use crate::models::{Balance, Block, Error, Ping, SpendTx, Top, Transactions, Tx, WireModel};

/// A decoded instance of any registered model.
#[derive(Clone, Debug, PartialEq)]
pub enum Model {
    Balance(Balance),
    Block(Block),
    Error(Error),
    Ping(Ping),
    SpendTx(SpendTx),
    Top(Top),
    Transactions(Transactions),
    Tx(Tx),
}

/// Constructor decoding raw JSON bytes into a registered model.
pub type ModelDecoder = fn(&[u8]) -> Result<Model, DecodeError>;

/// Registry entry: a model name and its constructors.
#[derive(Clone, Copy, Debug)]
pub struct ModelEntry {
    pub name: &'static str,
    /// Decodes and validates raw JSON bytes.
    pub decode: ModelDecoder,
    /// Decodes and validates an already parsed JSON value.
    pub decode_value: fn(Value) -> Result<Model, DecodeError>,
}

/// No model is registered under the requested name.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("no model registered under '{0}'")]
pub struct ModelNotFound(pub String);

macro_rules! model_entries {
    ($($model:ident),* $(,)?) => {
        /// All registered models, in registration order.
        pub static MODELS: &[ModelEntry] = &[
            $(ModelEntry {
                name: <$model as WireModel>::NAME,
                decode: |bytes| <$model as WireModel>::decode(bytes).map(Model::$model),
                decode_value: |value| <$model as WireModel>::decode_value(value).map(Model::$model),
            },)*
        ];

        impl Model {
            /// Registered name of the model.
            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$model(_) => <$model as WireModel>::NAME,)*
                }
            }

            /// Encodes the wrapped model as compact JSON bytes.
            pub fn encode(&self) -> Vec<u8> {
                match self {
                    $(Self::$model(model) => model.encode(),)*
                }
            }

            /// Encodes the wrapped model as a JSON value.
            pub fn to_value(&self) -> Value {
                match self {
                    $(Self::$model(model) => model.to_value(),)*
                }
            }
        }

        $(
            impl From<$model> for Model {
                fn from(model: $model) -> Self {
                    Self::$model(model)
                }
            }
        )*
    };
}

model_entries!(Balance, Block, Error, Ping, SpendTx, Top, Transactions, Tx);

/// Finds a model by its registered name (case-sensitive).
pub fn lookup(name: &str) -> Result<&'static ModelEntry, ModelNotFound> {
    MODELS
        .iter()
        .find(|entry| entry.name == name)
        .ok_or_else(|| ModelNotFound(name.to_owned()))
}

/// Names of all registered models, in registration order.
pub fn names() -> impl Iterator<Item = &'static str> {
    MODELS.iter().map(|entry| entry.name)
}

/// Decodes `bytes` as the model registered under `name`.
pub fn decode(name: &str, bytes: &[u8]) -> Result<Model, crate::Error> {
    let entry = lookup(name)?;
    Ok((entry.decode)(bytes)?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{MODELS, Model, ModelNotFound, lookup, names};
    use crate::models::fixtures;

    #[test]
    fn registry_lists_all_models_in_order() {
        let registered: Vec<_> = names().collect();
        assert_eq!(
            registered,
            [
                "Balance",
                "Block",
                "Error",
                "Ping",
                "SpendTx",
                "Top",
                "Transactions",
                "Tx"
            ]
        );
    }

    #[test]
    fn every_name_builds_its_own_model() {
        let samples = [
            ("Balance", json!({ "balance": 1 })),
            (
                "Block",
                json!({
                    "height": 1,
                    "prev_hash": fixtures::PREV_BLOCK_HASH,
                    "state_hash": fixtures::STATE_HASH,
                    "txs_hash": fixtures::TXS_HASH,
                    "target": 1,
                    "nonce": 1,
                    "time": 1,
                    "version": 1,
                }),
            ),
            ("Error", json!({ "reason": "oops" })),
            (
                "Ping",
                json!({
                    "source": "peer",
                    "genesis_hash": fixtures::PREV_BLOCK_HASH,
                    "best_hash": fixtures::BLOCK_HASH,
                    "difficulty": 1.0,
                    "share": 1,
                }),
            ),
            (
                "SpendTx",
                json!({ "recipient_pubkey": fixtures::RECIPIENT, "amount": 1, "fee": 1 }),
            ),
            ("Top", json!({ "hash": fixtures::BLOCK_HASH, "height": 1 })),
            ("Transactions", json!([])),
            ("Tx", json!({ "type": "spend_tx", "data": {} })),
        ];
        assert_eq!(samples.len(), MODELS.len());

        for (name, payload) in samples {
            let entry = lookup(name).expect("registered");
            let model = (entry.decode)(payload.to_string().as_bytes()).expect("valid payload");
            assert_eq!(model.name(), name);

            let from_value = (entry.decode_value)(payload).expect("valid payload");
            assert_eq!(from_value, model);
        }
    }

    #[test]
    fn unknown_name_is_not_found() {
        let error = lookup("CoinbaseTx").expect_err("not registered");
        assert_eq!(error, ModelNotFound("CoinbaseTx".to_owned()));
        assert!(lookup("top").is_err());
    }

    #[test]
    fn decode_by_name_reports_decode_errors() {
        let error = super::decode("Top", b"{}").expect_err("missing fields");
        assert!(matches!(error, crate::Error::Decode(_)));

        let model = super::decode("Error", br#"{"reason":"x"}"#).expect("valid");
        assert!(matches!(model, Model::Error(_)));
    }
}
