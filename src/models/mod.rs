//! Typed models of the Epoch API resources.
//!
//! Every model is an immutable value object: fields are private, constructors
//! validate, and the JSON wire form goes through [`WireModel`]. Unknown JSON
//! fields are ignored on decode.

mod balance;
mod block;
mod error;
mod id;
mod ping;
mod spend_tx;
mod top;
mod transactions;
mod tx;

pub use balance::Balance;
pub use block::Block;
pub use error::Error;
pub use id::{IdError, IdKind};
pub use ping::Ping;
pub use spend_tx::SpendTx;
pub use top::Top;
pub use transactions::Transactions;
pub use tx::Tx;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::DecodeError;

/// JSON wire encoding shared by all models.
pub trait WireModel: Serialize + DeserializeOwned {
    /// Schema name of the model, as used by the registry.
    const NAME: &'static str;

    /// Checks invariants that the JSON shape alone cannot express.
    fn validate(&self) -> Result<(), DecodeError> {
        Ok(())
    }

    /// Decodes and validates a model from raw JSON bytes.
    fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let model: Self = serde_json::from_slice(bytes)
            .map_err(|source| DecodeError::malformed(Self::NAME, source))?;
        model.validate()?;
        Ok(model)
    }

    /// Decodes and validates a model from an already parsed JSON value.
    fn decode_value(value: Value) -> Result<Self, DecodeError> {
        let model: Self = serde_json::from_value(value)
            .map_err(|source| DecodeError::malformed(Self::NAME, source))?;
        model.validate()?;
        Ok(model)
    }

    /// Encodes the model as compact JSON bytes.
    fn encode(&self) -> Vec<u8> {
        // Models only hold strings, integers, finite floats and JSON objects.
        serde_json::to_vec(self).expect("model serialization is infallible")
    }

    /// Encodes the model as a JSON value.
    fn to_value(&self) -> Value {
        serde_json::to_value(self).expect("model serialization is infallible")
    }
}

pub(crate) fn check_id(
    model: &'static str,
    field: &'static str,
    kind: IdKind,
    value: &str,
) -> Result<(), DecodeError> {
    kind.decode(value)
        .map(drop)
        .map_err(|error| DecodeError::invalid(model, field, error.to_string()))
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Identifiers shared by the model tests.

    pub const BLOCK_HASH: &str = "bh$SeLqn3UAUoRymWmwW7axrzJK7JfNaBR2cHCryA6cFsgFkHEF";
    pub const PREV_BLOCK_HASH: &str = "bh$tHggZ5wKxbrxY2Yt1EAviybdDcKk9Mq4DZQiwKCDWkEaXE8U";
    pub const STATE_HASH: &str = "bs$2Kw2XL8QVSQHwJYKpWLktaxtwKuz7iYF5pqcauUHpmcvhHUVd";
    pub const TXS_HASH: &str = "bx$2maNN7AsevCiv546m1TLrSxCFSDeVHif7S7pSsdPS2VXEbkbG";
    pub const SENDER: &str = "ak$3DDiCtDLpQ19tqZshWZvpJwVZYXJrru593Q2JqnV3HN7aWk5h";
    pub const RECIPIENT: &str = "ak$3es43fFoysoasc5ee1gWnAvnsepyES5VAegEAowaeYEjtkvep";
    pub const SIGNATURE: &str = "sg$vKq9rnmsf1d9zxpbtHnR6H1RQsRpTuABfFsmS11bmPYvqGGX5PLP2iVUfJd3zzfk7N1txzPTnH1bNRgFjqgKbCsem7tD";

    /// Asserts that re-encoding a decoded payload is stable.
    pub fn assert_stable_round_trip<M: super::WireModel>(payload: &[u8]) {
        let first = M::decode(payload).expect("payload decodes").encode();
        let second = M::decode(&first).expect("encoded payload decodes").encode();
        assert_eq!(first, second);
    }
}
