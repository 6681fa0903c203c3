use serde::{Deserialize, Serialize};

use super::{IdKind, WireModel, check_id};
use crate::DecodeError;

/// Current head of the chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Top {
    hash: String,
    height: u64,
}

impl Top {
    pub fn new(hash: impl Into<String>, height: u64) -> Result<Self, DecodeError> {
        let top = Self {
            hash: hash.into(),
            height,
        };
        top.validate()?;
        Ok(top)
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn height(&self) -> u64 {
        self.height
    }
}

impl WireModel for Top {
    const NAME: &'static str = "Top";

    fn validate(&self) -> Result<(), DecodeError> {
        check_id(Self::NAME, "hash", IdKind::BlockHash, &self.hash)
    }
}
