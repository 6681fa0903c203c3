use serde::{Deserialize, Serialize};

use super::{Tx, WireModel};
use crate::DecodeError;

/// Ordered list of transactions, encoded as a bare JSON array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transactions(Vec<Tx>);

impl Transactions {
    pub fn new(txs: Vec<Tx>) -> Self {
        Self(txs)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tx> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<Tx> {
        self.0
    }
}

impl<'a> IntoIterator for &'a Transactions {
    type Item = &'a Tx;
    type IntoIter = std::slice::Iter<'a, Tx>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Transactions {
    type Item = Tx;
    type IntoIter = std::vec::IntoIter<Tx>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl WireModel for Transactions {
    const NAME: &'static str = "Transactions";

    fn validate(&self) -> Result<(), DecodeError> {
        self.0.iter().try_for_each(Tx::validate)
    }
}
