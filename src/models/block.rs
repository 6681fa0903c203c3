use serde::{Deserialize, Serialize};

use super::{IdKind, Tx, WireModel, check_id};
use crate::DecodeError;

/// A block with its header fields and transactions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Only present when the node includes the block's own hash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hash: Option<String>,
    height: u64,
    prev_hash: String,
    state_hash: String,
    txs_hash: String,
    target: u64,
    nonce: u64,
    /// Milliseconds since the Unix epoch.
    time: u64,
    version: u32,
    #[serde(default)]
    pow: Vec<u32>,
    #[serde(default)]
    transactions: Vec<Tx>,
}

impl Block {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        height: u64,
        prev_hash: impl Into<String>,
        state_hash: impl Into<String>,
        txs_hash: impl Into<String>,
        target: u64,
        nonce: u64,
        time: u64,
        version: u32,
    ) -> Result<Self, DecodeError> {
        let block = Self {
            hash: None,
            height,
            prev_hash: prev_hash.into(),
            state_hash: state_hash.into(),
            txs_hash: txs_hash.into(),
            target,
            nonce,
            time,
            version,
            pow: Vec::new(),
            transactions: Vec::new(),
        };
        block.validate()?;
        Ok(block)
    }

    pub fn with_hash(mut self, hash: impl Into<String>) -> Result<Self, DecodeError> {
        self.hash = Some(hash.into());
        self.validate()?;
        Ok(self)
    }

    #[must_use]
    pub fn with_pow(mut self, pow: Vec<u32>) -> Self {
        self.pow = pow;
        self
    }

    #[must_use]
    pub fn with_transactions(mut self, transactions: Vec<Tx>) -> Self {
        self.transactions = transactions;
        self
    }

    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn prev_hash(&self) -> &str {
        &self.prev_hash
    }

    pub fn state_hash(&self) -> &str {
        &self.state_hash
    }

    pub fn txs_hash(&self) -> &str {
        &self.txs_hash
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn time(&self) -> u64 {
        self.time
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn pow(&self) -> &[u32] {
        &self.pow
    }

    pub fn transactions(&self) -> &[Tx] {
        &self.transactions
    }
}

impl WireModel for Block {
    const NAME: &'static str = "Block";

    fn validate(&self) -> Result<(), DecodeError> {
        if let Some(hash) = &self.hash {
            check_id(Self::NAME, "hash", IdKind::BlockHash, hash)?;
        }
        check_id(Self::NAME, "prev_hash", IdKind::BlockHash, &self.prev_hash)?;
        check_id(
            Self::NAME,
            "state_hash",
            IdKind::BlockStateHash,
            &self.state_hash,
        )?;
        check_id(Self::NAME, "txs_hash", IdKind::BlockTxsHash, &self.txs_hash)?;
        self.transactions.iter().try_for_each(Tx::validate)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::Block;
    use crate::DecodeError;
    use crate::models::{SpendTx, Tx, WireModel, fixtures};

    fn block_json() -> Value {
        json!({
            "height": 12,
            "prev_hash": fixtures::PREV_BLOCK_HASH,
            "state_hash": fixtures::STATE_HASH,
            "txs_hash": fixtures::TXS_HASH,
            "target": 553_713_663,
            "nonce": 9012,
            "time": 1_507_121_283_000_u64,
            "version": 1,
            "pow": [1, 2, 3],
            "transactions": [
                { "type": "coinbase_tx", "data": { "account": fixtures::SENDER } },
            ],
        })
    }

    #[test]
    fn decodes_block() {
        let block = Block::decode(block_json().to_string().as_bytes()).expect("valid");
        assert_eq!(block.height(), 12);
        assert_eq!(block.hash(), None);
        assert_eq!(block.prev_hash(), fixtures::PREV_BLOCK_HASH);
        assert_eq!(block.pow(), [1, 2, 3]);
        assert_eq!(block.transactions().len(), 1);
        assert_eq!(block.to_value(), block_json());
    }

    #[test]
    fn round_trip_is_stable() {
        fixtures::assert_stable_round_trip::<Block>(block_json().to_string().as_bytes());
    }

    #[test]
    fn optional_collections_default_to_empty() {
        let mut payload = block_json();
        let object = payload.as_object_mut().expect("object");
        object.remove("pow");
        object.remove("transactions");
        object.insert("miner".to_owned(), json!("ignored"));

        let block = Block::decode(payload.to_string().as_bytes()).expect("valid");
        assert!(block.pow().is_empty());
        assert!(block.transactions().is_empty());
    }

    #[test]
    fn missing_prev_hash_is_rejected() {
        let mut payload = block_json();
        payload.as_object_mut().expect("object").remove("prev_hash");
        let error = Block::decode(payload.to_string().as_bytes()).expect_err("missing field");
        assert!(matches!(error, DecodeError::Malformed { model: "Block", .. }));
    }

    #[test]
    fn hashes_are_checked_by_kind() {
        let mut payload = block_json();
        payload["state_hash"] = json!(fixtures::TXS_HASH);
        let error = Block::decode(payload.to_string().as_bytes()).expect_err("wrong prefix");
        assert!(matches!(
            error,
            DecodeError::InvalidField {
                field: "state_hash",
                ..
            }
        ));
    }

    #[test]
    fn negative_height_is_rejected() {
        let mut payload = block_json();
        payload["height"] = json!(-1);
        assert!(Block::decode(payload.to_string().as_bytes()).is_err());
    }

    #[test]
    fn builds_block_for_posting() {
        let spend = SpendTx::new(fixtures::RECIPIENT, 1, 1).expect("valid");
        let block = Block::new(
            13,
            fixtures::BLOCK_HASH,
            fixtures::STATE_HASH,
            fixtures::TXS_HASH,
            553_713_663,
            1,
            1_507_121_284_000,
            1,
        )
        .and_then(|block| block.with_hash(fixtures::PREV_BLOCK_HASH))
        .expect("valid")
        .with_transactions(vec![Tx::from_spend(&spend)]);

        let decoded = Block::decode(&block.encode()).expect("valid");
        assert_eq!(decoded, block);
    }
}
