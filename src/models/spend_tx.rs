use serde::{Deserialize, Serialize};

use super::{IdKind, WireModel, check_id};
use crate::DecodeError;

/// Transfer of tokens between two accounts.
///
/// `sender` and `nonce` are optional: when posted to the node's spend
/// endpoint they are filled in from the node's own account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendTx {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sender: Option<String>,
    recipient_pubkey: String,
    amount: u64,
    fee: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nonce: Option<u64>,
}

impl SpendTx {
    pub fn new(
        recipient_pubkey: impl Into<String>,
        amount: u64,
        fee: u64,
    ) -> Result<Self, DecodeError> {
        let tx = Self {
            sender: None,
            recipient_pubkey: recipient_pubkey.into(),
            amount,
            fee,
            nonce: None,
        };
        tx.validate()?;
        Ok(tx)
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Result<Self, DecodeError> {
        self.sender = Some(sender.into());
        self.validate()?;
        Ok(self)
    }

    #[must_use]
    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn sender(&self) -> Option<&str> {
        self.sender.as_deref()
    }

    pub fn recipient_pubkey(&self) -> &str {
        &self.recipient_pubkey
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn fee(&self) -> u64 {
        self.fee
    }

    pub fn nonce(&self) -> Option<u64> {
        self.nonce
    }
}

impl WireModel for SpendTx {
    const NAME: &'static str = "SpendTx";

    fn validate(&self) -> Result<(), DecodeError> {
        if let Some(sender) = &self.sender {
            check_id(Self::NAME, "sender", IdKind::AccountPubkey, sender)?;
        }
        check_id(
            Self::NAME,
            "recipient_pubkey",
            IdKind::AccountPubkey,
            &self.recipient_pubkey,
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::SpendTx;
    use crate::DecodeError;
    use crate::models::{WireModel, fixtures};

    #[test]
    fn builds_unsigned_spend() {
        let tx = SpendTx::new(fixtures::RECIPIENT, 100, 1).expect("valid");
        let encoded: serde_json::Value = serde_json::from_slice(&tx.encode()).expect("json");
        assert_eq!(
            encoded,
            json!({ "recipient_pubkey": fixtures::RECIPIENT, "amount": 100, "fee": 1 })
        );
    }

    #[test]
    fn decodes_full_spend() {
        let payload = json!({
            "sender": fixtures::SENDER,
            "recipient_pubkey": fixtures::RECIPIENT,
            "amount": 10,
            "fee": 2,
            "nonce": 7,
            "ttl": 100,
        })
        .to_string();

        let tx = SpendTx::decode(payload.as_bytes()).expect("valid");
        let expected = SpendTx::new(fixtures::RECIPIENT, 10, 2)
            .and_then(|tx| tx.with_sender(fixtures::SENDER))
            .expect("valid")
            .with_nonce(7);
        assert_eq!(tx, expected);
        fixtures::assert_stable_round_trip::<SpendTx>(payload.as_bytes());
    }

    #[test]
    fn missing_fee_is_rejected() {
        let payload = json!({ "recipient_pubkey": fixtures::RECIPIENT, "amount": 10 }).to_string();
        let error = SpendTx::decode(payload.as_bytes()).expect_err("missing fee");
        assert!(matches!(error, DecodeError::Malformed { .. }));
        assert_eq!(error.model(), "SpendTx");
    }

    #[test]
    fn recipient_must_be_an_account() {
        let error = SpendTx::new("ak$not-base58", 1, 1).expect_err("bad recipient");
        assert!(matches!(
            error,
            DecodeError::InvalidField {
                field: "recipient_pubkey",
                ..
            }
        ));
    }
}
