use serde::{Deserialize, Serialize};

use super::{IdKind, WireModel, check_id};
use crate::DecodeError;

/// Balance of an account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    balance: u64,
    /// Account the balance belongs to. The node omits it when the account is
    /// implied by the request path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub_key: Option<String>,
}

impl Balance {
    pub fn new(balance: u64) -> Self {
        Self {
            balance,
            pub_key: None,
        }
    }

    pub fn with_pub_key(mut self, pub_key: impl Into<String>) -> Result<Self, DecodeError> {
        self.pub_key = Some(pub_key.into());
        self.validate()?;
        Ok(self)
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn pub_key(&self) -> Option<&str> {
        self.pub_key.as_deref()
    }
}

impl WireModel for Balance {
    const NAME: &'static str = "Balance";

    fn validate(&self) -> Result<(), DecodeError> {
        if let Some(pub_key) = &self.pub_key {
            check_id(Self::NAME, "pub_key", IdKind::AccountPubkey, pub_key)?;
        }
        Ok(())
    }
}
