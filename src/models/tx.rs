use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{IdKind, SpendTx, WireModel, check_id};
use crate::registry::{self, Model, ModelNotFound};
use crate::{DecodeError, Error};

/// Transaction type tags and the registered model of their payload.
const PAYLOAD_MODELS: &[(&str, &str)] = &[(Tx::SPEND, SpendTx::NAME)];

/// Transaction envelope: a type tag and the type-specific payload.
///
/// The payload is kept as raw JSON so that transactions of types this crate
/// does not model survive a decode/encode cycle untouched. Use
/// [`Tx::payload`] to resolve it to a typed model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tx {
    #[serde(rename = "type")]
    kind: String,
    data: Map<String, Value>,
    /// Empty for unsigned transactions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    signatures: Vec<String>,
}

impl Tx {
    /// Type tag of spend transactions.
    pub const SPEND: &'static str = "spend_tx";

    pub fn new(
        kind: impl Into<String>,
        data: Map<String, Value>,
    ) -> Result<Self, DecodeError> {
        let tx = Self {
            kind: kind.into(),
            data,
            signatures: Vec::new(),
        };
        tx.validate()?;
        Ok(tx)
    }

    /// Wraps a spend transaction in an unsigned envelope.
    pub fn from_spend(spend: &SpendTx) -> Self {
        let Value::Object(data) = spend.to_value() else {
            unreachable!("SpendTx always encodes as a JSON object");
        };
        Self {
            kind: Self::SPEND.to_owned(),
            data,
            signatures: Vec::new(),
        }
    }

    pub fn with_signatures(mut self, signatures: Vec<String>) -> Result<Self, DecodeError> {
        self.signatures = signatures;
        self.validate()?;
        Ok(self)
    }

    pub fn tx_type(&self) -> &str {
        &self.kind
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn signatures(&self) -> &[String] {
        &self.signatures
    }

    pub fn is_signed(&self) -> bool {
        !self.signatures.is_empty()
    }

    /// Registered model name of the payload, if the type tag is known.
    pub fn payload_model(&self) -> Option<&'static str> {
        PAYLOAD_MODELS
            .iter()
            .find(|(tag, _)| *tag == self.kind)
            .map(|(_, model)| *model)
    }

    /// Decodes the payload through the model registry.
    ///
    /// Unknown type tags fail with [`Error::ModelNotFound`].
    pub fn payload(&self) -> Result<Model, Error> {
        let name = self
            .payload_model()
            .ok_or_else(|| ModelNotFound(self.kind.clone()))?;
        let entry = registry::lookup(name)?;
        Ok((entry.decode_value)(Value::Object(self.data.clone()))?)
    }
}

impl WireModel for Tx {
    const NAME: &'static str = "Tx";

    fn validate(&self) -> Result<(), DecodeError> {
        if self.kind.is_empty() {
            return Err(DecodeError::invalid(Self::NAME, "type", "must not be empty"));
        }
        for signature in &self.signatures {
            check_id(Self::NAME, "signatures", IdKind::Signature, signature)?;
        }
        Ok(())
    }
}
