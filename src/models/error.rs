use serde::{Deserialize, Serialize};

use super::WireModel;

/// Error body returned by the node alongside a non-success status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Error {
    reason: String,
}

impl Error {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl WireModel for Error {
    const NAME: &'static str = "Error";
}
