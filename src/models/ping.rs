use serde::{Deserialize, Serialize};

use super::{IdKind, WireModel, check_id};
use crate::DecodeError;

/// Handshake exchanged between peers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ping {
    /// Address the sending peer is reachable at.
    source: String,
    genesis_hash: String,
    best_hash: String,
    difficulty: f64,
    /// Number of peers the sender asks to receive back.
    share: u32,
    #[serde(default)]
    peers: Vec<String>,
}

impl Ping {
    pub fn new(
        source: impl Into<String>,
        genesis_hash: impl Into<String>,
        best_hash: impl Into<String>,
        difficulty: f64,
        share: u32,
    ) -> Result<Self, DecodeError> {
        let ping = Self {
            source: source.into(),
            genesis_hash: genesis_hash.into(),
            best_hash: best_hash.into(),
            difficulty,
            share,
            peers: Vec::new(),
        };
        ping.validate()?;
        Ok(ping)
    }

    #[must_use]
    pub fn with_peers(mut self, peers: Vec<String>) -> Self {
        self.peers = peers;
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn genesis_hash(&self) -> &str {
        &self.genesis_hash
    }

    pub fn best_hash(&self) -> &str {
        &self.best_hash
    }

    pub fn difficulty(&self) -> f64 {
        self.difficulty
    }

    pub fn share(&self) -> u32 {
        self.share
    }

    pub fn peers(&self) -> &[String] {
        &self.peers
    }
}

impl WireModel for Ping {
    const NAME: &'static str = "Ping";

    fn validate(&self) -> Result<(), DecodeError> {
        if self.source.is_empty() {
            return Err(DecodeError::invalid(Self::NAME, "source", "must not be empty"));
        }
        if !self.difficulty.is_finite() || self.difficulty < 0.0 {
            return Err(DecodeError::invalid(
                Self::NAME,
                "difficulty",
                format!(
                    "must be a finite non-negative number, got {}",
                    self.difficulty
                ),
            ));
        }
        check_id(
            Self::NAME,
            "genesis_hash",
            IdKind::BlockHash,
            &self.genesis_hash,
        )?;
        check_id(Self::NAME, "best_hash", IdKind::BlockHash, &self.best_hash)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::Ping;
    use crate::DecodeError;
    use crate::models::{WireModel, fixtures};

    fn ping_json() -> serde_json::Value {
        json!({
            "source": "http://127.0.0.1:3013",
            "genesis_hash": fixtures::PREV_BLOCK_HASH,
            "best_hash": fixtures::BLOCK_HASH,
            "difficulty": 1.5,
            "share": 32,
            "peers": ["http://10.0.0.2:3013"],
        })
    }

    #[test]
    fn decodes_ping() {
        let ping = Ping::decode(ping_json().to_string().as_bytes()).expect("valid");
        assert_eq!(ping.share(), 32);
        assert!((ping.difficulty() - 1.5).abs() < f64::EPSILON);
        assert_eq!(ping.peers(), ["http://10.0.0.2:3013"]);
        fixtures::assert_stable_round_trip::<Ping>(ping_json().to_string().as_bytes());
    }

    #[test]
    fn integer_difficulty_is_accepted() {
        let mut payload = ping_json();
        payload["difficulty"] = json!(3);
        let ping = Ping::decode(payload.to_string().as_bytes()).expect("valid");
        assert!((ping.difficulty() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn negative_difficulty_is_rejected() {
        let mut payload = ping_json();
        payload["difficulty"] = json!(-0.5);
        let error = Ping::decode(payload.to_string().as_bytes()).expect_err("negative");
        assert!(matches!(
            error,
            DecodeError::InvalidField {
                field: "difficulty",
                ..
            }
        ));
    }

    #[test]
    fn non_finite_difficulty_cannot_be_built() {
        let error = Ping::new(
            "peer",
            fixtures::BLOCK_HASH,
            fixtures::BLOCK_HASH,
            f64::NAN,
            1,
        )
        .expect_err("nan");
        assert_eq!(error.model(), "Ping");
    }

    #[test]
    fn missing_best_hash_is_rejected() {
        let mut payload = ping_json();
        payload.as_object_mut().expect("object").remove("best_hash");
        let error = Ping::decode(payload.to_string().as_bytes()).expect_err("missing");
        assert!(matches!(error, DecodeError::Malformed { model: "Ping", .. }));
    }
}
