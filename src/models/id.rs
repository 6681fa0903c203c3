use std::fmt;

use thiserror::Error;

/// Kinds of prefixed base58check identifiers used by the node.
///
/// On the wire an identifier is `<prefix>$<base58check(payload)>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdKind {
    BlockHash,
    BlockStateHash,
    BlockTxsHash,
    AccountPubkey,
    Signature,
}

impl IdKind {
    pub fn prefix(self) -> &'static str {
        match self {
            Self::BlockHash => "bh",
            Self::BlockStateHash => "bs",
            Self::BlockTxsHash => "bx",
            Self::AccountPubkey => "ak",
            Self::Signature => "sg",
        }
    }

    /// Length in bytes of the decoded payload.
    pub fn payload_len(self) -> usize {
        match self {
            Self::Signature => 64,
            _ => 32,
        }
    }

    /// Encodes a raw payload as an identifier of this kind.
    pub fn encode(self, payload: &[u8]) -> String {
        format!(
            "{}${}",
            self.prefix(),
            bs58::encode(payload).with_check().into_string()
        )
    }

    /// Checks prefix, checksum and length, returning the raw payload.
    pub fn decode(self, value: &str) -> Result<Vec<u8>, IdError> {
        let encoded = value
            .strip_prefix(self.prefix())
            .and_then(|rest| rest.strip_prefix('$'))
            .ok_or(IdError::Prefix { kind: self })?;

        let payload = bs58::decode(encoded).with_check(None).into_vec()?;
        if payload.len() != self.payload_len() {
            return Err(IdError::Length {
                kind: self,
                actual: payload.len(),
            });
        }
        Ok(payload)
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BlockHash => "block hash",
            Self::BlockStateHash => "block state hash",
            Self::BlockTxsHash => "block transactions hash",
            Self::AccountPubkey => "account public key",
            Self::Signature => "signature",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum IdError {
    #[error("expected a {kind} starting with '{}$'", .kind.prefix())]
    Prefix { kind: IdKind },

    #[error("invalid base58check encoding: {0}")]
    Base58(#[from] bs58::decode::Error),

    #[error("{kind} must be {} bytes, got {actual}", .kind.payload_len())]
    Length { kind: IdKind, actual: usize },
}

#[cfg(test)]
mod tests {
    use super::{IdError, IdKind};
    use crate::models::fixtures;

    #[test]
    fn encodes_known_block_hash() {
        assert_eq!(IdKind::BlockHash.encode(&[1; 32]), fixtures::BLOCK_HASH);
        let payload = IdKind::BlockHash.decode(fixtures::BLOCK_HASH);
        assert_eq!(payload.expect("valid"), vec![1; 32]);
    }

    #[test]
    fn signature_payload_is_64_bytes() {
        let payload = IdKind::Signature.decode(fixtures::SIGNATURE);
        assert_eq!(payload.expect("valid"), vec![7; 64]);
    }

    #[test]
    fn rejects_wrong_prefix() {
        let error = IdKind::AccountPubkey
            .decode(fixtures::BLOCK_HASH)
            .expect_err("block hash is not a pubkey");
        assert!(matches!(
            error,
            IdError::Prefix {
                kind: IdKind::AccountPubkey
            }
        ));
    }

    #[test]
    fn rejects_bad_checksum() {
        let error = IdKind::BlockHash
            .decode("bh$SeLqn3UAUoRymWmwW7axrzJK7JfNaBR2cHCryA6cFsc9JqpK")
            .expect_err("checksum mismatch");
        assert!(matches!(error, IdError::Base58(_)));
    }

    #[test]
    fn rejects_short_payload() {
        let short = IdKind::BlockHash.encode(&[1; 31]);
        let error = IdKind::BlockHash.decode(&short).expect_err("too short");
        assert!(matches!(
            error,
            IdError::Length {
                kind: IdKind::BlockHash,
                actual: 31
            }
        ));
    }
}
