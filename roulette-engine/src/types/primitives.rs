//! Validated primitive types for the wagering domain.
//!
//! These newtypes provide:
//! - Type safety (can't accidentally pass a round id as a stake)
//! - Validation at construction time
//! - Domain semantics in function signatures

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// PLAYER ID
// ═══════════════════════════════════════════════════════════════════════════════

/// Validated 32-byte player address.
///
/// The engine treats addresses as opaque; only equality and ordering of
/// arrival matter. Hex rendering uses a 0x prefix.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerId([u8; 32]);

impl PlayerId {
    /// Create from a fixed-size array (infallible).
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Try to create from a byte slice.
    ///
    /// # Errors
    /// Returns `InvalidPlayerId::WrongLength` if the slice is not exactly
    /// 32 bytes.
    pub fn from_slice(slice: &[u8]) -> Result<Self, InvalidPlayerId> {
        let bytes: [u8; 32] = slice
            .try_into()
            .map_err(|_| InvalidPlayerId::WrongLength(slice.len()))?;
        Ok(Self(bytes))
    }

    /// Parse from hex string (with or without 0x prefix).
    ///
    /// # Errors
    /// Returns `InvalidPlayerId` if the string is not valid hex or wrong
    /// length.
    pub fn from_hex(s: &str) -> Result<Self, InvalidPlayerId> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        if s.len() != 64 {
            return Err(InvalidPlayerId::WrongLength(s.len() / 2));
        }
        let bytes = hex::decode(s).map_err(|_| InvalidPlayerId::InvalidHex)?;
        Self::from_slice(&bytes)
    }

    /// Get the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to lowercase hex string with 0x prefix.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// The zero address.
    pub const ZERO: Self = Self([0u8; 32]);
}

impl fmt::Debug for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlayerId({})", self.to_hex())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<PlayerId> for String {
    fn from(id: PlayerId) -> Self {
        id.to_hex()
    }
}

impl TryFrom<String> for PlayerId {
    type Error = InvalidPlayerId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl TryFrom<&str> for PlayerId {
    type Error = InvalidPlayerId;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::from_hex(s)
    }
}

impl From<[u8; 32]> for PlayerId {
    fn from(bytes: [u8; 32]) -> Self {
        Self::new(bytes)
    }
}

/// Error for invalid player addresses.
#[derive(Debug, Clone, Error)]
pub enum InvalidPlayerId {
    /// Address has wrong byte length.
    #[error("wrong length: expected 32 bytes, got {0}")]
    WrongLength(usize),
    /// Address contains invalid hex characters.
    #[error("invalid hex encoding")]
    InvalidHex,
}

// ═══════════════════════════════════════════════════════════════════════════════
// ROUND ID
// ═══════════════════════════════════════════════════════════════════════════════

/// Round identifier newtype for clarity in function signatures.
///
/// Round ids are allocated monotonically by the engine and unique across
/// a deployment's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoundId(u64);

impl RoundId {
    /// Create a new round id.
    #[must_use]
    pub const fn new(n: u64) -> Self {
        Self(n)
    }

    /// Get the value.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Returns the next round id (saturating at `u64::MAX`).
    #[must_use]
    pub const fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl From<u64> for RoundId {
    fn from(n: u64) -> Self {
        Self(n)
    }
}

impl From<RoundId> for u64 {
    fn from(id: RoundId) -> Self {
        id.0
    }
}

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
