//! Error types for beacon verification.
//!
//! Wire-facing failures carry stable string codes (`drand-0`, `drand-1`)
//! so that callers relaying errors across process boundaries keep a fixed
//! vocabulary. Construction-time failures (malformed key material) have no
//! wire code; they never leave the deployment that misconfigured them.

use thiserror::Error;

/// Result type alias using [`BeaconError`].
pub type Result<T> = std::result::Result<T, BeaconError>;

/// Errors that can occur during beacon verification and draw selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum BeaconError {
    /// The randomness buffer handed to [`select`](crate::select) is too
    /// short to read a 128-bit integer from.
    ///
    /// Unreachable when the buffer comes from
    /// [`derive_randomness`](crate::derive_randomness), which always
    /// produces 32 bytes; the guard stays as defense-in-depth.
    #[error("randomness too short: got {len} bytes, need at least 16")]
    InvalidRndLength {
        /// Length of the rejected buffer.
        len: usize,
    },

    /// The signature did not verify under the beacon public key, or was
    /// not a valid G2 element at all.
    ///
    /// Both cases collapse into one kind: callers cannot act differently
    /// on "malformed" versus "forged".
    #[error("beacon signature rejected")]
    InvalidProof,

    /// The configured public key is not a valid compressed G1 element.
    #[error("beacon public key rejected")]
    InvalidPublicKey,

    /// Selection was asked to reduce modulo zero.
    #[error("selection modulus must be non-zero")]
    ZeroModulus,

    /// Key material handed to the test signer was rejected.
    #[error("signing key material rejected")]
    InvalidKeyMaterial,
}

impl BeaconError {
    /// Stable wire code for failures that cross process boundaries.
    ///
    /// Returns `None` for construction-time errors that stay local.
    #[must_use]
    pub const fn wire_code(&self) -> Option<&'static str> {
        match self {
            Self::InvalidRndLength { .. } => Some("drand-0"),
            Self::InvalidProof => Some("drand-1"),
            Self::InvalidPublicKey | Self::ZeroModulus | Self::InvalidKeyMaterial => None,
        }
    }
}
