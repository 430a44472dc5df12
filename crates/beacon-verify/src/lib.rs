//! Verification primitives for an external BLS randomness beacon.
//!
//! This crate provides [`BeaconVerifier`], which checks that a beacon
//! signature is a valid BLS12-381 min-pk signature over the SHA-256 hash
//! of a round seed, together with the two pure functions that turn a
//! verified signature into a draw:
//!
//! - [`derive_randomness`] binds the signature to a caller-chosen
//!   instant (typically the round's committed closing time), producing
//!   a 32-byte uniform digest
//! - [`select`] reduces the digest to a winning slot with bias bounded by
//!   2^-64
//!
//! # Crate Relationships
//!
//! This is a **low-level crate** in the roulette stack:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  Application Layer (roulette-engine)                     │
//! │  └─ settles rounds against verified beacons              │
//! └────────────────────────────┬─────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │  Crypto Layer (beacon-verify) ◄── YOU ARE HERE           │
//! │  └─ BLS verification, digest derivation, selection       │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use beacon_verify::{BeaconVerifier, derive_randomness, select};
//!
//! let verifier = BeaconVerifier::from_hex(PUBLIC_KEY_HEX)?;
//! verifier.verify(&sig, &seed)?;
//!
//! let digest = derive_randomness(&sig, closing_time_ms);
//! let slot = select(38, &digest)?;
//! ```
//!
//! # Why min-pk?
//!
//! The beacon publishes a 48-byte G1 public key and 96-byte G2 signatures,
//! the "minimal public key" BLS12-381 variant. BLS signatures are
//! deterministic: once the beacon signs a seed, the draw derived from that
//! signature is fixed, so the only remaining operator freedom is the
//! binding instant mixed in by [`derive_randomness`] — which callers
//! remove by pinning it to a value committed before bets were taken.

mod error;
mod verify;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use error::{BeaconError, Result};
pub use verify::{
    BeaconVerifier, DIGEST_LEN, DST, PUBLIC_KEY_LEN, SELECTOR_INPUT_LEN, SIGNATURE_LEN,
    derive_randomness, select,
};
