//! Layered error types for the roulette engine.
//!
//! This module provides a hierarchical error system:
//!
//! - [`DomainError`] - Wagering rule violations (bad stakes, closed rounds)
//! - [`InfraError`] - Infrastructure errors (event sink, payout transport)
//! - [`AppError`] - Application-level errors combining the layers
//!
//! # Error Philosophy
//!
//! - Domain errors abort the operation atomically: no state mutation, no
//!   event emission. Each carries a wire-stable numeric code so external
//!   callers keep a fixed vocabulary.
//! - Beacon errors surface transparently from the verification crate and
//!   keep that crate's `drand-*` string codes.
//! - Nothing is logged as an event on failure; events describe only
//!   successful state transitions.

use thiserror::Error;

use crate::types::primitives::{PlayerId, RoundId};

// ═══════════════════════════════════════════════════════════════════════════════
// DOMAIN ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

/// Domain-level errors representing wagering rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DomainError {
    /// Stake outside the per-bet limits.
    #[error("stake {amount} outside limits [{min}, {max}]")]
    InvalidCoinValue {
        /// The offered stake.
        amount: u64,
        /// Minimum admissible stake (inclusive).
        min: u64,
        /// Maximum admissible stake (inclusive).
        max: u64,
    },

    /// Stake exceeds the round's remaining intake budget.
    #[error("stake {requested} exceeds remaining round budget {remaining}")]
    RoundNotAvailable {
        /// The offered stake.
        requested: u64,
        /// Remaining intake budget.
        remaining: u64,
    },

    /// The pool cannot cover the requested amount.
    #[error("pool holds {available}, cannot cover {requested}")]
    InsufficientPool {
        /// Amount that was requested.
        requested: u64,
        /// Amount actually available.
        available: u64,
    },

    /// The betting window has closed.
    #[error("betting closed at {closing_time}, now {now}")]
    RoundClosed {
        /// Current clock reading (ms).
        now: u64,
        /// Round closing time (ms).
        closing_time: u64,
    },

    /// The player already holds a bet in this round.
    #[error("player {0} already placed a bet")]
    AlreadyPlaced(PlayerId),

    /// Settlement attempted before the betting window closed.
    #[error("round open until {closing_time}, now {now}")]
    RoundNotFinished {
        /// Current clock reading (ms).
        now: u64,
        /// Round closing time (ms).
        closing_time: u64,
    },

    /// A bet named no outcomes at all.
    #[error("bet values must not be empty")]
    EmptyBetValues,

    /// A bet value falls outside the wheel.
    #[error("bet value {value} outside wheel [1, {wheel_size}]")]
    BetValueOutOfRange {
        /// The offending value.
        value: u8,
        /// Wheel size of the round.
        wheel_size: u8,
    },

    /// A bet names the same outcome twice.
    #[error("duplicate bet value {value}")]
    DuplicateBetValue {
        /// The repeated value.
        value: u8,
    },

    /// The round is already settled; no further mutation is possible.
    #[error("round {0} already settled")]
    RoundSettled(RoundId),

    /// No round exists under the given id.
    #[error("round {0} not found")]
    RoundNotFound(RoundId),

    /// Round parameters rejected at creation or update.
    #[error("invalid round parameters: {0}")]
    InvalidRoundParameters(String),
}

impl DomainError {
    /// Wire-stable numeric code for this error kind.
    ///
    /// Codes 0-5 match the original wire table; 6-9 extend it for the
    /// validations this engine adds (bet-value checks, settled-round
    /// guard, round lookup, parameter preconditions).
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::InvalidCoinValue { .. } => 0,
            Self::RoundNotAvailable { .. } => 1,
            Self::InsufficientPool { .. } => 2,
            Self::RoundClosed { .. } => 3,
            Self::AlreadyPlaced(_) => 4,
            Self::RoundNotFinished { .. } => 5,
            Self::EmptyBetValues
            | Self::BetValueOutOfRange { .. }
            | Self::DuplicateBetValue { .. } => 6,
            Self::RoundSettled(_) => 7,
            Self::RoundNotFound(_) => 8,
            Self::InvalidRoundParameters(_) => 9,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// INFRASTRUCTURE ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

/// Infrastructure-level errors from external collaborators.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InfraError {
    /// Event sink rejected an append.
    #[error("event sink error: {0}")]
    EventSink(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Payout transport failed to move funds.
    #[error("payout transport error: {0}")]
    Payout(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration file error.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

// ═══════════════════════════════════════════════════════════════════════════════
// APPLICATION ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

/// Application-level errors combining domain, beacon, and infrastructure.
///
/// This is the primary error type used throughout the engine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    /// Wagering rule violation.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Beacon verification or selection failure.
    #[error(transparent)]
    Beacon(#[from] beacon_verify::BeaconError),

    /// Infrastructure error.
    #[error(transparent)]
    Infra(#[from] InfraError),
}

/// Type alias for application Results.
pub type Result<T> = std::result::Result<T, AppError>;

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_codes_match_table() {
        let cases: Vec<(DomainError, u8)> = vec![
            (
                DomainError::InvalidCoinValue {
                    amount: 1,
                    min: 2,
                    max: 3,
                },
                0,
            ),
            (
                DomainError::RoundNotAvailable {
                    requested: 5,
                    remaining: 1,
                },
                1,
            ),
            (
                DomainError::InsufficientPool {
                    requested: 5,
                    available: 1,
                },
                2,
            ),
            (
                DomainError::RoundClosed {
                    now: 2,
                    closing_time: 1,
                },
                3,
            ),
            (DomainError::AlreadyPlaced(PlayerId::new([0; 32])), 4),
            (
                DomainError::RoundNotFinished {
                    now: 1,
                    closing_time: 2,
                },
                5,
            ),
            (DomainError::EmptyBetValues, 6),
            (
                DomainError::BetValueOutOfRange {
                    value: 99,
                    wheel_size: 38,
                },
                6,
            ),
            (DomainError::DuplicateBetValue { value: 7 }, 6),
            (DomainError::RoundSettled(RoundId::new(1)), 7),
            (DomainError::RoundNotFound(RoundId::new(1)), 8),
            (DomainError::InvalidRoundParameters("min > max".into()), 9),
        ];
        for (err, code) in cases {
            assert_eq!(err.code(), code, "{err}");
        }
    }

    #[test]
    fn app_error_from_domain() {
        let app: AppError = DomainError::EmptyBetValues.into();
        assert!(matches!(app, AppError::Domain(DomainError::EmptyBetValues)));
    }

    #[test]
    fn app_error_from_beacon_keeps_wire_code() {
        let app: AppError = beacon_verify::BeaconError::InvalidProof.into();
        let code = match app {
            AppError::Beacon(inner) => inner.wire_code(),
            AppError::Domain(_) | AppError::Infra(_) => None,
        };
        assert_eq!(code, Some("drand-1"));
    }

    #[test]
    fn domain_error_display() {
        let err = DomainError::InvalidCoinValue {
            amount: 500,
            min: 1_000,
            max: 10_000,
        };
        let rendered = err.to_string();
        assert!(rendered.contains("500"));
        assert!(rendered.contains("1000"));
    }
}
