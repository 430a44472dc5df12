//! Strongly-typed records appended to the event channel.
//!
//! Events are emitted strictly after the state mutation they describe, so
//! observers never see an event for a change that was rolled back. Two
//! records exist: one per accepted bet, one per settled round.

use serde::{Deserialize, Serialize};

use super::primitives::{PlayerId, RoundId};

// ═══════════════════════════════════════════════════════════════════════════════
// UNIFIED EVENT ENUM
// ═══════════════════════════════════════════════════════════════════════════════

/// Unified enum for all engine events.
///
/// # Serialization
///
/// Events are serialized with a type tag for deserialization:
/// ```json
/// {"NewBet": {"round": 3, "player": "0x...", "amount": "1000000", ...}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum RouletteEvent {
    /// A bet was admitted into a round.
    NewBet(NewBetEvent),
    /// A round was drawn and settled.
    RoundResult(RoundResultEvent),
}

impl RouletteEvent {
    /// Get the event type name (for logging/metrics).
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::NewBet(_) => "NewBet",
            Self::RoundResult(_) => "RoundResult",
        }
    }

    /// The round this event belongs to.
    #[must_use]
    pub const fn round(&self) -> RoundId {
        match self {
            Self::NewBet(e) => e.round,
            Self::RoundResult(e) => e.round,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// EVENT RECORDS
// ═══════════════════════════════════════════════════════════════════════════════

/// A bet was admitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBetEvent {
    /// Round the bet entered.
    pub round: RoundId,
    /// Bettor's address.
    pub player: PlayerId,
    /// Stake admitted (after validation).
    pub amount: u64,
    /// Outcomes the bet covers.
    pub values: Vec<u8>,
}

/// A round was drawn and settled. Emitted exactly once per round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResultEvent {
    /// The settled round.
    pub round: RoundId,
    /// Beacon seed the draw was verified against.
    pub seed: Vec<u8>,
    /// Winning wheel number.
    pub random: u8,
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
