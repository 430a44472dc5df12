//! Round lifecycle enumeration.

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════════
// ROUND STATE
// ═══════════════════════════════════════════════════════════════════════════════

/// Lifecycle state of a round.
///
/// The state is derived, not stored: a round is Open while the clock has
/// not passed its closing time, Closed once it has, and Settled after a
/// successful finish. The closure boundary is non-overlapping by design:
/// a bet at `now == closing_time` is admitted, a finish at the same
/// instant is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundState {
    /// Accepting bets (`now <= closing_time`).
    Open,
    /// Betting window passed, draw not yet applied.
    Closed,
    /// Draw applied and prizes disbursed; terminal.
    Settled,
}

impl RoundState {
    /// Human-readable name for display.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Closed => "Closed",
            Self::Settled => "Settled",
        }
    }

    /// Whether bets may still be admitted.
    #[must_use]
    pub const fn accepts_bets(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// Whether the round has reached its terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Settled)
    }
}
