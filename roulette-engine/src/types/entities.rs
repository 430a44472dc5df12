//! Domain entities recorded by the bet ledger.

use serde::{Deserialize, Serialize};

use super::primitives::PlayerId;

// ═══════════════════════════════════════════════════════════════════════════════
// BET
// ═══════════════════════════════════════════════════════════════════════════════

/// A single admitted bet.
///
/// `values` is validated at admission: non-empty, each in
/// `[1, wheel_size]`, no duplicates. The prize divisor is `values.len()`,
/// so duplicate rejection keeps the payout formula honest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bet {
    /// Address of the bettor.
    pub player: PlayerId,
    /// Stake escrowed into the round pool.
    pub amount: u64,
    /// Distinct wheel outcomes this bet covers.
    pub values: Vec<u8>,
}

impl Bet {
    /// Whether this bet covers the drawn winning number.
    #[must_use]
    pub fn covers(&self, winner: u8) -> bool {
        self.values.contains(&winner)
    }

    /// Number of outcomes covered (the prize divisor).
    #[must_use]
    pub fn way_count(&self) -> usize {
        self.values.len()
    }
}
