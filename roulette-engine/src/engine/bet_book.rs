//! Insertion-ordered bet ledger.
//!
//! One record per player per round. The draw traversal replays the book
//! in exactly the order bets were admitted, and that order survives
//! persistence, so an auditor can reproduce every settlement.

use indexmap::IndexMap;

use crate::types::entities::Bet;
use crate::types::primitives::PlayerId;

// ═══════════════════════════════════════════════════════════════════════════════
// BET BOOK
// ═══════════════════════════════════════════════════════════════════════════════

/// Ordered mapping from player to their single bet in a round.
#[derive(Debug, Default)]
pub struct BetBook {
    entries: IndexMap<PlayerId, Bet>,
}

impl BetBook {
    /// Create an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the player already holds a bet.
    #[must_use]
    pub fn contains(&self, player: &PlayerId) -> bool {
        self.entries.contains_key(player)
    }

    /// Record a bet.
    ///
    /// Precondition: `!contains(player)`. The round engine checks this
    /// before calling; a repeated insert would overwrite, so the caller
    /// must not let it happen.
    pub fn insert(&mut self, player: PlayerId, bet: Bet) {
        debug_assert!(!self.entries.contains_key(&player));
        self.entries.insert(player, bet);
    }

    /// Look up a player's bet.
    #[must_use]
    pub fn get(&self, player: &PlayerId) -> Option<&Bet> {
        self.entries.get(player)
    }

    /// Iterate bets in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&PlayerId, &Bet)> {
        self.entries.iter()
    }

    /// Number of recorded bets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the book is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all recorded stakes.
    #[must_use]
    pub fn total_staked(&self) -> u64 {
        self.entries
            .values()
            .fold(0u64, |acc, bet| acc.saturating_add(bet.amount))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
