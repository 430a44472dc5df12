//! Balance port.
//!
//! The engine is parametric in the asset it escrows. The minimum contract
//! consumed from the fungible token is value/merge/split; everything else
//! (minting, transfer semantics, supply) belongs to the token
//! implementation. Mixing assets within a round is impossible by
//! construction: a round's pool and every stake share one `B`.

// ═══════════════════════════════════════════════════════════════════════════════
// BALANCE PORT
// ═══════════════════════════════════════════════════════════════════════════════

/// Minimum fungible-asset contract the engine consumes.
pub trait Balance: Sized + Send {
    /// An empty balance.
    fn zero() -> Self;

    /// Current face value.
    fn value(&self) -> u64;

    /// Absorb another balance of the same asset.
    fn merge(&mut self, other: Self);

    /// Split off up to `amount`, leaving the remainder.
    ///
    /// Saturates: splitting more than the balance holds returns
    /// everything and leaves zero. Callers that need exactness check
    /// [`value`](Self::value) first.
    fn split(&mut self, amount: u64) -> Self;

    /// Whether the balance is empty.
    fn is_zero(&self) -> bool {
        self.value() == 0
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TOKEN BALANCE
// ═══════════════════════════════════════════════════════════════════════════════

/// Plain u64-counter rendition of [`Balance`].
///
/// The engine side of the split-counter-plus-transport scheme: this type
/// tracks face value, while a payout sink knows how to turn a balance
/// into an actual disbursement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenBalance(u64);

impl TokenBalance {
    /// Create a balance with the given face value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }
}

impl Balance for TokenBalance {
    fn zero() -> Self {
        Self(0)
    }

    fn value(&self) -> u64 {
        self.0
    }

    fn merge(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }

    fn split(&mut self, amount: u64) -> Self {
        let taken = self.0.min(amount);
        self.0 -= taken;
        Self(taken)
    }
}
