//! Per-round prize pool.
//!
//! The pool escrows seed liquidity and every admitted stake for one
//! round. There is no internal synchronization: the enclosing round owns
//! the pool exclusively, and the host serializes operations per round.

use crate::error::DomainError;
use crate::ports::balance::Balance;

// ═══════════════════════════════════════════════════════════════════════════════
// POOL
// ═══════════════════════════════════════════════════════════════════════════════

/// Single-asset escrow for one round.
#[derive(Debug)]
pub struct Pool<B: Balance> {
    funds: B,
}

impl<B: Balance> Pool<B> {
    /// Open a pool with seed liquidity.
    pub fn new(seed: B) -> Self {
        Self { funds: seed }
    }

    /// Current face value.
    pub fn value(&self) -> u64 {
        self.funds.value()
    }

    /// Escrow additional funds.
    pub fn deposit(&mut self, funds: B) {
        self.funds.merge(funds);
    }

    /// Withdraw exactly `amount`.
    ///
    /// # Errors
    /// Returns `DomainError::InsufficientPool` if the pool holds less
    /// than `amount`; the pool is untouched in that case.
    pub fn withdraw(&mut self, amount: u64) -> Result<B, DomainError> {
        let available = self.funds.value();
        if amount > available {
            return Err(DomainError::InsufficientPool {
                requested: amount,
                available,
            });
        }
        Ok(self.funds.split(amount))
    }

    /// Withdraw everything, leaving the pool empty.
    pub fn drain(&mut self) -> B {
        let value = self.funds.value();
        self.funds.split(value)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
