//! Wheel parameters and prize arithmetic.

use beacon_verify::select;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

// ═══════════════════════════════════════════════════════════════════════════════
// WHEEL CONFIG
// ═══════════════════════════════════════════════════════════════════════════════

/// Wheel size and payout numerator for a deployment.
///
/// Captured into each round at creation, so settled rounds audit against
/// the parameters they actually ran under even if the deployment is later
/// reconfigured.
///
/// The defaults model a 38-pocket wheel paying 36x on a single-number
/// hit: a bet on `k` distinct numbers returns `stake * 36 / k`, for an
/// expected return of `36/38 ≈ 0.9474` per staked unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelConfig {
    wheel_size: u8,
    payout_numerator: u64,
}

impl WheelConfig {
    /// Create a wheel, validating both parameters are usable.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidRoundParameters` if the wheel has
    /// fewer than two pockets or the payout numerator is zero.
    pub fn new(wheel_size: u8, payout_numerator: u64) -> Result<Self, DomainError> {
        if wheel_size < 2 {
            return Err(DomainError::InvalidRoundParameters(format!(
                "wheel size {wheel_size} must be at least 2"
            )));
        }
        if payout_numerator == 0 {
            return Err(DomainError::InvalidRoundParameters(
                "payout numerator must be non-zero".into(),
            ));
        }
        Ok(Self {
            wheel_size,
            payout_numerator,
        })
    }

    /// Number of pockets on the wheel; outcomes are `[1, wheel_size]`.
    #[must_use]
    pub const fn wheel_size(&self) -> u8 {
        self.wheel_size
    }

    /// Single-number payout multiplier.
    #[must_use]
    pub const fn payout_numerator(&self) -> u64 {
        self.payout_numerator
    }

    /// Reduce a derived digest to a winning number in `[1, wheel_size]`.
    ///
    /// # Errors
    /// Propagates the selector's length guard.
    pub fn winning_number(&self, digest: &[u8]) -> beacon_verify::Result<u8> {
        Ok(select(self.wheel_size, digest)? + 1)
    }

    /// Prize for a winning stake spread over `ways` distinct numbers.
    ///
    /// Integer division; the remainder stays in the pool.
    #[must_use]
    pub fn prize(&self, stake: u64, ways: usize) -> u64 {
        if ways == 0 {
            return 0;
        }
        stake.saturating_mul(self.payout_numerator) / ways as u64
    }

    /// Worst-case payout obligation for a given intake budget.
    ///
    /// Every staked unit can come back multiplied by the payout
    /// numerator when each bet covers a single number and wins.
    #[must_use]
    pub const fn max_obligation(&self, total_amount: u64) -> u64 {
        total_amount.saturating_mul(self.payout_numerator)
    }
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            wheel_size: 38,
            payout_numerator: 36,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
