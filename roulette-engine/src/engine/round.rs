//! Per-round state machine.
//!
//! A round moves OPEN → CLOSED → SETTLED. The first transition is purely
//! a function of the clock; the second happens exactly once, when a
//! verified beacon settles the draw. Rounds are never destroyed: settled
//! rounds stay retrievable as audit evidence, bet order intact.

use crate::engine::bet_book::BetBook;
use crate::engine::pool::Pool;
use crate::engine::wheel::WheelConfig;
use crate::error::DomainError;
use crate::ports::balance::Balance;
use crate::types::entities::Bet;
use crate::types::enums::RoundState;
use crate::types::primitives::{PlayerId, RoundId};

// ═══════════════════════════════════════════════════════════════════════════════
// ROUND CONFIG
// ═══════════════════════════════════════════════════════════════════════════════

/// All state owned by one round.
///
/// The round is an exclusively owned resource during any mutating
/// operation; the host serializes concurrent transactions touching the
/// same round. Operations on distinct rounds may proceed in parallel.
#[derive(Debug)]
pub struct RoundConfig<B: Balance> {
    /// Unique id, fixed at creation.
    round: RoundId,
    /// Escrowed stakes plus seed liquidity.
    pool: Pool<B>,
    /// Minimum single-bet stake (inclusive).
    min_value: u64,
    /// Maximum single-bet stake (inclusive).
    max_value: u64,
    /// Remaining admissible bet budget.
    total_amount: u64,
    /// Bets strictly after this instant are rejected (ms).
    closing_time: u64,
    /// Bet ledger, stable insertion order.
    players: BetBook,
    /// Wheel parameters captured at creation.
    wheel: WheelConfig,
    /// Winning payouts delivered so far, across settlement attempts.
    prizes_paid: usize,
    /// Set exactly once, by settlement.
    settled: bool,
}

impl<B: Balance> RoundConfig<B> {
    pub(crate) fn new(
        round: RoundId,
        seed: B,
        min_value: u64,
        max_value: u64,
        total_amount: u64,
        closing_time: u64,
        wheel: WheelConfig,
    ) -> Self {
        Self {
            round,
            pool: Pool::new(seed),
            min_value,
            max_value,
            total_amount,
            closing_time,
            players: BetBook::new(),
            wheel,
            prizes_paid: 0,
            settled: false,
        }
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Accessors
    // ───────────────────────────────────────────────────────────────────────────

    /// Round id.
    #[must_use]
    pub const fn round(&self) -> RoundId {
        self.round
    }

    /// Minimum admissible stake.
    #[must_use]
    pub const fn min_value(&self) -> u64 {
        self.min_value
    }

    /// Maximum admissible stake.
    #[must_use]
    pub const fn max_value(&self) -> u64 {
        self.max_value
    }

    /// Remaining intake budget.
    #[must_use]
    pub const fn total_amount(&self) -> u64 {
        self.total_amount
    }

    /// Betting window close (ms since epoch, inclusive).
    #[must_use]
    pub const fn closing_time(&self) -> u64 {
        self.closing_time
    }

    /// Current pool face value.
    #[must_use]
    pub fn pool_value(&self) -> u64 {
        self.pool.value()
    }

    /// The bet ledger, in admission order.
    #[must_use]
    pub const fn bets(&self) -> &BetBook {
        &self.players
    }

    /// Wheel parameters this round runs under.
    #[must_use]
    pub const fn wheel(&self) -> &WheelConfig {
        &self.wheel
    }

    /// Winning payouts delivered so far.
    ///
    /// Non-zero on an unsettled round means a settlement attempt
    /// delivered a prefix of the payouts before its transport failed;
    /// the next attempt resumes after them.
    #[must_use]
    pub const fn prizes_paid(&self) -> usize {
        self.prizes_paid
    }

    /// Lifecycle state at the given instant.
    ///
    /// A bet at `now == closing_time` is still admitted; settlement
    /// requires `now > closing_time`. The boundary is non-overlapping so
    /// no instant allows both.
    #[must_use]
    pub const fn state(&self, now: u64) -> RoundState {
        if self.settled {
            RoundState::Settled
        } else if now <= self.closing_time {
            RoundState::Open
        } else {
            RoundState::Closed
        }
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Mutations (crate-internal; the engine is the only caller)
    // ───────────────────────────────────────────────────────────────────────────

    /// Validate and record a bet, escrowing the stake.
    ///
    /// Checks run in a fixed order and the first failure aborts with no
    /// state change: bet shape, stake limits, intake budget, betting
    /// window, one-bet-per-player.
    pub(crate) fn admit_bet(
        &mut self,
        player: PlayerId,
        values: Vec<u8>,
        stake: B,
        now: u64,
    ) -> Result<Bet, DomainError> {
        validate_values(&values, self.wheel.wheel_size())?;

        let input = stake.value();
        if input < self.min_value || input > self.max_value {
            return Err(DomainError::InvalidCoinValue {
                amount: input,
                min: self.min_value,
                max: self.max_value,
            });
        }
        if input > self.total_amount {
            return Err(DomainError::RoundNotAvailable {
                requested: input,
                remaining: self.total_amount,
            });
        }
        if now > self.closing_time {
            return Err(DomainError::RoundClosed {
                now,
                closing_time: self.closing_time,
            });
        }
        if self.players.contains(&player) {
            return Err(DomainError::AlreadyPlaced(player));
        }

        self.total_amount -= input;
        let bet = Bet {
            player,
            amount: input,
            values,
        };
        self.players.insert(player, bet.clone());
        self.pool.deposit(stake);
        Ok(bet)
    }

    /// Overwrite the scalar limits and join extra liquidity.
    ///
    /// Permitted only while OPEN; the closing time is immutable.
    pub(crate) fn apply_update(
        &mut self,
        min_value: u64,
        max_value: u64,
        total_amount: u64,
        extra: B,
        now: u64,
    ) -> Result<(), DomainError> {
        match self.state(now) {
            RoundState::Open => {}
            RoundState::Closed => {
                return Err(DomainError::RoundClosed {
                    now,
                    closing_time: self.closing_time,
                });
            }
            RoundState::Settled => return Err(DomainError::RoundSettled(self.round)),
        }
        if min_value > max_value {
            return Err(DomainError::InvalidRoundParameters(format!(
                "min stake {min_value} exceeds max stake {max_value}"
            )));
        }
        self.min_value = min_value;
        self.max_value = max_value;
        self.total_amount = total_amount;
        self.pool.deposit(extra);
        Ok(())
    }

    /// Withdraw funds for the operator.
    ///
    /// Allowed while OPEN (emergency drain) or after settlement
    /// (leftovers), never in the CLOSED gap where a draw is pending.
    pub(crate) fn withdraw_funds(&mut self, amount: u64, now: u64) -> Result<B, DomainError> {
        if self.state(now) == RoundState::Closed {
            return Err(DomainError::RoundNotFinished {
                now,
                closing_time: self.closing_time,
            });
        }
        self.pool.withdraw(amount)
    }

    /// Prizes owed for a drawn winner, in bet admission order.
    ///
    /// Pure computation; nothing moves until the caller withdraws.
    pub(crate) fn winning_payouts(&self, winner: u8) -> Vec<(PlayerId, u64)> {
        self.players
            .iter()
            .filter(|(_, bet)| bet.covers(winner))
            .map(|(player, bet)| (*player, self.wheel.prize(bet.amount, bet.way_count())))
            .collect()
    }

    /// Withdraw one prize from the pool.
    pub(crate) fn withdraw_prize(&mut self, amount: u64) -> Result<B, DomainError> {
        self.pool.withdraw(amount)
    }

    /// Return an undelivered balance to escrow.
    pub(crate) fn refund(&mut self, funds: B) {
        self.pool.deposit(funds);
    }

    /// Record one more payout as delivered.
    pub(crate) const fn record_prize_paid(&mut self) {
        self.prizes_paid = self.prizes_paid.saturating_add(1);
    }

    /// Empty the pool for the residual drain.
    pub(crate) fn drain_pool(&mut self) -> B {
        self.pool.drain()
    }

    /// Enter the terminal state.
    pub(crate) const fn mark_settled(&mut self) {
        self.settled = true;
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// BET SHAPE VALIDATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Check a bet's outcome set: non-empty, in `[1, wheel_size]`, distinct.
///
/// Out-of-range values could never win but would still consume stake;
/// duplicates would inflate the prize divisor. Both are rejected.
fn validate_values(values: &[u8], wheel_size: u8) -> Result<(), DomainError> {
    if values.is_empty() {
        return Err(DomainError::EmptyBetValues);
    }
    let mut seen = [false; 256];
    for &value in values {
        if value == 0 || value > wheel_size {
            return Err(DomainError::BetValueOutOfRange { value, wheel_size });
        }
        if seen[value as usize] {
            return Err(DomainError::DuplicateBetValue { value });
        }
        seen[value as usize] = true;
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
