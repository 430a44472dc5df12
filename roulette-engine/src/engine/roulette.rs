//! Engine orchestrator.
//!
//! [`RouletteEngine`] owns the global round counter and every round's
//! state, and coordinates the outward-facing collaborators: the beacon
//! verifier, the clock, the event sink, and the payout transport.
//!
//! # Round Lifecycle
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ create_round │────▶│     bet      │────▶│    finish    │
//! │   (admin)    │     │  (0..N bets) │     │   (admin)    │
//! └──────────────┘     └──────────────┘     └──────┬───────┘
//!                                                  │
//!                        prizes ──▶ winners        │
//!                        residual ──▶ operator  ◀──┘
//! ```
//!
//! Every mutating entry point reads the clock once, applies the round
//! state machine, and only then touches the outward ports, so a failure
//! in validation leaves no trace and emits nothing.

use std::fmt;

use beacon_verify::{BeaconVerifier, derive_randomness};
use indexmap::IndexMap;
use tracing::{info, instrument, warn};

use crate::admin::AdminCapability;
use crate::engine::round::RoundConfig;
use crate::engine::wheel::WheelConfig;
use crate::error::{DomainError, Result};
use crate::ports::balance::Balance;
use crate::ports::clock::Clock;
use crate::ports::sink::{EventSink, PayoutSink};
use crate::types::enums::RoundState;
use crate::types::events::{NewBetEvent, RoundResultEvent, RouletteEvent};
use crate::types::primitives::{PlayerId, RoundId};

// ═══════════════════════════════════════════════════════════════════════════════
// GLOBAL STATE
// ═══════════════════════════════════════════════════════════════════════════════

/// Process-wide counter backing round id allocation.
///
/// Incremented only inside `create_round`, in the same exclusive borrow
/// that inserts the new round, so ids are unique across the deployment's
/// history.
#[derive(Debug, Default)]
struct RouletteConfig {
    current_round: u64,
}

// ═══════════════════════════════════════════════════════════════════════════════
// ROULETTE ENGINE
// ═══════════════════════════════════════════════════════════════════════════════

/// The round engine.
///
/// Generic over the escrowed asset and the three host-provided ports.
/// All mutating methods take `&mut self`: the engine is a single-writer
/// resource, and hosts that need concurrency run one engine task per
/// deployment (rounds are independent, but the round counter is shared).
pub struct RouletteEngine<B, C, E, P>
where
    B: Balance,
    C: Clock,
    E: EventSink,
    P: PayoutSink<B>,
{
    /// Beacon verifier under the deployment public key.
    verifier: BeaconVerifier,
    /// Wheel parameters stamped into new rounds.
    wheel: WheelConfig,
    /// Recipient of residual drains and the implied trust anchor.
    operator: PlayerId,
    /// Trusted time source.
    clock: C,
    /// Event log appends.
    events: E,
    /// Fund disbursement transport.
    payouts: P,
    /// Global round counter.
    config: RouletteConfig,
    /// Every round ever created, keyed by id, kept for audit.
    rounds: IndexMap<RoundId, RoundConfig<B>>,
}

impl<B, C, E, P> RouletteEngine<B, C, E, P>
where
    B: Balance,
    C: Clock,
    E: EventSink,
    P: PayoutSink<B>,
{
    /// Create an engine and issue its admin capability.
    ///
    /// The capability is issued exactly once; protecting it afterwards
    /// is the operator's problem, not the engine's.
    pub fn new(
        verifier: BeaconVerifier,
        wheel: WheelConfig,
        operator: PlayerId,
        clock: C,
        events: E,
        payouts: P,
    ) -> (Self, AdminCapability) {
        let engine = Self {
            verifier,
            wheel,
            operator,
            clock,
            events,
            payouts,
            config: RouletteConfig::default(),
            rounds: IndexMap::new(),
        };
        (engine, AdminCapability::issue())
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Admin operations
    // ───────────────────────────────────────────────────────────────────────────

    /// Open a new round.
    ///
    /// Allocates the next round id, sets `closing_time = now + period_ms`
    /// and escrows `seed` as initial liquidity. Underfunded parameter
    /// choices are legal but logged; see [`finish`](Self::finish) for
    /// where they bite.
    ///
    /// # Errors
    /// Returns `InvalidRoundParameters` if `min_value > max_value` or
    /// `period_ms == 0`.
    #[instrument(skip(self, _cap, seed))]
    pub fn create_round(
        &mut self,
        _cap: &AdminCapability,
        min_value: u64,
        max_value: u64,
        total_amount: u64,
        period_ms: u64,
        seed: B,
    ) -> Result<RoundId> {
        if min_value > max_value {
            return Err(DomainError::InvalidRoundParameters(format!(
                "min stake {min_value} exceeds max stake {max_value}"
            ))
            .into());
        }
        if period_ms == 0 {
            return Err(
                DomainError::InvalidRoundParameters("betting period must be non-zero".into())
                    .into(),
            );
        }

        let now = self.clock.now_ms();
        let round = RoundId::new(self.config.current_round);
        let closing_time = now.saturating_add(period_ms);

        if let Some(shortfall) = solvency_shortfall(&self.wheel, seed.value(), 0, total_amount) {
            warn!(
                round = %round,
                pool = seed.value(),
                total_amount,
                shortfall,
                "round parameters admit insolvency; worst-case payouts exceed pool"
            );
        }

        self.rounds.insert(
            round,
            RoundConfig::new(
                round,
                seed,
                min_value,
                max_value,
                total_amount,
                closing_time,
                self.wheel,
            ),
        );
        self.config.current_round = self.config.current_round.saturating_add(1);

        info!(round = %round, closing_time, "round created");
        Ok(round)
    }

    /// Overwrite a round's scalar limits and join extra liquidity.
    ///
    /// Permitted only while OPEN; the closing time is immutable.
    ///
    /// # Errors
    /// `RoundNotFound`, `RoundClosed`/`RoundSettled` outside OPEN, or
    /// `InvalidRoundParameters` for inverted limits.
    #[instrument(skip(self, _cap, extra))]
    pub fn update_round(
        &mut self,
        _cap: &AdminCapability,
        round_id: RoundId,
        min_value: u64,
        max_value: u64,
        total_amount: u64,
        extra: B,
    ) -> Result<()> {
        let now = self.clock.now_ms();
        let round = self
            .rounds
            .get_mut(&round_id)
            .ok_or(DomainError::RoundNotFound(round_id))?;
        round.apply_update(min_value, max_value, total_amount, extra, now)?;

        if let Some(shortfall) = solvency_shortfall(
            &self.wheel,
            round.pool_value(),
            round.bets().total_staked(),
            round.total_amount(),
        ) {
            warn!(
                round = %round_id,
                pool = round.pool_value(),
                shortfall,
                "updated parameters admit insolvency; worst-case payouts exceed pool"
            );
        }

        info!(round = %round_id, min_value, max_value, total_amount, "round updated");
        Ok(())
    }

    /// Emergency withdrawal of pool funds to a recipient.
    ///
    /// Allowed while OPEN or after settlement, never in the CLOSED gap.
    /// An OPEN-state withdraw can strand funds owed to future winners;
    /// that trust decision sits with the capability holder, and the
    /// engine's contribution is a warning naming the exposure.
    ///
    /// # Errors
    /// `RoundNotFound`, `RoundNotFinished` in the CLOSED gap,
    /// `InsufficientPool`, or a propagated transport failure (the
    /// undelivered funds go back into the pool).
    #[instrument(skip(self, _cap))]
    pub async fn withdraw(
        &mut self,
        _cap: &AdminCapability,
        round_id: RoundId,
        amount: u64,
        recipient: PlayerId,
    ) -> Result<()> {
        let now = self.clock.now_ms();
        let round = self
            .rounds
            .get_mut(&round_id)
            .ok_or(DomainError::RoundNotFound(round_id))?;
        let state = round.state(now);
        let funds = round.withdraw_funds(amount, now)?;

        if state == RoundState::Open {
            warn!(
                round = %round_id,
                amount,
                remaining_pool = round.pool_value(),
                outstanding_stakes = round.bets().total_staked(),
                "operator withdraw while betting is open"
            );
        }

        if let Err(rejected) = self.payouts.disburse(recipient, funds).await {
            round.refund(rejected.funds);
            return Err(rejected.error);
        }
        info!(round = %round_id, amount, recipient = %recipient, "operator withdraw");
        Ok(())
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Player operations
    // ───────────────────────────────────────────────────────────────────────────

    /// Place a bet.
    ///
    /// Validation order is fixed: bet shape, stake limits, intake
    /// budget, betting window, one-bet-per-player. A failure leaves the
    /// round untouched and emits nothing; the stake counter is simply
    /// dropped (fund movement only ever happens through the payout
    /// sink, so a dropped rejection moves nothing).
    ///
    /// # Errors
    /// See [`DomainError`] codes 0-6 plus `RoundNotFound`.
    #[instrument(skip(self, values, stake))]
    pub async fn bet(
        &mut self,
        round_id: RoundId,
        player: PlayerId,
        values: Vec<u8>,
        stake: B,
    ) -> Result<()> {
        let now = self.clock.now_ms();
        let round = self
            .rounds
            .get_mut(&round_id)
            .ok_or(DomainError::RoundNotFound(round_id))?;
        let bet = round.admit_bet(player, values, stake, now)?;

        info!(
            round = %round_id,
            player = %player,
            amount = bet.amount,
            ways = bet.way_count(),
            "bet admitted"
        );
        self.emit(RouletteEvent::NewBet(NewBetEvent {
            round: round_id,
            player,
            amount: bet.amount,
            values: bet.values,
        }))
        .await;
        Ok(())
    }

    /// Settle a round against a verified beacon.
    ///
    /// Requires `now > closing_time`. Verifies the beacon pair, derives
    /// the digest from the signature and the round's committed closing
    /// time, reduces it to a winning number, then pays every covering
    /// bet in admission order and drains the residual pool to the
    /// operator.
    ///
    /// Failures never destroy value and never leave the draw ambiguous:
    /// the pending obligation is checked against the pool before any
    /// fund moves, a transport failure puts the undelivered balance
    /// straight back into the pool and leaves the round CLOSED, and
    /// because the digest is bound to the closing time rather than the
    /// retry-variable wall clock, a retry selects the same winner and
    /// resumes after the last delivered prize.
    ///
    /// # Errors
    /// `RoundNotFound`, `RoundSettled`, `RoundNotFinished`, beacon
    /// `InvalidProof`, `InsufficientPool`, or a propagated transport
    /// failure.
    #[instrument(skip(self, _cap, sig, seed))]
    pub async fn finish(
        &mut self,
        _cap: &AdminCapability,
        round_id: RoundId,
        sig: &[u8],
        seed: &[u8],
    ) -> Result<u8> {
        let now = self.clock.now_ms();
        let round = self
            .rounds
            .get_mut(&round_id)
            .ok_or(DomainError::RoundNotFound(round_id))?;
        match round.state(now) {
            RoundState::Settled => return Err(DomainError::RoundSettled(round_id).into()),
            RoundState::Open => {
                return Err(DomainError::RoundNotFinished {
                    now,
                    closing_time: round.closing_time(),
                }
                .into());
            }
            RoundState::Closed => {}
        }

        self.verifier.verify(sig, seed)?;
        // Bound to the committed closing time, not `now`: every
        // settlement attempt of a round draws the same winner.
        let digest = derive_randomness(sig, round.closing_time());
        let winner = round.wheel().winning_number(&digest)?;

        // A prior attempt may have delivered a prefix of these payouts
        // before its transport failed; resume after it. The pending
        // obligation is totalled before anything moves.
        let payouts = round.winning_payouts(winner);
        let already_paid = round.prizes_paid();
        let obligation = payouts
            .iter()
            .skip(already_paid)
            .fold(0u64, |acc, (_, prize)| acc.saturating_add(*prize));
        if obligation > round.pool_value() {
            return Err(DomainError::InsufficientPool {
                requested: obligation,
                available: round.pool_value(),
            }
            .into());
        }

        for (recipient, prize) in payouts.iter().skip(already_paid) {
            if *prize > 0 {
                let funds = round.withdraw_prize(*prize)?;
                if let Err(rejected) = self.payouts.disburse(*recipient, funds).await {
                    round.refund(rejected.funds);
                    return Err(rejected.error);
                }
            }
            round.record_prize_paid();
        }

        let residual = round.drain_pool();
        let residual_value = residual.value();
        if residual_value > 0 {
            if let Err(rejected) = self.payouts.disburse(self.operator, residual).await {
                round.refund(rejected.funds);
                return Err(rejected.error);
            }
        }
        round.mark_settled();

        info!(
            round = %round_id,
            winner,
            winners = payouts.len(),
            paid = obligation,
            residual = residual_value,
            "round settled"
        );
        self.emit(RouletteEvent::RoundResult(RoundResultEvent {
            round: round_id,
            seed: seed.to_vec(),
            random: winner,
        }))
        .await;
        Ok(winner)
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Queries
    // ───────────────────────────────────────────────────────────────────────────

    /// Look up a round by id; settled rounds stay retrievable.
    #[must_use]
    pub fn round(&self, round_id: RoundId) -> Option<&RoundConfig<B>> {
        self.rounds.get(&round_id)
    }

    /// Iterate every round in creation order.
    pub fn rounds(&self) -> impl Iterator<Item = &RoundConfig<B>> {
        self.rounds.values()
    }

    /// The id the next created round will receive.
    #[must_use]
    pub const fn current_round(&self) -> u64 {
        self.config.current_round
    }

    /// Residual-drain recipient.
    #[must_use]
    pub const fn operator(&self) -> PlayerId {
        self.operator
    }

    /// Wheel parameters stamped into new rounds.
    #[must_use]
    pub const fn wheel(&self) -> &WheelConfig {
        &self.wheel
    }

    /// Append an event; sink failures are logged, never propagated.
    ///
    /// Events describe mutations that have already happened, so failing
    /// the operation over a sink hiccup would misreport the state.
    async fn emit(&self, event: RouletteEvent) {
        if let Err(error) = self.events.emit(&event).await {
            warn!(kind = event.type_name(), round = %event.round(), %error, "event emission failed");
        }
    }
}

impl<B, C, E, P> fmt::Debug for RouletteEngine<B, C, E, P>
where
    B: Balance,
    C: Clock,
    E: EventSink,
    P: PayoutSink<B>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouletteEngine")
            .field("current_round", &self.config.current_round)
            .field("rounds", &self.rounds.len())
            .field("operator", &self.operator)
            .finish_non_exhaustive()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SOLVENCY TELEMETRY
// ═══════════════════════════════════════════════════════════════════════════════

/// Worst-case funding gap for a round's current parameters.
///
/// Worst case: every admitted stake and the entire remaining intake
/// budget sit on single numbers that all hit. Future stakes also join
/// the pool, so the comparison credits the pool with the remaining
/// budget. Returns the gap, or `None` when the pool covers it.
fn solvency_shortfall(
    wheel: &WheelConfig,
    pool_value: u64,
    staked: u64,
    remaining_budget: u64,
) -> Option<u64> {
    let worst = wheel.max_obligation(staked.saturating_add(remaining_budget));
    let covered = pool_value.saturating_add(remaining_budget);
    if worst > covered {
        Some(worst - covered)
    } else {
        None
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
