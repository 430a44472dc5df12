//! Event and payout ports.
//!
//! Both ports sit on the outward side of the engine: the event sink
//! appends records to a durable external log, the payout sink turns a
//! withdrawn balance into an actual disbursement (on-chain transfer,
//! ledger row, message). The engine calls them only after the state
//! mutation they describe has been applied.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::error::{AppError, InfraError, Result};
use crate::ports::balance::Balance;
use crate::types::events::RouletteEvent;
use crate::types::primitives::PlayerId;

// ═══════════════════════════════════════════════════════════════════════════════
// EVENT SINK PORT
// ═══════════════════════════════════════════════════════════════════════════════

/// Port for appending events to an external log.
///
/// Appends are fire-and-forget from the engine's perspective: a sink
/// failure is logged but never rolls back the mutation the event
/// describes.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Append one event.
    ///
    /// # Errors
    /// Returns an error if the append fails after the sink's own retries.
    async fn emit(&self, event: &RouletteEvent) -> Result<()>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// PAYOUT SINK PORT
// ═══════════════════════════════════════════════════════════════════════════════

/// A disbursement the transport could not deliver.
///
/// The undelivered funds ride back with the error so the caller can
/// restore them to escrow instead of dropping value on the floor.
pub struct DisburseError<B> {
    /// The balance that was not delivered.
    pub funds: B,
    /// The underlying transport failure.
    pub error: AppError,
}

impl<B: Balance> fmt::Debug for DisburseError<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisburseError")
            .field("value", &self.funds.value())
            .field("error", &self.error)
            .finish()
    }
}

/// Port for disbursing withdrawn funds to a recipient.
#[async_trait]
pub trait PayoutSink<B: Balance>: Send + Sync {
    /// Deliver `funds` to `recipient`.
    ///
    /// # Errors
    /// On failure the undelivered funds come back inside
    /// [`DisburseError`]; the caller is responsible for returning them
    /// to escrow before surfacing the failure.
    async fn disburse(
        &self,
        recipient: PlayerId,
        funds: B,
    ) -> std::result::Result<(), DisburseError<B>>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// IN-MEMORY IMPLEMENTATIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// In-memory event log.
///
/// Clones share the same backing log. Used by tests and by deployments
/// that drain events through their own poller. The `should_fail` switch
/// simulates sink outage.
#[derive(Debug, Clone, Default)]
pub struct MemoryEventSink {
    events: Arc<Mutex<Vec<RouletteEvent>>>,
    should_fail: Arc<AtomicBool>,
}

impl MemoryEventSink {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything appended so far, in order.
    #[must_use]
    pub fn events(&self) -> Vec<RouletteEvent> {
        self.lock().clone()
    }

    /// Number of events appended.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Make subsequent appends fail.
    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RouletteEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl EventSink for MemoryEventSink {
    async fn emit(&self, event: &RouletteEvent) -> Result<()> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(AppError::Infra(InfraError::EventSink(
                "simulated sink outage".into(),
            )));
        }
        self.lock().push(event.clone());
        Ok(())
    }
}

/// In-memory payout ledger recording `(recipient, face value)` rows.
///
/// Clones share the same backing ledger. Delivery failures are driven
/// by an allowance: unlimited by default, zero while simulating an
/// outage, or a finite count to fail partway through a settlement walk.
#[derive(Debug, Clone)]
pub struct MemoryPayoutSink {
    transfers: Arc<Mutex<Vec<(PlayerId, u64)>>>,
    /// Deliveries left before failures start; `usize::MAX` = unlimited.
    allowance: Arc<AtomicUsize>,
}

impl Default for MemoryPayoutSink {
    fn default() -> Self {
        Self {
            transfers: Arc::new(Mutex::new(Vec::new())),
            allowance: Arc::new(AtomicUsize::new(usize::MAX)),
        }
    }
}

impl MemoryPayoutSink {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all disbursements so far, in order.
    #[must_use]
    pub fn transfers(&self) -> Vec<(PlayerId, u64)> {
        self.lock().clone()
    }

    /// Total face value delivered to `recipient`.
    #[must_use]
    pub fn total_for(&self, recipient: PlayerId) -> u64 {
        self.lock()
            .iter()
            .filter(|(to, _)| *to == recipient)
            .fold(0u64, |acc, (_, amount)| acc.saturating_add(*amount))
    }

    /// Make subsequent disbursements fail (or recover).
    pub fn set_should_fail(&self, should_fail: bool) {
        let allowance = if should_fail { 0 } else { usize::MAX };
        self.allowance.store(allowance, Ordering::SeqCst);
    }

    /// Deliver `successes` more disbursements, then fail the rest.
    pub fn fail_after(&self, successes: usize) {
        self.allowance.store(successes, Ordering::SeqCst);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(PlayerId, u64)>> {
        self.transfers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl<B: Balance + 'static> PayoutSink<B> for MemoryPayoutSink {
    async fn disburse(
        &self,
        recipient: PlayerId,
        funds: B,
    ) -> std::result::Result<(), DisburseError<B>> {
        let allowance = self.allowance.load(Ordering::SeqCst);
        if allowance == 0 {
            return Err(DisburseError {
                funds,
                error: AppError::Infra(InfraError::Payout(
                    "simulated transport outage".into(),
                )),
            });
        }
        if allowance != usize::MAX {
            self.allowance.store(allowance - 1, Ordering::SeqCst);
        }
        self.lock().push((recipient, funds.value()));
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
