//! Clock port.
//!
//! The engine never reads the wall clock directly; it consumes a trusted
//! monotonic millisecond source supplied by the host. Closure boundaries
//! and digest derivation both depend on this reading, so the source is
//! part of the trust model.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

// ═══════════════════════════════════════════════════════════════════════════════
// CLOCK PORT
// ═══════════════════════════════════════════════════════════════════════════════

/// Port for reading the current time in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    /// Current time in milliseconds.
    fn now_ms(&self) -> u64;
}

// ═══════════════════════════════════════════════════════════════════════════════
// SYSTEM CLOCK
// ═══════════════════════════════════════════════════════════════════════════════

/// Wall-clock implementation backed by [`SystemTime`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        u64::try_from(since_epoch.as_millis()).unwrap_or(u64::MAX)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// MANUAL CLOCK
// ═══════════════════════════════════════════════════════════════════════════════

/// Manually driven clock for tests and simulation.
///
/// Clones share the same underlying instant, so a test can hold one
/// handle while the engine holds another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock frozen at `start_ms`.
    #[must_use]
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    /// Jump to an absolute time.
    pub fn set(&self, now_ms: u64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }

    /// Advance by a delta.
    pub fn advance(&self, delta_ms: u64) {
        self.now.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
