//! Admin capability.
//!
//! Authorization is capability-based: holding the token is the sole
//! predicate for create/update/withdraw/finish. There is no multi-sig
//! and no role hierarchy; a single operator is trusted to hold the
//! token, submit authentic beacons, and not withdraw against
//! outstanding obligations.

/// Unforgeable admin token, singular per engine.
///
/// The type is deliberately inert: not `Clone`, not `Default`, not
/// constructible outside this crate. The only way to obtain one is
/// [`RouletteEngine::new`](crate::engine::RouletteEngine::new), which
/// issues it exactly once alongside the engine it governs. Off-process
/// callers map onto this by authenticating as the operator before their
/// request reaches the engine.
#[derive(Debug)]
pub struct AdminCapability {
    _witness: (),
}

impl AdminCapability {
    /// Issue the capability. Crate-internal; called once per engine.
    pub(crate) const fn issue() -> Self {
        Self { _witness: () }
    }
}
