//! Ports for external collaborators.
//!
//! The engine owns the round state machine and ledger; everything on the
//! other side of a trust or process boundary enters through a port:
//!
//! - [`clock`] - trusted millisecond time source
//! - [`balance`] - fungible-asset contract (value/merge/split)
//! - [`sink`] - event log appends and payout disbursement

pub mod balance;
pub mod clock;
pub mod sink;

pub use balance::{Balance, TokenBalance};
pub use clock::{Clock, ManualClock, SystemClock};
pub use sink::{DisburseError, EventSink, MemoryEventSink, MemoryPayoutSink, PayoutSink};
