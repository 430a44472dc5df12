//! Round engine: state machine, ledger, pool, and settlement.
//!
//! - [`wheel`] - Wheel parameters and prize arithmetic
//! - [`pool`] - Per-round prize escrow
//! - [`bet_book`] - Insertion-ordered bet ledger
//! - [`round`] - Per-round state machine
//! - [`roulette`] - The orchestrating engine

pub mod bet_book;
pub mod pool;
pub mod roulette;
pub mod round;
pub mod wheel;

pub use bet_book::BetBook;
pub use pool::Pool;
pub use roulette::RouletteEngine;
pub use round::RoundConfig;
pub use wheel::WheelConfig;
