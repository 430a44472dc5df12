//! Domain types for the roulette engine.
//!
//! This module contains all the core types used throughout the engine:
//!
//! - [`enums`] - Lifecycle enumerations (`RoundState`)
//! - [`primitives`] - Validated newtypes (`PlayerId`, `RoundId`)
//! - [`events`] - Records appended to the event channel
//! - [`entities`] - Ledger entities (`Bet`)

pub mod entities;
pub mod enums;
pub mod events;
pub mod primitives;

// Re-export commonly used types at module level
pub use entities::Bet;
pub use enums::RoundState;
pub use events::{NewBetEvent, RoundResultEvent, RouletteEvent};
pub use primitives::{PlayerId, RoundId};
