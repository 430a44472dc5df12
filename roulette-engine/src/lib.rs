//! Verifiable Roulette Engine
//!
//! A wagering engine that settles roulette rounds against an external
//! BLS randomness beacon. Participants stake fungible tokens on subsets
//! of numbered outcomes; after a fixed betting window the engine draws
//! one winning number from cryptographically verifiable randomness and
//! disburses prizes from a shared pool. The draw is unpredictable at
//! bet-placement time and publicly auditable afterwards.
//!
//! # Architecture
//!
//! The engine follows a hexagonal architecture:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         ENGINE CORE                             │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐          │
//! │  │    Round     │  │   Bet Book   │  │     Pool     │          │
//! │  │   Machine    │─▶│   (ordered)  │─▶│   (escrow)   │          │
//! │  └──────────────┘  └──────────────┘  └──────────────┘          │
//! │          │                                    │                 │
//! │          ▼                                    ▼                 │
//! │   ┌──────────────┐                  ┌──────────────┐            │
//! │   │beacon-verify │                  │ Payout Sink  │            │
//! │   │ (BLS draw)   │                  │ Event Sink   │            │
//! │   └──────────────┘                  └──────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`types`] - Domain types (primitives, entities, events)
//! - [`error`] - Layered error types with wire-stable codes
//! - [`admin`] - Capability-based authorization
//! - [`ports`] - Clock, balance, event, and payout seams
//! - [`engine`] - Round state machine, ledger, and settlement
//! - [`config`] - Configuration loading and validation
//!
//! # Getting Started
//!
//! ```ignore
//! use roulette_engine::engine::{RouletteEngine, WheelConfig};
//!
//! let (mut engine, cap) = RouletteEngine::new(
//!     verifier, WheelConfig::default(), operator, clock, events, payouts,
//! );
//! let round = engine.create_round(&cap, min, max, total, period_ms, seed)?;
//! engine.bet(round, player, vec![17, 20], stake).await?;
//! // ...window closes...
//! let winner = engine.finish(&cap, round, &sig, &seed).await?;
//! ```

pub mod admin;
pub mod config;
pub mod engine;
pub mod error;
pub mod ports;
pub mod types;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version string
#[must_use]
pub const fn version() -> &'static str {
    VERSION
}
