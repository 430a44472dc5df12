//! Configuration loading and validation for the roulette engine.
//!
//! Configuration is loaded from multiple sources in order of precedence:
//! 1. Environment variables (highest)
//! 2. Environment-specific file (e.g., `development.toml`)
//! 3. Default file (`default.toml`)
//!
//! # Example
//!
//! ```ignore
//! use roulette_engine::config::Settings;
//!
//! let settings = Settings::load("development")?;
//! println!("Wheel size: {}", settings.wheel.wheel_size);
//! ```

mod settings;

pub use settings::{BeaconSettings, LoggingSettings, RoundSettings, Settings, WheelSettings};
