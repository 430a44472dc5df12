//! Settings structs and loading logic.
//!
//! All settings have sensible defaults and can be overridden via
//! environment variables or configuration files.

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use beacon_verify::PUBLIC_KEY_LEN;

/// Default beacon public key: the drand mainnet (League of Entropy)
/// chained-scheme key. Deployments targeting another beacon override it.
const DEFAULT_BEACON_PUBLIC_KEY: &str = "868f005eb8e6e4ca0a47c8a77ceaa5309a47978a7c71bc5cce96366b5d7a569937c529eeda66c7293784a9402801af31";

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Beacon verification configuration.
    pub beacon: BeaconSettings,
    /// Wheel parameters for new rounds.
    pub wheel: WheelSettings,
    /// Default round limits.
    pub round: RoundSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl Settings {
    /// Load settings from configuration files and environment variables.
    ///
    /// Files are loaded in this order (later overrides earlier):
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (if exists)
    /// 3. Environment variables with `ROULETTE_` prefix
    ///
    /// # Arguments
    /// * `environment` - Environment name (e.g., "development", "production")
    ///
    /// # Errors
    /// Returns `ConfigError` if configuration is invalid or cannot be loaded.
    pub fn load(environment: &str) -> Result<Self, ConfigError> {
        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".into());

        let builder = Config::builder()
            // Start with default values
            .set_default("beacon.public_key", DEFAULT_BEACON_PUBLIC_KEY)?
            .set_default("wheel.wheel_size", 38)?
            .set_default("wheel.payout_numerator", 36)?
            .set_default("round.min_value", 1_000_000)?
            .set_default("round.max_value", 10_000_000)?
            .set_default("round.total_amount", 10_000_000)?
            .set_default("round.period_ms", 60_000)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "json")?
            // Load default configuration file
            .add_source(File::with_name(&format!("{config_dir}/default")).required(false))
            // Load environment-specific file
            .add_source(File::with_name(&format!("{config_dir}/{environment}")).required(false))
            // Override with environment variables (ROULETTE_ prefix)
            .add_source(
                Environment::with_prefix("ROULETTE")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Load settings from a specific file path.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize()
    }

    /// Validate settings and return any validation errors.
    ///
    /// # Errors
    /// Returns a list of validation error messages.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        // Beacon validation
        match hex::decode(
            self.beacon
                .public_key
                .strip_prefix("0x")
                .unwrap_or(&self.beacon.public_key),
        ) {
            Ok(bytes) if bytes.len() == PUBLIC_KEY_LEN => {}
            Ok(bytes) => errors.push(format!(
                "beacon.public_key must be {PUBLIC_KEY_LEN} bytes, got {}",
                bytes.len()
            )),
            Err(_) => errors.push("beacon.public_key must be valid hex".into()),
        }

        // Wheel validation
        if self.wheel.wheel_size < 2 {
            errors.push("wheel.wheel_size must be at least 2".into());
        }
        if self.wheel.payout_numerator == 0 {
            errors.push("wheel.payout_numerator must be non-zero".into());
        }
        if self.wheel.payout_numerator >= u64::from(self.wheel.wheel_size) {
            errors.push("wheel.payout_numerator must stay below wheel_size (house edge)".into());
        }

        // Round validation
        if self.round.min_value > self.round.max_value {
            errors.push("round.min_value cannot exceed round.max_value".into());
        }
        if self.round.period_ms == 0 {
            errors.push("round.period_ms must be non-zero".into());
        }
        if self.round.total_amount == 0 {
            errors.push("round.total_amount must be non-zero".into());
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Beacon verification configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BeaconSettings {
    /// Hex-encoded 48-byte G1 public key of the beacon network.
    pub public_key: String,
}

/// Wheel parameters for new rounds.
#[derive(Debug, Clone, Deserialize)]
pub struct WheelSettings {
    /// Number of pockets; outcomes are `[1, wheel_size]`.
    pub wheel_size: u8,
    /// Single-number payout multiplier.
    pub payout_numerator: u64,
}

/// Default limits stamped into newly created rounds.
#[derive(Debug, Clone, Deserialize)]
pub struct RoundSettings {
    /// Minimum single-bet stake (inclusive).
    pub min_value: u64,
    /// Maximum single-bet stake (inclusive).
    pub max_value: u64,
    /// Total intake budget per round.
    pub total_amount: u64,
    /// Betting window length in milliseconds.
    pub period_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (e.g., "info", "debug").
    pub level: String,
    /// Output format: "json" or "pretty".
    pub format: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
