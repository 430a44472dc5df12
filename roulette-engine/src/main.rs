//! Roulette Engine CLI
//!
//! Entry point for the engine binary. Provides subcommands for:
//! - `verify` - Check a beacon (sig, seed) pair against the deployment key
//! - `draw` - Compute the winner a settlement at a given instant would draw
//! - `version` - Show version information

use beacon_verify::{BeaconVerifier, derive_randomness};
use clap::{Parser, Subcommand};
use eyre::eyre;
use roulette_engine::config::{LoggingSettings, Settings};
use roulette_engine::engine::WheelConfig;
use tracing::info;

/// Roulette Engine
#[derive(Parser, Debug)]
#[command(name = "roulette-engine")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Environment name (selects config/{environment}.toml)
    #[arg(short, long, default_value = "development")]
    environment: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Verify a beacon signature over a round seed
    Verify {
        /// Hex-encoded 96-byte G2 signature
        #[arg(long)]
        sig: String,

        /// Hex-encoded round seed
        #[arg(long)]
        seed: String,

        /// Override the configured beacon public key (hex)
        #[arg(long)]
        public_key: Option<String>,
    },

    /// Derive the winning number a round commits to
    Draw {
        /// Hex-encoded 96-byte G2 signature
        #[arg(long)]
        sig: String,

        /// Hex-encoded round seed
        #[arg(long)]
        seed: String,

        /// Digest-binding instant in milliseconds since epoch (the
        /// round's committed closing time)
        #[arg(long)]
        timestamp_ms: u64,

        /// Override the configured wheel size
        #[arg(long)]
        wheel_size: Option<u8>,

        /// Override the configured beacon public key (hex)
        #[arg(long)]
        public_key: Option<String>,
    },

    /// Show version information
    Version,
}

fn main() -> eyre::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let settings = Settings::load(&cli.environment)?;
    settings
        .validate()
        .map_err(|errors| eyre!("invalid configuration: {}", errors.join("; ")))?;
    init_tracing(&settings.logging);

    info!(
        version = roulette_engine::VERSION,
        environment = %cli.environment,
        "Starting roulette engine CLI"
    );

    match cli.command {
        Commands::Verify {
            sig,
            seed,
            public_key,
        } => {
            let verifier = make_verifier(&settings, public_key.as_deref())?;
            let sig = decode_hex_arg("sig", &sig)?;
            let seed = decode_hex_arg("seed", &seed)?;
            verifier.verify(&sig, &seed)?;
            println!("signature verifies under the beacon key");
        }

        Commands::Draw {
            sig,
            seed,
            timestamp_ms,
            wheel_size,
            public_key,
        } => {
            let verifier = make_verifier(&settings, public_key.as_deref())?;
            let sig = decode_hex_arg("sig", &sig)?;
            let seed = decode_hex_arg("seed", &seed)?;
            verifier.verify(&sig, &seed)?;

            let wheel = WheelConfig::new(
                wheel_size.unwrap_or(settings.wheel.wheel_size),
                settings.wheel.payout_numerator,
            )?;
            let digest = derive_randomness(&sig, timestamp_ms);
            let winner = wheel.winning_number(&digest)?;

            println!(
                "{}",
                serde_json::json!({
                    "winner": winner,
                    "wheel_size": wheel.wheel_size(),
                    "timestamp_ms": timestamp_ms,
                    "digest": hex::encode(digest),
                })
            );
        }

        Commands::Version => {
            println!("roulette-engine {}", roulette_engine::VERSION);
        }
    }

    Ok(())
}

/// Initialize the tracing subscriber from logging settings.
///
/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(logging: &LoggingSettings) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(logging.level.clone()));
    if logging.format == "json" {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Build a verifier from the CLI override or the configured key.
fn make_verifier(settings: &Settings, override_key: Option<&str>) -> eyre::Result<BeaconVerifier> {
    let key = override_key.unwrap_or(&settings.beacon.public_key);
    Ok(BeaconVerifier::from_hex(key)?)
}

/// Decode a hex CLI argument, tolerating a 0x prefix.
fn decode_hex_arg(name: &str, value: &str) -> eyre::Result<Vec<u8>> {
    hex::decode(value.strip_prefix("0x").unwrap_or(value))
        .map_err(|e| eyre!("--{name} is not valid hex: {e}"))
}
