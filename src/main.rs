//! Crash Sensing replay tool.
//!
//! Feeds a recorded newline-delimited JSON sensor stream through a detection
//! session and prints one verdict per reading.
//!
//! ```text
//! crash-sensing --input ride.jsonl --vehicle car
//! cat ride.jsonl | crash-sensing --format json --alerts-only
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crash_sensing::replay::{replay, ReplayOptions, VerdictFormat};
use crash_sensing::{DetectionSession, DetectorConfig, VehicleProfile};

/// Output format for verdicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
enum OutputFormat {
    /// One human-readable line per reading.
    #[default]
    Text,
    /// One JSON object per reading.
    Json,
}

impl From<OutputFormat> for VerdictFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => VerdictFormat::Text,
            OutputFormat::Json => VerdictFormat::Json,
        }
    }
}

/// Vehicle selection on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Vehicle {
    Car,
    Scooter,
}

impl From<Vehicle> for VehicleProfile {
    fn from(vehicle: Vehicle) -> Self {
        match vehicle {
            Vehicle::Car => VehicleProfile::Car,
            Vehicle::Scooter => VehicleProfile::Scooter,
        }
    }
}

/// Replay a sensor stream through the crash detector.
#[derive(Parser, Debug)]
#[command(name = "crash-sensing")]
#[command(version, about = "Replay IMU readings through the crash detector")]
struct Args {
    /// Newline-delimited JSON readings. Reads stdin when omitted.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Vehicle profile. Overrides the config file's default.
    #[arg(short, long, value_enum)]
    vehicle: Option<Vehicle>,

    /// YAML detector configuration.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Only print verdicts that are accidents.
    #[arg(long)]
    alerts_only: bool,

    /// Stop at the first malformed or rejected line instead of skipping it.
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("crash_sensing=info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => DetectorConfig::load(path)
            .with_context(|| format!("loading detector config {}", path.display()))?,
        None => DetectorConfig::default(),
    };

    let mut session = DetectionSession::with_config(config).context("invalid detector config")?;
    if let Some(vehicle) = args.vehicle {
        session.set_vehicle_type(vehicle.into());
    }
    info!(vehicle = %session.vehicle_type(), "Replay starting");

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let options = ReplayOptions {
        format: args.format.into(),
        alerts_only: args.alerts_only,
        strict: args.strict,
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = replay(reader, &mut out, &mut session, options).context("replay aborted")?;
    out.flush()?;

    info!(%summary, "Replay complete");
    Ok(())
}
