//! Error types for the detection engine.
//!
//! The core has no I/O, so the only runtime failure is a reading that
//! cannot be scored. Too few readings is a normal verdict, never an error.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::Channel;

/// Errors raised while ingesting readings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetectionError {
    /// A channel held NaN or an infinity. The reading was not stored.
    #[error("Non-finite reading on {channel}: {value}")]
    NonFiniteReading {
        /// Offending channel.
        channel: Channel,
        /// Raw value as received.
        value: f64,
    },

    /// A vehicle name did not match any profile.
    #[error("Unknown vehicle type '{0}' (expected 'car' or 'scooter')")]
    UnknownVehicle(String),
}

/// Errors raised while loading or validating a [`DetectorConfig`](crate::config::DetectorConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A parameter is outside its allowed range.
    #[error("Invalid config value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Errors raised while reading sensor messages.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to read sensor stream: {0}")]
    Io(#[from] std::io::Error),

    /// A line was not a valid sensor message. Lines are 1-based.
    #[error("Malformed sensor message on line {line}: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A verdict could not be written to the output stream.
    #[error("Failed to write verdict: {0}")]
    Output(#[source] std::io::Error),

    /// A message parsed but carried an unusable reading.
    #[error("Rejected sensor message on line {line}: {source}")]
    Rejected {
        line: usize,
        #[source]
        source: DetectionError,
    },
}
