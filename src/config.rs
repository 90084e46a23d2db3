//! Detection session configuration.
//!
//! Only the temporal confirmation policy is configurable. Scorer thresholds
//! are fixed constants in [`crate::car`] and [`crate::scooter`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::VehicleProfile;

/// Parameters for a [`DetectionSession`](crate::session::DetectionSession).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Maximum readings kept in the sliding window.
    pub window_capacity: usize,
    /// Readings required before any verdict is issued.
    pub min_readings: usize,
    /// Most recent readings re-scored to corroborate a positive verdict.
    pub confirmation_samples: usize,
    /// Positive readings among those needed to confirm.
    pub confirmations_required: usize,
    /// Points added to a confirmed verdict.
    pub confirmed_bonus: u8,
    /// Points removed from a suppressed verdict.
    pub noise_penalty: u8,
    /// Profile a new session starts with.
    pub default_profile: VehicleProfile,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            window_capacity: 10,
            min_readings: 5,
            confirmation_samples: 3,
            confirmations_required: 2,
            confirmed_bonus: 15,
            noise_penalty: 20,
            default_profile: VehicleProfile::Scooter,
        }
    }
}

impl DetectorConfig {
    /// Loads and validates a YAML config file. Missing keys take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: DetectorConfig =
            serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_capacity == 0 {
            return Err(invalid("window_capacity", "must be at least 1"));
        }
        if self.min_readings == 0 || self.min_readings > self.window_capacity {
            return Err(invalid(
                "min_readings",
                format!("must be within 1..={}", self.window_capacity),
            ));
        }
        if self.confirmation_samples == 0 || self.confirmation_samples > self.window_capacity {
            return Err(invalid(
                "confirmation_samples",
                format!("must be within 1..={}", self.window_capacity),
            ));
        }
        if self.confirmations_required == 0
            || self.confirmations_required > self.confirmation_samples
        {
            return Err(invalid(
                "confirmations_required",
                format!("must be within 1..={}", self.confirmation_samples),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}
