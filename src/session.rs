//! Detection session: sliding window plus temporal confirmation.
//!
//! A session wraps one vehicle scorer and decides in two stages:
//! 1. Score the latest reading on its own.
//! 2. If that is positive, re-score the most recent readings and require
//!    the event to persist before reporting it.
//!
//! Stage 2 trades a little latency for far fewer false alarms from single
//! spikes such as potholes or a dropped phone.
//!
//! The session is synchronous and not internally locked. Each instance
//! belongs to one caller; serialize access externally if several threads
//! feed the same device.

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use crate::clock::{MonotonicClock, TimestampSource};
use crate::config::DetectorConfig;
use crate::error::{ConfigError, DetectionError};
use crate::types::{DangerResult, Sample, VehicleProfile};

/// Stateful crash detector for one device.
#[derive(Debug)]
pub struct DetectionSession<C: TimestampSource = MonotonicClock> {
    config: DetectorConfig,
    profile: VehicleProfile,
    clock: C,

    // Oldest first. Never longer than config.window_capacity.
    window: VecDeque<Sample>,
}

impl DetectionSession<MonotonicClock> {
    /// Session with default configuration and a monotonic clock.
    pub fn new() -> Self {
        let config = DetectorConfig::default();
        Self::build(config, MonotonicClock::new())
    }

    /// Session with a custom configuration and a monotonic clock.
    pub fn with_config(config: DetectorConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, MonotonicClock::new())
    }
}

impl Default for DetectionSession<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: TimestampSource> DetectionSession<C> {
    /// Session with a custom configuration and timestamp source.
    pub fn with_clock(config: DetectorConfig, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, clock))
    }

    fn build(config: DetectorConfig, clock: C) -> Self {
        Self {
            profile: config.default_profile,
            window: VecDeque::with_capacity(config.window_capacity),
            config,
            clock,
        }
    }

    /// Active vehicle profile.
    pub fn vehicle_type(&self) -> VehicleProfile {
        self.profile
    }

    /// Switches profile and clears the window, even if the profile is unchanged.
    pub fn set_vehicle_type(&mut self, profile: VehicleProfile) {
        info!(
            from = %self.profile,
            to = %profile,
            discarded = self.window.len(),
            "Vehicle profile selected, history cleared"
        );
        self.profile = profile;
        self.reset();
    }

    /// Validates and stores one reading, stamped by the session clock.
    ///
    /// Acceleration in g, angular velocity in deg/s. A reading with any
    /// non-finite channel is rejected and leaves the window untouched.
    pub fn add_reading(
        &mut self,
        accel_x: f64,
        accel_y: f64,
        accel_z: f64,
        gyro_x: f64,
        gyro_y: f64,
        gyro_z: f64,
    ) -> Result<(), DetectionError> {
        let timestamp_ms = self.clock.now_ms();
        let sample = Sample::try_new(
            timestamp_ms,
            [accel_x, accel_y, accel_z],
            [gyro_x, gyro_y, gyro_z],
        )
        .map_err(|err| {
            warn!(timestamp_ms, error = %err, "Rejected reading");
            err
        })?;

        self.push_sample(sample);
        Ok(())
    }

    /// Stores a sample as-is, evicting the oldest when the window is full.
    ///
    /// The caller is trusted to push in time order and to have validated
    /// the values.
    pub fn push_sample(&mut self, sample: Sample) {
        self.window.push_back(sample);
        while self.window.len() > self.config.window_capacity {
            if let Some(evicted) = self.window.pop_front() {
                debug!(timestamp_ms = evicted.timestamp_ms, "Evicted oldest reading");
            }
        }
    }

    /// Verdict for the latest reading, corroborated against recent history.
    pub fn detect_with_history(&self) -> DangerResult {
        if self.window.len() < self.config.min_readings {
            return DangerResult::insufficient_data();
        }

        let score = self.profile.scorer();
        let Some(latest) = self.window.back() else {
            return DangerResult::insufficient_data();
        };

        let candidate = score(latest);
        if !candidate.is_accident {
            return candidate;
        }

        // The latest reading counts towards its own corroboration.
        let corroborating = self
            .window
            .iter()
            .rev()
            .take(self.config.confirmation_samples)
            .filter(|sample| score(sample).is_accident)
            .count();

        if corroborating >= self.config.confirmations_required {
            let confirmed = candidate.confirmed(self.config.confirmed_bonus);
            info!(
                profile = %self.profile,
                danger = confirmed.danger_percentage,
                corroborating,
                reason = %confirmed.reason,
                "Accident confirmed"
            );
            confirmed
        } else {
            debug!(
                profile = %self.profile,
                danger = candidate.danger_percentage,
                corroborating,
                "Positive reading not corroborated, filtered as noise"
            );
            candidate.noise_filtered(self.config.noise_penalty)
        }
    }

    /// Clears the window without changing the profile.
    pub fn reset(&mut self) {
        self.window.clear();
    }

    /// Readings currently held, oldest first.
    pub fn readings(&self) -> impl Iterator<Item = &Sample> {
        self.window.iter()
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }
}

// ============================================================================
// TESTS
// ============================================================================
