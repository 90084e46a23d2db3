//! Core data types for the crash detection engine.
//!
//! This module defines the values that flow between the scorers, the
//! detection session and downstream consumers. If a concept exists, it gets
//! a type: triggers and verdict outcomes are enums rather than strings, and
//! the human-readable reason is derived from them.
//!
//! Units throughout: acceleration in g (gravity-normalized, so a device at
//! rest reads roughly (0, 0, 1)) and angular velocity in degrees per second.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DetectionError;

/// Reason rendered when no rule fired.
pub const NORMAL_OPERATION: &str = "Normal operation";

/// Reason reported while the window holds too few readings.
pub const INSUFFICIENT_DATA: &str = "Insufficient data";

/// Reason reported when a positive reading was not corroborated.
pub const NOISE_FILTERED: &str = "Noise filtered";

/// Suffix appended to the reason of a corroborated accident.
pub const CONFIRMED_SUFFIX: &str = " (Confirmed)";

/// A single inertial sensor observation.
///
/// This is the minimal input contract: three-axis accelerometer, three-axis
/// gyroscope and a monotonic capture timestamp. The timestamp is bookkeeping
/// only; no scorer reads it.
///
/// Values are f64 so threshold comparisons (e.g. `accel_z < 0.85`) behave
/// identically to the double-precision reference arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Monotonic timestamp in milliseconds.
    pub timestamp_ms: u64,

    /// Accelerometer reading [x, y, z] in g.
    pub accel: [f64; 3],

    /// Gyroscope reading [x, y, z] in deg/s.
    pub gyro: [f64; 3],
}

impl Sample {
    /// Creates a sample without validating it.
    ///
    /// Scoring a sample that holds NaN or infinite values yields a clamped
    /// but meaningless result. Use [`Sample::try_new`] at trust boundaries.
    pub fn new(timestamp_ms: u64, accel: [f64; 3], gyro: [f64; 3]) -> Self {
        Self {
            timestamp_ms,
            accel,
            gyro,
        }
    }

    /// Creates a sample, rejecting any non-finite channel.
    pub fn try_new(
        timestamp_ms: u64,
        accel: [f64; 3],
        gyro: [f64; 3],
    ) -> Result<Self, DetectionError> {
        let sample = Self::new(timestamp_ms, accel, gyro);
        sample.validate()?;
        Ok(sample)
    }

    /// Checks that every channel holds a finite value.
    pub fn validate(&self) -> Result<(), DetectionError> {
        for (channel, value) in Channel::ALL.iter().zip(self.channels()) {
            if !value.is_finite() {
                return Err(DetectionError::NonFiniteReading {
                    channel: *channel,
                    value,
                });
            }
        }
        Ok(())
    }

    /// The six scalar channels in `Channel::ALL` order.
    pub fn channels(&self) -> [f64; 6] {
        [
            self.accel[0],
            self.accel[1],
            self.accel[2],
            self.gyro[0],
            self.gyro[1],
            self.gyro[2],
        ]
    }

    pub fn accel_x(&self) -> f64 {
        self.accel[0]
    }

    pub fn accel_y(&self) -> f64 {
        self.accel[1]
    }

    pub fn accel_z(&self) -> f64 {
        self.accel[2]
    }

    pub fn gyro_z(&self) -> f64 {
        self.gyro[2]
    }
}

/// One of the six scalar sensor channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Channel {
    AccX,
    AccY,
    AccZ,
    GyroX,
    GyroY,
    GyroZ,
}

impl Channel {
    pub const ALL: [Channel; 6] = [
        Channel::AccX,
        Channel::AccY,
        Channel::AccZ,
        Channel::GyroX,
        Channel::GyroY,
        Channel::GyroZ,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Channel::AccX => "accX",
            Channel::AccY => "accY",
            Channel::AccZ => "accZ",
            Channel::GyroX => "gyroX",
            Channel::GyroY => "gyroY",
            Channel::GyroZ => "gyroZ",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Vehicle the sensor is mounted on.
///
/// Selects both the scoring rules and the accident threshold. Thresholds and
/// physical priors differ between profiles, so readings taken under one
/// profile are never re-scored under another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleProfile {
    Car,
    #[default]
    Scooter,
}

impl VehicleProfile {
    /// Score at or above which a single reading counts as an accident.
    pub fn accident_threshold(&self) -> u8 {
        match self {
            VehicleProfile::Car => crate::car::ACCIDENT_THRESHOLD,
            VehicleProfile::Scooter => crate::scooter::ACCIDENT_THRESHOLD,
        }
    }

    /// The pure scoring function for this profile.
    pub fn scorer(&self) -> fn(&Sample) -> DangerResult {
        match self {
            VehicleProfile::Car => crate::car::score,
            VehicleProfile::Scooter => crate::scooter::score,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            VehicleProfile::Car => "car",
            VehicleProfile::Scooter => "scooter",
        }
    }
}

impl fmt::Display for VehicleProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl std::str::FromStr for VehicleProfile {
    type Err = DetectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "car" => Ok(VehicleProfile::Car),
            "scooter" => Ok(VehicleProfile::Scooter),
            other => Err(DetectionError::UnknownVehicle(other.to_string())),
        }
    }
}

/// A rule that fired while scoring a single sample.
///
/// Magnitudes are carried unrounded; `Display` renders them the way the
/// reason string shows them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Trigger {
    /// Scooter lying on its side.
    TippedOver,
    /// Scooter impact between 3.5g and 6.0g deviation.
    HardImpact { g: f64 },
    /// Scooter impact above 6.0g deviation.
    SevereImpact { g: f64 },
    /// Scooter rotating faster than 300 deg/s.
    Tumbling,
    /// Car upside down.
    RolloverInverted,
    /// Car on its side.
    RolloverOnSide,
    /// Car tilted well beyond normal road camber.
    AbnormalTilt { degrees: i64 },
    /// Car impact between 2.5g and 5.0g deviation.
    CollisionDetected { g: f64 },
    /// Car impact between 5.0g and 8.0g deviation.
    SevereCollision { g: f64 },
    /// Car impact above 8.0g deviation.
    CatastrophicImpact { g: f64 },
    /// Horizontal-plane acceleration above 2.0g.
    LateralImpact { g: f64 },
    /// Yaw rate above 90 deg/s.
    LossOfControl,
}

/// Rounds to one decimal with ties going up, so `3.25` prints as `3.3`.
/// Plain `{:.1}` would round that tie to even.
fn tenths(g: f64) -> f64 {
    (g * 10.0).round() / 10.0
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::TippedOver => write!(f, "Vehicle tipped over"),
            Trigger::HardImpact { g } => write!(f, "Hard impact ({:.1}g)", tenths(*g)),
            Trigger::SevereImpact { g } => write!(f, "Severe impact ({:.1}g)", tenths(*g)),
            Trigger::Tumbling => write!(f, "Tumbling detected"),
            Trigger::RolloverInverted => write!(f, "Vehicle Rollover (Inverted)"),
            Trigger::RolloverOnSide => write!(f, "Vehicle Rollover (On Side)"),
            Trigger::AbnormalTilt { degrees } => {
                write!(f, "Abnormal Vehicle Tilt ({}°)", degrees)
            }
            Trigger::CollisionDetected { g } => write!(f, "Collision Detected ({:.1}g)", tenths(*g)),
            Trigger::SevereCollision { g } => write!(f, "Severe Collision ({:.1}g)", tenths(*g)),
            Trigger::CatastrophicImpact { g } => write!(f, "Catastrophic Impact ({:.1}g)", tenths(*g)),
            Trigger::LateralImpact { g } => write!(f, "Lateral Impact ({:.1}g)", tenths(*g)),
            Trigger::LossOfControl => write!(f, "Loss of control (Spin)"),
        }
    }
}

/// How a verdict was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Straight from a single-sample scorer.
    Instantaneous,
    /// Window too short to judge.
    InsufficientData,
    /// Positive reading corroborated by the recent window.
    Confirmed,
    /// Positive reading rejected as a transient spike.
    NoiseFiltered,
}

/// Coarse severity band for a danger percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DangerLevel {
    Moderate,
    High,
    Critical,
}

impl DangerLevel {
    pub fn from_percentage(percentage: u8) -> Self {
        match percentage {
            80.. => DangerLevel::Critical,
            60..=79 => DangerLevel::High,
            _ => DangerLevel::Moderate,
        }
    }
}

impl fmt::Display for DangerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DangerLevel::Moderate => f.pad("MODERATE"),
            DangerLevel::High => f.pad("HIGH"),
            DangerLevel::Critical => f.pad("CRITICAL"),
        }
    }
}

/// Verdict for one evaluation.
///
/// `danger_percentage` is a heuristic severity in [0, 100], not a
/// calibrated probability.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DangerResult {
    pub is_accident: bool,
    pub danger_percentage: u8,
    pub reason: String,
    pub outcome: Outcome,
    pub triggers: Vec<Trigger>,
}

impl DangerResult {
    /// Builds an instantaneous result from the rules that fired.
    pub fn from_triggers(triggers: Vec<Trigger>, danger_percentage: u8, threshold: u8) -> Self {
        let reason = if triggers.is_empty() {
            NORMAL_OPERATION.to_string()
        } else {
            triggers
                .iter()
                .map(Trigger::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };

        Self {
            is_accident: danger_percentage >= threshold,
            danger_percentage,
            reason,
            outcome: Outcome::Instantaneous,
            triggers,
        }
    }

    pub fn insufficient_data() -> Self {
        Self {
            is_accident: false,
            danger_percentage: 0,
            reason: INSUFFICIENT_DATA.to_string(),
            outcome: Outcome::InsufficientData,
            triggers: Vec::new(),
        }
    }

    /// Derives the corroborated verdict, raising the score by `bonus`.
    pub fn confirmed(&self, bonus: u8) -> Self {
        Self {
            is_accident: true,
            danger_percentage: self.danger_percentage.saturating_add(bonus).min(100),
            reason: format!("{}{}", self.reason, CONFIRMED_SUFFIX),
            outcome: Outcome::Confirmed,
            triggers: self.triggers.clone(),
        }
    }

    /// Derives the suppressed verdict, lowering the score by `penalty`.
    pub fn noise_filtered(&self, penalty: u8) -> Self {
        Self {
            is_accident: false,
            danger_percentage: self.danger_percentage.saturating_sub(penalty),
            reason: NOISE_FILTERED.to_string(),
            outcome: Outcome::NoiseFiltered,
            triggers: self.triggers.clone(),
        }
    }

    pub fn level(&self) -> DangerLevel {
        DangerLevel::from_percentage(self.danger_percentage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_rejects_nan() {
        let err = Sample::try_new(0, [0.0, f64::NAN, 1.0], [0.0; 3]).unwrap_err();
        match err {
            DetectionError::NonFiniteReading { channel, .. } => assert_eq!(channel, Channel::AccY),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_try_new_rejects_infinite_gyro() {
        let err = Sample::try_new(0, [0.0, 0.0, 1.0], [0.0, 0.0, f64::INFINITY]).unwrap_err();
        assert!(matches!(
            err,
            DetectionError::NonFiniteReading { channel: Channel::GyroZ, .. }
        ));
    }

    #[test]
    fn test_try_new_accepts_finite() {
        let sample = Sample::try_new(42, [0.1, -0.2, 1.0], [5.0, 0.0, -3.0]).unwrap();
        assert_eq!(sample.timestamp_ms, 42);
        assert_eq!(sample.accel_z(), 1.0);
    }

    #[test]
    fn test_empty_triggers_render_normal_operation() {
        let result = DangerResult::from_triggers(Vec::new(), 0, 50);
        assert_eq!(result.reason, NORMAL_OPERATION);
        assert!(!result.is_accident);
        assert_eq!(result.outcome, Outcome::Instantaneous);
    }

    #[test]
    fn test_reasons_joined_in_order() {
        let result = DangerResult::from_triggers(
            vec![Trigger::TippedOver, Trigger::Tumbling],
            100,
            50,
        );
        assert_eq!(result.reason, "Vehicle tipped over, Tumbling detected");
        assert!(result.is_accident);
    }

    #[test]
    fn test_trigger_display_one_decimal() {
        assert_eq!(Trigger::HardImpact { g: 4.04 }.to_string(), "Hard impact (4.0g)");
        assert_eq!(
            Trigger::LateralImpact { g: 3.0 }.to_string(),
            "Lateral Impact (3.0g)"
        );
        assert_eq!(
            Trigger::AbnormalTilt { degrees: 53 }.to_string(),
            "Abnormal Vehicle Tilt (53°)"
        );
    }

    #[test]
    fn test_confirmed_caps_at_100() {
        let base = DangerResult::from_triggers(vec![Trigger::RolloverInverted], 95, 55);
        let confirmed = base.confirmed(15);
        assert_eq!(confirmed.danger_percentage, 100);
        assert_eq!(confirmed.reason, "Vehicle Rollover (Inverted) (Confirmed)");
        assert_eq!(confirmed.outcome, Outcome::Confirmed);
        // Source result is untouched.
        assert_eq!(base.danger_percentage, 95);
    }

    #[test]
    fn test_noise_filtered_floors_at_zero() {
        let base = DangerResult::from_triggers(vec![Trigger::Tumbling], 12, 50);
        let filtered = base.noise_filtered(20);
        assert_eq!(filtered.danger_percentage, 0);
        assert!(!filtered.is_accident);
        assert_eq!(filtered.reason, NOISE_FILTERED);
    }

    #[test]
    fn test_danger_level_bands() {
        assert_eq!(DangerLevel::from_percentage(100), DangerLevel::Critical);
        assert_eq!(DangerLevel::from_percentage(80), DangerLevel::Critical);
        assert_eq!(DangerLevel::from_percentage(79), DangerLevel::High);
        assert_eq!(DangerLevel::from_percentage(60), DangerLevel::High);
        assert_eq!(DangerLevel::from_percentage(59), DangerLevel::Moderate);
        assert_eq!(DangerLevel::from_percentage(0), DangerLevel::Moderate);
    }

    #[test]
    fn test_vehicle_profile_parsing() {
        assert_eq!("car".parse::<VehicleProfile>().unwrap(), VehicleProfile::Car);
        assert_eq!(" Scooter ".parse::<VehicleProfile>().unwrap(), VehicleProfile::Scooter);
        assert!("bicycle".parse::<VehicleProfile>().is_err());
        assert_eq!(VehicleProfile::default(), VehicleProfile::Scooter);
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = DangerResult::from_triggers(vec![Trigger::LossOfControl], 25, 55);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["isAccident"], false);
        assert_eq!(json["dangerPercentage"], 25);
        assert_eq!(json["reason"], "Loss of control (Spin)");
        assert_eq!(json["outcome"], "instantaneous");
        assert_eq!(json["triggers"][0]["kind"], "loss_of_control");
    }
}
