//! Scooter crash scoring.
//!
//! Light two-wheelers are unstable platforms: the most common accident is
//! the vehicle going over on its side, followed by hard falls and tumbling.
//! Rules are additive and fire independently.

use crate::scoring::ScoreSheet;
use crate::signal::Kinematics;
use crate::types::{DangerResult, Sample, Trigger};

/// A single reading at or above this score is an accident.
pub const ACCIDENT_THRESHOLD: u8 = 50;

/// |accZ| below this means the scooter is tilted past roughly 60°.
pub const TIPPING_THRESHOLD: f64 = 0.5;
/// Points for a tipped-over scooter.
pub const TIPPING_DANGER: f64 = 65.0;

/// Deviation from 1g that counts as a hard fall.
pub const IMPACT_THRESHOLD: f64 = 3.5;
/// Deviation from 1g that counts as a severe fall.
pub const SEVERE_IMPACT_THRESHOLD: f64 = 6.0;
/// Points at the impact threshold.
pub const IMPACT_BASE_DANGER: f64 = 40.0;
/// Extra points per g beyond the impact threshold.
pub const IMPACT_DANGER_PER_G: f64 = 15.0;

/// Total rotation above this (deg/s) is tumbling.
pub const TUMBLING_THRESHOLD: f64 = 300.0;
/// Rotation danger is `total_rotation / TUMBLING_DIVISOR`.
pub const TUMBLING_DIVISOR: f64 = 10.0;

/// Scores one sample under the scooter rules.
pub fn score(sample: &Sample) -> DangerResult {
    let kin = Kinematics::of(sample);
    let mut sheet = ScoreSheet::new();

    if sample.accel_z().abs() < TIPPING_THRESHOLD {
        sheet.add(TIPPING_DANGER, Trigger::TippedOver);
    }

    let delta = kin.acceleration_delta;
    if delta > IMPACT_THRESHOLD {
        let danger = IMPACT_BASE_DANGER + (delta - IMPACT_THRESHOLD) * IMPACT_DANGER_PER_G;
        let trigger = if delta > SEVERE_IMPACT_THRESHOLD {
            Trigger::SevereImpact { g: delta }
        } else {
            Trigger::HardImpact { g: delta }
        };
        sheet.add(danger, trigger);
    }

    if kin.total_rotation > TUMBLING_THRESHOLD {
        sheet.add(kin.total_rotation / TUMBLING_DIVISOR, Trigger::Tumbling);
    }

    sheet.finish(ACCIDENT_THRESHOLD)
}
