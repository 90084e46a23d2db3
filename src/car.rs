//! Car crash scoring.
//!
//! Cars are a stable platform, so any significant tilt is already abnormal.
//! The rules target rollovers, frontal and side impacts, and spins. The
//! accident threshold sits higher than the scooter's because the baseline
//! is calmer and false alarms are costlier.

use crate::scoring::ScoreSheet;
use crate::signal::Kinematics;
use crate::types::{DangerResult, Sample, Trigger};

/// A single reading at or above this score is an accident.
pub const ACCIDENT_THRESHOLD: u8 = 55;

/// Orientation rules need total acceleration above this (g). Below it the
/// gravity axis is unreliable.
pub const FREEFALL_THRESHOLD: f64 = 0.5;

/// accZ at or below this means the car is upside down.
pub const INVERTED_Z: f64 = -0.3;
/// accZ below this means the car is on its side.
pub const ON_SIDE_Z: f64 = 0.3;
/// accZ below this (about 30°) is an abnormal tilt.
pub const TILT_Z: f64 = 0.85;

pub const INVERTED_DANGER: f64 = 100.0;
pub const ON_SIDE_DANGER: f64 = 95.0;
/// Tilt danger at `TILT_Z`, rising by `TILT_DANGER_SPAN` towards `ON_SIDE_Z`.
pub const TILT_BASE_DANGER: f64 = 50.0;
pub const TILT_DANGER_SPAN: f64 = 35.0;

/// Deviation from 1g that counts as a collision.
pub const IMPACT_THRESHOLD: f64 = 2.5;
pub const SEVERE_IMPACT_THRESHOLD: f64 = 5.0;
pub const CATASTROPHIC_IMPACT_THRESHOLD: f64 = 8.0;
pub const IMPACT_BASE_DANGER: f64 = 30.0;
pub const IMPACT_DANGER_PER_G: f64 = 10.0;

/// Horizontal-plane acceleration (g) that counts as a side impact.
pub const LATERAL_THRESHOLD: f64 = 2.0;
pub const LATERAL_BASE_DANGER: f64 = 40.0;
pub const LATERAL_DANGER_PER_G: f64 = 15.0;

/// Yaw rate (deg/s) that counts as a spin.
pub const SPIN_THRESHOLD: f64 = 90.0;
pub const SPIN_DANGER: f64 = 25.0;

/// Scores one sample under the car rules.
pub fn score(sample: &Sample) -> DangerResult {
    let kin = Kinematics::of(sample);
    let mut sheet = ScoreSheet::new();

    if kin.total_acceleration > FREEFALL_THRESHOLD {
        score_orientation(sample.accel_z(), &mut sheet);
    }

    let delta = kin.acceleration_delta;
    if delta > IMPACT_THRESHOLD {
        let danger = IMPACT_BASE_DANGER + (delta - IMPACT_THRESHOLD) * IMPACT_DANGER_PER_G;
        let trigger = if delta > CATASTROPHIC_IMPACT_THRESHOLD {
            Trigger::CatastrophicImpact { g: delta }
        } else if delta > SEVERE_IMPACT_THRESHOLD {
            Trigger::SevereCollision { g: delta }
        } else {
            Trigger::CollisionDetected { g: delta }
        };
        sheet.add(danger, trigger);
    }

    if kin.lateral_g > LATERAL_THRESHOLD {
        let danger = LATERAL_BASE_DANGER + (kin.lateral_g - LATERAL_THRESHOLD) * LATERAL_DANGER_PER_G;
        sheet.add(danger, Trigger::LateralImpact { g: kin.lateral_g });
    }

    if sample.gyro_z().abs() > SPIN_THRESHOLD {
        sheet.add(SPIN_DANGER, Trigger::LossOfControl);
    }

    sheet.finish(ACCIDENT_THRESHOLD)
}

/// Rollover and tilt. Mutually exclusive, first match wins.
fn score_orientation(accel_z: f64, sheet: &mut ScoreSheet) {
    if accel_z <= INVERTED_Z {
        sheet.add(INVERTED_DANGER, Trigger::RolloverInverted);
    } else if accel_z < ON_SIDE_Z {
        sheet.add(ON_SIDE_DANGER, Trigger::RolloverOnSide);
    } else if accel_z < TILT_Z {
        // 0.0 at TILT_Z, 1.0 at ON_SIDE_Z
        let severity = (TILT_Z - accel_z) / (TILT_Z - ON_SIDE_Z);
        let danger = TILT_BASE_DANGER + severity * TILT_DANGER_SPAN;
        let degrees = accel_z.acos().to_degrees().round() as i64;
        sheet.add(danger, Trigger::AbnormalTilt { degrees });
    }
}
