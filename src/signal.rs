//! Vector magnitude helpers shared by both scorers.
//!
//! Everything here is a pure function of one sample. There is deliberately
//! no gravity estimation or filtering: the scorers work on instantaneous
//! readings that are already gravity-normalized (1.0 = resting gravity).

use crate::types::Sample;

/// Acceleration magnitude of a device at rest, in g.
pub const RESTING_G: f64 = 1.0;

/// Euclidean norm of a 3-vector.
pub fn magnitude3(a: f64, b: f64, c: f64) -> f64 {
    (a * a + b * b + c * c).sqrt()
}

/// Total acceleration magnitude in g.
pub fn total_acceleration(sample: &Sample) -> f64 {
    magnitude3(sample.accel_x(), sample.accel_y(), sample.accel_z())
}

/// Deviation of total acceleration from resting gravity, in g.
pub fn acceleration_delta(sample: &Sample) -> f64 {
    (total_acceleration(sample) - RESTING_G).abs()
}

/// Acceleration magnitude in the horizontal (x, y) plane, in g.
pub fn lateral_g(sample: &Sample) -> f64 {
    magnitude3(sample.accel_x(), sample.accel_y(), 0.0)
}

/// Total angular velocity magnitude in deg/s.
pub fn total_rotation(sample: &Sample) -> f64 {
    magnitude3(sample.gyro[0], sample.gyro[1], sample.gyro[2])
}

/// The magnitudes a scorer needs, computed once per sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    pub total_acceleration: f64,
    pub acceleration_delta: f64,
    pub lateral_g: f64,
    pub total_rotation: f64,
}

impl Kinematics {
    pub fn of(sample: &Sample) -> Self {
        let total = total_acceleration(sample);
        Self {
            total_acceleration: total,
            acceleration_delta: (total - RESTING_G).abs(),
            lateral_g: lateral_g(sample),
            total_rotation: total_rotation(sample),
        }
    }
}
