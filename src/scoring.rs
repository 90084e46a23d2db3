//! Additive score accumulation shared by the vehicle scorers.
//!
//! Each scorer owns its rule set; this only handles the mechanics that are
//! identical for both: summing points, recording triggers in firing order,
//! then rounding and clamping into a [`DangerResult`].

use crate::types::{DangerResult, Trigger};

/// Upper bound of a danger percentage.
pub const MAX_DANGER: f64 = 100.0;

/// Running tally for a single sample.
#[derive(Debug, Default)]
pub(crate) struct ScoreSheet {
    points: f64,
    triggers: Vec<Trigger>,
}

impl ScoreSheet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, points: f64, trigger: Trigger) {
        self.points += points;
        self.triggers.push(trigger);
    }

    /// Rounds to the nearest integer, clamps to [0, 100] and applies the
    /// accident threshold.
    pub(crate) fn finish(self, threshold: u8) -> DangerResult {
        // NaN survives the clamp and casts to 0.
        let percentage = self.points.round().clamp(0.0, MAX_DANGER) as u8;
        DangerResult::from_triggers(self.triggers, percentage, threshold)
    }
}
