//! Sensor message decoding.
//!
//! Devices publish one JSON object per reading:
//!
//! ```json
//! {"accX": 0.02, "accY": -0.01, "accZ": 0.98, "gyroX": 1.5, "gyroY": 0.0, "gyroZ": -2.1}
//! ```
//!
//! An optional integer `timestamp` (ms) overrides the session clock. Streams
//! are newline-delimited; blank lines are skipped.

use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::clock::TimestampSource;
use crate::error::{DetectionError, IngestError};
use crate::session::DetectionSession;
use crate::types::Sample;

/// One decoded sensor reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorMessage {
    #[serde(rename = "accX", alias = "acc_x")]
    pub acc_x: f64,
    #[serde(rename = "accY", alias = "acc_y")]
    pub acc_y: f64,
    #[serde(rename = "accZ", alias = "acc_z")]
    pub acc_z: f64,
    #[serde(rename = "gyroX", alias = "gyro_x")]
    pub gyro_x: f64,
    #[serde(rename = "gyroY", alias = "gyro_y")]
    pub gyro_y: f64,
    #[serde(rename = "gyroZ", alias = "gyro_z")]
    pub gyro_z: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

impl SensorMessage {
    /// Decodes a single JSON message. `line` is used for error reporting only.
    pub fn parse(json: &str, line: usize) -> Result<Self, IngestError> {
        serde_json::from_str(json).map_err(|source| IngestError::Malformed { line, source })
    }

    /// Builds a validated sample, using `fallback_ms` when the message has
    /// no timestamp of its own.
    pub fn to_sample(&self, fallback_ms: u64) -> Result<Sample, DetectionError> {
        Sample::try_new(
            self.timestamp.unwrap_or(fallback_ms),
            [self.acc_x, self.acc_y, self.acc_z],
            [self.gyro_x, self.gyro_y, self.gyro_z],
        )
    }

    /// Feeds this reading into a session.
    ///
    /// Messages carrying a timestamp keep it; the rest are stamped by the
    /// session clock.
    pub fn apply_to<C: TimestampSource>(
        &self,
        session: &mut DetectionSession<C>,
    ) -> Result<(), DetectionError> {
        match self.timestamp {
            Some(ts) => {
                session.push_sample(self.to_sample(ts)?);
                Ok(())
            }
            None => session.add_reading(
                self.acc_x,
                self.acc_y,
                self.acc_z,
                self.gyro_x,
                self.gyro_y,
                self.gyro_z,
            ),
        }
    }

    /// Like [`apply_to`](Self::apply_to), but attributes a rejected
    /// reading to its 1-based stream line.
    pub fn apply_line<C: TimestampSource>(
        &self,
        line: usize,
        session: &mut DetectionSession<C>,
    ) -> Result<(), IngestError> {
        self.apply_to(session)
            .map_err(|source| IngestError::Rejected { line, source })
    }
}

/// Lazily decodes a newline-delimited message stream.
///
/// Yields `(line_number, message)` pairs; line numbers are 1-based.
pub fn read_messages<R: BufRead>(
    reader: R,
) -> impl Iterator<Item = Result<(usize, SensorMessage), IngestError>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let line_no = index + 1;
            match line {
                Err(err) => Some(Err(IngestError::Io(err))),
                Ok(text) if text.trim().is_empty() => None,
                Ok(text) => Some(SensorMessage::parse(text.trim(), line_no).map(|m| (line_no, m))),
            }
        })
}
