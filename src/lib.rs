//! Crash Sensing Library
//!
//! A real-time crash detection engine for vehicle-mounted inertial sensors.
//! It turns a stream of six-axis readings into graded danger verdicts.
//!
//! # Design Philosophy
//!
//! - **Graded, not binary**: every verdict carries a 0–100 danger percentage
//!   and the human-readable triggers behind it.
//! - **Vehicle-aware**: cars and scooters fail differently, so each has its
//!   own rules and accident threshold.
//! - **Corroborate before alarming**: a positive reading must persist across
//!   recent history before it is reported, which filters single spikes.
//! - **Fixed footprint**: no I/O, no allocation growth, O(window) per verdict.
//!
//! # Example
//!
//! ```
//! use crash_sensing::{DetectionSession, VehicleProfile};
//!
//! let mut session = DetectionSession::new();
//! session.set_vehicle_type(VehicleProfile::Car);
//!
//! for _ in 0..5 {
//!     // Car upside down: gravity reads negative on Z.
//!     session.add_reading(0.0, 0.0, -0.9, 0.0, 0.0, 0.0).unwrap();
//! }
//!
//! let verdict = session.detect_with_history();
//! assert!(verdict.is_accident);
//! assert_eq!(verdict.reason, "Vehicle Rollover (Inverted) (Confirmed)");
//! ```

pub mod alert;
pub mod car;
pub mod clock;
pub mod config;
pub mod error;
pub mod ffi;
pub mod ingest;
pub mod replay;
pub mod scooter;
mod scoring;
pub mod session;
pub mod signal;
pub mod types;

mod stress_tests;

// Re-export commonly used types
pub use alert::{AlertKind, AlertRequest, GeoPoint};
pub use clock::{MonotonicClock, SteppedClock, TimestampSource};
pub use config::DetectorConfig;
pub use error::{ConfigError, DetectionError, IngestError};
pub use ingest::SensorMessage;
pub use replay::{ReplayOptions, ReplaySummary, VerdictFormat};
pub use session::DetectionSession;
pub use types::{DangerLevel, DangerResult, Outcome, Sample, Trigger, VehicleProfile};
