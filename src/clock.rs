//! Timestamp sources for sample bookkeeping.
//!
//! Timestamps never feed into scoring. They exist so callers can line
//! verdicts up with their own streams.

use std::cell::Cell;
use std::time::Instant;

/// Supplies monotonic millisecond timestamps to a session.
pub trait TimestampSource {
    fn now_ms(&self) -> u64;
}

/// Milliseconds elapsed since the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimestampSource for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Deterministic clock advancing a fixed step per reading.
///
/// Useful for replaying recorded streams at a known sample rate.
#[derive(Debug, Clone)]
pub struct SteppedClock {
    next_ms: Cell<u64>,
    step_ms: u64,
}

impl SteppedClock {
    pub fn new(start_ms: u64, step_ms: u64) -> Self {
        Self {
            next_ms: Cell::new(start_ms),
            step_ms,
        }
    }

    /// Clock ticking at `rate_hz`, starting from zero.
    pub fn at_rate(rate_hz: u32) -> Self {
        Self::new(0, 1000 / u64::from(rate_hz.max(1)))
    }
}

impl TimestampSource for SteppedClock {
    fn now_ms(&self) -> u64 {
        let now = self.next_ms.get();
        self.next_ms.set(now.saturating_add(self.step_ms));
        now
    }
}
