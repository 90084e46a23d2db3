//! Replay of a recorded sensor stream.
//!
//! Drives a session with every message of a newline-delimited stream and
//! writes one verdict per accepted reading.

use std::fmt;
use std::io::{BufRead, Write};

use tracing::warn;

use crate::clock::TimestampSource;
use crate::error::IngestError;
use crate::ingest::read_messages;
use crate::session::DetectionSession;
use crate::types::DangerResult;

/// How verdicts are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerdictFormat {
    /// One aligned human-readable line per reading.
    #[default]
    Text,
    /// One JSON object per reading: `{"line": N, "verdict": {...}}`.
    Json,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReplayOptions {
    pub format: VerdictFormat,
    /// Only write verdicts that are accidents.
    pub alerts_only: bool,
    /// Stop at the first malformed or rejected line instead of skipping it.
    pub strict: bool,
}

/// Counters for a finished replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplaySummary {
    pub readings: usize,
    pub accidents: usize,
    pub skipped: usize,
}

impl fmt::Display for ReplaySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} readings, {} accidents, {} skipped",
            self.readings, self.accidents, self.skipped
        )
    }
}

/// Replays `reader` through `session`, writing verdicts to `out`.
///
/// Outside strict mode, bad lines are logged and counted as skipped.
/// Read errors on the stream itself always abort.
pub fn replay<R, W, C>(
    reader: R,
    out: &mut W,
    session: &mut DetectionSession<C>,
    options: ReplayOptions,
) -> Result<ReplaySummary, IngestError>
where
    R: BufRead,
    W: Write,
    C: TimestampSource,
{
    let mut summary = ReplaySummary::default();

    for item in read_messages(reader) {
        let applied = item.and_then(|(line, message)| {
            message.apply_line(line, session).map(|()| line)
        });

        let line = match applied {
            Ok(line) => line,
            Err(err @ IngestError::Io(_)) => return Err(err),
            Err(err) if options.strict => return Err(err),
            Err(err) => {
                warn!(error = %err, "Skipping line");
                summary.skipped += 1;
                continue;
            }
        };
        summary.readings += 1;

        let verdict = session.detect_with_history();
        if verdict.is_accident {
            summary.accidents += 1;
        } else if options.alerts_only {
            continue;
        }
        write_verdict(out, line, &verdict, options.format).map_err(IngestError::Output)?;
    }

    Ok(summary)
}

fn write_verdict(
    out: &mut impl Write,
    line: usize,
    verdict: &DangerResult,
    format: VerdictFormat,
) -> std::io::Result<()> {
    match format {
        VerdictFormat::Text => {
            let flag = if verdict.is_accident { "ACCIDENT" } else { "ok" };
            writeln!(
                out,
                "{line:>6}  {flag:<8}  {:>3}%  {:<8}  {}",
                verdict.danger_percentage,
                verdict.level(),
                verdict.reason
            )
        }
        VerdictFormat::Json => {
            let record = serde_json::json!({ "line": line, "verdict": verdict });
            writeln!(out, "{record}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SteppedClock;
    use crate::config::DetectorConfig;
    use crate::types::VehicleProfile;
    use std::io::Cursor;

    const LEVEL: &str = r#"{"accX":0,"accY":0,"accZ":1,"gyroX":0,"gyroY":0,"gyroZ":0}"#;
    const INVERTED: &str = r#"{"accX":0,"accY":0,"accZ":-0.9,"gyroX":0,"gyroY":0,"gyroZ":0}"#;
    const TRUNCATED: &str = r#"{"accX":0,"accY":0,"accZ":1}"#;

    fn car_session() -> DetectionSession<SteppedClock> {
        let mut session =
            DetectionSession::with_clock(DetectorConfig::default(), SteppedClock::at_rate(50))
                .unwrap();
        session.set_vehicle_type(VehicleProfile::Car);
        session
    }

    fn run(lines: &[&str], options: ReplayOptions) -> (Result<ReplaySummary, IngestError>, String) {
        let mut session = car_session();
        let mut out = Vec::new();
        let result = replay(Cursor::new(lines.join("\n")), &mut out, &mut session, options);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_one_verdict_per_reading() {
        let (result, out) = run(&[LEVEL; 6], ReplayOptions::default());
        let summary = result.unwrap();

        assert_eq!(summary, ReplaySummary { readings: 6, accidents: 0, skipped: 0 });
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].contains("Insufficient data"));
        assert!(lines[5].contains("Normal operation"));
        assert!(lines[5].trim_start().starts_with("6  ok"));
    }

    #[test]
    fn test_alerts_only_writes_accidents() {
        let mut stream = vec![LEVEL; 3];
        stream.extend([INVERTED; 4]);
        let options = ReplayOptions { alerts_only: true, ..Default::default() };

        let (result, out) = run(&stream, options);
        let summary = result.unwrap();

        // Reading 4 is too early to judge; 5 to 7 have two inverted
        // readings in their last three.
        assert_eq!(summary.readings, 7);
        assert_eq!(summary.accidents, 3);
        assert_eq!(out.lines().count(), 3);
        assert!(out.lines().all(|l| l.contains("ACCIDENT") && l.contains("(Confirmed)")));
    }

    #[test]
    fn test_bad_lines_are_skipped_by_default() {
        let stream = [LEVEL, "not json", TRUNCATED, LEVEL];
        let (result, out) = run(&stream, ReplayOptions::default());

        assert_eq!(result.unwrap(), ReplaySummary { readings: 2, accidents: 0, skipped: 2 });
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn test_strict_stops_at_malformed_line() {
        let options = ReplayOptions { strict: true, ..Default::default() };
        let (result, out) = run(&[LEVEL, "not json", LEVEL], options);

        assert!(matches!(result, Err(IngestError::Malformed { line: 2, .. })));
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn test_json_format_carries_line_and_verdict() {
        let options = ReplayOptions { format: VerdictFormat::Json, ..Default::default() };
        let (result, out) = run(&[INVERTED; 5], options);
        result.unwrap();

        let last: serde_json::Value = serde_json::from_str(out.lines().last().unwrap()).unwrap();
        assert_eq!(last["line"], 5);
        assert_eq!(last["verdict"]["isAccident"], true);
        assert_eq!(last["verdict"]["dangerPercentage"], 100);
    }
}
