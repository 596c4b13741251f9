// LogcatLens - core/converter.rs
//
// Line converters for the logcat output formats the engine understands.
// The variant set is closed, so converters are a plain enum matched
// exhaustively rather than trait objects.
// Core layer: pure functions of (line, clock reading), no I/O.

use crate::core::model::{Level, LogRecord};
use chrono::{Datelike, Local, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// A known logcat line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// `logcat -v threadtime`:
    /// `MM-DD HH:MM:SS.mmm  PID  TID LEVEL TAG : message`
    #[default]
    Threadtime,

    /// `logcat -v brief`: `LEVEL/TAG(PID): message`
    Brief,
}

impl LogFormat {
    /// Every converter, in detection order.
    pub fn all() -> &'static [LogFormat] {
        &[LogFormat::Threadtime, LogFormat::Brief]
    }

    /// Human-readable converter name.
    pub fn name(self) -> &'static str {
        match self {
            LogFormat::Threadtime => "Threadtime",
            LogFormat::Brief => "Brief",
        }
    }

    /// Description of the line layout this converter accepts.
    pub fn description(self) -> &'static str {
        match self {
            LogFormat::Threadtime => {
                "Android logcat threadtime format (MM-DD HH:MM:SS.mmm PID TID LEVEL TAG: message)"
            }
            LogFormat::Brief => "Android logcat brief format (LEVEL/TAG(PID): message)",
        }
    }

    /// Convert a raw line using the local wall clock.
    ///
    /// Returns `None` when the line does not match this format or yields an
    /// invalid record. A miss is not an error.
    pub fn convert(self, line: &str) -> Option<LogRecord> {
        self.convert_at(line, Local::now().naive_local())
    }

    /// Convert a raw line against an explicit clock reading.
    ///
    /// Threadtime lines carry no year, so `now`'s year is prefixed to the
    /// parsed month-day. Brief lines carry no date or time at all, so the
    /// record is stamped with `now` itself: replaying a saved Brief capture
    /// yields the replay time, not the capture time.
    pub fn convert_at(self, line: &str, now: NaiveDateTime) -> Option<LogRecord> {
        let record = match self {
            LogFormat::Threadtime => convert_threadtime(line, now),
            LogFormat::Brief => convert_brief(line, now),
        }?;
        record.is_valid().then_some(record)
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a format name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFormat(pub String);

impl fmt::Display for UnknownFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown log format '{}' (expected 'threadtime' or 'brief')",
            self.0
        )
    }
}

impl std::error::Error for UnknownFormat {}

impl FromStr for LogFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogFormat::all()
            .iter()
            .copied()
            .find(|format| format.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownFormat(s.to_string()))
    }
}

// =============================================================================
// Grammars
// =============================================================================

fn threadtime_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // TAG is lazy so it stops at the first `<ws>*:<ws>*` delimiter.
        Regex::new(
            r"^(\d{2}-\d{2})\s+(\d{2}:\d{2}:\d{2}\.\d{3})\s+(\d+)\s+(\d+)\s+([VDIWEA])\s+(.+?)\s*:\s*(.*)$",
        )
        .expect("threadtime regex is valid")
    })
}

fn brief_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // logcat right-aligns the PID inside the parentheses, so leading
        // spaces are accepted on purpose; the strict form is `(PID)`.
        Regex::new(r"^([VDIWEA])/(.+?)\(\s*(\d+)\):\s*(.*)$").expect("brief regex is valid")
    })
}

fn convert_threadtime(line: &str, now: NaiveDateTime) -> Option<LogRecord> {
    let caps = threadtime_regex().captures(line)?;
    let level = Level::from_code(&caps[5])?;

    Some(LogRecord {
        date: Some(format!("{}-{}", now.year(), &caps[1])),
        time: caps[2].to_string(),
        pid: caps[3].to_string(),
        tid: caps[4].to_string(),
        package: String::new(),
        level,
        tag: caps[6].trim().to_string(),
        message: caps[7].to_string(),
    })
}

fn convert_brief(line: &str, now: NaiveDateTime) -> Option<LogRecord> {
    let caps = brief_regex().captures(line)?;
    let level = Level::from_code(&caps[1])?;

    Some(LogRecord {
        date: Some(now.format("%Y-%m-%d").to_string()),
        time: now.format("%H:%M:%S%.3f").to_string(),
        pid: caps[3].to_string(),
        tid: String::new(),
        package: String::new(),
        level,
        tag: caps[2].trim().to_string(),
        message: caps[4].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn clock() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_milli_opt(9, 26, 53, 589)
            .unwrap()
    }

    #[test]
    fn test_threadtime_basic_line() {
        let line = "02-10 12:34:23.772  2577  4448 D PowerUI : can't show warning";
        let record = LogFormat::Threadtime.convert_at(line, clock()).unwrap();
        assert_eq!(record.date.as_deref(), Some("2025-02-10"));
        assert_eq!(record.time, "12:34:23.772");
        assert_eq!(record.pid, "2577");
        assert_eq!(record.tid, "4448");
        assert_eq!(record.level, Level::Debug);
        assert_eq!(record.tag, "PowerUI");
        assert_eq!(record.message, "can't show warning");
        assert_eq!(record.package, "");
    }

    #[test]
    fn test_threadtime_tag_stops_at_first_delimiter() {
        let line = "01-01 00:00:01.000  100  101 I Net:Stack: state: up";
        let record = LogFormat::Threadtime.convert_at(line, clock()).unwrap();
        assert_eq!(record.tag, "Net");
        assert_eq!(record.message, "Stack: state: up");
    }

    #[test]
    fn test_threadtime_tag_with_spaces_is_trimmed() {
        let line = "11-30 23:59:59.999 1 2 W Some Tag   :   message body";
        let record = LogFormat::Threadtime.convert_at(line, clock()).unwrap();
        assert_eq!(record.tag, "Some Tag");
        assert_eq!(record.message, "message body");
    }

    #[test]
    fn test_threadtime_uses_clock_year() {
        let line = "12-31 23:59:59.999  1  1 I Tag: late";
        let record = LogFormat::Threadtime.convert_at(line, clock()).unwrap();
        assert_eq!(record.date.as_deref(), Some("2025-12-31"));
    }

    #[test]
    fn test_threadtime_rejects_other_formats() {
        assert!(LogFormat::Threadtime
            .convert_at("I/MyTag(1234): Log message here", clock())
            .is_none());
        assert!(LogFormat::Threadtime
            .convert_at("02-10 12:34:23.772  2577  4448 X PowerUI: bad level", clock())
            .is_none());
        assert!(LogFormat::Threadtime.convert_at("", clock()).is_none());
    }

    #[test]
    fn test_threadtime_empty_message_is_invalid() {
        let line = "02-10 12:34:23.772  2577  4448 D PowerUI:";
        assert!(LogFormat::Threadtime.convert_at(line, clock()).is_none());
    }

    #[test]
    fn test_brief_basic_line() {
        let record = LogFormat::Brief
            .convert_at("I/MyTag(1234): Log message here", clock())
            .unwrap();
        assert_eq!(record.level, Level::Info);
        assert_eq!(record.tag, "MyTag");
        assert_eq!(record.pid, "1234");
        assert_eq!(record.message, "Log message here");
        assert_eq!(record.tid, "");
        assert_eq!(record.package, "");
    }

    #[test]
    fn test_brief_stamps_clock_time() {
        let record = LogFormat::Brief
            .convert_at("E/Crash(  77): boom", clock())
            .unwrap();
        assert_eq!(record.date.as_deref(), Some("2025-03-14"));
        assert_eq!(record.time, "09:26:53.589");
        assert_eq!(record.pid, "77");
    }

    #[test]
    fn test_brief_rejects_threadtime_line() {
        let line = "02-10 12:34:23.772  2577  4448 D PowerUI : can't show warning";
        assert!(LogFormat::Brief.convert_at(line, clock()).is_none());
    }

    #[test]
    fn test_format_names_round_trip_through_from_str() {
        for format in LogFormat::all() {
            assert_eq!(format.name().parse::<LogFormat>().unwrap(), *format);
        }
        assert_eq!("BRIEF".parse::<LogFormat>().unwrap(), LogFormat::Brief);
        assert!("time".parse::<LogFormat>().is_err());
    }
}
