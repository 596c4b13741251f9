// LogcatLens - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Log Record (normalised output of a converter)
// =============================================================================

/// A single parsed device-log line, normalised across formats.
///
/// This is the unit that flows through filtering, marking, and saving.
/// Every converter produces these regardless of the source line's layout;
/// fields a format does not carry are left empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Calendar date as `YYYY-MM-DD`. `None` when the format carries no date.
    pub date: Option<String>,

    /// Time of day as `HH:MM:SS.mmm`. Fixed width and zero-padded, so plain
    /// string comparison orders records chronologically within a day.
    pub time: String,

    /// Process ID token (digits, kept as text).
    pub pid: String,

    /// Thread ID token (digits, kept as text). Empty when not carried.
    pub tid: String,

    /// Package name. Empty when not carried.
    pub package: String,

    /// Severity level.
    pub level: Level,

    /// Log tag.
    pub tag: String,

    /// Message text.
    pub message: String,
}

impl LogRecord {
    /// A record is valid when it has a level and a non-empty message.
    /// The level is always present by construction.
    pub fn is_valid(&self) -> bool {
        !self.message.is_empty()
    }
}

// =============================================================================
// Level
// =============================================================================

/// Logcat severity levels, ordered from least to most severe.
///
/// The derived `Ord` follows declaration order, which is the ordinal scale
/// used by the minimum-level filter: `V < D < I < W < E < A`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum Level {
    #[default]
    #[serde(rename = "V")]
    Verbose,
    #[serde(rename = "D")]
    Debug,
    #[serde(rename = "I")]
    Info,
    #[serde(rename = "W")]
    Warn,
    #[serde(rename = "E")]
    Error,
    #[serde(rename = "A")]
    Assert,
}

impl Level {
    /// Returns all variants in ordinal order (least severe first).
    pub fn all() -> &'static [Level] {
        &[
            Level::Verbose,
            Level::Debug,
            Level::Info,
            Level::Warn,
            Level::Error,
            Level::Assert,
        ]
    }

    /// Position on the severity scale, `V = 0` through `A = 5`.
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// The single-letter code used in logcat output.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Verbose => "V",
            Level::Debug => "D",
            Level::Info => "I",
            Level::Warn => "W",
            Level::Error => "E",
            Level::Assert => "A",
        }
    }

    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Level::Verbose => "Verbose",
            Level::Debug => "Debug",
            Level::Info => "Info",
            Level::Warn => "Warn",
            Level::Error => "Error",
            Level::Assert => "Assert",
        }
    }

    /// Map a single logcat level letter. Case-sensitive, as in logcat output.
    pub fn from_code(code: &str) -> Option<Level> {
        match code {
            "V" => Some(Level::Verbose),
            "D" => Some(Level::Debug),
            "I" => Some(Level::Info),
            "W" => Some(Level::Warn),
            "E" => Some(Level::Error),
            "A" => Some(Level::Assert),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a user-supplied level string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLevel(pub String);

impl fmt::Display for UnknownLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown level '{}' (expected one of V, D, I, W, E, A)",
            self.0
        )
    }
}

impl std::error::Error for UnknownLevel {}

impl FromStr for Level {
    type Err = UnknownLevel;

    /// Accepts the letter code or the full label, case-insensitively.
    /// Used for CLI flags and config values, never for parsing log lines.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Level::all()
            .iter()
            .copied()
            .find(|level| {
                level.as_str().eq_ignore_ascii_case(trimmed)
                    || level.label().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| UnknownLevel(s.to_string()))
    }
}

// =============================================================================
// Marked record
// =============================================================================

/// A pinned record together with its row in the primary filtered view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedRecord {
    /// The pinned record.
    pub record: LogRecord,

    /// Row of the record in the primary filtered view.
    pub original_index: usize,
}

// =============================================================================
// Detection statistics
// =============================================================================

/// Line counts for one converter pass over a source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DetectionStats {
    /// Non-blank, non-header lines seen.
    pub line_count: usize,

    /// Lines that produced a valid record.
    pub parsed_count: usize,
}

impl DetectionStats {
    /// Fraction of lines parsed, `0.0` for an empty source.
    pub fn parse_rate(&self) -> f64 {
        if self.line_count == 0 {
            0.0
        } else {
            self.parsed_count as f64 / self.line_count as f64
        }
    }

    /// True when every counted line parsed.
    pub fn is_complete(&self) -> bool {
        self.line_count > 0 && self.parsed_count == self.line_count
    }
}
