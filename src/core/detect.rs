// LogcatLens - core/detect.rs
//
// Format auto-detection: run a finite line source through each candidate
// converter, score the parse rate, and keep the best result.
// Core layer: operates on in-memory lines, the platform layer does the reading.

use crate::core::converter::LogFormat;
use crate::core::model::{DetectionStats, LogRecord};
use crate::util::constants;
use crate::util::error::DetectError;
use chrono::{Local, NaiveDateTime};

/// Outcome of a successful detection pass.
#[derive(Debug, Clone)]
pub struct Detection {
    /// Records produced by the winning converter, in source order.
    pub records: Vec<LogRecord>,
    /// The converter that produced them.
    pub format: LogFormat,
    /// Line counts for the winning converter.
    pub stats: DetectionStats,
}

/// True for lines that are neither records nor parse misses: blank lines,
/// logcat buffer banners (`--------- beginning of main`) and the `#` comment
/// header written by the save format.
pub fn is_header_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty()
        || constants::HEADER_MARKERS
            .iter()
            .any(|marker| trimmed.starts_with(marker))
}

/// Parse every line with one fixed converter, skipping detection.
pub fn parse_with<S: AsRef<str>>(
    lines: &[S],
    format: LogFormat,
) -> Result<Detection, DetectError> {
    parse_with_at(lines, format, Local::now().naive_local())
}

/// Like [`parse_with`] with an explicit clock reading.
///
/// Fails with `NoMatchingFormat` when not a single counted line parses.
pub fn parse_with_at<S: AsRef<str>>(
    lines: &[S],
    format: LogFormat,
    now: NaiveDateTime,
) -> Result<Detection, DetectError> {
    let (records, stats) = run_candidate(lines, |line| format.convert_at(line, now));
    if stats.parsed_count == 0 {
        return Err(DetectError::NoMatchingFormat {
            line_count: stats.line_count,
            candidates: 1,
        });
    }

    tracing::info!(
        format = format.name(),
        parsed = stats.parsed_count,
        lines = stats.line_count,
        "Format forced"
    );

    Ok(Detection {
        records,
        format,
        stats,
    })
}

/// Try each candidate in order and return the records of the best one,
/// using the local wall clock for converters that need it.
pub fn detect_and_parse<S: AsRef<str>>(
    lines: &[S],
    candidates: &[LogFormat],
) -> Result<Detection, DetectError> {
    detect_and_parse_at(lines, candidates, Local::now().naive_local())
}

/// Like [`detect_and_parse`] with an explicit clock reading.
///
/// The winner is the candidate with the strictly highest parsed count. The
/// first candidate that parses every counted line wins immediately and later
/// candidates are not tried, even if one of them would tie.
pub fn detect_and_parse_at<S: AsRef<str>>(
    lines: &[S],
    candidates: &[LogFormat],
    now: NaiveDateTime,
) -> Result<Detection, DetectError> {
    let (format, records, stats) =
        select_best(lines, candidates, |format, line| format.convert_at(line, now))?;

    tracing::info!(
        format = format.name(),
        parsed = stats.parsed_count,
        lines = stats.line_count,
        "Format detected"
    );

    Ok(Detection {
        records,
        format,
        stats,
    })
}

/// Candidate-agnostic selection loop shared by the public entry points.
fn select_best<S, C, F>(
    lines: &[S],
    candidates: &[C],
    convert: F,
) -> Result<(C, Vec<LogRecord>, DetectionStats), DetectError>
where
    S: AsRef<str>,
    C: Copy + std::fmt::Debug,
    F: Fn(C, &str) -> Option<LogRecord>,
{
    if candidates.is_empty() {
        let line_count = lines
            .iter()
            .filter(|&line| !is_header_line(line.as_ref()))
            .count();
        tracing::warn!(lines = line_count, "No detection candidates configured");
        return Err(DetectError::NoMatchingFormat {
            line_count,
            candidates: 0,
        });
    }

    let mut best: Option<(C, Vec<LogRecord>, DetectionStats)> = None;
    let mut last_line_count = 0;

    for &candidate in candidates {
        let (records, stats) = run_candidate(lines, |line| convert(candidate, line));
        last_line_count = stats.line_count;

        tracing::debug!(
            candidate = ?candidate,
            parsed = stats.parsed_count,
            lines = stats.line_count,
            "Detection candidate scored"
        );

        let best_count = best.as_ref().map_or(0, |(_, _, s)| s.parsed_count);
        let complete = stats.is_complete();
        if stats.parsed_count > best_count {
            best = Some((candidate, records, stats));
        }
        if complete {
            break;
        }
    }

    best.ok_or(DetectError::NoMatchingFormat {
        line_count: last_line_count,
        candidates: candidates.len(),
    })
}

fn run_candidate<S, F>(lines: &[S], convert: F) -> (Vec<LogRecord>, DetectionStats)
where
    S: AsRef<str>,
    F: Fn(&str) -> Option<LogRecord>,
{
    let mut records = Vec::new();
    let mut stats = DetectionStats::default();

    for line in lines {
        let line = line.as_ref();
        if is_header_line(line) {
            continue;
        }
        stats.line_count += 1;
        if let Some(record) = convert(line) {
            records.push(record);
            stats.parsed_count += 1;
        }
    }

    (records, stats)
}
