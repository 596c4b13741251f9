// LogcatLens - core/serializer.rs
//
// Canonical text rendering of records for save. Output is threadtime
// layout so a saved file is re-read by the Threadtime converter in full.
// Core layer: writes to a String or any fmt::Write, never touches files.

use crate::core::converter::LogFormat;
use crate::core::model::LogRecord;
use crate::util::constants;
use std::fmt::Write;

/// Render one record as a threadtime line (no trailing newline).
///
/// `DATE TIME  PID  TID LEVEL TAG: MESSAGE`, with fixed placeholders for
/// missing fields and PID/TID right-aligned to five columns.
pub fn format_record(record: &LogRecord) -> String {
    let mut line = String::with_capacity(40 + record.tag.len() + record.message.len());
    // Writing to a String cannot fail.
    let _ = write_record(&mut line, record);
    line
}

fn write_record<W: Write>(out: &mut W, record: &LogRecord) -> std::fmt::Result {
    let date = record
        .date
        .as_deref()
        .and_then(month_day)
        .unwrap_or(constants::PLACEHOLDER_DATE);
    let time = non_empty(&record.time).unwrap_or(constants::PLACEHOLDER_TIME);
    let pid = non_empty(&record.pid).unwrap_or(constants::PLACEHOLDER_ID);
    let tid = non_empty(&record.tid).unwrap_or(constants::PLACEHOLDER_ID);
    // Level is a closed enum, so there is always a letter to write.
    let level = record.level.as_str();
    let tag = non_empty(&record.tag).unwrap_or(constants::PLACEHOLDER_TAG);
    let width = constants::ID_COLUMN_WIDTH;

    write!(
        out,
        "{date} {time}  {pid:>width$}  {tid:>width$} {level} {tag}: {}",
        record.message
    )
}

/// Extract `MM-DD` from `YYYY-MM-DD`; an `MM-DD` value is kept as-is.
fn month_day(date: &str) -> Option<&str> {
    let parts: Vec<&str> = date.split('-').collect();
    match parts.len() {
        3 => date.get(parts[0].len() + 1..),
        2 => Some(date),
        _ => non_empty(date),
    }
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

/// Render a full save blob: three `#` header lines then one line per record.
pub fn save(records: &[LogRecord]) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_save(&mut out, records);
    out
}

fn write_save<W: Write>(out: &mut W, records: &[LogRecord]) -> std::fmt::Result {
    writeln!(out, "# Log file saved by {}", constants::APP_NAME)?;
    writeln!(out, "# Format: {}", LogFormat::Threadtime.description())?;
    writeln!(out, "# Total entries: {}", records.len())?;
    for record in records {
        write_record(out, record)?;
        out.write_char('\n')?;
    }
    Ok(())
}
