// LogcatLens - core/filter.rs
//
// Composable filter engine for log records.
// All active field filters are AND-combined; inside one field, the
// expression text picks AND (`&&`) or OR (`||`, legacy `|`) between keywords.
// Core layer: pure logic, no I/O.

use crate::core::model::{Level, LogRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Keyword expressions
// =============================================================================

/// Boolean mode joining the keywords of one expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Any keyword may match.
    Or,
    /// Every keyword must match.
    And,
}

impl MatchMode {
    /// Separator written when appending a keyword in this mode.
    pub fn separator(self) -> &'static str {
        match self {
            MatchMode::Or => "||",
            MatchMode::And => "&&",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MatchMode::Or => "OR",
            MatchMode::And => "AND",
        })
    }
}

/// Split expression text into its mode and raw (untrimmed) parts.
///
/// `&&` takes precedence over `||`, which takes precedence over a single `|`.
fn split_expression(text: &str) -> (MatchMode, Vec<&str>) {
    if text.contains("&&") {
        (MatchMode::And, text.split("&&").collect())
    } else if text.contains("||") {
        (MatchMode::Or, text.split("||").collect())
    } else {
        (MatchMode::Or, text.split('|').collect())
    }
}

/// A parsed keyword expression for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterExpr {
    mode: MatchMode,
    tokens: Vec<String>,
    folded: Vec<String>,
}

impl FilterExpr {
    /// Parse expression text. Returns `None` only for empty text, which
    /// disables the field's filter.
    ///
    /// Text made only of separators or whitespace keeps an empty keyword
    /// list: in OR mode nothing can match, in AND mode everything does.
    pub fn parse(text: &str) -> Option<Self> {
        if text.is_empty() {
            return None;
        }

        let (mode, parts) = split_expression(text);
        let tokens: Vec<String> = parts
            .into_iter()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect();

        let folded = tokens.iter().map(|t| t.to_lowercase()).collect();
        Some(Self {
            mode,
            tokens,
            folded,
        })
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// The trimmed, non-empty keywords in source order. May be empty.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Test a field value against the expression.
    ///
    /// `exact` selects case-sensitive equality (PID/TID); otherwise each
    /// keyword is a case-insensitive substring.
    pub fn matches(&self, value: &str, exact: bool) -> bool {
        if exact {
            let hit = |token: &String| value == token.as_str();
            match self.mode {
                MatchMode::Or => self.tokens.iter().any(hit),
                MatchMode::And => self.tokens.iter().all(hit),
            }
        } else {
            let value = value.to_lowercase();
            let hit = |token: &String| value.contains(token.as_str());
            match self.mode {
                MatchMode::Or => self.folded.iter().any(hit),
                MatchMode::And => self.folded.iter().all(hit),
            }
        }
    }
}

/// Match a field value against raw expression text.
///
/// An empty expression always passes.
pub fn matches_string_filter(value: &str, expr: &str, exact: bool) -> bool {
    FilterExpr::parse(expr).map_or(true, |parsed| parsed.matches(value, exact))
}

/// Append `value` to an expression as a new keyword joined with `mode`.
///
/// Returns `None` when `value` is already one of the expression's keywords,
/// leaving the caller's text unchanged.
pub fn append_token(current: &str, value: &str, mode: MatchMode) -> Option<String> {
    let current = current.trim();
    let value = value.trim();
    if current.is_empty() {
        return Some(value.to_string());
    }

    let (_, parts) = split_expression(current);
    if parts.iter().any(|part| part.trim() == value) {
        return None;
    }

    Some(format!("{current}{}{value}", mode.separator()))
}

// =============================================================================
// Field identifiers and raw inputs
// =============================================================================

/// Stable identifier of a free-text filter field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterField {
    Message,
    Tag,
    Package,
    Pid,
    Tid,
    StartTime,
    EndTime,
}

impl FilterField {
    pub fn all() -> &'static [FilterField] {
        &[
            FilterField::Message,
            FilterField::Tag,
            FilterField::Package,
            FilterField::Pid,
            FilterField::Tid,
            FilterField::StartTime,
            FilterField::EndTime,
        ]
    }

    /// Whether keywords in this field compare by exact equality.
    pub fn is_exact(self) -> bool {
        matches!(self, FilterField::Pid | FilterField::Tid)
    }
}

/// Current raw text of every filter field, as the user typed it.
///
/// This is the mutable side of filtering; `FilterCriteria` is rebuilt from
/// it on every evaluation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterInputs {
    pub message: String,
    pub tag: String,
    pub package: String,
    pub pid: String,
    pub tid: String,
    /// Level letter or name; empty or unrecognised means no floor.
    pub min_level: String,
    pub start_time: String,
    pub end_time: String,
}

impl FilterInputs {
    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::Message => &self.message,
            FilterField::Tag => &self.tag,
            FilterField::Package => &self.package,
            FilterField::Pid => &self.pid,
            FilterField::Tid => &self.tid,
            FilterField::StartTime => &self.start_time,
            FilterField::EndTime => &self.end_time,
        }
    }

    pub fn get_mut(&mut self, field: FilterField) -> &mut String {
        match field {
            FilterField::Message => &mut self.message,
            FilterField::Tag => &mut self.tag,
            FilterField::Package => &mut self.package,
            FilterField::Pid => &mut self.pid,
            FilterField::Tid => &mut self.tid,
            FilterField::StartTime => &mut self.start_time,
            FilterField::EndTime => &mut self.end_time,
        }
    }

    /// Add a keyword to a field. Returns false if it was already present.
    pub fn add_keyword(&mut self, field: FilterField, value: &str, mode: MatchMode) -> bool {
        let slot = self.get_mut(field);
        match append_token(slot, value, mode) {
            Some(updated) => {
                *slot = updated;
                true
            }
            None => false,
        }
    }
}

// =============================================================================
// Criteria
// =============================================================================

/// Immutable filter set built from `FilterInputs`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub message: Option<FilterExpr>,
    pub tag: Option<FilterExpr>,
    pub package: Option<FilterExpr>,
    pub pid: Option<FilterExpr>,
    pub tid: Option<FilterExpr>,
    pub min_level: Option<Level>,
    /// Inclusive lower time bound, compared lexically.
    pub start_time: Option<String>,
    /// Inclusive upper time bound, compared lexically.
    pub end_time: Option<String>,
}

impl FilterCriteria {
    pub fn from_inputs(inputs: &FilterInputs) -> Self {
        let bound = |text: &str| {
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        };

        let min_level = match inputs.min_level.trim() {
            "" => None,
            raw => match raw.parse::<Level>() {
                Ok(level) => Some(level),
                Err(e) => {
                    tracing::debug!(error = %e, "Ignoring unrecognised minimum level");
                    None
                }
            },
        };

        Self {
            message: FilterExpr::parse(&inputs.message),
            tag: FilterExpr::parse(&inputs.tag),
            package: FilterExpr::parse(&inputs.package),
            pid: FilterExpr::parse(&inputs.pid),
            tid: FilterExpr::parse(&inputs.tid),
            min_level,
            start_time: bound(&inputs.start_time),
            end_time: bound(&inputs.end_time),
        }
    }

    /// Returns true if no filters are active.
    pub fn is_empty(&self) -> bool {
        self.message.is_none()
            && self.tag.is_none()
            && self.package.is_none()
            && self.pid.is_none()
            && self.tid.is_none()
            && self.min_level.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
    }
}

impl From<&FilterInputs> for FilterCriteria {
    fn from(inputs: &FilterInputs) -> Self {
        Self::from_inputs(inputs)
    }
}

/// Check a single record against every active filter.
pub fn passes_filter(record: &LogRecord, criteria: &FilterCriteria) -> bool {
    fn check(expr: &Option<FilterExpr>, field: FilterField, value: &str) -> bool {
        expr.as_ref().map_or(true, |e| e.matches(value, field.is_exact()))
    }

    if !check(&criteria.message, FilterField::Message, &record.message) {
        return false;
    }

    // Time range (lexical; the time column is fixed width)
    if let Some(ref start) = criteria.start_time {
        if record.time.as_str() < start.as_str() {
            return false;
        }
    }
    if let Some(ref end) = criteria.end_time {
        if record.time.as_str() > end.as_str() {
            return false;
        }
    }

    if !check(&criteria.tag, FilterField::Tag, &record.tag)
        || !check(&criteria.package, FilterField::Package, &record.package)
        || !check(&criteria.pid, FilterField::Pid, &record.pid)
        || !check(&criteria.tid, FilterField::Tid, &record.tid)
    {
        return false;
    }

    if let Some(floor) = criteria.min_level {
        if record.level < floor {
            return false;
        }
    }

    true
}

/// Apply filters to a slice of records, returning indices of passing records.
///
/// The result is the primary view as positions into `records`, ascending.
pub fn apply_filters(records: &[LogRecord], criteria: &FilterCriteria) -> Vec<usize> {
    if criteria.is_empty() {
        return (0..records.len()).collect();
    }

    records
        .iter()
        .enumerate()
        .filter(|(_, record)| passes_filter(record, criteria))
        .map(|(idx, _)| idx)
        .collect()
}
