// LogcatLens - app/session.rs
//
// The live log session: accepted records, the filtered view over them, the
// active converter, the raw filter inputs, and the pinned marks.
//
// Rules:
// - `visible` holds indices into `records`, ascending, and is the only
//   source of view rows. Marks store view rows, so every rebuild of
//   `visible` re-anchors them.
// - Load replaces the whole record set or nothing; a failed load leaves
//   the session exactly as it was.
// - Live ingestion appends; existing view rows never shift.

use crate::app::history::FilterHistory;
use crate::core::converter::LogFormat;
use crate::core::detect;
use crate::core::filter::{self, FilterCriteria, FilterField, FilterInputs};
use crate::core::marks::MarkTracker;
use crate::core::model::{DetectionStats, LogRecord, MarkedRecord};
use crate::core::serializer;
use crate::platform::fs;
use crate::util::error::{DetectError, FileError, LogcatLensError};
use crate::util::logging;
use std::path::Path;

/// What happened to one live line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// The active converter produced no valid record; nothing was stored.
    Rejected,
    /// Stored, but the current filters hide it.
    Hidden,
    /// Stored and appended to the view at `row`.
    Visible { row: usize },
}

/// Result of a successful load.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct LoadSummary {
    pub format: LogFormat,
    pub stats: DetectionStats,
}

/// A mark whose record is filtered out of the view. Kept by source index so
/// it can be restored when the record becomes visible again.
#[derive(Debug, Clone)]
struct ParkedMark {
    source: usize,
    mark: MarkedRecord,
}

#[derive(Debug)]
pub struct LogSession {
    records: Vec<LogRecord>,
    visible: Vec<usize>,
    converter: LogFormat,
    candidates: Vec<LogFormat>,
    inputs: FilterInputs,
    marks: MarkTracker,
    parked: Vec<ParkedMark>,
    history: FilterHistory,
}

impl Default for LogSession {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSession {
    /// Empty session using the Threadtime converter and every known format
    /// as a detection candidate.
    pub fn new() -> Self {
        Self::with_candidates(LogFormat::all().to_vec())
    }

    /// Empty session that tries `candidates`, in order, on load.
    pub fn with_candidates(candidates: Vec<LogFormat>) -> Self {
        Self {
            records: Vec::new(),
            visible: Vec::new(),
            converter: LogFormat::default(),
            candidates,
            inputs: FilterInputs::default(),
            marks: MarkTracker::default(),
            parked: Vec::new(),
            history: FilterHistory::default(),
        }
    }

    /// Keep at most `capacity` history entries per filter field.
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history = FilterHistory::new(capacity);
        self
    }

    // =========================================================================
    // Live ingestion
    // =========================================================================

    /// Convert one line with the active converter and route the result.
    ///
    /// Criteria are rebuilt from the current inputs on every call, so an
    /// input edit takes effect from the next line onward.
    pub fn ingest_line(&mut self, line: &str) -> LineOutcome {
        let Some(record) = self.converter.convert(line) else {
            tracing::debug!(
                converter = self.converter.name(),
                line = logging::preview(line),
                "Live line rejected"
            );
            return LineOutcome::Rejected;
        };

        let criteria = FilterCriteria::from_inputs(&self.inputs);
        let passes = filter::passes_filter(&record, &criteria);
        let source = self.records.len();
        self.records.push(record);

        if passes {
            self.visible.push(source);
            LineOutcome::Visible {
                row: self.visible.len() - 1,
            }
        } else {
            LineOutcome::Hidden
        }
    }

    // =========================================================================
    // Filtering
    // =========================================================================

    pub fn inputs(&self) -> &FilterInputs {
        &self.inputs
    }

    /// Mutable access to the raw inputs. Changes reach already-stored
    /// records only after [`refilter`](Self::refilter).
    pub fn inputs_mut(&mut self) -> &mut FilterInputs {
        &mut self.inputs
    }

    /// Replace every input and rebuild the view.
    pub fn set_inputs(&mut self, inputs: FilterInputs) {
        self.inputs = inputs;
        self.refilter();
    }

    /// Rebuild the view from all records and move marks to their new rows.
    ///
    /// The applied inputs are added to the filter history. A mark whose
    /// record is now hidden is parked, not dropped; it returns to the mark
    /// list on the first rebuild that shows the record again.
    pub fn refilter(&mut self) {
        self.history.record_inputs(&self.inputs);
        let criteria = FilterCriteria::from_inputs(&self.inputs);
        let old_visible =
            std::mem::replace(&mut self.visible, filter::apply_filters(&self.records, &criteria));
        let visible = &self.visible;

        let detached = self.marks.reanchor(|row| {
            let source = *old_visible.get(row)?;
            visible.binary_search(&source).ok()
        });

        let parked = std::mem::take(&mut self.parked);
        for entry in parked {
            match visible.binary_search(&entry.source) {
                Ok(row) => {
                    self.marks.add(entry.mark.record, row);
                }
                Err(_) => self.parked.push(entry),
            }
        }

        for mark in detached {
            if let Some(&source) = old_visible.get(mark.original_index) {
                self.parked.push(ParkedMark { source, mark });
            }
        }

        tracing::debug!(
            visible = self.visible.len(),
            total = self.records.len(),
            marks = self.marks.len(),
            parked = self.parked.len(),
            "View rebuilt"
        );
    }

    pub fn history(&self) -> &FilterHistory {
        &self.history
    }

    /// Put the next older history entry into `field`. Returns false when
    /// the field has no history. The view is not rebuilt.
    pub fn recall_previous(&mut self, field: FilterField) -> bool {
        let current = self.inputs.get(field).to_string();
        match self.history.previous(field, &current) {
            Some(text) => {
                *self.inputs.get_mut(field) = text;
                true
            }
            None => false,
        }
    }

    /// Put the next newer history entry (or the draft) into `field`.
    pub fn recall_next(&mut self, field: FilterField) -> bool {
        match self.history.next(field) {
            Some(text) => {
                *self.inputs.get_mut(field) = text;
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Marks
    // =========================================================================

    pub fn marks(&self) -> &MarkTracker {
        &self.marks
    }

    /// Marks currently hidden by the filters.
    pub fn hidden_mark_count(&self) -> usize {
        self.parked.len()
    }

    /// Pin view row `row`. Returns false if the row does not exist or is
    /// already pinned.
    pub fn mark(&mut self, row: usize) -> bool {
        let Some(record) = self.record_at(row).cloned() else {
            return false;
        };
        self.marks.add(record, row)
    }

    /// Unpin view row `row`. Returns false if it was not pinned.
    pub fn unmark(&mut self, row: usize) -> bool {
        self.marks.remove(row)
    }

    /// Flip the pin on view row `row`. Returns the new state, or `None` if
    /// the row does not exist.
    pub fn toggle_mark(&mut self, row: usize) -> Option<bool> {
        if row >= self.visible.len() {
            return None;
        }
        if self.marks.is_marked(row) {
            self.unmark(row);
            Some(false)
        } else {
            self.mark(row);
            Some(true)
        }
    }

    pub fn is_row_marked(&self, row: usize) -> bool {
        self.marks.is_marked(row)
    }

    /// View row to scroll to for entry `marked_row` of the mark list.
    pub fn scroll_target(&self, marked_row: usize) -> Option<usize> {
        self.marks.get_original_index(marked_row)
    }

    // =========================================================================
    // Load / save
    // =========================================================================

    pub fn converter(&self) -> LogFormat {
        self.converter
    }

    /// Switch the converter used for live lines.
    pub fn set_converter(&mut self, format: LogFormat) {
        tracing::debug!(format = format.name(), "Live converter set");
        self.converter = format;
    }

    pub fn candidates(&self) -> &[LogFormat] {
        &self.candidates
    }

    /// Detect the format of `lines` and replace the record set with the
    /// winning converter's output.
    ///
    /// On success the detected converter becomes the live converter and
    /// inputs and marks are reset; filter history is kept. On failure
    /// nothing changes.
    pub fn load_lines<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<LoadSummary, DetectError> {
        let detection = detect::detect_and_parse(lines, &self.candidates)?;
        Ok(self.adopt(detection.records, detection.format, detection.stats))
    }

    /// Parse `lines` with one fixed format instead of detecting.
    ///
    /// Fails like detection does when not a single line parses.
    pub fn load_lines_as<S: AsRef<str>>(
        &mut self,
        lines: &[S],
        format: LogFormat,
    ) -> Result<LoadSummary, DetectError> {
        let detection = detect::parse_with(lines, format)?;
        Ok(self.adopt(detection.records, detection.format, detection.stats))
    }

    /// Read `path` and load it, detecting the format unless `format` is set.
    pub fn load_file(
        &mut self,
        path: &Path,
        format: Option<LogFormat>,
    ) -> Result<LoadSummary, LogcatLensError> {
        let lines = fs::read_lines(path)?;
        let summary = match format {
            Some(format) => self.load_lines_as(&lines, format)?,
            None => self.load_lines(&lines)?,
        };
        tracing::info!(
            path = %path.display(),
            format = summary.format.name(),
            records = self.records.len(),
            "Log file loaded"
        );
        Ok(summary)
    }

    fn adopt(
        &mut self,
        records: Vec<LogRecord>,
        format: LogFormat,
        stats: DetectionStats,
    ) -> LoadSummary {
        self.visible = (0..records.len()).collect();
        self.records = records;
        self.converter = format;
        self.inputs = FilterInputs::default();
        self.marks.clear();
        self.parked.clear();
        LoadSummary { format, stats }
    }

    /// Canonical save text of every stored record.
    pub fn save_text(&self) -> String {
        serializer::save(&self.records)
    }

    /// Write the canonical save text to `path`. Returns the record count.
    pub fn save_file(&self, path: &Path) -> Result<usize, FileError> {
        fs::write_atomic(path, &self.save_text())?;
        tracing::info!(
            path = %path.display(),
            records = self.records.len(),
            "Log file saved"
        );
        Ok(self.records.len())
    }

    /// Drop every record, the view and all marks. Inputs are kept.
    pub fn clear(&mut self) {
        self.records.clear();
        self.visible.clear();
        self.marks.clear();
        self.parked.clear();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn visible_indices(&self) -> &[usize] {
        &self.visible
    }

    pub fn visible_records(&self) -> impl Iterator<Item = &LogRecord> + '_ {
        self.visible.iter().map(|&i| &self.records[i])
    }

    /// Record shown at view row `row`.
    pub fn record_at(&self, row: usize) -> Option<&LogRecord> {
        self.visible.get(row).and_then(|&i| self.records.get(i))
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn total_count(&self) -> usize {
        self.records.len()
    }

    /// "Showing N / M" status line.
    pub fn status_line(&self) -> String {
        format!("Showing {} / {}", self.visible.len(), self.records.len())
    }
}
