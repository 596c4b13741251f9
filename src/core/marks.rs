// LogcatLens - core/marks.rs
//
// Pinned-record tracking. Each mark remembers the record and its row in the
// primary filtered view so the caller can jump back to it.
//
// Linear scans throughout: mark lists are interactive-scale.

use crate::core::model::{LogRecord, MarkedRecord};

/// Time-ordered list of pinned records.
///
/// Ordered ascending by `record.time`; records with equal times keep the
/// order in which they were marked. At most one entry per view row.
#[derive(Debug, Clone, Default)]
pub struct MarkTracker {
    marks: Vec<MarkedRecord>,
}

impl MarkTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin `record`, shown at `original_index` in the primary view.
    ///
    /// No-op if that row is already pinned. Returns whether a mark was added.
    pub fn add(&mut self, record: LogRecord, original_index: usize) -> bool {
        if self.is_marked(original_index) {
            return false;
        }

        let pos = self
            .marks
            .iter()
            .position(|m| m.record.time > record.time)
            .unwrap_or(self.marks.len());

        self.marks.insert(
            pos,
            MarkedRecord {
                record,
                original_index,
            },
        );
        true
    }

    /// Unpin the row at `original_index`. Returns whether a mark was removed.
    pub fn remove(&mut self, original_index: usize) -> bool {
        match self
            .marks
            .iter()
            .position(|m| m.original_index == original_index)
        {
            Some(pos) => {
                self.marks.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn is_marked(&self, original_index: usize) -> bool {
        self.marks.iter().any(|m| m.original_index == original_index)
    }

    /// Primary-view row of the mark at position `row` in this list.
    pub fn get_original_index(&self, row: usize) -> Option<usize> {
        self.marks.get(row).map(|m| m.original_index)
    }

    pub fn get(&self, row: usize) -> Option<&MarkedRecord> {
        self.marks.get(row)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MarkedRecord> {
        self.marks.iter()
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn clear(&mut self) {
        self.marks.clear();
    }

    /// Move every mark to a new view row after the primary view changed.
    ///
    /// `remap` receives a mark's current row and returns its new row, or
    /// `None` if the record is no longer in view. Marks mapped to `None` are
    /// taken out of the list and returned so the caller can restore them
    /// once the record is visible again. Time order is unaffected.
    pub fn reanchor<F>(&mut self, mut remap: F) -> Vec<MarkedRecord>
    where
        F: FnMut(usize) -> Option<usize>,
    {
        let mut detached = Vec::new();
        let mut kept = Vec::with_capacity(self.marks.len());

        for mut mark in self.marks.drain(..) {
            match remap(mark.original_index) {
                Some(row) => {
                    mark.original_index = row;
                    kept.push(mark);
                }
                None => detached.push(mark),
            }
        }

        self.marks = kept;
        detached
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Level;

    fn record(time: &str, message: &str) -> LogRecord {
        LogRecord {
            date: None,
            time: time.to_string(),
            pid: "1".to_string(),
            tid: "1".to_string(),
            package: String::new(),
            level: Level::Info,
            tag: "T".to_string(),
            message: message.to_string(),
        }
    }

    fn messages(tracker: &MarkTracker) -> Vec<&str> {
        tracker.iter().map(|m| m.record.message.as_str()).collect()
    }

    #[test]
    fn test_add_same_index_twice_keeps_one() {
        let mut tracker = MarkTracker::new();
        assert!(tracker.add(record("10:00:00.000", "a"), 3));
        assert!(!tracker.add(record("11:00:00.000", "b"), 3));
        assert_eq!(tracker.len(), 1);
        assert_eq!(messages(&tracker), vec!["a"]);
    }

    #[test]
    fn test_add_keeps_time_order() {
        let mut tracker = MarkTracker::new();
        tracker.add(record("10:00:00.000", "later"), 0);
        tracker.add(record("09:00:00.000", "earlier"), 1);
        assert_eq!(messages(&tracker), vec!["earlier", "later"]);
        assert_eq!(tracker.get_original_index(0), Some(1));
        assert_eq!(tracker.get_original_index(1), Some(0));
    }

    #[test]
    fn test_equal_times_keep_arrival_order() {
        let mut tracker = MarkTracker::new();
        tracker.add(record("10:00:00.000", "first"), 5);
        tracker.add(record("10:00:00.000", "second"), 2);
        tracker.add(record("09:59:59.999", "zeroth"), 9);
        assert_eq!(messages(&tracker), vec!["zeroth", "first", "second"]);
    }

    #[test]
    fn test_remove_and_is_marked() {
        let mut tracker = MarkTracker::new();
        tracker.add(record("10:00:00.000", "a"), 1);
        tracker.add(record("10:00:01.000", "b"), 2);
        assert!(tracker.is_marked(2));
        assert!(tracker.remove(2));
        assert!(!tracker.is_marked(2));
        assert!(!tracker.remove(2));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_get_original_index_out_of_range() {
        let tracker = MarkTracker::new();
        assert_eq!(tracker.get_original_index(0), None);
    }

    #[test]
    fn test_clear() {
        let mut tracker = MarkTracker::new();
        tracker.add(record("10:00:00.000", "a"), 1);
        tracker.clear();
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_reanchor_moves_and_detaches() {
        let mut tracker = MarkTracker::new();
        tracker.add(record("10:00:00.000", "a"), 4);
        tracker.add(record("10:00:01.000", "b"), 7);

        // Row 4 becomes row 1, row 7 drops out of view.
        let detached = tracker.reanchor(|row| if row == 4 { Some(1) } else { None });
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.get_original_index(0), Some(1));
        assert_eq!(detached.len(), 1);
        assert_eq!(detached[0].record.message, "b");
        assert_eq!(detached[0].original_index, 7);
    }
}
