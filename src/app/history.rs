// LogcatLens - app/history.rs
//
// Per-field filter history with Up/Down style navigation. In memory only;
// a session starts with empty history.

use crate::core::filter::{FilterField, FilterInputs};
use crate::util::constants;
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Default, Clone)]
struct FieldHistory {
    entries: VecDeque<String>,
    /// Position while navigating; `None` means editing fresh text.
    cursor: Option<usize>,
    /// Text that was in the field when navigation started.
    draft: String,
}

/// Bounded history of submitted values for every filter field.
#[derive(Debug, Clone)]
pub struct FilterHistory {
    capacity: usize,
    fields: HashMap<FilterField, FieldHistory>,
}

impl Default for FilterHistory {
    fn default() -> Self {
        Self::new(constants::DEFAULT_HISTORY_SIZE)
    }
}

impl FilterHistory {
    /// Empty history keeping at most `capacity` entries per field.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(constants::MIN_HISTORY_SIZE),
            fields: HashMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Remember a submitted value. Returns whether the history changed.
    ///
    /// Empty text and a repeat of the newest entry are ignored; an older
    /// duplicate moves to the newest position.
    pub fn record(&mut self, field: FilterField, text: &str) -> bool {
        let text = text.trim();
        let capacity = self.capacity;
        let history = self.fields.entry(field).or_default();
        history.cursor = None;
        history.draft.clear();

        if text.is_empty() || history.entries.back().map(String::as_str) == Some(text) {
            return false;
        }

        if let Some(pos) = history.entries.iter().position(|e| e == text) {
            history.entries.remove(pos);
        }
        history.entries.push_back(text.to_string());
        while history.entries.len() > capacity {
            history.entries.pop_front();
        }
        true
    }

    /// Record every non-empty field of `inputs`.
    pub fn record_inputs(&mut self, inputs: &FilterInputs) {
        for &field in FilterField::all() {
            self.record(field, inputs.get(field));
        }
    }

    /// Step to the next older entry.
    ///
    /// `current` is the field's text right now; it is kept as the draft the
    /// first time navigation leaves it. Stays on the oldest entry once
    /// reached. `None` if the field has no history.
    pub fn previous(&mut self, field: FilterField, current: &str) -> Option<String> {
        let history = self.fields.get_mut(&field)?;
        if history.entries.is_empty() {
            return None;
        }

        let pos = match history.cursor {
            None => {
                history.draft = current.to_string();
                history.entries.len() - 1
            }
            Some(pos) => pos.saturating_sub(1),
        };
        history.cursor = Some(pos);
        history.entries.get(pos).cloned()
    }

    /// Step to the next newer entry. Moving past the newest entry restores
    /// the draft text. `None` when not navigating.
    pub fn next(&mut self, field: FilterField) -> Option<String> {
        let history = self.fields.get_mut(&field)?;
        let pos = history.cursor?;

        if pos + 1 < history.entries.len() {
            history.cursor = Some(pos + 1);
            history.entries.get(pos + 1).cloned()
        } else {
            history.cursor = None;
            Some(std::mem::take(&mut history.draft))
        }
    }

    /// Entries for `field`, oldest first.
    pub fn entries(&self, field: FilterField) -> Vec<&str> {
        self.fields
            .get(&field)
            .map(|h| h.entries.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }
}
