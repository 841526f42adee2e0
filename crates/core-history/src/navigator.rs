//! Per-call history cursor.
//!
//! The first step back from the in-progress edit stashes the buffer text;
//! stepping forward past the newest entry hands it back verbatim.

use crate::History;

#[derive(Debug, Default, Clone)]
pub struct HistoryNavigator {
    /// How many entries back from the newest; 0 means "the in-progress edit".
    offset: usize,
    stash: Option<String>,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Step to an older entry. `current` is the buffer text, stashed on the
    /// first step. Returns the text to show, or `None` at the oldest entry.
    pub fn previous(&mut self, history: &History, current: &str) -> Option<String> {
        if self.offset >= history.len() {
            return None;
        }
        if self.offset == 0 {
            self.stash = Some(current.to_owned());
        }
        self.offset += 1;
        history.recent(self.offset - 1).map(str::to_owned)
    }

    /// Step to a newer entry, or back to the stashed edit. `None` when
    /// already at the in-progress edit.
    pub fn next(&mut self, history: &History) -> Option<String> {
        match self.offset {
            0 => None,
            1 => {
                self.offset = 0;
                Some(self.stash.take().unwrap_or_default())
            }
            _ => {
                self.offset -= 1;
                history.recent(self.offset - 1).map(str::to_owned)
            }
        }
    }

    /// Jump to the oldest entry.
    pub fn first(&mut self, history: &History, current: &str) -> Option<String> {
        if history.is_empty() {
            return None;
        }
        if self.offset == 0 {
            self.stash = Some(current.to_owned());
        }
        self.offset = history.len();
        history.get(0).map(str::to_owned)
    }

    /// Jump back to the in-progress edit.
    pub fn last(&mut self) -> Option<String> {
        if self.offset == 0 {
            return None;
        }
        self.offset = 0;
        Some(self.stash.take().unwrap_or_default())
    }

    /// Position the cursor on an entry picked by search (age index).
    pub fn jump_to(&mut self, history: &History, age: usize, current: &str) {
        if age >= history.len() {
            return;
        }
        if self.offset == 0 {
            self.stash = Some(current.to_owned());
        }
        self.offset = history.len() - age;
    }
}
