//! Incremental history search state (`Ctrl-R` / `Ctrl-S`).
//!
//! While searching, the buffer is left untouched; the matched entry is only
//! previewed. Committing copies the entry into the buffer as one undo step.

use core_history::History;
use core_text::{Buffer, Direction};

#[derive(Debug, Clone)]
pub(crate) struct SearchState {
    pub query: String,
    pub dir: Direction,
    /// Age index of the current match.
    pub found: Option<usize>,
    /// The last query change or step found nothing.
    pub failing: bool,
}

impl SearchState {
    pub fn new(dir: Direction) -> Self {
        Self {
            query: String::new(),
            dir,
            found: None,
            failing: false,
        }
    }

    /// Re-run after the query changed, keeping the current match when it
    /// still matches.
    pub fn refresh(&mut self, history: &History) {
        let hit = match (self.dir, self.found) {
            (_, Some(age)) if history.get(age).is_some_and(|e| e.contains(&self.query)) => {
                Some(age)
            }
            (Direction::Backward, Some(age)) => history.search(&self.query, Some(age)),
            (Direction::Forward, Some(age)) => history.search_forward(&self.query, age),
            (_, None) => history.search(&self.query, None),
        };
        self.settle(hit);
    }

    /// Move to the next match in the search direction. Returns false when
    /// there is none.
    pub fn step(&mut self, history: &History, dir: Direction) -> bool {
        self.dir = dir;
        let hit = match (dir, self.found) {
            (Direction::Backward, found) => history.search(&self.query, found),
            (Direction::Forward, Some(age)) => history.search_forward(&self.query, age),
            (Direction::Forward, None) => None,
        };
        self.settle(hit);
        hit.is_some()
    }

    fn settle(&mut self, hit: Option<usize>) {
        self.failing = hit.is_none();
        if hit.is_some() {
            self.found = hit;
        }
        tracing::trace!(target: "editor.search", query_len = self.query.len(), found = ?self.found, failing = self.failing, "search_step");
    }

    pub fn prompt(&self) -> String {
        let failing = if self.failing { "failed " } else { "" };
        let reverse = match self.dir {
            Direction::Backward => "reverse-",
            Direction::Forward => "",
        };
        format!("({failing}{reverse}i-search)'{}': ", self.query)
    }

    /// Buffer shown while searching: the match with the cursor on the hit,
    /// or `current` when nothing matched yet.
    pub fn preview(&self, history: &History, current: &Buffer) -> Buffer {
        let Some(entry) = self.found.and_then(|age| history.get(age)) else {
            return current.clone();
        };
        let mut buf = Buffer::from_str(entry);
        let at = entry.find(self.query.as_str()).unwrap_or(entry.len());
        buf.set_cursor(buf.position_at_byte(at));
        buf
    }
}
