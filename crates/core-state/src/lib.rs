//! Per-call edit state: the buffer being edited, its undo history and the
//! kill ring.
//!
//! Every mutating helper here snapshots before it mutates, so a command
//! implemented on top of `EditState` cannot forget its undo entry.
//!
//! Insert coalescing:
//! - A run of consecutive self-insert keystrokes shares one snapshot taken at
//!   the first insert of the run.
//! - Any other command (motion, delete, kill, newline) ends the run.
//! - A bracketed paste is a single discrete snapshot.

use core_text::{Buffer, Direction, Position};

pub mod kill_ring;
pub mod undo;

pub use kill_ring::KillRing;
pub use undo::{InsertRun, SnapshotKind, UNDO_HISTORY_MAX, UndoEngine};

#[derive(Debug, Default)]
pub struct EditState {
    pub buffer: Buffer,
    pub undo: UndoEngine,
    pub kill_ring: KillRing,
}

impl EditState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Self-insert typed text, coalescing with the current insert run.
    pub fn insert_typed(&mut self, text: &str) {
        self.undo.begin_insert_coalescing(&self.buffer);
        self.buffer.insert_str(text);
        self.undo.note_insert_edit();
    }

    /// Insert text as one discrete undo step (paste, yank, newline).
    pub fn insert_discrete(&mut self, kind: SnapshotKind, text: &str) {
        if text.is_empty() {
            return;
        }
        self.undo.push_discrete_edit_snapshot(kind, &self.buffer);
        self.buffer.insert_str(text);
    }

    /// Delete a span as one undo step; returns the removed text.
    pub fn delete(&mut self, a: Position, b: Position) -> String {
        if a == b {
            return String::new();
        }
        self.undo
            .push_discrete_edit_snapshot(SnapshotKind::Edit, &self.buffer);
        self.buffer.delete_range(a, b)
    }

    /// Delete from the cursor to `target` and store the text in the kill ring.
    /// Returns false when the span is empty.
    pub fn kill_to(&mut self, target: Position) -> bool {
        let cursor = self.buffer.cursor();
        if target == cursor {
            return false;
        }
        let dir = if target > cursor {
            Direction::Forward
        } else {
            Direction::Backward
        };
        let text = self.delete(cursor, target);
        self.kill_ring.kill(&text, dir);
        true
    }

    /// Insert the kill ring slot at the cursor. Returns false when empty.
    pub fn yank(&mut self) -> bool {
        let Some(text) = self.kill_ring.yank().map(str::to_owned) else {
            return false;
        };
        self.insert_discrete(SnapshotKind::Edit, &text);
        true
    }

    /// Replace the whole buffer (cursor at end) as one undo step.
    pub fn replace_all(&mut self, text: &str) {
        if self.buffer.text() == text && self.buffer.cursor_at_end() {
            return;
        }
        self.undo
            .push_discrete_edit_snapshot(SnapshotKind::Replace, &self.buffer);
        self.buffer.set_text(text);
    }

    /// Replace the span `[a, b)` with `text`, leaving the cursor after it.
    pub fn replace_span(&mut self, a: Position, b: Position, text: &str) {
        self.undo
            .push_discrete_edit_snapshot(SnapshotKind::Replace, &self.buffer);
        let start = a.min(b);
        self.buffer.delete_range(a, b);
        self.buffer.set_cursor(start);
        self.buffer.insert_str(text);
    }

    pub fn undo(&mut self) -> bool {
        self.undo.undo(&mut self.buffer)
    }

    /// Called for every command that is not a self-insert or a kill.
    pub fn end_sequences(&mut self, keep_kill: bool) {
        self.undo.end_insert_coalescing();
        if !keep_kill {
            self.kill_ring.break_sequence();
        }
    }
}
