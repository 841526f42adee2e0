use core_text::Buffer;
use std::collections::VecDeque;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::trace;

/// Maximum number of snapshots retained in undo history.
pub const UNDO_HISTORY_MAX: usize = 200;

/// Snapshot classification, recorded for tracing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapshotKind {
    /// Coalesced insert run or discrete edit.
    Edit,
    /// Whole bracketed paste.
    Paste,
    /// Buffer replaced wholesale (history recall, completion accept).
    Replace,
}

/// A full-state snapshot: buffer rows plus cursor.
#[derive(Clone, Debug)]
pub struct EditSnapshot {
    pub kind: SnapshotKind,
    pub buffer: Buffer,
    pub hash: u64,
}

/// Insert run state tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertRun {
    Inactive,
    Active { edits: u32 },
}

#[derive(Debug)]
pub struct UndoEngine {
    undo_stack: VecDeque<EditSnapshot>,
    insert_run: InsertRun,
    snapshots_skipped: u64,
}

impl Default for UndoEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoEngine {
    pub fn new() -> Self {
        Self {
            undo_stack: VecDeque::new(),
            insert_run: InsertRun::Inactive,
            snapshots_skipped: 0,
        }
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }
    pub fn insert_run(&self) -> InsertRun {
        self.insert_run
    }
    pub fn snapshots_skipped(&self) -> u64 {
        self.snapshots_skipped
    }

    /// Capture `buffer` before a mutation. Identical successive states are
    /// stored once.
    pub fn push_snapshot(&mut self, kind: SnapshotKind, buffer: &Buffer) {
        let current_hash = buffer_hash(buffer);
        if let Some(last) = self.undo_stack.back()
            && last.hash == current_hash
            && last.buffer == *buffer
        {
            self.snapshots_skipped += 1;
            trace!(target: "state.undo", undo_depth = self.undo_stack.len(), hash = current_hash, "snapshot_dedupe_skip");
            return;
        }
        self.undo_stack.push_back(EditSnapshot {
            kind,
            buffer: buffer.clone(),
            hash: current_hash,
        });
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), rows = buffer.row_count(), ?kind, hash = current_hash, "push_snapshot");
        if self.undo_stack.len() > UNDO_HISTORY_MAX {
            self.undo_stack.pop_front();
            trace!(target: "state.undo", "undo_stack_trimmed");
        }
    }

    /// Snapshot once at the start of a self-insert run; later inserts in the
    /// same run share it.
    pub fn begin_insert_coalescing(&mut self, buffer: &Buffer) {
        if self.insert_run == InsertRun::Inactive {
            self.push_snapshot(SnapshotKind::Edit, buffer);
            self.insert_run = InsertRun::Active { edits: 0 };
        }
    }

    pub fn end_insert_coalescing(&mut self) {
        self.insert_run = InsertRun::Inactive;
    }

    pub fn note_insert_edit(&mut self) {
        if let InsertRun::Active { edits } = &mut self.insert_run {
            *edits += 1;
        }
    }

    /// Ends any insert run and snapshots before a discrete edit.
    pub fn push_discrete_edit_snapshot(&mut self, kind: SnapshotKind, buffer: &Buffer) {
        self.end_insert_coalescing();
        self.push_snapshot(kind, buffer);
    }

    /// Restore the most recent snapshot. Returns false when there is nothing to undo.
    pub fn undo(&mut self, buffer: &mut Buffer) -> bool {
        self.end_insert_coalescing();
        match self.undo_stack.pop_back() {
            Some(last) => {
                trace!(target: "state.undo", undo_depth = self.undo_stack.len(), kind = ?last.kind, "undo_pop");
                *buffer = last.buffer;
                true
            }
            None => false,
        }
    }
}

fn buffer_hash(buf: &Buffer) -> u64 {
    let mut h = DefaultHasher::new();
    for row in buf.rows() {
        row.hash(&mut h);
    }
    buf.cursor().hash(&mut h);
    h.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::Position;

    #[test]
    fn undo_restores_buffer_and_cursor() {
        let mut u = UndoEngine::new();
        let mut b = Buffer::from_str("abc");
        u.push_discrete_edit_snapshot(SnapshotKind::Edit, &b);
        b.delete_range(Position::new(0, 0), Position::new(0, 2));
        assert_eq!(b.text(), "c");
        assert!(u.undo(&mut b));
        assert_eq!(b.text(), "abc");
        assert_eq!(b.cursor(), Position::new(0, 3));
        assert!(!u.undo(&mut b));
    }

    #[test]
    fn insert_run_coalesces() {
        let mut u = UndoEngine::new();
        let mut b = Buffer::new();
        for c in "hello".chars() {
            u.begin_insert_coalescing(&b);
            b.insert_char(c);
            u.note_insert_edit();
        }
        assert_eq!(u.undo_depth(), 1);
        assert_eq!(u.insert_run(), InsertRun::Active { edits: 5 });
        u.end_insert_coalescing();
        u.begin_insert_coalescing(&b);
        b.insert_char('!');
        assert_eq!(u.undo_depth(), 2);
        assert!(u.undo(&mut b));
        assert_eq!(b.text(), "hello");
        assert!(u.undo(&mut b));
        assert!(b.is_empty());
    }

    #[test]
    fn identical_snapshots_deduped() {
        let mut u = UndoEngine::new();
        let b = Buffer::from_str("x");
        u.push_snapshot(SnapshotKind::Edit, &b);
        u.push_snapshot(SnapshotKind::Edit, &b);
        assert_eq!(u.undo_depth(), 1);
        assert_eq!(u.snapshots_skipped(), 1);
    }

    #[test]
    fn history_is_bounded() {
        let mut u = UndoEngine::new();
        let mut b = Buffer::new();
        for i in 0..(UNDO_HISTORY_MAX + 10) {
            u.push_snapshot(SnapshotKind::Edit, &b);
            b.insert_str(&i.to_string());
        }
        assert_eq!(u.undo_depth(), UNDO_HISTORY_MAX);
        // the oldest snapshots went first; the newest is still on top
        let newest = b.clone();
        b.insert_str("tail");
        u.push_snapshot(SnapshotKind::Edit, &newest);
        assert!(u.undo(&mut b));
        assert_eq!(b, newest);
        let mut undone = 0;
        while u.undo(&mut b) {
            undone += 1;
        }
        assert_eq!(undone, UNDO_HISTORY_MAX - 1);
        // oldest survivor is the state after "0".."10" were typed
        assert_eq!(b.text(), "012345678910");
    }
}
