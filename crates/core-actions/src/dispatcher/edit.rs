//! Text edit action handling: inserts, deletes, kills, yank and transpose.
//!
//! Kills go through `EditState::kill_to` so consecutive kills accumulate in
//! the kill ring; they end the insert run but keep the kill sequence alive.

use super::{DispatchResult, EditOptions};
use crate::EditKind;
use crate::hygiene::sanitize;
use core_state::{EditState, SnapshotKind};
use core_text::motion::{next_boundary, prev_boundary};
use core_text::{Direction, Position, Unit};

pub(crate) fn handle_edit(kind: EditKind, state: &mut EditState, opts: EditOptions) -> DispatchResult {
    let before = state.buffer.cursor();
    let result = match kind {
        EditKind::InsertText(text) => {
            state.kill_ring.break_sequence();
            let text = sanitize(&text, opts.multiline);
            if text.is_empty() {
                return DispatchResult::clean();
            }
            state.insert_typed(&text);
            DispatchResult::dirty()
        }
        EditKind::InsertNewline => {
            state.end_sequences(false);
            state.insert_discrete(SnapshotKind::Edit, "\n");
            DispatchResult::dirty()
        }
        EditKind::Backspace => delete_toward(state, Direction::Backward),
        EditKind::DeleteForward => delete_toward(state, Direction::Forward),
        EditKind::KillLineEnd => {
            let mut target = state.buffer.target(Unit::Line, Direction::Forward, 1);
            if target == before {
                // at row end: kill the row break
                target = state.buffer.target(Unit::Codepoint, Direction::Forward, 1);
            }
            kill(state, target)
        }
        EditKind::KillLineStart => {
            let target = state.buffer.target(Unit::Line, Direction::Backward, 1);
            kill(state, target)
        }
        EditKind::KillWordBackward => {
            let target = state.buffer.target(Unit::Word, Direction::Backward, 1);
            kill(state, target)
        }
        EditKind::KillWordForward => {
            let target = state.buffer.target(Unit::Word, Direction::Forward, 1);
            kill(state, target)
        }
        EditKind::Yank => {
            state.end_sequences(false);
            if state.yank() {
                DispatchResult::dirty()
            } else {
                DispatchResult::failed()
            }
        }
        EditKind::Transpose => {
            state.end_sequences(false);
            transpose(state)
        }
    };
    if result.dirty {
        let after = state.buffer.cursor();
        tracing::trace!(target: "actions.dispatch", row = before.row, col = before.col, to_row = after.row, to_col = after.col, "edit");
    }
    result
}

fn delete_toward(state: &mut EditState, dir: Direction) -> DispatchResult {
    state.end_sequences(false);
    let cursor = state.buffer.cursor();
    let target = state.buffer.target(Unit::Codepoint, dir, 1);
    if target == cursor {
        return DispatchResult::failed();
    }
    state.delete(cursor, target);
    DispatchResult::dirty()
}

fn kill(state: &mut EditState, target: Position) -> DispatchResult {
    state.end_sequences(true);
    if state.kill_to(target) {
        DispatchResult::dirty()
    } else {
        DispatchResult::failed()
    }
}

/// Swap the character runs around the cursor (the last two at row end) and
/// move past them. A run is a base codepoint plus its combining marks.
fn transpose(state: &mut EditState) -> DispatchResult {
    let Position { row, col } = state.buffer.cursor();
    let chars = state.buffer.current_row();
    let len = chars.len();
    let (mid, right) = if col >= len {
        (prev_boundary(chars, len), len)
    } else {
        (col, next_boundary(chars, col))
    };
    let left = prev_boundary(chars, mid);
    if mid == 0 || left == mid || mid == right {
        return DispatchResult::failed();
    }
    let swapped: String = chars[mid..right].iter().chain(&chars[left..mid]).collect();
    state.replace_span(Position::new(row, left), Position::new(row, right), &swapped);
    DispatchResult::dirty()
}
