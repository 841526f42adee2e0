//! Motion sub-dispatch (cursor movement).
//!
//! Delegates to `core_text` targets; a motion that cannot move (start of
//! buffer, first row for `Up`) reports `failed` so the loop can beep or fall
//! back to history.

use super::DispatchResult;
use crate::MotionKind;
use core_state::EditState;
use core_text::{Direction, Unit};

pub(crate) fn handle_motion(kind: MotionKind, state: &mut EditState) -> DispatchResult {
    let (unit, dir) = match kind {
        MotionKind::Left => (Unit::Codepoint, Direction::Backward),
        MotionKind::Right => (Unit::Codepoint, Direction::Forward),
        MotionKind::WordLeft => (Unit::Word, Direction::Backward),
        MotionKind::WordRight => (Unit::Word, Direction::Forward),
        MotionKind::LineStart => (Unit::Line, Direction::Backward),
        MotionKind::LineEnd => (Unit::Line, Direction::Forward),
        MotionKind::BufferStart => (Unit::Buffer, Direction::Backward),
        MotionKind::BufferEnd => (Unit::Buffer, Direction::Forward),
        MotionKind::Up => (Unit::Row, Direction::Backward),
        MotionKind::Down => (Unit::Row, Direction::Forward),
    };
    let before = state.buffer.cursor();
    if state.buffer.move_cursor(unit, dir, 1) {
        let after = state.buffer.cursor();
        tracing::trace!(target: "actions.dispatch", ?kind, row = before.row, col = before.col, to_row = after.row, to_col = after.col, "motion");
        DispatchResult::dirty()
    } else {
        DispatchResult::failed()
    }
}
