use super::DispatchResult;
use core_state::EditState;

pub(crate) fn handle_undo(state: &mut EditState) -> DispatchResult {
    let before = state.buffer.row_count();
    if state.undo() {
        tracing::trace!(target: "actions.dispatch", op = "undo", rows_changed = (before != state.buffer.row_count()), "undo");
        DispatchResult::dirty()
    } else {
        DispatchResult::failed()
    }
}
