//! Dispatcher applying buffer-level `Action`s to an `EditState`.
//!
//! Sub-modules:
//! * `motion` - cursor movement
//! * `edit`   - text mutation, kills and yank
//! * `undo`   - undo dispatch
//!
//! Every command other than a self-insert ends the current insert run; every
//! command other than a kill ends the kill sequence.

use crate::Action;
use core_state::{EditState, SnapshotKind};

mod edit;
mod motion;
mod undo;

/// Result of dispatching a single `Action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    /// Buffer or cursor changed; a render is needed.
    pub dirty: bool,
    /// The command had nothing to act on (beep candidate).
    pub failed: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            failed: false,
        }
    }
    pub fn clean() -> Self {
        Self {
            dirty: false,
            failed: false,
        }
    }
    pub fn failed() -> Self {
        Self {
            dirty: false,
            failed: true,
        }
    }
}

/// Options that change how edits are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOptions {
    /// Row breaks in inserted text are kept (otherwise they become spaces).
    pub multiline: bool,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self { multiline: true }
    }
}

/// Apply an action to the edit state. Loop-level actions are a clean no-op.
pub fn dispatch(action: Action, state: &mut EditState, opts: EditOptions) -> DispatchResult {
    match action {
        Action::Motion(kind) => {
            state.end_sequences(false);
            motion::handle_motion(kind, state)
        }
        Action::Edit(kind) => edit::handle_edit(kind, state, opts),
        Action::Paste(text) => {
            state.end_sequences(false);
            let text = crate::hygiene::sanitize(&text, opts.multiline);
            if text.is_empty() {
                return DispatchResult::clean();
            }
            state.insert_discrete(SnapshotKind::Paste, &text);
            tracing::trace!(target: "actions.dispatch", op = "paste", len = text.len(), "edit");
            DispatchResult::dirty()
        }
        Action::Undo => {
            state.end_sequences(false);
            undo::handle_undo(state)
        }
        other => {
            tracing::trace!(target: "actions.dispatch", action = ?std::mem::discriminant(&other), "loop_level_action_ignored");
            DispatchResult::clean()
        }
    }
}
