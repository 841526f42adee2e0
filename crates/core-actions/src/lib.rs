//! Key bindings and buffer command dispatch.
//!
//! `translate_key` maps a decoded `KeyEvent` to an `Action` using
//! emacs/readline bindings. `dispatch` applies the buffer-level actions
//! (motions, edits, paste, undo) to an `EditState`. Actions that need the
//! edit loop (submit, history, search, completion, screen control) pass
//! through `dispatch` untouched; the loop handles them before dispatching.

pub mod dispatcher;
pub mod hygiene;
pub mod key_translator;

pub use core_text::Direction;
pub use dispatcher::{DispatchResult, EditOptions, dispatch};
pub use key_translator::{translate_input, translate_key};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    Left,
    Right,
    WordLeft,
    WordRight,
    LineStart,
    LineEnd,
    BufferStart,
    BufferEnd,
    /// Previous row; at the first row the loop falls back to history.
    Up,
    /// Next row; at the last row the loop falls back to history.
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditKind {
    /// Self-insert of typed text (coalesced into one undo step per run).
    InsertText(String),
    InsertNewline,
    Backspace,
    DeleteForward,
    KillLineEnd,
    KillLineStart,
    KillWordBackward,
    KillWordForward,
    Yank,
    Transpose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryStep {
    Prev,
    Next,
    First,
    Last,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Motion(MotionKind),
    Edit(EditKind),
    /// Bracketed paste; inserted as one undo step.
    Paste(String),
    Undo,
    Submit,
    /// Ctrl-D: delete forward, or end of input on an empty buffer.
    DeleteOrEof,
    Interrupt,
    ClearScreen,
    History(HistoryStep),
    /// Incremental history search (Backward = Ctrl-R).
    Search(Direction),
    /// Completion trigger / selection step (Forward = Tab).
    Complete(Direction),
    Page(Direction),
    Cancel,
    Resize,
}
