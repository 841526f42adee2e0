//! oxline: an embeddable readline-style line editor.
//!
//! ```no_run
//! # #[cfg(unix)] {
//! use oxline::{Editor, Readline, TtyBackend};
//!
//! let mut editor = Editor::new(TtyBackend::stdio());
//! editor.set_history(Some("history.txt".into()), 200);
//! while let Readline::Line(line) = editor.readline("demo") {
//!     println!("{line}");
//! }
//! # }
//! ```
//!
//! One `Editor` owns one terminal backend and one history. Each `readline`
//! call enters raw mode for its duration only; the prior mode is restored on
//! every exit path. When the input is not a terminal the call degrades to a
//! plain line read with no editing.

mod editor;
mod fallback;
mod options;
mod search;
mod session;

pub use editor::Editor;
pub use options::EditorOptions;

pub use core_completion::{Candidate, CompletionProvider, complete_words, word_before};
pub use core_config::Config;
pub use core_history::{DuplicatePolicy, History};
pub use core_terminal::{MemoryTerminal, TerminalBackend, TerminalCapabilities};
#[cfg(unix)]
pub use core_terminal::TtyBackend;
pub use crossterm::style::Color;

/// Outcome of one `readline` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readline {
    /// The submitted text; rows are joined with `'\n'`.
    Line(String),
    /// Ctrl-C.
    Interrupted,
    /// End of input: Ctrl-D on an empty buffer, a closed stream or an I/O failure.
    Eof,
}
