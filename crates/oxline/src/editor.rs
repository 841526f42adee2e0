//! The embedder-facing handle.

use std::path::PathBuf;
use std::time::Duration;

use core_completion::CompletionProvider;
use core_config::Config;
use core_history::{DuplicatePolicy, History};
use core_input::KeyReader;
use core_terminal::{ModeOptions, TerminalBackend, TerminalGuard};
use crossterm::style::Color;

use crate::Readline;
use crate::fallback::read_plain_line;
use crate::options::EditorOptions;
use crate::session::Session;

/// A line editor bound to one terminal backend.
///
/// Settings persist across `readline` calls. History is held in memory and
/// written to the configured file when the editor is dropped.
pub struct Editor<B: TerminalBackend> {
    backend: B,
    options: EditorOptions,
    history: History,
    completer: Option<Box<dyn CompletionProvider>>,
    reader: KeyReader,
}

impl<B: TerminalBackend> Editor<B> {
    pub fn new(backend: B) -> Self {
        Self::with_options(backend, EditorOptions::default())
    }

    pub fn with_options(backend: B, options: EditorOptions) -> Self {
        let reader = KeyReader::new(options.esc_timeout);
        Self {
            backend,
            options,
            history: History::default(),
            completer: None,
            reader,
        }
    }

    /// Build from a loaded configuration file, loading the configured history.
    pub fn from_config(backend: B, cfg: &Config) -> Self {
        let mut editor = Self::with_options(backend, EditorOptions::from_config(cfg));
        editor.history.set_policy(cfg.file.history.duplicates);
        editor.set_history(cfg.file.history.path.clone(), cfg.history_max_entries());
        editor
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    pub fn set_completer(&mut self, completer: impl CompletionProvider + 'static) {
        self.completer = Some(Box::new(completer));
    }

    pub fn clear_completer(&mut self) {
        self.completer = None;
    }

    /// An empty marker falls back to `"> "`.
    pub fn set_prompt_marker(&mut self, marker: impl Into<String>) {
        let marker = marker.into();
        self.options.prompt_marker = if marker.is_empty() {
            tracing::info!(target: "config", "empty_prompt_marker_defaulted");
            core_config::DEFAULT_MARKER.to_string()
        } else {
            marker
        };
    }

    pub fn set_continuation_marker(&mut self, marker: Option<String>) {
        self.options.continuation_marker = marker;
    }

    pub fn set_prompt_color(&mut self, color: Option<Color>) {
        self.options.prompt_color = color;
    }

    pub fn enable_multiline(&mut self, on: bool) {
        self.options.multiline = on;
    }

    pub fn enable_color(&mut self, on: bool) {
        self.options.color = on;
    }

    pub fn enable_beep(&mut self, on: bool) {
        self.options.beep = on;
    }

    pub fn enable_bracketed_paste(&mut self, on: bool) {
        self.options.bracketed_paste = on;
    }

    pub fn set_continuation_char(&mut self, c: char) {
        self.options.continuation_char = c;
    }

    pub fn set_esc_timeout(&mut self, timeout: Duration) {
        self.options.esc_timeout = timeout;
        self.reader = KeyReader::new(timeout);
    }

    pub fn set_history_duplicates(&mut self, policy: DuplicatePolicy) {
        self.history.set_policy(policy);
    }

    /// Set the history file and capacity, then load existing entries in
    /// place of the current ones.
    ///
    /// A missing or unreadable file leaves history empty; it is created on
    /// the first save.
    pub fn set_history(&mut self, path: Option<PathBuf>, max_entries: usize) {
        self.history.set_max_entries(max_entries);
        self.history.set_path(path.clone());
        let Some(path) = path else {
            return;
        };
        self.history.clear();
        if let Err(e) = self.history.load(&path) {
            tracing::warn!(target: "history.io", error = %e, "history_load_failed");
        }
    }

    pub fn history_remove_last(&mut self) -> Option<String> {
        self.history.remove_last()
    }

    pub fn history_clear(&mut self) {
        self.history.clear();
    }

    /// Read one line.
    ///
    /// Raw mode is held for the duration of the call only. A non-empty
    /// submitted line is added to history.
    pub fn readline(&mut self, prompt: &str) -> Readline {
        if !self.backend.capabilities().interactive {
            tracing::debug!(target: "editor.loop", "non_interactive_fallback");
            return read_plain_line(&mut self.backend, prompt, &self.options.prompt_marker);
        }
        let opts = ModeOptions {
            bracketed_paste: self.options.bracketed_paste,
        };
        let outcome = {
            let mut guard = match TerminalGuard::enter(&mut self.backend, opts) {
                Ok(guard) => guard,
                Err(e) => {
                    tracing::warn!(target: "terminal.mode", error = %e, "raw_mode_enter_failed");
                    return Readline::Eof;
                }
            };
            let outcome = Session::new(
                &mut *guard,
                &mut self.reader,
                &self.history,
                &mut self.completer,
                &self.options,
                prompt,
            )
            .run();
            if let Err(e) = guard.release() {
                tracing::warn!(target: "terminal.mode", error = %e, "raw_mode_restore_failed");
            }
            outcome
        };
        if let Readline::Line(line) = &outcome
            && self.history.add(line)
        {
            tracing::trace!(target: "history", len = self.history.len(), "entry_added");
        }
        outcome
    }
}

impl<B: TerminalBackend> Drop for Editor<B> {
    fn drop(&mut self) {
        if self.history.path().is_none() {
            return;
        }
        if let Err(e) = self.history.persist() {
            tracing::warn!(target: "history.io", error = %e, "history_save_failed");
        }
    }
}
