//! One `readline` call: the edit loop state machine.
//!
//! States:
//! * `Reading` - keys dispatch to buffer commands.
//! * `Completing` - a candidate overlay is open; selection keys move within
//!   it, Enter/Tab accept, Esc cancels.
//! * `Searching` - incremental history search; typed text edits the query.
//! * Done - `handle` returned a `Readline`.
//!
//! A key a sub-mode does not recognise commits that sub-mode (accepts the
//! selection or the match) and is then handled as in `Reading`.
//!
//! Every iteration is read -> handle -> redraw. The renderer diffs against the
//! previous frame, so an iteration that changes nothing writes nothing.

use std::io;

use core_actions::hygiene::sanitize;
use core_actions::{
    Action, Direction, EditKind, EditOptions, HistoryStep, MotionKind, dispatch, translate_input,
};
use core_completion::{Candidate, CompletionProvider, CompletionSet, apply};
use core_history::{History, HistoryNavigator};
use core_input::KeyReader;
use core_render::overlay::{completion_lines, page_size};
use core_render::{PromptSpec, RenderEngine, Style, Writer, layout};
use core_state::EditState;
use core_terminal::TerminalBackend;
use core_text::{Position, str_width};

use crate::Readline;
use crate::options::EditorOptions;
use crate::search::SearchState;

enum Mode {
    Reading,
    Completing(CompletionSet),
    Searching(SearchState),
}

pub(crate) struct Session<'a, B: TerminalBackend> {
    term: &'a mut B,
    reader: &'a mut KeyReader,
    history: &'a History,
    completer: &'a mut Option<Box<dyn CompletionProvider>>,
    options: &'a EditorOptions,
    state: EditState,
    nav: HistoryNavigator,
    renderer: RenderEngine,
    writer: Writer,
    mode: Mode,
    /// Screen rows of the edit area in the last frame, wraps included.
    edit_height: usize,
    prompt: String,
    continuation: String,
    color: bool,
}

impl<'a, B: TerminalBackend> Session<'a, B> {
    pub fn new(
        term: &'a mut B,
        reader: &'a mut KeyReader,
        history: &'a History,
        completer: &'a mut Option<Box<dyn CompletionProvider>>,
        options: &'a EditorOptions,
        prompt_text: &str,
    ) -> Self {
        let marker = options.prompt_marker.as_str();
        let continuation = options
            .continuation_marker
            .clone()
            .unwrap_or_else(|| " ".repeat(str_width(marker)));
        let color = options.color && term.capabilities().color;
        Self {
            term,
            reader,
            history,
            completer,
            options,
            state: EditState::new(),
            nav: HistoryNavigator::new(),
            renderer: RenderEngine::new(),
            writer: Writer::new(),
            mode: Mode::Reading,
            edit_height: 1,
            prompt: format!("{prompt_text}{marker}"),
            continuation,
            color,
        }
    }

    pub fn run(mut self) -> Readline {
        if let Err(e) = self.redraw() {
            tracing::warn!(target: "editor.loop", error = %e, "terminal_write_failed");
            return Readline::Eof;
        }
        loop {
            let event = match self.reader.read(&mut *self.term) {
                Ok(Some(event)) => event,
                Ok(None) => {
                    tracing::debug!(target: "editor.loop", "input_closed");
                    self.finish();
                    return Readline::Eof;
                }
                Err(e) => {
                    tracing::warn!(target: "editor.loop", error = %e, "terminal_read_failed");
                    self.finish();
                    return Readline::Eof;
                }
            };
            let Some(action) = translate_input(event) else {
                continue;
            };
            if let Some(outcome) = self.handle(action) {
                self.finish();
                tracing::debug!(target: "editor.loop", outcome = outcome_kind(&outcome), rows = self.state.buffer.row_count(), "done");
                return outcome;
            }
            if let Err(e) = self.redraw() {
                tracing::warn!(target: "editor.loop", error = %e, "terminal_write_failed");
                return Readline::Eof;
            }
        }
    }

    fn handle(&mut self, action: Action) -> Option<Readline> {
        match std::mem::replace(&mut self.mode, Mode::Reading) {
            Mode::Reading => self.handle_reading(action),
            Mode::Completing(set) => self.handle_completing(set, action),
            Mode::Searching(search) => self.handle_searching(search, action),
        }
    }

    fn handle_reading(&mut self, action: Action) -> Option<Readline> {
        let cursor = self.state.buffer.cursor();
        let last_row = self.state.buffer.row_count() - 1;
        match action {
            Action::Submit => return self.submit(),
            Action::Interrupt => return Some(Readline::Interrupted),
            Action::DeleteOrEof if self.state.buffer.is_empty() => return Some(Readline::Eof),
            Action::DeleteOrEof => self.apply(Action::Edit(EditKind::DeleteForward)),
            Action::ClearScreen => self.renderer.clear_screen(&mut self.writer),
            Action::Resize => self.renderer.invalidate(&mut self.writer),
            Action::History(step) => self.history_step(step),
            Action::Motion(MotionKind::Up) if cursor.row == 0 => {
                self.history_step(HistoryStep::Prev)
            }
            Action::Motion(MotionKind::Down) if cursor.row == last_row => {
                self.history_step(HistoryStep::Next)
            }
            Action::Search(dir) => self.start_search(dir),
            Action::Complete(_) => self.complete(),
            Action::Page(_) | Action::Cancel => {}
            other => self.apply(other),
        }
        None
    }

    fn handle_completing(&mut self, mut set: CompletionSet, action: Action) -> Option<Readline> {
        match action {
            Action::Complete(Direction::Forward)
            | Action::Motion(MotionKind::Down)
            | Action::History(HistoryStep::Next) => set.select_next(),
            Action::Complete(Direction::Backward)
            | Action::Motion(MotionKind::Up)
            | Action::History(HistoryStep::Prev) => set.select_prev(),
            Action::Page(dir) => {
                let page = page_size(set.len(), self.overlay_rows());
                set.select_page(page, dir == Direction::Forward);
            }
            Action::Resize => self.renderer.invalidate(&mut self.writer),
            Action::Submit => {
                self.accept(set);
                return None;
            }
            Action::Cancel => {
                tracing::trace!(target: "completion", "overlay_cancelled");
                return None;
            }
            Action::Interrupt => return Some(Readline::Interrupted),
            other => {
                self.accept(set);
                return self.handle_reading(other);
            }
        }
        self.mode = Mode::Completing(set);
        None
    }

    fn handle_searching(&mut self, mut search: SearchState, action: Action) -> Option<Readline> {
        match action {
            Action::Edit(EditKind::InsertText(text)) | Action::Paste(text) => {
                search.query.push_str(&sanitize(&text, false));
                search.refresh(self.history);
                if search.failing {
                    self.beep();
                }
            }
            Action::Edit(EditKind::Backspace) => {
                if search.query.pop().is_none() {
                    self.beep();
                }
                search.refresh(self.history);
            }
            Action::Search(dir) => {
                if !search.step(self.history, dir) {
                    self.beep();
                }
            }
            Action::Resize => self.renderer.invalidate(&mut self.writer),
            Action::Cancel => {
                tracing::trace!(target: "editor.search", "search_cancelled");
                return None;
            }
            other => {
                self.commit_search(&search);
                return self.handle_reading(other);
            }
        }
        self.mode = Mode::Searching(search);
        None
    }

    fn apply(&mut self, action: Action) {
        let opts = EditOptions {
            multiline: self.options.multiline,
        };
        if dispatch(action, &mut self.state, opts).failed {
            self.beep();
        }
    }

    /// Enter: continue on a new row after the continuation char, else submit.
    fn submit(&mut self) -> Option<Readline> {
        let cursor = self.state.buffer.cursor();
        if self.options.multiline
            && self.state.buffer.char_before_cursor() == Some(self.options.continuation_char)
        {
            self.state.end_sequences(false);
            let before = Position::new(cursor.row, cursor.col - 1);
            self.state.replace_span(before, cursor, "\n");
            tracing::trace!(target: "editor.loop", row = cursor.row, "continuation_row");
            return None;
        }
        Some(Readline::Line(self.state.buffer.text()))
    }

    fn history_step(&mut self, step: HistoryStep) {
        let current = self.state.buffer.text();
        let text = match step {
            HistoryStep::Prev => self.nav.previous(self.history, &current),
            HistoryStep::Next => self.nav.next(self.history),
            HistoryStep::First => self.nav.first(self.history, &current),
            HistoryStep::Last => self.nav.last(),
        };
        match text {
            Some(text) => {
                self.state.end_sequences(false);
                self.state.replace_all(&text);
                tracing::trace!(target: "history", offset = self.nav.offset(), ?step, "navigate");
            }
            None => self.beep(),
        }
    }

    fn start_search(&mut self, dir: Direction) {
        if self.history.is_empty() {
            self.beep();
            return;
        }
        self.state.end_sequences(false);
        self.mode = Mode::Searching(SearchState::new(dir));
    }

    fn commit_search(&mut self, search: &SearchState) {
        let Some(age) = search.found else {
            return;
        };
        let Some(entry) = self.history.get(age) else {
            return;
        };
        let current = self.state.buffer.text();
        self.nav.jump_to(self.history, age, &current);
        self.state.replace_all(entry);
        tracing::trace!(target: "editor.search", age, "search_committed");
    }

    fn complete(&mut self) {
        let Some(provider) = self.completer.as_deref_mut() else {
            self.beep();
            return;
        };
        let text = self.state.buffer.text();
        let cursor = self.state.buffer.byte_offset(self.state.buffer.cursor());
        let candidates = provider.complete(&text, cursor);
        let Some(set) = CompletionSet::new(&text, candidates) else {
            tracing::trace!(target: "completion", "no_candidates");
            self.beep();
            return;
        };
        tracing::trace!(target: "completion", count = set.len(), "candidates");
        if set.is_single() {
            self.accept(set);
            return;
        }
        self.mode = Mode::Completing(set);
    }

    fn accept(&mut self, set: CompletionSet) {
        let text = self.state.buffer.text();
        self.insert_candidate(&text, set.into_selected());
    }

    fn insert_candidate(&mut self, text: &str, candidate: Candidate) {
        let candidate = Candidate {
            replacement: sanitize(&candidate.replacement, self.options.multiline),
            ..candidate
        };
        let (new_text, cursor) = apply(text, &candidate);
        self.state.end_sequences(false);
        self.state.replace_all(&new_text);
        let pos = self.state.buffer.position_at_byte(cursor);
        self.state.buffer.set_cursor(pos);
        tracing::trace!(target: "completion", len = candidate.replacement.len(), "candidate_applied");
    }

    fn beep(&mut self) {
        if self.options.beep {
            self.writer.bell();
        }
    }

    fn overlay_rows(&self) -> usize {
        let (_, rows) = self.term.size();
        usize::from(rows).saturating_sub(self.edit_height)
    }

    fn prompt_style(&self) -> Style {
        match self.options.prompt_color {
            Some(c) => Style::fg(c).for_color(self.color),
            None => Style::PLAIN,
        }
    }

    fn redraw(&mut self) -> io::Result<()> {
        let (cols, _) = self.term.size();
        let style = self.prompt_style();
        let mut frame = match &self.mode {
            Mode::Searching(search) => {
                let prompt = search.prompt();
                let preview = search.preview(self.history, &self.state.buffer);
                let spec = PromptSpec {
                    prompt: &prompt,
                    continuation: &self.continuation,
                    style,
                };
                layout(&spec, &preview, cols)
            }
            _ => {
                let spec = PromptSpec {
                    prompt: &self.prompt,
                    continuation: &self.continuation,
                    style,
                };
                layout(&spec, &self.state.buffer, cols)
            }
        };
        self.edit_height = frame.height();
        if let Mode::Completing(set) = &self.mode {
            let max_rows = self.overlay_rows();
            frame.extend(completion_lines(set, max_rows, cols, self.color));
        }
        self.renderer.render(frame, &mut self.writer);
        self.writer.flush(&mut *self.term)
    }

    /// Final frame without overlays, then leave the cursor below the input.
    fn finish(&mut self) {
        self.mode = Mode::Reading;
        let mut result = self.redraw();
        if result.is_ok() {
            self.renderer.finish(&mut self.writer);
            result = self.writer.flush(&mut *self.term);
        }
        if let Err(e) = result {
            tracing::warn!(target: "editor.loop", error = %e, "terminal_write_failed");
        }
    }
}

fn outcome_kind(outcome: &Readline) -> &'static str {
    match outcome {
        Readline::Line(_) => "line",
        Readline::Interrupted => "interrupted",
        Readline::Eof => "eof",
    }
}
