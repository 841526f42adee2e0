//! Incremental renderer.
//!
//! Holds the previously emitted `Frame` and diffs each new frame against it.
//! The terminal cursor is assumed to be where the last render left it (at the
//! previous frame's cursor), so every move is relative.
//!
//! Diff steps:
//! 1. Find the first display line that differs. No difference and the same
//!    cursor means nothing is emitted at all.
//! 2. From there on, every line that differs is cleared and reprinted.
//!    Lines past the end of the old frame are reached with `\r\n`, which
//!    scrolls the screen when the edit area hits the bottom.
//! 3. If the frame shrank, clear everything below the last new line.
//! 4. Move to the new cursor position.
//!
//! A resize invalidates the previous frame: the old area is cleared from its
//! top row and the next render is a full draw.

use crate::frame::{DisplayLine, Frame, ScreenPos};
use crate::writer::Writer;

/// Counters for render path decisions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderMetrics {
    pub full_frames: u64,
    pub partial_frames: u64,
    pub cursor_only_frames: u64,
    pub noop_frames: u64,
    pub lines_repainted: u64,
}

#[derive(Debug, Default)]
pub struct RenderEngine {
    prev: Option<Frame>,
    metrics: RenderMetrics,
}

impl RenderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous(&self) -> Option<&Frame> {
        self.prev.as_ref()
    }

    pub fn metrics(&self) -> RenderMetrics {
        self.metrics
    }

    /// Queue the operations that bring the screen from the previous frame to `frame`.
    pub fn render(&mut self, frame: Frame, w: &mut Writer) {
        match self.prev.take() {
            None => self.full(&frame, w),
            Some(prev) => self.diff(&prev, &frame, w),
        }
        self.prev = Some(frame);
    }

    fn full(&mut self, frame: &Frame, w: &mut Writer) {
        w.column(0);
        w.clear_below();
        for (i, line) in frame.lines.iter().enumerate() {
            if i > 0 {
                w.new_line();
            }
            print_line(line, w);
        }
        let last = frame.lines.len().saturating_sub(1);
        w.move_rows(last, frame.cursor.row);
        w.column(frame.cursor.col);
        self.metrics.full_frames += 1;
        self.metrics.lines_repainted += frame.lines.len() as u64;
        tracing::trace!(target: "render.diff", lines = frame.lines.len(), "full_frame");
    }

    fn diff(&mut self, prev: &Frame, next: &Frame, w: &mut Writer) {
        let longest = prev.lines.len().max(next.lines.len());
        let first = (0..longest).find(|&i| prev.lines.get(i) != next.lines.get(i));
        let Some(first) = first else {
            if prev.cursor == next.cursor {
                self.metrics.noop_frames += 1;
                return;
            }
            move_cursor(prev.cursor, next.cursor, w);
            self.metrics.cursor_only_frames += 1;
            tracing::trace!(target: "render.diff", row = next.cursor.row, col = next.cursor.col, "cursor_only");
            return;
        };

        let mut row = prev.cursor.row;
        let mut repainted = 0usize;
        for i in first..next.lines.len() {
            if prev.lines.get(i) == Some(&next.lines[i]) {
                continue;
            }
            if i < prev.lines.len() {
                w.move_rows(row, i);
                w.column(0);
            } else {
                // line i-1 is on screen: either an old line or one appended just before
                w.move_rows(row, i - 1);
                w.new_line();
            }
            w.clear_line();
            print_line(&next.lines[i], w);
            row = i;
            repainted += 1;
        }
        if prev.lines.len() > next.lines.len() {
            let last = next.lines.len() - 1;
            w.move_rows(row, last + 1);
            w.column(0);
            w.clear_below();
            row = last + 1;
        }
        w.move_rows(row, next.cursor.row);
        w.column(next.cursor.col);

        self.metrics.partial_frames += 1;
        self.metrics.lines_repainted += repainted as u64;
        tracing::trace!(
            target: "render.diff",
            first_changed = first,
            repainted,
            old_lines = prev.lines.len(),
            new_lines = next.lines.len(),
            "partial_frame"
        );
    }

    /// Forget the previous frame after a resize, clearing the old area from
    /// its top row. The next `render` is a full draw.
    pub fn invalidate(&mut self, w: &mut Writer) {
        if let Some(prev) = self.prev.take() {
            w.move_rows(prev.cursor.row, 0);
            w.column(0);
            w.clear_below();
            tracing::debug!(target: "render.diff", old_lines = prev.lines.len(), "frame_invalidated");
        }
    }

    /// Clear the whole screen; the next render draws at the top.
    pub fn clear_screen(&mut self, w: &mut Writer) {
        self.prev = None;
        w.clear_screen();
    }

    /// Leave the cursor on a fresh line below the frame.
    pub fn finish(&mut self, w: &mut Writer) {
        if let Some(prev) = self.prev.take() {
            w.move_rows(prev.cursor.row, prev.lines.len().saturating_sub(1));
        }
        w.new_line();
    }
}

fn move_cursor(from: ScreenPos, to: ScreenPos, w: &mut Writer) {
    w.move_rows(from.row, to.row);
    w.column(to.col);
}

fn print_line(line: &DisplayLine, w: &mut Writer) {
    for span in &line.spans {
        w.styled(span.style, span.text.as_str());
    }
}
