//! Frame model and buffer layout.
//!
//! A `Frame` is the engine's record of what is on screen: display lines of
//! styled text plus the cursor's screen coordinates, both relative to the top
//! left of the edit area.
//!
//! Wrapping rules:
//! * Each buffer row starts a new display line. The first row is prefixed
//!   by the prompt, later rows by the continuation marker.
//! * A codepoint that would cross the terminal width moves to the next
//!   display line. Zero width codepoints stay on the line of their base, so a
//!   wide codepoint or a base+combining run is never split.
//! * When the cursor would sit exactly at the terminal width it is placed at
//!   column 0 of an extra display line, avoiding the terminal's deferred wrap.
//! * Control characters occupy no columns and are not printed.

use core_text::{Buffer, char_width};
use smallvec::SmallVec;

use crate::style::Style;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub style: Style,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayLine {
    pub spans: SmallVec<[Span; 2]>,
    width: usize,
}

impl DisplayLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Columns occupied.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Plain text of the line (no styling).
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn push_char(&mut self, c: char, style: Style) {
        if c.is_control() {
            return;
        }
        match self.spans.last_mut() {
            Some(last) if last.style == style => last.text.push(c),
            _ => self.spans.push(Span {
                style,
                text: c.to_string(),
            }),
        }
        self.width += char_width(c) as usize;
    }

    /// Append text, stopping before the first codepoint that would exceed
    /// `max_width` columns. Returns whether everything fit.
    pub fn push_str_clipped(&mut self, text: &str, style: Style, max_width: usize) -> bool {
        for c in text.chars() {
            let w = char_width(c) as usize;
            if self.width + w > max_width {
                return false;
            }
            self.push_char(c, style);
        }
        true
    }

    pub fn push_str(&mut self, text: &str, style: Style) {
        for c in text.chars() {
            self.push_char(c, style);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, PartialOrd, Ord)]
pub struct ScreenPos {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub lines: Vec<DisplayLine>,
    pub cursor: ScreenPos,
}

impl Frame {
    pub fn height(&self) -> usize {
        self.lines.len()
    }

    /// Append lines below the edit area (completion overlay).
    pub fn extend(&mut self, lines: impl IntoIterator<Item = DisplayLine>) {
        self.lines.extend(lines);
    }

    /// Plain text per line, for tests and debugging.
    pub fn texts(&self) -> Vec<String> {
        self.lines.iter().map(DisplayLine::text).collect()
    }
}

/// Prompt decoration for `layout`.
#[derive(Debug, Clone, Copy)]
pub struct PromptSpec<'a> {
    /// Prompt text plus marker, shown before the first row.
    pub prompt: &'a str,
    /// Shown before every following row.
    pub continuation: &'a str,
    pub style: Style,
}

struct LineBuilder {
    width: usize,
    lines: Vec<DisplayLine>,
    x: usize,
}

impl LineBuilder {
    fn new(width: usize) -> Self {
        Self {
            width,
            lines: vec![DisplayLine::new()],
            x: 0,
        }
    }

    fn wraps(&self, w: usize) -> bool {
        w > 0 && self.x > 0 && self.x + w > self.width
    }

    fn push(&mut self, c: char, style: Style) {
        if c.is_control() {
            return;
        }
        let w = char_width(c) as usize;
        if self.wraps(w) {
            self.break_line();
        }
        if let Some(line) = self.lines.last_mut() {
            line.push_char(c, style);
        }
        self.x += w;
    }

    fn break_line(&mut self) {
        self.lines.push(DisplayLine::new());
        self.x = 0;
    }

    fn row(&self) -> usize {
        self.lines.len() - 1
    }

    /// Where a cursor placed before `c` appears.
    fn pos_before(&self, c: char) -> ScreenPos {
        let w = if c.is_control() { 0 } else { char_width(c) as usize };
        if self.wraps(w) {
            ScreenPos {
                row: self.row() + 1,
                col: 0,
            }
        } else {
            ScreenPos {
                row: self.row(),
                col: self.x,
            }
        }
    }
}

/// Lay out the buffer with its prompt at `width` columns.
pub fn layout(prompt: &PromptSpec<'_>, buf: &Buffer, width: u16) -> Frame {
    let mut b = LineBuilder::new(usize::from(width.max(1)));
    let cur = buf.cursor();
    let mut cursor = ScreenPos::default();
    let mut wrap_cursor = false;
    for (row_idx, row) in buf.rows().enumerate() {
        if row_idx > 0 {
            b.break_line();
        }
        let prefix = if row_idx == 0 {
            prompt.prompt
        } else {
            prompt.continuation
        };
        for c in prefix.chars() {
            b.push(c, prompt.style);
        }
        for (col, &c) in row.iter().enumerate() {
            if row_idx == cur.row && col == cur.col {
                cursor = b.pos_before(c);
            }
            b.push(c, Style::PLAIN);
        }
        if row_idx == cur.row && cur.col >= row.len() {
            if b.x >= b.width {
                wrap_cursor = true;
                b.break_line();
            }
            cursor = ScreenPos {
                row: b.row(),
                col: b.x,
            };
        }
    }
    if wrap_cursor {
        tracing::trace!(target: "render.layout", row = cursor.row, "cursor_wrapped_to_next_line");
    }
    Frame {
        lines: b.lines,
        cursor,
    }
}
