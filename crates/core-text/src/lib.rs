//! Codepoint-row edit buffer.
//!
//! The buffer stores the text being edited as rows of Unicode scalar values.
//! Rows are separated by explicit row breaks (newline insertion), never by
//! wrapping; wrapping is a render concern.
//!
//! Invariants:
//! - There is always at least one row; an empty buffer is one empty row.
//! - No row contains `'\n'`.
//! - The cursor row is a valid row index and the cursor column is within
//!   `[0, row.len()]`.
//!
//! Combining marks are stored as separate codepoints; cursor motion and
//! width accounting treat a base codepoint and its attached zero width
//! codepoints as one step (see `motion`).

pub mod motion;
pub mod width;

pub use width::{char_width, run_width, str_width};

/// A cursor position expressed as (row index, codepoint offset within that row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
    pub fn origin() -> Self {
        Self { row: 0, col: 0 }
    }
}

/// Unit used by `Buffer::move_cursor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// One codepoint step (base plus attached zero width codepoints).
    Codepoint,
    /// Word (whitespace / word / punctuation classes).
    Word,
    /// Start or end of the current row.
    Line,
    /// Adjacent row, keeping the display column.
    Row,
    /// Start or end of the whole buffer.
    Buffer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

/// Multi-row text buffer with a cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    rows: Vec<Vec<char>>,
    cursor: Position,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    /// An empty buffer: one empty row, cursor at the origin.
    pub fn new() -> Self {
        Self {
            rows: vec![Vec::new()],
            cursor: Position::origin(),
        }
    }

    /// Build a buffer from text (`'\n'` separates rows). The cursor is placed at the end.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> Self {
        let rows: Vec<Vec<char>> = text.split('\n').map(|r| r.chars().collect()).collect();
        let mut buf = Self {
            rows,
            cursor: Position::origin(),
        };
        buf.cursor = buf.end_position();
        buf
    }

    /// Replace the whole content; the cursor moves to the end.
    pub fn set_text(&mut self, text: &str) {
        *self = Self::from_str(text);
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, idx: usize) -> Option<&[char]> {
        self.rows.get(idx).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// The row holding the cursor.
    pub fn current_row(&self) -> &[char] {
        &self.rows[self.cursor.row]
    }

    pub fn row_text(&self, idx: usize) -> String {
        self.row(idx).map(|r| r.iter().collect()).unwrap_or_default()
    }

    /// Full text with rows joined by `'\n'`.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.extend(row.iter());
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.rows.len() == 1 && self.rows[0].is_empty()
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Set the cursor, clamping to a valid position.
    pub fn set_cursor(&mut self, pos: Position) {
        self.cursor = self.clamp(pos);
    }

    pub fn clamp(&self, pos: Position) -> Position {
        let row = pos.row.min(self.rows.len() - 1);
        let col = pos.col.min(self.rows[row].len());
        Position::new(row, col)
    }

    pub fn end_position(&self) -> Position {
        let row = self.rows.len() - 1;
        Position::new(row, self.rows[row].len())
    }

    pub fn cursor_at_end(&self) -> bool {
        self.cursor == self.end_position()
    }

    /// Codepoint immediately before the cursor within the current row.
    pub fn char_before_cursor(&self) -> Option<char> {
        if self.cursor.col == 0 {
            return None;
        }
        self.current_row().get(self.cursor.col - 1).copied()
    }

    /// Insert a codepoint at the cursor; `'\n'` splits the row.
    pub fn insert_char(&mut self, c: char) {
        if c == '\n' {
            self.insert_newline();
            return;
        }
        let Position { row, col } = self.cursor;
        self.rows[row].insert(col, c);
        self.cursor.col += 1;
    }

    /// Split the current row at the cursor; the cursor moves to the start of the new row.
    pub fn insert_newline(&mut self) {
        let Position { row, col } = self.cursor;
        let tail = self.rows[row].split_off(col);
        self.rows.insert(row + 1, tail);
        self.cursor = Position::new(row + 1, 0);
    }

    /// Insert a string at the cursor; every `'\n'` starts a new row.
    pub fn insert_str(&mut self, text: &str) {
        for (i, part) in text.split('\n').enumerate() {
            if i > 0 {
                self.insert_newline();
            }
            let Position { row, col } = self.cursor;
            let before = self.rows[row].len();
            self.rows[row].splice(col..col, part.chars());
            self.cursor.col += self.rows[row].len() - before;
        }
    }

    /// Text between two positions (order-insensitive), rows joined by `'\n'`.
    pub fn slice(&self, a: Position, b: Position) -> String {
        let (start, end) = self.ordered(a, b);
        let mut out = String::new();
        for row in start.row..=end.row {
            let chars = &self.rows[row];
            let from = if row == start.row { start.col } else { 0 };
            let to = if row == end.row { end.col } else { chars.len() };
            if row > start.row {
                out.push('\n');
            }
            out.extend(chars[from..to].iter());
        }
        out
    }

    /// Delete the span between two positions (order-insensitive) and return the removed text.
    ///
    /// A span crossing rows merges the first and last row. The cursor is
    /// renumbered: inside the span it moves to the span start, after the
    /// span it shifts with the text.
    pub fn delete_range(&mut self, a: Position, b: Position) -> String {
        let (start, end) = self.ordered(a, b);
        if start == end {
            return String::new();
        }
        let removed = self.slice(start, end);
        if start.row == end.row {
            self.rows[start.row].drain(start.col..end.col);
        } else {
            let tail = self.rows[end.row].split_off(end.col);
            self.rows[start.row].truncate(start.col);
            self.rows[start.row].extend(tail);
            self.rows.drain(start.row + 1..=end.row);
        }
        let cur = self.cursor;
        self.cursor = if cur <= start {
            cur
        } else if cur <= end {
            start
        } else if cur.row == end.row {
            Position::new(start.row, start.col + (cur.col - end.col))
        } else {
            Position::new(cur.row - (end.row - start.row), cur.col)
        };
        removed
    }

    /// Position a motion would reach from the cursor, without moving.
    pub fn target(&self, unit: Unit, dir: Direction, count: usize) -> Position {
        let mut pos = self.cursor;
        for _ in 0..count {
            let next = match unit {
                Unit::Codepoint => motion::step(self, pos, dir),
                Unit::Word => motion::word(self, pos, dir),
                Unit::Row => motion::vertical(self, pos, dir),
                Unit::Line => match dir {
                    Direction::Backward => Position::new(pos.row, 0),
                    Direction::Forward => Position::new(pos.row, self.rows[pos.row].len()),
                },
                Unit::Buffer => match dir {
                    Direction::Backward => Position::origin(),
                    Direction::Forward => self.end_position(),
                },
            };
            if next == pos {
                break;
            }
            pos = next;
        }
        pos
    }

    /// Move the cursor `count` units; returns whether it moved.
    pub fn move_cursor(&mut self, unit: Unit, dir: Direction, count: usize) -> bool {
        let target = self.target(unit, dir, count);
        let moved = target != self.cursor;
        self.cursor = target;
        moved
    }

    /// Display columns of `row[..up_to]` (clamped).
    pub fn display_width(&self, row: usize, up_to: usize) -> usize {
        match self.rows.get(row) {
            Some(chars) => run_width(&chars[..up_to.min(chars.len())]),
            None => 0,
        }
    }

    /// Byte offset of a position within `text()`.
    pub fn byte_offset(&self, pos: Position) -> usize {
        let pos = self.clamp(pos);
        let mut offset = 0usize;
        for row in &self.rows[..pos.row] {
            offset += row.iter().map(|c| c.len_utf8()).sum::<usize>() + 1;
        }
        offset
            + self.rows[pos.row][..pos.col]
                .iter()
                .map(|c| c.len_utf8())
                .sum::<usize>()
    }

    /// Position of a byte offset within `text()`, clamped to the end and
    /// rounded down to a codepoint boundary.
    pub fn position_at_byte(&self, byte: usize) -> Position {
        let mut remaining = byte;
        for (row_idx, row) in self.rows.iter().enumerate() {
            let mut col = 0usize;
            for c in row {
                let len = c.len_utf8();
                if remaining < len {
                    return Position::new(row_idx, col);
                }
                remaining -= len;
                col += 1;
            }
            if remaining == 0 || row_idx + 1 == self.rows.len() {
                return Position::new(row_idx, col);
            }
            remaining -= 1; // row break
        }
        self.end_position()
    }

    fn ordered(&self, a: Position, b: Position) -> (Position, Position) {
        let a = self.clamp(a);
        let b = self.clamp(b);
        if a <= b { (a, b) } else { (b, a) }
    }
}
