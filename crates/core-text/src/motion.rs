//! Cursor motion helpers.
//!
//! These operate purely on a `Buffer` + `Position` pair and never mutate the
//! buffer. The edit buffer exposes them through `Buffer::target` /
//! `Buffer::move_cursor`; the dispatcher uses `target` directly when a kill
//! command needs the span a motion would cover.
//!
//! Step semantics:
//! * A *step* over codepoints treats a base codepoint plus every zero width
//!   codepoint following it (combining marks, ZWJ, variation selectors) as one
//!   unit. A wide codepoint is a single codepoint, so a step never lands inside
//!   it.
//! * Row breaks count as whitespace for word motion and as one step for
//!   codepoint motion.
//! * Word classification is deliberately naive: whitespace, word
//!   (alphanumeric or `_`) and punctuation. No Unicode word segmentation.

use crate::width::{char_width, is_zero_width};
use crate::{Buffer, Direction, Position};

/// Classification used by word motions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Space,
    Word,
    Punct,
}

/// Classify a codepoint. Row breaks are whitespace.
pub fn classify(c: char) -> CharClass {
    if c == '\n' || c.is_whitespace() {
        CharClass::Space
    } else if c == '_' || c.is_alphanumeric() {
        CharClass::Word
    } else {
        CharClass::Punct
    }
}

/// True for codepoints that attach to the preceding base codepoint.
#[inline]
fn attaches(c: char) -> bool {
    c != '\n' && is_zero_width(c)
}

/// Next step boundary within a row (returns `row.len()` at or past the end).
pub fn next_boundary(row: &[char], col: usize) -> usize {
    if col >= row.len() {
        return row.len();
    }
    let mut next = col + 1;
    while next < row.len() && attaches(row[next]) {
        next += 1;
    }
    next
}

/// Previous step boundary within a row (returns 0 at or before the start).
pub fn prev_boundary(row: &[char], col: usize) -> usize {
    if col == 0 {
        return 0;
    }
    let mut prev = col.min(row.len()) - 1;
    while prev > 0 && attaches(row[prev]) {
        prev -= 1;
    }
    prev
}

/// Codepoint after `pos` treating a row end as `'\n'`; `None` at buffer end.
pub fn char_after(buf: &Buffer, pos: Position) -> Option<char> {
    let row = buf.row(pos.row)?;
    if pos.col < row.len() {
        Some(row[pos.col])
    } else if pos.row + 1 < buf.row_count() {
        Some('\n')
    } else {
        None
    }
}

/// Codepoint before `pos` treating a row start as `'\n'`; `None` at buffer start.
pub fn char_before(buf: &Buffer, pos: Position) -> Option<char> {
    let row = buf.row(pos.row)?;
    if pos.col > 0 {
        row.get(pos.col - 1).copied()
    } else if pos.row > 0 {
        Some('\n')
    } else {
        None
    }
}

fn raw_forward(buf: &Buffer, pos: Position) -> Position {
    let len = buf.row(pos.row).map_or(0, <[char]>::len);
    if pos.col < len {
        Position::new(pos.row, pos.col + 1)
    } else if pos.row + 1 < buf.row_count() {
        Position::new(pos.row + 1, 0)
    } else {
        pos
    }
}

fn raw_backward(buf: &Buffer, pos: Position) -> Position {
    if pos.col > 0 {
        Position::new(pos.row, pos.col - 1)
    } else if pos.row > 0 {
        let len = buf.row(pos.row - 1).map_or(0, <[char]>::len);
        Position::new(pos.row - 1, len)
    } else {
        pos
    }
}

/// One codepoint step (base + attached marks), crossing row breaks.
pub fn step(buf: &Buffer, pos: Position, dir: Direction) -> Position {
    let Some(row) = buf.row(pos.row) else {
        return pos;
    };
    match dir {
        Direction::Forward => {
            if pos.col < row.len() {
                Position::new(pos.row, next_boundary(row, pos.col))
            } else {
                raw_forward(buf, pos)
            }
        }
        Direction::Backward => {
            if pos.col > 0 {
                Position::new(pos.row, prev_boundary(row, pos.col))
            } else {
                raw_backward(buf, pos)
            }
        }
    }
}

/// Word motion: skip whitespace, then the run of the same class.
pub fn word(buf: &Buffer, pos: Position, dir: Direction) -> Position {
    let mut p = pos;
    match dir {
        Direction::Forward => {
            while let Some(c) = char_after(buf, p) {
                if classify(c) != CharClass::Space {
                    break;
                }
                p = raw_forward(buf, p);
            }
            let Some(first) = char_after(buf, p) else {
                return p;
            };
            let class = classify(first);
            p = raw_forward(buf, p);
            while let Some(c) = char_after(buf, p) {
                if !(attaches(c) || classify(c) == class) {
                    break;
                }
                p = raw_forward(buf, p);
            }
            p
        }
        Direction::Backward => {
            while let Some(c) = char_before(buf, p) {
                if classify(c) != CharClass::Space {
                    break;
                }
                p = raw_backward(buf, p);
            }
            let mut base = p;
            let class = loop {
                match char_before(buf, base) {
                    Some(c) if attaches(c) => base = raw_backward(buf, base),
                    Some(c) => break Some(classify(c)),
                    None => break None,
                }
            };
            let Some(class) = class else {
                return p;
            };
            while let Some(c) = char_before(buf, p) {
                if !(attaches(c) || classify(c) == class) {
                    break;
                }
                p = raw_backward(buf, p);
            }
            p
        }
    }
}

/// Vertical motion to the adjacent row keeping the display column where possible.
pub fn vertical(buf: &Buffer, pos: Position, dir: Direction) -> Position {
    let target_row = match dir {
        Direction::Backward if pos.row > 0 => pos.row - 1,
        Direction::Forward if pos.row + 1 < buf.row_count() => pos.row + 1,
        _ => return pos,
    };
    let col = buf.display_width(pos.row, pos.col);
    Position::new(target_row, col_for_display(buf, target_row, col))
}

/// Codepoint offset of the last step boundary whose display column is `<= target`.
pub fn col_for_display(buf: &Buffer, row: usize, target: usize) -> usize {
    let Some(chars) = buf.row(row) else {
        return 0;
    };
    let mut col = 0usize;
    let mut width = 0usize;
    while col < chars.len() {
        let next = next_boundary(chars, col);
        let w: usize = chars[col..next].iter().map(|&c| char_width(c) as usize).sum();
        if width + w > target {
            break;
        }
        width += w;
        col = next;
    }
    col
}
