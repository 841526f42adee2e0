//! Terminal writer: an ordered list of primitive terminal operations,
//! flushed once per frame.
//!
//! Design invariants:
//! * Commands preserve ordering; nothing is written before `flush`.
//! * All vertical movement is relative to the current cursor row: the edit
//!   area lives wherever the prompt started, not at an absolute origin.
//! * Zero-length moves are never queued (`CSI 0 A` moves one row on most
//!   terminals).
//! * Styled text always ends with an attribute reset.

use std::io::{self, Write};

use crossterm::{
    cursor::{MoveDown, MoveTo, MoveToColumn, MoveUp},
    queue,
    style::{Attribute, Print, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use crate::style::Style;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveUp(u16),
    MoveDown(u16),
    Column(u16),
    /// `\r\n`: start of the next row, scrolling at the bottom of the screen.
    NewLine,
    ClearLine,
    ClearBelow,
    ClearScreen,
    Print(String),
    Styled(Style, String),
    Bell,
}

#[derive(Debug, Default)]
pub struct Writer {
    cmds: Vec<Command>,
}

fn clamp16(v: usize) -> u16 {
    u16::try_from(v).unwrap_or(u16::MAX)
}

impl Writer {
    pub fn new() -> Self {
        Self { cmds: Vec::new() }
    }

    pub fn commands(&self) -> &[Command] {
        &self.cmds
    }

    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Move from row `from` to row `to` of the edit area.
    pub fn move_rows(&mut self, from: usize, to: usize) {
        if to < from {
            self.cmds.push(Command::MoveUp(clamp16(from - to)));
        } else if to > from {
            self.cmds.push(Command::MoveDown(clamp16(to - from)));
        }
    }

    pub fn column(&mut self, col: usize) {
        self.cmds.push(Command::Column(clamp16(col)));
    }

    pub fn new_line(&mut self) {
        self.cmds.push(Command::NewLine);
    }

    pub fn clear_line(&mut self) {
        self.cmds.push(Command::ClearLine);
    }

    pub fn clear_below(&mut self) {
        self.cmds.push(Command::ClearBelow);
    }

    pub fn clear_screen(&mut self) {
        self.cmds.push(Command::ClearScreen);
    }

    pub fn bell(&mut self) {
        self.cmds.push(Command::Bell);
    }

    pub fn print<S: Into<String>>(&mut self, s: S) {
        let s: String = s.into();
        if !s.is_empty() {
            self.cmds.push(Command::Print(s));
        }
    }

    pub fn styled<S: Into<String>>(&mut self, style: Style, s: S) {
        let s: String = s.into();
        if s.is_empty() {
            return;
        }
        if style.is_plain() {
            self.cmds.push(Command::Print(s));
        } else {
            self.cmds.push(Command::Styled(style, s));
        }
    }

    /// Write every queued command to `out` and flush it. The queue is
    /// emptied even when writing fails.
    pub fn flush<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        for c in self.cmds.drain(..) {
            match c {
                Command::MoveUp(n) => queue!(out, MoveUp(n))?,
                Command::MoveDown(n) => queue!(out, MoveDown(n))?,
                Command::Column(x) => queue!(out, MoveToColumn(x))?,
                Command::NewLine => queue!(out, Print("\r\n"))?,
                Command::ClearLine => queue!(out, Clear(ClearType::CurrentLine))?,
                Command::ClearBelow => queue!(out, Clear(ClearType::FromCursorDown))?,
                Command::ClearScreen => queue!(out, Clear(ClearType::All), MoveTo(0, 0))?,
                Command::Print(s) => queue!(out, Print(s))?,
                Command::Styled(style, s) => {
                    if let Some(fg) = style.fg {
                        queue!(out, SetForegroundColor(fg))?;
                    }
                    if style.dim {
                        queue!(out, SetAttribute(Attribute::Dim))?;
                    }
                    if style.reverse {
                        queue!(out, SetAttribute(Attribute::Reverse))?;
                    }
                    queue!(out, Print(s), SetAttribute(Attribute::Reset))?;
                }
                Command::Bell => queue!(out, Print("\x07"))?,
            }
        }
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::style::Color;

    #[test]
    fn zero_moves_are_skipped() {
        let mut w = Writer::new();
        w.move_rows(3, 3);
        w.print("");
        assert!(w.is_empty());
        w.move_rows(3, 1);
        w.move_rows(1, 4);
        assert_eq!(w.commands(), &[Command::MoveUp(2), Command::MoveDown(3)]);
    }

    #[test]
    fn flush_encodes_ansi() {
        let mut w = Writer::new();
        w.column(0);
        w.clear_line();
        w.styled(Style::fg(Color::DarkGreen), "> ");
        w.print("hi");
        w.move_rows(2, 0);
        w.new_line();
        let mut out = Vec::new();
        w.flush(&mut out).unwrap();
        assert!(w.is_empty());
        let s = String::from_utf8(out).unwrap();
        assert!(s.starts_with("\x1b[1G\x1b[2K"), "{s:?}");
        assert!(s.contains("> \x1b[0m"));
        assert!(s.contains("hi\x1b[2A\r\n"), "{s:?}");
    }

    #[test]
    fn plain_style_prints_without_sgr() {
        let mut w = Writer::new();
        w.styled(Style::PLAIN, "x");
        assert_eq!(w.commands(), &[Command::Print("x".into())]);
    }
}
