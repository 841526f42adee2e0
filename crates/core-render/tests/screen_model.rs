//! Replays renderer output on a minimal screen model and checks that the
//! incremental path always leaves the same picture a full draw would.

use core_render::{Command, PromptSpec, RenderEngine, Style, Writer, layout};
use core_text::{Buffer, Direction, Position, Unit, str_width};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// Append-only line model: printing must start exactly at the end of the
/// row's current content, which the renderer guarantees by clearing first.
struct Screen {
    rows: Vec<String>,
    row: usize,
    col: usize,
}

impl Screen {
    fn new() -> Self {
        Self {
            rows: vec![String::new()],
            row: 0,
            col: 0,
        }
    }

    fn ensure_row(&mut self) {
        while self.rows.len() <= self.row {
            self.rows.push(String::new());
        }
    }

    fn apply(&mut self, cmds: &[Command]) {
        for cmd in cmds {
            match cmd {
                Command::MoveUp(n) => {
                    assert!(self.row >= *n as usize, "moved above the edit area");
                    self.row -= *n as usize;
                }
                Command::MoveDown(n) => {
                    self.row += *n as usize;
                    assert!(self.row < self.rows.len(), "moved below written rows");
                }
                Command::Column(c) => self.col = *c as usize,
                Command::NewLine => {
                    self.row += 1;
                    self.col = 0;
                    self.ensure_row();
                }
                Command::ClearLine => self.rows[self.row].clear(),
                Command::ClearBelow => {
                    assert_eq!(self.col, 0, "clear below only used at column 0");
                    self.rows.truncate(self.row + 1);
                    self.rows[self.row].clear();
                }
                Command::ClearScreen => {
                    self.rows = vec![String::new()];
                    self.row = 0;
                    self.col = 0;
                }
                Command::Print(s) | Command::Styled(_, s) => {
                    let line = &mut self.rows[self.row];
                    assert_eq!(str_width(line), self.col, "print would overwrite");
                    line.push_str(s);
                    self.col += str_width(s);
                }
                Command::Bell => {}
            }
        }
    }

    fn assert_shows(&self, texts: &[String], cursor: (usize, usize)) {
        assert_eq!(&self.rows[..texts.len()], texts);
        assert!(self.rows[texts.len()..].iter().all(String::is_empty));
        assert_eq!((self.row, self.col), cursor);
    }
}

fn spec() -> PromptSpec<'static> {
    PromptSpec {
        prompt: "> ",
        continuation: ". ",
        style: Style::PLAIN,
    }
}

fn step(engine: &mut RenderEngine, screen: &mut Screen, buf: &Buffer, width: u16) {
    let frame = layout(&spec(), buf, width);
    let texts = frame.texts();
    let cursor = (frame.cursor.row, frame.cursor.col);
    let mut w = Writer::new();
    engine.render(frame, &mut w);
    screen.apply(w.commands());
    screen.assert_shows(&texts, cursor);
}

#[test]
fn typing_then_deleting_across_a_wrap() {
    let mut engine = RenderEngine::new();
    let mut screen = Screen::new();
    let mut buf = Buffer::new();
    for c in "hello world".chars() {
        buf.insert_char(c);
        step(&mut engine, &mut screen, &buf, 8);
    }
    for _ in 0..6 {
        let end = buf.cursor();
        let start = buf.target(Unit::Codepoint, Direction::Backward, 1);
        buf.delete_range(start, end);
        step(&mut engine, &mut screen, &buf, 8);
    }
    assert_eq!(screen.rows[0], "> hello");
}

#[test]
fn inserting_a_row_in_the_middle() {
    let mut engine = RenderEngine::new();
    let mut screen = Screen::new();
    let mut buf = Buffer::from_str("one\nthree");
    step(&mut engine, &mut screen, &buf, 40);
    buf.set_cursor(Position::new(0, 3));
    buf.insert_newline();
    buf.insert_str("two");
    step(&mut engine, &mut screen, &buf, 40);
    assert_eq!(&screen.rows[..3], ["> one", ". two", ". three"]);
}

#[test]
fn wide_text_moves_as_a_unit_when_the_width_shrinks() {
    let mut engine = RenderEngine::new();
    let mut screen = Screen::new();
    let buf = Buffer::from_str("界界界");
    step(&mut engine, &mut screen, &buf, 20);
    let mut w = Writer::new();
    engine.invalidate(&mut w);
    screen.apply(w.commands());
    step(&mut engine, &mut screen, &buf, 5);
    assert_eq!(&screen.rows[..2], ["> 界", "界界"]);
    assert_eq!((screen.row, screen.col), (1, 4));
}

fn edit_strategy() -> impl Strategy<Value = Vec<(u8, char)>> {
    prop::collection::vec(
        (0u8..5, prop::sample::select(vec!['a', 'b', ' ', '界', '\u{0301}', 'z'])),
        1..40,
    )
}

proptest! {
    #[test]
    fn incremental_render_matches_frame(edits in edit_strategy(), width in 4u16..12) {
        let mut engine = RenderEngine::new();
        let mut screen = Screen::new();
        let mut buf = Buffer::new();
        for (op, c) in edits {
            match op {
                0 | 1 => buf.insert_char(c),
                2 => buf.insert_newline(),
                3 => {
                    buf.move_cursor(Unit::Codepoint, Direction::Backward, 1);
                }
                _ => {
                    let end = buf.cursor();
                    let start = buf.target(Unit::Codepoint, Direction::Backward, 1);
                    buf.delete_range(start, end);
                }
            }
            step(&mut engine, &mut screen, &buf, width);
        }
        // same state again is a no-op
        let mut w = Writer::new();
        engine.render(layout(&spec(), &buf, width), &mut w);
        prop_assert!(w.is_empty());
    }
}
