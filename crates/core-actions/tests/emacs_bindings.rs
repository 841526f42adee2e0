use core_actions::{Action, Direction, EditKind, HistoryStep, MotionKind, translate_key};
use core_events::{KeyEvent, ModMask, NamedKey};
use pretty_assertions::assert_eq;

fn named(k: NamedKey) -> KeyEvent {
    KeyEvent::named(k)
}

#[test]
fn motion_bindings() {
    let table = [
        (KeyEvent::ctrl('a'), MotionKind::LineStart),
        (KeyEvent::ctrl('e'), MotionKind::LineEnd),
        (KeyEvent::ctrl('b'), MotionKind::Left),
        (KeyEvent::ctrl('f'), MotionKind::Right),
        (KeyEvent::alt('b'), MotionKind::WordLeft),
        (KeyEvent::alt('f'), MotionKind::WordRight),
        (named(NamedKey::Left), MotionKind::Left),
        (named(NamedKey::Right), MotionKind::Right),
        (named(NamedKey::Left).with_mods(ModMask::CTRL), MotionKind::WordLeft),
        (named(NamedKey::Right).with_mods(ModMask::CTRL), MotionKind::WordRight),
        (named(NamedKey::Home), MotionKind::LineStart),
        (named(NamedKey::End), MotionKind::LineEnd),
        (named(NamedKey::Home).with_mods(ModMask::CTRL), MotionKind::BufferStart),
        (named(NamedKey::End).with_mods(ModMask::CTRL), MotionKind::BufferEnd),
        (named(NamedKey::Up), MotionKind::Up),
        (named(NamedKey::Down), MotionKind::Down),
    ];
    for (key, kind) in table {
        assert_eq!(translate_key(&key), Some(Action::Motion(kind)), "{key}");
    }
}

#[test]
fn edit_bindings() {
    let table = [
        (named(NamedKey::Backspace), EditKind::Backspace),
        (KeyEvent::ctrl('h'), EditKind::Backspace),
        (named(NamedKey::Delete), EditKind::DeleteForward),
        (KeyEvent::ctrl('k'), EditKind::KillLineEnd),
        (KeyEvent::ctrl('u'), EditKind::KillLineStart),
        (KeyEvent::ctrl('w'), EditKind::KillWordBackward),
        (named(NamedKey::Backspace).with_mods(ModMask::ALT), EditKind::KillWordBackward),
        (KeyEvent::alt('d'), EditKind::KillWordForward),
        (KeyEvent::ctrl('y'), EditKind::Yank),
        (KeyEvent::ctrl('t'), EditKind::Transpose),
        (KeyEvent::ctrl('j'), EditKind::InsertNewline),
        (named(NamedKey::Enter).with_mods(ModMask::SHIFT), EditKind::InsertNewline),
    ];
    for (key, kind) in table {
        assert_eq!(translate_key(&key), Some(Action::Edit(kind)), "{key}");
    }
}

#[test]
fn loop_bindings() {
    let table = [
        (named(NamedKey::Enter), Action::Submit),
        (KeyEvent::ctrl('d'), Action::DeleteOrEof),
        (KeyEvent::ctrl('c'), Action::Interrupt),
        (KeyEvent::ctrl('l'), Action::ClearScreen),
        (KeyEvent::ctrl('z'), Action::Undo),
        (KeyEvent::ctrl('_'), Action::Undo),
        (KeyEvent::ctrl('r'), Action::Search(Direction::Backward)),
        (KeyEvent::ctrl('s'), Action::Search(Direction::Forward)),
        (KeyEvent::ctrl('p'), Action::History(HistoryStep::Prev)),
        (KeyEvent::ctrl('n'), Action::History(HistoryStep::Next)),
        (KeyEvent::alt('<'), Action::History(HistoryStep::First)),
        (KeyEvent::alt('>'), Action::History(HistoryStep::Last)),
        (named(NamedKey::Tab), Action::Complete(Direction::Forward)),
        (named(NamedKey::BackTab), Action::Complete(Direction::Backward)),
        (named(NamedKey::Esc), Action::Cancel),
        (named(NamedKey::PageDown), Action::Page(Direction::Forward)),
    ];
    for (key, action) in table {
        assert_eq!(translate_key(&key), Some(action), "{key}");
    }
}
