//! Key -> Action translation (emacs/readline bindings).
//!
//! The table is stateless: every key maps to at most one `Action`
//! regardless of what came before. Sub-mode behaviour (completion overlay,
//! reverse search) is decided by the edit loop from the same actions, so a
//! key means the same thing everywhere it is bound.
//!
//! Unbound keys (function keys, Insert, stray Alt chords) translate to `None`
//! and are ignored by the loop.

use crate::{Action, Direction, EditKind, HistoryStep, MotionKind};
use core_events::{InputEvent, KeyEvent, KeyToken, ModMask, NamedKey};

/// Translate a decoded input event.
pub fn translate_input(event: InputEvent) -> Option<Action> {
    match event {
        InputEvent::Key(key) => translate_key(&key),
        InputEvent::Paste(text) => Some(Action::Paste(text)),
        InputEvent::Resize => Some(Action::Resize),
    }
}

pub fn translate_key(key: &KeyEvent) -> Option<Action> {
    let action = match key.token {
        KeyToken::Char(c) => map_char(c, key.mods),
        KeyToken::Named(named) => map_named(named, key.mods),
    };
    if key.is_text() {
        // typed content stays out of the log
        tracing::trace!(target: "actions.translate", "translate_text_key");
    } else {
        tracing::trace!(target: "actions.translate", key = %key, bound = action.is_some(), "translate_key");
    }
    action
}

fn motion(kind: MotionKind) -> Option<Action> {
    Some(Action::Motion(kind))
}

fn edit(kind: EditKind) -> Option<Action> {
    Some(Action::Edit(kind))
}

fn map_char(c: char, mods: ModMask) -> Option<Action> {
    let ctrl = mods.contains(ModMask::CTRL);
    let alt = mods.contains(ModMask::ALT);
    match (ctrl, alt) {
        (false, false) if !c.is_control() => edit(EditKind::InsertText(c.to_string())),
        (true, false) => match c.to_ascii_lowercase() {
            'a' => motion(MotionKind::LineStart),
            'e' => motion(MotionKind::LineEnd),
            'b' => motion(MotionKind::Left),
            'f' => motion(MotionKind::Right),
            'h' => edit(EditKind::Backspace),
            'd' => Some(Action::DeleteOrEof),
            'k' => edit(EditKind::KillLineEnd),
            'u' => edit(EditKind::KillLineStart),
            'w' => edit(EditKind::KillWordBackward),
            'y' => edit(EditKind::Yank),
            't' => edit(EditKind::Transpose),
            'z' | '_' => Some(Action::Undo),
            'l' => Some(Action::ClearScreen),
            'j' => edit(EditKind::InsertNewline),
            'r' => Some(Action::Search(Direction::Backward)),
            's' => Some(Action::Search(Direction::Forward)),
            'p' => Some(Action::History(HistoryStep::Prev)),
            'n' => Some(Action::History(HistoryStep::Next)),
            'c' => Some(Action::Interrupt),
            'g' => Some(Action::Cancel),
            _ => None,
        },
        (false, true) => match c {
            'b' | 'B' => motion(MotionKind::WordLeft),
            'f' | 'F' => motion(MotionKind::WordRight),
            'd' | 'D' => edit(EditKind::KillWordForward),
            '<' => Some(Action::History(HistoryStep::First)),
            '>' => Some(Action::History(HistoryStep::Last)),
            _ => None,
        },
        _ => None,
    }
}

fn map_named(key: NamedKey, mods: ModMask) -> Option<Action> {
    let ctrl = mods.contains(ModMask::CTRL);
    let alt = mods.contains(ModMask::ALT);
    match key {
        NamedKey::Enter if mods.contains(ModMask::SHIFT) || alt => {
            edit(EditKind::InsertNewline)
        }
        NamedKey::Enter => Some(Action::Submit),
        NamedKey::Tab => Some(Action::Complete(Direction::Forward)),
        NamedKey::BackTab => Some(Action::Complete(Direction::Backward)),
        NamedKey::Backspace if alt || ctrl => edit(EditKind::KillWordBackward),
        NamedKey::Backspace => edit(EditKind::Backspace),
        NamedKey::Delete => edit(EditKind::DeleteForward),
        NamedKey::Esc => Some(Action::Cancel),
        NamedKey::Left if ctrl || alt => motion(MotionKind::WordLeft),
        NamedKey::Right if ctrl || alt => motion(MotionKind::WordRight),
        NamedKey::Left => motion(MotionKind::Left),
        NamedKey::Right => motion(MotionKind::Right),
        NamedKey::Up => motion(MotionKind::Up),
        NamedKey::Down => motion(MotionKind::Down),
        NamedKey::Home if ctrl => motion(MotionKind::BufferStart),
        NamedKey::End if ctrl => motion(MotionKind::BufferEnd),
        NamedKey::Home => motion(MotionKind::LineStart),
        NamedKey::End => motion(MotionKind::LineEnd),
        NamedKey::PageUp => Some(Action::Page(Direction::Backward)),
        NamedKey::PageDown => Some(Action::Page(Direction::Forward)),
        NamedKey::Insert | NamedKey::F(_) => None,
    }
}
