//! Key and input event types shared by the decoder, the dispatcher and the
//! edit loop.
//!
//! Invariants:
//! * A `KeyEvent` is produced once by the decoder and consumed exactly once by
//!   the edit loop.
//! * Control bytes are surfaced as `Char` + `ModMask::CTRL` (e.g. 0x01 becomes
//!   `Ctrl-a`); Tab, Enter, Backspace and Escape are surfaced as named keys.
//! * `InputEvent::Paste` carries the full bracketed paste span. Consumers must
//!   log only its length, never the content.

use std::fmt;

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ModMask: u8 {
        const CTRL  = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const SHIFT = 0b0000_0100;
    }
}

impl ModMask {
    /// Decode the xterm modifier parameter (`1 + bitmask`, shift=1 alt=2 ctrl=4).
    pub fn from_xterm_param(param: u16) -> Self {
        let bits = param.saturating_sub(1);
        let mut mods = ModMask::empty();
        if bits & 1 != 0 {
            mods |= ModMask::SHIFT;
        }
        if bits & 2 != 0 {
            mods |= ModMask::ALT;
        }
        if bits & 4 != 0 {
            mods |= ModMask::CTRL;
        }
        mods
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Enter,
    Tab,
    /// Shift-Tab (`CSI Z`).
    BackTab,
    Backspace,
    Esc,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
    F(u8),
}

/// Logical key identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyToken {
    Char(char),
    Named(NamedKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub token: KeyToken,
    pub mods: ModMask,
}

impl KeyEvent {
    pub fn new(token: KeyToken, mods: ModMask) -> Self {
        Self { token, mods }
    }
    pub fn char(c: char) -> Self {
        Self::new(KeyToken::Char(c), ModMask::empty())
    }
    pub fn ctrl(c: char) -> Self {
        Self::new(KeyToken::Char(c), ModMask::CTRL)
    }
    pub fn alt(c: char) -> Self {
        Self::new(KeyToken::Char(c), ModMask::ALT)
    }
    pub fn named(key: NamedKey) -> Self {
        Self::new(KeyToken::Named(key), ModMask::empty())
    }
    pub fn with_mods(mut self, mods: ModMask) -> Self {
        self.mods |= mods;
        self
    }
    /// True for a plain (or shifted) printable character.
    pub fn is_text(&self) -> bool {
        matches!(self.token, KeyToken::Char(c) if !c.is_control())
            && (self.mods - ModMask::SHIFT).is_empty()
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mods.contains(ModMask::CTRL) {
            f.write_str("C-")?;
        }
        if self.mods.contains(ModMask::ALT) {
            f.write_str("M-")?;
        }
        if self.mods.contains(ModMask::SHIFT) {
            f.write_str("S-")?;
        }
        match self.token {
            KeyToken::Char(c) => write!(f, "{c}"),
            KeyToken::Named(NamedKey::F(n)) => write!(f, "<F{n}>"),
            KeyToken::Named(k) => write!(f, "<{k:?}>"),
        }
    }
}

/// Events surfaced by the input decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    /// Complete bracketed paste span.
    Paste(String),
    /// Terminal size changed; the previous frame is invalid.
    Resize,
}

impl From<KeyEvent> for InputEvent {
    fn from(k: KeyEvent) -> Self {
        InputEvent::Key(k)
    }
}
