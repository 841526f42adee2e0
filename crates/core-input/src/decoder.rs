//! Byte level escape sequence decoder.
//!
//! The decoder is a tagged state enum with a total transition function:
//! every byte in every state has a defined next state, so garbage input can
//! only ever be discarded, never crash or wedge the decoder.
//!
//! ```text
//! Ground --ESC--> Escape --'['--> Csi --final--> Ground
//!    |               |            |--'['--> ConsoleFn --'A'..'E'--> Ground
//!    |               |            `--overflow--> CsiDiscard --final--> Ground
//!    |               |---'O'--> Ss3 --final--> Ground
//!    |               |---ESC--> Escape (emits Esc)
//!    |               `--other-> Ground (emits Alt+key)
//!    `--lead byte--> Utf8 --last continuation--> Ground
//! Csi "200~" --> Paste --"ESC[201~"--> Ground (emits Paste)
//! ```
//!
//! Timeouts are not measured here. The driver calls `timeout()` when no
//! byte arrives within the escape timeout while `needs_timeout()` is true.

use core_events::{InputEvent, KeyEvent, KeyToken, ModMask, NamedKey};
use smallvec::SmallVec;

/// Longest CSI parameter/intermediate run accepted before the sequence is dropped.
pub const MAX_CSI_LEN: usize = 32;
/// Bracketed paste bytes kept; the rest of an oversized paste is dropped.
pub const MAX_PASTE_BYTES: usize = 4 << 20;
const PASTE_END: &[u8] = b"\x1b[201~";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum State {
    #[default]
    Ground,
    Escape,
    Csi(SmallVec<[u8; 16]>),
    /// Overlong CSI; swallowed up to its final byte.
    CsiDiscard,
    /// Linux console `ESC [ [` function key prefix.
    ConsoleFn,
    Ss3,
    Utf8 {
        buf: [u8; 4],
        have: u8,
        need: u8,
        alt: bool,
    },
    Paste {
        buf: Vec<u8>,
        dropped: usize,
    },
}

/// Coarse state label, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Ground,
    Escape,
    Csi,
    Ss3,
    Utf8,
    Paste,
}

#[derive(Debug)]
pub struct Decoder {
    state: State,
    paste_limit: usize,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::with_paste_limit(MAX_PASTE_BYTES)
    }
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoder keeping at most `limit` bytes of one bracketed paste.
    pub fn with_paste_limit(limit: usize) -> Self {
        Self {
            state: State::Ground,
            paste_limit: limit,
        }
    }

    pub fn phase(&self) -> Phase {
        phase_of(&self.state)
    }

    /// True when a partial sequence is buffered and the escape timeout applies.
    /// A bracketed paste waits for its end marker without a timeout.
    pub fn needs_timeout(&self) -> bool {
        !matches!(self.state, State::Ground | State::Paste { .. })
    }

    /// Feed one byte; returns the event it completes, if any.
    pub fn feed(&mut self, byte: u8) -> Option<InputEvent> {
        match std::mem::take(&mut self.state) {
            State::Ground => self.ground(byte, false),
            State::Escape => self.escape(byte),
            State::Csi(params) => self.csi(params, byte),
            State::CsiDiscard => self.csi_discard(byte),
            State::ConsoleFn => {
                let ev = match byte {
                    b'A'..=b'E' => Some(KeyEvent::named(NamedKey::F(byte - b'A' + 1))),
                    0x1b => {
                        self.state = State::Escape;
                        None
                    }
                    _ => {
                        tracing::trace!(target: "input.decode", byte, "console_fn_unknown_discarded");
                        None
                    }
                };
                ev.map(InputEvent::Key)
            }
            State::Ss3 => {
                let ev = ss3_key(byte);
                if ev.is_none() {
                    tracing::trace!(target: "input.decode", byte, "ss3_unknown_discarded");
                }
                ev.map(InputEvent::Key)
            }
            State::Utf8 {
                buf,
                have,
                need,
                alt,
            } => self.utf8(buf, have, need, alt, byte),
            State::Paste { buf, dropped } => self.paste(buf, dropped, byte),
        }
    }

    /// The escape timeout fired. A bare ESC becomes an Escape key; other
    /// partial sequences are resolved or dropped. The decoder is back in
    /// `Ground` afterwards unless it was collecting a paste.
    pub fn timeout(&mut self) -> Option<InputEvent> {
        match std::mem::take(&mut self.state) {
            State::Escape => Some(InputEvent::Key(KeyEvent::named(NamedKey::Esc))),
            State::Csi(params) if params.is_empty() => Some(InputEvent::Key(KeyEvent::alt('['))),
            State::Ss3 => Some(InputEvent::Key(KeyEvent::alt('O'))),
            paste @ State::Paste { .. } => {
                self.state = paste;
                None
            }
            State::Ground => None,
            other => {
                tracing::trace!(target: "input.decode", phase = ?phase_of(&other), "partial_sequence_dropped");
                None
            }
        }
    }

    fn ground(&mut self, byte: u8, alt: bool) -> Option<InputEvent> {
        let mods = if alt { ModMask::ALT } else { ModMask::empty() };
        let key = match byte {
            0x1b => {
                self.state = State::Escape;
                return None;
            }
            b'\r' => KeyEvent::named(NamedKey::Enter),
            b'\t' => KeyEvent::named(NamedKey::Tab),
            0x08 | 0x7f => KeyEvent::named(NamedKey::Backspace),
            0x00 => KeyEvent::ctrl(' '),
            0x01..=0x1a => KeyEvent::ctrl((b'a' + byte - 1) as char),
            0x1c => KeyEvent::ctrl('\\'),
            0x1d => KeyEvent::ctrl(']'),
            0x1e => KeyEvent::ctrl('^'),
            0x1f => KeyEvent::ctrl('_'),
            0x20..=0x7e => KeyEvent::char(byte as char),
            0xc2..=0xf4 => {
                let need = match byte {
                    0xc2..=0xdf => 1,
                    0xe0..=0xef => 2,
                    _ => 3,
                };
                self.state = State::Utf8 {
                    buf: [byte, 0, 0, 0],
                    have: 1,
                    need,
                    alt,
                };
                return None;
            }
            _ => {
                tracing::trace!(target: "input.decode", byte, "invalid_lead_byte_discarded");
                return None;
            }
        };
        Some(InputEvent::Key(key.with_mods(mods)))
    }

    fn escape(&mut self, byte: u8) -> Option<InputEvent> {
        match byte {
            b'[' => {
                self.state = State::Csi(SmallVec::new());
                None
            }
            b'O' => {
                self.state = State::Ss3;
                None
            }
            0x1b => {
                self.state = State::Escape;
                Some(InputEvent::Key(KeyEvent::named(NamedKey::Esc)))
            }
            _ => self.ground(byte, true),
        }
    }

    fn csi(&mut self, mut params: SmallVec<[u8; 16]>, byte: u8) -> Option<InputEvent> {
        match byte {
            0x20..=0x3f => {
                if params.len() >= MAX_CSI_LEN {
                    tracing::trace!(target: "input.decode", len = params.len(), "csi_overflow_discarded");
                    self.state = State::CsiDiscard;
                    return None;
                }
                params.push(byte);
                self.state = State::Csi(params);
                None
            }
            b'[' if params.is_empty() => {
                self.state = State::ConsoleFn;
                None
            }
            0x40..=0x7e => self.csi_final(&params, byte),
            0x1b => {
                tracing::trace!(target: "input.decode", "csi_interrupted_by_escape");
                self.state = State::Escape;
                None
            }
            _ => {
                tracing::trace!(target: "input.decode", byte, "csi_malformed_discarded");
                None
            }
        }
    }

    fn csi_discard(&mut self, byte: u8) -> Option<InputEvent> {
        match byte {
            0x20..=0x3f => self.state = State::CsiDiscard,
            0x1b => self.state = State::Escape,
            _ => {}
        }
        None
    }

    fn csi_final(&mut self, raw: &[u8], fin: u8) -> Option<InputEvent> {
        if raw.first().is_some_and(|b| matches!(b, b'<' | b'=' | b'>' | b'?')) {
            tracing::trace!(target: "input.decode", fin, "csi_private_discarded");
            return None;
        }
        let params = parse_params(raw);
        let mods = params
            .get(1)
            .copied()
            .map(ModMask::from_xterm_param)
            .unwrap_or_default();
        let named = match fin {
            b'A' => NamedKey::Up,
            b'B' => NamedKey::Down,
            b'C' => NamedKey::Right,
            b'D' => NamedKey::Left,
            b'H' => NamedKey::Home,
            b'F' => NamedKey::End,
            b'P' => NamedKey::F(1),
            b'Q' => NamedKey::F(2),
            b'R' => NamedKey::F(3),
            b'S' => NamedKey::F(4),
            b'Z' => NamedKey::BackTab,
            b'~' => match params.first().copied().unwrap_or(0) {
                200 => {
                    tracing::trace!(target: "input.paste", "start");
                    self.state = State::Paste {
                        buf: Vec::new(),
                        dropped: 0,
                    };
                    return None;
                }
                n => match tilde_key(n) {
                    Some(k) => k,
                    None => {
                        tracing::trace!(target: "input.decode", code = n, "csi_tilde_unknown");
                        return None;
                    }
                },
            },
            _ => {
                tracing::trace!(target: "input.decode", fin, "csi_unknown_final");
                return None;
            }
        };
        Some(InputEvent::Key(KeyEvent::named(named).with_mods(mods)))
    }

    fn utf8(&mut self, mut buf: [u8; 4], have: u8, need: u8, alt: bool, byte: u8) -> Option<InputEvent> {
        if !(0x80..=0xbf).contains(&byte) {
            tracing::trace!(target: "input.decode", have, "utf8_truncated_discarded");
            return self.ground(byte, false);
        }
        buf[have as usize] = byte;
        let have = have + 1;
        if have <= need {
            self.state = State::Utf8 {
                buf,
                have,
                need,
                alt,
            };
            return None;
        }
        match std::str::from_utf8(&buf[..have as usize])
            .ok()
            .and_then(|s| s.chars().next())
        {
            Some(c) => {
                let key = KeyEvent::char(c);
                Some(InputEvent::Key(if alt { key.with_mods(ModMask::ALT) } else { key }))
            }
            None => {
                tracing::trace!(target: "input.decode", "utf8_invalid_discarded");
                None
            }
        }
    }

    fn paste(&mut self, mut buf: Vec<u8>, mut dropped: usize, byte: u8) -> Option<InputEvent> {
        buf.push(byte);
        if !buf.ends_with(PASTE_END) {
            // keep a marker-sized tail past the limit so the end is still seen
            if buf.len() > self.paste_limit + PASTE_END.len() {
                buf.remove(self.paste_limit);
                dropped += 1;
            }
            self.state = State::Paste { buf, dropped };
            return None;
        }
        buf.truncate(buf.len() - PASTE_END.len());
        if buf.len() > self.paste_limit {
            dropped += buf.len() - self.paste_limit;
            buf.truncate(self.paste_limit);
        }
        if dropped > 0 {
            tracing::debug!(target: "input.paste", kept = buf.len(), dropped, "paste_truncated");
        }
        let text = match String::from_utf8(buf) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        };
        log_paste_complete(&text);
        Some(InputEvent::Paste(text))
    }
}

#[inline]
pub(crate) fn log_paste_complete(text: &str) {
    tracing::trace!(target: "input.paste", len = text.len(), "end");
}

fn phase_of(state: &State) -> Phase {
    match state {
        State::Ground => Phase::Ground,
        State::Escape => Phase::Escape,
        State::Csi(_) | State::CsiDiscard | State::ConsoleFn => Phase::Csi,
        State::Ss3 => Phase::Ss3,
        State::Utf8 { .. } => Phase::Utf8,
        State::Paste { .. } => Phase::Paste,
    }
}

fn parse_params(raw: &[u8]) -> SmallVec<[u16; 4]> {
    raw.split(|&b| b == b';')
        .map(|part| {
            part.iter()
                .take_while(|b| b.is_ascii_digit())
                .fold(0u16, |acc, &d| acc.saturating_mul(10).saturating_add(u16::from(d - b'0')))
        })
        .collect()
}

fn tilde_key(code: u16) -> Option<NamedKey> {
    Some(match code {
        1 | 7 => NamedKey::Home,
        2 => NamedKey::Insert,
        3 => NamedKey::Delete,
        4 | 8 => NamedKey::End,
        5 => NamedKey::PageUp,
        6 => NamedKey::PageDown,
        11..=15 => NamedKey::F((code - 10) as u8),
        17..=21 => NamedKey::F((code - 11) as u8),
        23 | 24 => NamedKey::F((code - 12) as u8),
        _ => return None,
    })
}

fn ss3_key(byte: u8) -> Option<KeyEvent> {
    let named = match byte {
        b'A' => NamedKey::Up,
        b'B' => NamedKey::Down,
        b'C' => NamedKey::Right,
        b'D' => NamedKey::Left,
        b'H' => NamedKey::Home,
        b'F' => NamedKey::End,
        b'M' => NamedKey::Enter,
        b'P' => NamedKey::F(1),
        b'Q' => NamedKey::F(2),
        b'R' => NamedKey::F(3),
        b'S' => NamedKey::F(4),
        _ => return None,
    };
    Some(KeyEvent::named(named))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn decode(bytes: &[u8]) -> Vec<InputEvent> {
        let mut d = Decoder::new();
        bytes.iter().filter_map(|&b| d.feed(b)).collect()
    }

    fn key(k: KeyEvent) -> InputEvent {
        InputEvent::Key(k)
    }

    #[test]
    fn left_arrow_is_one_event_and_returns_to_ground() {
        let mut d = Decoder::new();
        assert_eq!(d.feed(0x1b), None);
        assert_eq!(d.phase(), Phase::Escape);
        assert_eq!(d.feed(b'['), None);
        assert_eq!(d.phase(), Phase::Csi);
        assert_eq!(d.feed(b'D'), Some(key(KeyEvent::named(NamedKey::Left))));
        assert_eq!(d.phase(), Phase::Ground);
    }

    #[test]
    fn bare_escape_resolves_on_timeout() {
        let mut d = Decoder::new();
        assert_eq!(d.feed(0x1b), None);
        assert!(d.needs_timeout());
        assert_eq!(d.timeout(), Some(key(KeyEvent::named(NamedKey::Esc))));
        assert_eq!(d.phase(), Phase::Ground);
        assert_eq!(d.timeout(), None);
    }

    #[test]
    fn control_bytes() {
        assert_eq!(
            decode(b"\x01\x05\r\t\x7f\x08\x0a\x1f"),
            vec![
                key(KeyEvent::ctrl('a')),
                key(KeyEvent::ctrl('e')),
                key(KeyEvent::named(NamedKey::Enter)),
                key(KeyEvent::named(NamedKey::Tab)),
                key(KeyEvent::named(NamedKey::Backspace)),
                key(KeyEvent::named(NamedKey::Backspace)),
                key(KeyEvent::ctrl('j')),
                key(KeyEvent::ctrl('_')),
            ]
        );
    }

    #[test]
    fn alt_prefix() {
        assert_eq!(
            decode(b"\x1bb\x1b\x7f"),
            vec![
                key(KeyEvent::alt('b')),
                key(KeyEvent::named(NamedKey::Backspace).with_mods(ModMask::ALT)),
            ]
        );
        assert_eq!(
            decode("\x1bé".as_bytes()),
            vec![key(KeyEvent::alt('é'))]
        );
    }

    #[test]
    fn double_escape_emits_one_and_stays_pending() {
        let mut d = Decoder::new();
        d.feed(0x1b);
        assert_eq!(d.feed(0x1b), Some(key(KeyEvent::named(NamedKey::Esc))));
        assert_eq!(d.phase(), Phase::Escape);
        assert_eq!(d.feed(b'['), None);
        assert_eq!(d.feed(b'A'), Some(key(KeyEvent::named(NamedKey::Up))));
    }

    #[test]
    fn csi_keys_with_modifiers() {
        assert_eq!(
            decode(b"\x1b[1;5C\x1b[3~\x1b[3;2~\x1b[H\x1b[4~\x1b[15~\x1b[24~\x1b[Z"),
            vec![
                key(KeyEvent::named(NamedKey::Right).with_mods(ModMask::CTRL)),
                key(KeyEvent::named(NamedKey::Delete)),
                key(KeyEvent::named(NamedKey::Delete).with_mods(ModMask::SHIFT)),
                key(KeyEvent::named(NamedKey::Home)),
                key(KeyEvent::named(NamedKey::End)),
                key(KeyEvent::named(NamedKey::F(5))),
                key(KeyEvent::named(NamedKey::F(12))),
                key(KeyEvent::named(NamedKey::BackTab)),
            ]
        );
    }

    #[test]
    fn ss3_keys() {
        assert_eq!(
            decode(b"\x1bOA\x1bOH\x1bOP"),
            vec![
                key(KeyEvent::named(NamedKey::Up)),
                key(KeyEvent::named(NamedKey::Home)),
                key(KeyEvent::named(NamedKey::F(1))),
            ]
        );
    }

    #[test]
    fn utf8_multibyte() {
        assert_eq!(
            decode("é界😀".as_bytes()),
            vec![
                key(KeyEvent::char('é')),
                key(KeyEvent::char('界')),
                key(KeyEvent::char('😀')),
            ]
        );
    }

    #[test]
    fn truncated_utf8_is_dropped_and_next_byte_kept() {
        // lead byte of a 3-byte sequence followed by plain ASCII
        assert_eq!(decode(b"\xe7\x95x"), vec![key(KeyEvent::char('x'))]);
        // stray continuation byte
        assert_eq!(decode(b"\x80y"), vec![key(KeyEvent::char('y'))]);
        // overlong / surrogate encodings are rejected
        assert_eq!(decode(b"\xed\xa0\x80z"), vec![key(KeyEvent::char('z'))]);
    }

    #[test]
    fn malformed_csi_is_discarded() {
        // control byte inside CSI
        assert_eq!(decode(b"\x1b[1\x01a"), vec![key(KeyEvent::char('a'))]);
        // unknown final byte
        assert_eq!(decode(b"\x1b[9qb"), vec![key(KeyEvent::char('b'))]);
        // private mode reports
        assert_eq!(decode(b"\x1b[?1;2cc"), vec![key(KeyEvent::char('c'))]);
        // unknown tilde code
        assert_eq!(decode(b"\x1b[99~d"), vec![key(KeyEvent::char('d'))]);
    }

    #[test]
    fn overlong_csi_is_discarded_whole() {
        let mut bytes = b"ab\x1b[".to_vec();
        bytes.extend(std::iter::repeat_n(b'1', MAX_CSI_LEN + 8));
        bytes.extend(b";5D");
        bytes.push(b'k');
        assert_eq!(
            decode(&bytes),
            vec![
                key(KeyEvent::char('a')),
                key(KeyEvent::char('b')),
                key(KeyEvent::char('k')),
            ]
        );
    }

    #[test]
    fn overlong_csi_cut_by_escape_resyncs() {
        let mut d = Decoder::new();
        let mut bytes = b"\x1b[".to_vec();
        bytes.extend(std::iter::repeat_n(b'2', MAX_CSI_LEN + 1));
        bytes.extend(b"\x1b[A");
        let events: Vec<_> = bytes.iter().filter_map(|&b| d.feed(b)).collect();
        assert_eq!(events, vec![key(KeyEvent::named(NamedKey::Up))]);
        assert_eq!(d.phase(), Phase::Ground);
    }

    #[test]
    fn linux_console_function_keys() {
        assert_eq!(
            decode(b"\x1b[[A\x1b[[E\x1b[[zq"),
            vec![
                key(KeyEvent::named(NamedKey::F(1))),
                key(KeyEvent::named(NamedKey::F(5))),
                key(KeyEvent::char('q')),
            ]
        );
    }

    #[test]
    fn escape_inside_csi_restarts() {
        assert_eq!(
            decode(b"\x1b[1\x1b[B"),
            vec![key(KeyEvent::named(NamedKey::Down))]
        );
    }

    #[test]
    fn bracketed_paste_is_one_event() {
        let mut d = Decoder::new();
        let mut out = Vec::new();
        for &b in b"\x1b[200~line1\nline\x1b2\r\x1b[201~" {
            out.extend(d.feed(b));
            assert!(out.is_empty() || d.phase() == Phase::Ground);
        }
        assert_eq!(out, vec![InputEvent::Paste("line1\nline\x1b2\r".into())]);
        assert_eq!(d.phase(), Phase::Ground);
    }

    #[test]
    fn paste_survives_timeouts() {
        let mut d = Decoder::new();
        for &b in b"\x1b[200~ab" {
            d.feed(b);
        }
        assert!(!d.needs_timeout());
        assert_eq!(d.timeout(), None);
        for &b in b"c\x1b[201~" {
            if let Some(ev) = d.feed(b) {
                assert_eq!(ev, InputEvent::Paste("abc".into()));
            }
        }
        assert_eq!(d.phase(), Phase::Ground);
    }

    #[test]
    fn oversized_paste_is_truncated() {
        let mut d = Decoder::with_paste_limit(4);
        let mut out = Vec::new();
        for &b in b"\x1b[200~abcdefgh\x1b[201~z" {
            out.extend(d.feed(b));
        }
        assert_eq!(
            out,
            vec![InputEvent::Paste("abcd".into()), key(KeyEvent::char('z'))]
        );
        assert_eq!(d.phase(), Phase::Ground);
    }

    #[test]
    fn paste_at_the_limit_is_kept_whole() {
        let mut d = Decoder::with_paste_limit(3);
        let out: Vec<_> = b"\x1b[200~xyz\x1b[201~"
            .iter()
            .filter_map(|&b| d.feed(b))
            .collect();
        assert_eq!(out, vec![InputEvent::Paste("xyz".into())]);
    }

    #[test]
    fn partial_sequences_on_timeout() {
        let mut d = Decoder::new();
        d.feed(0x1b);
        d.feed(b'[');
        assert_eq!(d.timeout(), Some(key(KeyEvent::alt('['))));
        d.feed(0x1b);
        d.feed(b'[');
        d.feed(b'1');
        assert_eq!(d.timeout(), None);
        assert_eq!(d.phase(), Phase::Ground);
        d.feed(0xe7);
        assert_eq!(d.timeout(), None);
        assert_eq!(d.phase(), Phase::Ground);
    }

    proptest! {
        #[test]
        fn garbage_never_wedges_the_decoder(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            let mut d = Decoder::new();
            for b in bytes {
                let _ = d.feed(b);
            }
            // leave any paste, then flush partial state
            for &b in PASTE_END {
                let _ = d.feed(b);
            }
            let _ = d.timeout();
            let _ = d.timeout();
            prop_assert_eq!(d.phase(), Phase::Ground);
            prop_assert_eq!(d.feed(b'q'), Some(key(KeyEvent::char('q'))));
        }
    }
}
