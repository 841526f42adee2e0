//! Codepoint display width table.
//!
//! This module is the single authority for how many terminal columns a
//! codepoint occupies. Every layout, cursor and wrap decision in the engine
//! flows through [`char_width`]; no other crate calls `unicode_width`
//! directly.
//!
//! Width classes:
//! * `0` - control characters, combining marks, zero width joiners and
//!   variation selectors. These attach to the preceding base codepoint.
//! * `1` - ordinary narrow codepoints.
//! * `2` - East Asian wide / fullwidth codepoints and emoji presentation
//!   codepoints.
//!
//! Invariants:
//! - The result is always in `0..=2`.
//! - The width of a run equals the sum of the widths of its codepoints;
//!   there is no cluster-level override table.

use unicode_width::UnicodeWidthChar;

/// Display width in terminal columns of a single codepoint.
#[inline]
pub fn char_width(c: char) -> u8 {
    if c.is_control() {
        return 0;
    }
    match UnicodeWidthChar::width(c) {
        Some(w) if w >= 2 => 2,
        Some(w) => w as u8,
        None => 0,
    }
}

/// True when the codepoint contributes no columns and therefore attaches to
/// the base codepoint before it.
#[inline]
pub fn is_zero_width(c: char) -> bool {
    char_width(c) == 0
}

/// Sum of codepoint widths over a slice.
pub fn run_width(chars: &[char]) -> usize {
    chars.iter().map(|&c| char_width(c) as usize).sum()
}

/// Sum of codepoint widths over a string.
pub fn str_width(s: &str) -> usize {
    s.chars().map(|c| char_width(c) as usize).sum()
}
