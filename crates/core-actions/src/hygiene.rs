//! Control character hygiene for inserted text.
//!
//! Applied to typed text, pastes and accepted completions before they reach
//! the buffer:
//! * `\r\n`, `\r` and `\n` become a row break when multiline editing is on,
//!   a single space otherwise.
//! * A tab becomes `TAB_WIDTH` spaces.
//! * Any other control character is dropped.

pub const TAB_WIDTH: usize = 4;

pub fn sanitize(text: &str, multiline: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let newline = if multiline { '\n' } else { ' ' };
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push(newline);
            }
            '\n' => out.push(newline),
            '\t' => out.extend(std::iter::repeat_n(' ', TAB_WIDTH)),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}
