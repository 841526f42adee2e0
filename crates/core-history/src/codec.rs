//! Line codec for the history file.
//!
//! Each entry is stored on one line. Characters that would break the line
//! structure are escaped:
//!
//! | char        | stored    |
//! |-------------|-----------|
//! | `\`         | `\\`      |
//! | newline     | `\n`      |
//! | CR          | `\r`      |
//! | tab         | `\t`      |
//! | other C0/DEL| `\xHH`    |
//!
//! Unknown or truncated escapes decode literally.

pub fn escape(entry: &str) -> String {
    let mut out = String::with_capacity(entry.len());
    for c in entry.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out
}

pub fn unescape(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('\\') => {
                chars.next();
                out.push('\\');
            }
            Some('n') => {
                chars.next();
                out.push('\n');
            }
            Some('r') => {
                chars.next();
                out.push('\r');
            }
            Some('t') => {
                chars.next();
                out.push('\t');
            }
            Some('x') => {
                let mut ahead = chars.clone();
                ahead.next();
                let hex: String = ahead.by_ref().take(2).collect();
                let digits = hex.len() == 2 && hex.bytes().all(|b| b.is_ascii_hexdigit());
                match u8::from_str_radix(&hex, 16) {
                    Ok(v) if digits => {
                        out.push(char::from(v));
                        chars = ahead;
                    }
                    _ => out.push('\\'),
                }
            }
            _ => out.push('\\'),
        }
    }
    out
}
