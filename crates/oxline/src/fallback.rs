//! Plain line reader for input that is not a terminal (pipes, files,
//! `TERM=dumb`): prompt, then bytes up to newline or end of stream.
//! No decoding, no history, no completion.

use std::io::Write;

use core_terminal::{ByteRead, TerminalBackend};

use crate::Readline;

pub(crate) fn read_plain_line<B: TerminalBackend>(
    term: &mut B,
    prompt: &str,
    marker: &str,
) -> Readline {
    if let Err(e) = write!(term, "{prompt}{marker}").and_then(|()| term.flush()) {
        tracing::debug!(target: "editor.fallback", error = %e, "prompt_write_failed");
    }
    let mut bytes = Vec::new();
    loop {
        match term.poll_byte(None) {
            Ok(ByteRead::Byte(b'\n')) => break,
            Ok(ByteRead::Byte(b)) => bytes.push(b),
            Ok(ByteRead::Timeout | ByteRead::Interrupted) => {}
            Ok(ByteRead::Eof) if bytes.is_empty() => return Readline::Eof,
            Ok(ByteRead::Eof) => break,
            Err(e) => {
                tracing::warn!(target: "editor.fallback", error = %e, "read_failed");
                if bytes.is_empty() {
                    return Readline::Eof;
                }
                break;
            }
        }
    }
    if bytes.last() == Some(&b'\r') {
        bytes.pop();
    }
    tracing::debug!(target: "editor.fallback", len = bytes.len(), "plain_line_read");
    Readline::Line(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_terminal::{MemoryTerminal, TerminalCapabilities};
    use pretty_assertions::assert_eq;

    fn piped() -> MemoryTerminal {
        MemoryTerminal::new(80, 24).with_capabilities(TerminalCapabilities {
            interactive: false,
            color: false,
        })
    }

    #[test]
    fn reads_lines_then_eof() {
        let mut t = piped();
        t.feed("one\r\ntwo");
        assert_eq!(read_plain_line(&mut t, "p", "> "), Readline::Line("one".into()));
        assert_eq!(read_plain_line(&mut t, "p", "> "), Readline::Line("two".into()));
        assert_eq!(read_plain_line(&mut t, "p", "> "), Readline::Eof);
        assert_eq!(t.output_lossy(), "p> p> p> ");
    }

    #[test]
    fn empty_line_is_a_line() {
        let mut t = piped();
        t.feed("\n");
        assert_eq!(read_plain_line(&mut t, "", "> "), Readline::Line(String::new()));
    }

    #[test]
    fn escape_bytes_are_not_decoded() {
        let mut t = piped();
        t.feed("a\x1b[Db\n");
        assert_eq!(
            read_plain_line(&mut t, "", "> "),
            Readline::Line("a\u{1b}[Db".into())
        );
    }
}
