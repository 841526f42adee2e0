//! Scripted in-memory backend used by tests and by embedders that drive the
//! editor from something other than a tty.
//!
//! Input is a queue of steps. A `Pause` step models "no byte arrives within
//! the timeout": it satisfies exactly one timed poll. A blocking poll (no
//! timeout) waits through it. A `Resize` step updates the size, raises the
//! resize flag and interrupts the poll, as `SIGWINCH` does on a real tty.
//! Running out of steps is end of input.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::time::Duration;

use crate::{ByteRead, ModeOptions, TerminalBackend, TerminalCapabilities, TerminalError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Byte(u8),
    Pause,
    Resize(u16, u16),
}

#[derive(Debug, Clone)]
pub struct MemoryTerminal {
    script: VecDeque<Step>,
    output: Vec<u8>,
    size: (u16, u16),
    caps: TerminalCapabilities,
    raw: bool,
    transitions: usize,
    resized: bool,
    fail_writes: bool,
}

impl Default for MemoryTerminal {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

impl MemoryTerminal {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            script: VecDeque::new(),
            output: Vec::new(),
            size: (cols, rows),
            caps: TerminalCapabilities::default(),
            raw: false,
            transitions: 0,
            resized: false,
            fail_writes: false,
        }
    }

    pub fn with_capabilities(mut self, caps: TerminalCapabilities) -> Self {
        self.caps = caps;
        self
    }

    /// Queue raw input bytes.
    pub fn feed(&mut self, bytes: impl AsRef<[u8]>) -> &mut Self {
        self.script
            .extend(bytes.as_ref().iter().copied().map(Step::Byte));
        self
    }

    /// Queue a gap long enough for any escape timeout to fire.
    pub fn pause(&mut self) -> &mut Self {
        self.script.push_back(Step::Pause);
        self
    }

    /// Queue a terminal resize.
    pub fn resize(&mut self, cols: u16, rows: u16) -> &mut Self {
        self.script.push_back(Step::Resize(cols, rows));
        self
    }

    /// Make every subsequent write fail with `BrokenPipe`.
    pub fn fail_writes(&mut self, fail: bool) -> &mut Self {
        self.fail_writes = fail;
        self
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }

    pub fn output_lossy(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    /// Return and clear the recorded output.
    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }

    pub fn is_raw(&self) -> bool {
        self.raw
    }

    /// Number of raw mode enter/leave transitions performed.
    pub fn mode_transitions(&self) -> usize {
        self.transitions
    }

    pub fn pending_input(&self) -> usize {
        self.script.len()
    }
}

impl Write for MemoryTerminal {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.fail_writes {
            return Err(io::Error::from(io::ErrorKind::BrokenPipe));
        }
        self.output.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::from(io::ErrorKind::BrokenPipe));
        }
        Ok(())
    }
}

impl TerminalBackend for MemoryTerminal {
    fn enter(&mut self, _opts: ModeOptions) -> Result<(), TerminalError> {
        if !self.caps.interactive {
            return Err(TerminalError::NotATerminal);
        }
        if !self.raw {
            self.raw = true;
            self.transitions += 1;
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<(), TerminalError> {
        if self.raw {
            self.raw = false;
            self.transitions += 1;
        }
        Ok(())
    }

    fn capabilities(&self) -> TerminalCapabilities {
        self.caps
    }

    fn size(&self) -> (u16, u16) {
        self.size
    }

    fn poll_byte(&mut self, timeout: Option<Duration>) -> io::Result<ByteRead> {
        loop {
            match self.script.pop_front() {
                None => return Ok(ByteRead::Eof),
                Some(Step::Byte(b)) => return Ok(ByteRead::Byte(b)),
                Some(Step::Pause) if timeout.is_some() => return Ok(ByteRead::Timeout),
                Some(Step::Pause) => continue,
                Some(Step::Resize(cols, rows)) => {
                    self.size = (cols, rows);
                    self.resized = true;
                    return Ok(ByteRead::Interrupted);
                }
            }
        }
    }

    fn take_resize(&mut self) -> bool {
        std::mem::take(&mut self.resized)
    }
}
