//! Real terminal backend on a Unix file descriptor.
//!
//! Raw mode follows `cfmakeraw` through rustix's `Termios::make_raw`. The
//! attributes in effect before `enter` are saved on the backend itself and
//! written back by `leave`.

use std::io::{self, Stdin, Stdout, Write};
use std::time::Duration;

use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::queue;
use rustix::event::{PollFd, PollFlags, Timespec};
use rustix::fd::AsFd;
use rustix::io::Errno;
use rustix::termios::{self, OptionalActions, Termios};

use crate::{
    ByteRead, FALLBACK_SIZE, ModeOptions, ResizeWatcher, TerminalBackend, TerminalCapabilities,
    TerminalError,
};

pub struct TtyBackend<I: AsFd, O: Write> {
    input: I,
    output: O,
    caps: TerminalCapabilities,
    original: Option<Termios>,
    paste_enabled: bool,
    resize: ResizeWatcher,
}

impl TtyBackend<Stdin, Stdout> {
    /// Backend over the process stdin/stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin(), io::stdout())
    }
}

impl<I: AsFd, O: Write> TtyBackend<I, O> {
    pub fn new(input: I, output: O) -> Self {
        let caps = TerminalCapabilities::detect(input.as_fd());
        let resize = if caps.interactive {
            ResizeWatcher::install().unwrap_or_else(|e| {
                tracing::warn!(target: "terminal.resize", error = %e, "sigwinch_install_failed");
                ResizeWatcher::detached()
            })
        } else {
            ResizeWatcher::detached()
        };
        Self {
            input,
            output,
            caps,
            original: None,
            paste_enabled: false,
            resize,
        }
    }
}

fn timespec(d: Duration) -> Timespec {
    Timespec {
        tv_sec: d.as_secs() as _,
        tv_nsec: d.subsec_nanos() as _,
    }
}

impl<I: AsFd, O: Write> Write for TtyBackend<I, O> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.write(buf)
    }
    fn flush(&mut self) -> io::Result<()> {
        self.output.flush()
    }
}

impl<I: AsFd, O: Write> TerminalBackend for TtyBackend<I, O> {
    fn enter(&mut self, opts: ModeOptions) -> Result<(), TerminalError> {
        if self.original.is_some() {
            return Ok(());
        }
        if !termios::isatty(&self.input) {
            return Err(TerminalError::NotATerminal);
        }
        let original = termios::tcgetattr(&self.input).map_err(|e| TerminalError::Mode {
            op: "read",
            source: e.into(),
        })?;
        let mut raw = original.clone();
        raw.make_raw();
        termios::tcsetattr(&self.input, OptionalActions::Now, &raw).map_err(|e| {
            TerminalError::Mode {
                op: "set",
                source: e.into(),
            }
        })?;
        self.original = Some(original);
        if opts.bracketed_paste {
            queue!(self.output, EnableBracketedPaste)?;
            self.output.flush()?;
            self.paste_enabled = true;
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<(), TerminalError> {
        let Some(original) = self.original.take() else {
            return Ok(());
        };
        if self.paste_enabled {
            self.paste_enabled = false;
            // keep restoring the mode even when the output side is gone
            let _ = queue!(self.output, DisableBracketedPaste);
            let _ = self.output.flush();
        }
        termios::tcsetattr(&self.input, OptionalActions::Now, &original).map_err(|e| {
            TerminalError::Mode {
                op: "restore",
                source: e.into(),
            }
        })
    }

    fn capabilities(&self) -> TerminalCapabilities {
        self.caps
    }

    fn size(&self) -> (u16, u16) {
        match termios::tcgetwinsize(&self.input) {
            Ok(ws) if ws.ws_col > 0 && ws.ws_row > 0 => (ws.ws_col, ws.ws_row),
            _ => crossterm::terminal::size()
                .ok()
                .filter(|&(c, r)| c > 0 && r > 0)
                .unwrap_or(FALLBACK_SIZE),
        }
    }

    fn poll_byte(&mut self, timeout: Option<Duration>) -> io::Result<ByteRead> {
        let ts = timeout.map(timespec);
        let mut fds = [PollFd::new(&self.input, PollFlags::IN)];
        match rustix::event::poll(&mut fds, ts.as_ref()) {
            Ok(0) => return Ok(ByteRead::Timeout),
            Ok(_) => {}
            Err(Errno::INTR) => return Ok(ByteRead::Interrupted),
            Err(e) => return Err(e.into()),
        }
        let mut byte = [0u8; 1];
        match rustix::io::read(&self.input, &mut byte[..]) {
            Ok(0) => Ok(ByteRead::Eof),
            Ok(_) => Ok(ByteRead::Byte(byte[0])),
            Err(Errno::INTR) => Ok(ByteRead::Interrupted),
            Err(e) => Err(e.into()),
        }
    }

    fn take_resize(&mut self) -> bool {
        self.resize.take()
    }
}

impl<I: AsFd, O: Write> Drop for TtyBackend<I, O> {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}
