//! Terminal transport: raw mode acquisition, byte input with timeouts and the
//! output sink.
//!
//! Design invariants:
//! * Exactly one backend holds raw mode at a time. `TerminalGuard` restores
//!   the prior mode on drop, which covers early returns, `?` and panics.
//! * `poll_byte` never blocks longer than the timeout it is given. A `None`
//!   timeout blocks until a byte, end of input or a signal interruption.
//! * Resize notifications are flags, not events: they are set out of band
//!   (signal handler or script) and drained with `take_resize` after every read.

use std::io::{self, Write};
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use thiserror::Error;

pub mod capabilities;
pub mod memory;
#[cfg(unix)]
pub mod resize;
#[cfg(unix)]
pub mod tty;

pub use capabilities::TerminalCapabilities;
pub use memory::MemoryTerminal;
#[cfg(unix)]
pub use resize::ResizeWatcher;
#[cfg(unix)]
pub use tty::TtyBackend;

/// Size used when the terminal cannot be queried.
pub const FALLBACK_SIZE: (u16, u16) = (80, 25);

#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("input is not a terminal")]
    NotATerminal,
    #[error("failed to {op} terminal attributes: {source}")]
    Mode {
        op: &'static str,
        #[source]
        source: io::Error,
    },
}

/// Outcome of a single byte read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteRead {
    Byte(u8),
    /// The timeout elapsed with no input.
    Timeout,
    /// Input stream closed.
    Eof,
    /// The wait was interrupted by a signal (typically a resize).
    Interrupted,
}

/// Options applied while raw mode is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeOptions {
    pub bracketed_paste: bool,
}

impl Default for ModeOptions {
    fn default() -> Self {
        Self {
            bracketed_paste: true,
        }
    }
}

pub trait TerminalBackend: Write {
    /// Switch to raw mode (no canonical processing, no echo).
    fn enter(&mut self, opts: ModeOptions) -> Result<(), TerminalError>;
    /// Restore the mode saved by `enter`. A no-op when not entered.
    fn leave(&mut self) -> Result<(), TerminalError>;
    fn capabilities(&self) -> TerminalCapabilities;
    /// Terminal size as (columns, rows).
    fn size(&self) -> (u16, u16);
    fn poll_byte(&mut self, timeout: Option<Duration>) -> io::Result<ByteRead>;
    /// Drain the resize flag.
    fn take_resize(&mut self) -> bool;
}

impl<T: TerminalBackend + ?Sized> TerminalBackend for &mut T {
    fn enter(&mut self, opts: ModeOptions) -> Result<(), TerminalError> {
        (**self).enter(opts)
    }
    fn leave(&mut self) -> Result<(), TerminalError> {
        (**self).leave()
    }
    fn capabilities(&self) -> TerminalCapabilities {
        (**self).capabilities()
    }
    fn size(&self) -> (u16, u16) {
        (**self).size()
    }
    fn poll_byte(&mut self, timeout: Option<Duration>) -> io::Result<ByteRead> {
        (**self).poll_byte(timeout)
    }
    fn take_resize(&mut self) -> bool {
        (**self).take_resize()
    }
}

/// RAII guard ensuring terminal state restoration even if the caller
/// early-returns or panics.
pub struct TerminalGuard<'a, B: TerminalBackend + ?Sized> {
    backend: &'a mut B,
    active: bool,
}

impl<'a, B: TerminalBackend + ?Sized> TerminalGuard<'a, B> {
    pub fn enter(backend: &'a mut B, opts: ModeOptions) -> Result<Self, TerminalError> {
        backend.enter(opts)?;
        tracing::debug!(target: "terminal.mode", bracketed_paste = opts.bracketed_paste, "raw_mode_entered");
        Ok(Self {
            backend,
            active: true,
        })
    }

    /// Leave raw mode now and report failures instead of swallowing them.
    pub fn release(mut self) -> Result<(), TerminalError> {
        self.active = false;
        let res = self.backend.leave();
        tracing::debug!(target: "terminal.mode", ok = res.is_ok(), "raw_mode_left");
        res
    }
}

impl<B: TerminalBackend + ?Sized> Deref for TerminalGuard<'_, B> {
    type Target = B;
    fn deref(&self) -> &B {
        &*self.backend
    }
}

impl<B: TerminalBackend + ?Sized> DerefMut for TerminalGuard<'_, B> {
    fn deref_mut(&mut self) -> &mut B {
        &mut *self.backend
    }
}

impl<B: TerminalBackend + ?Sized> Drop for TerminalGuard<'_, B> {
    fn drop(&mut self) {
        if self.active {
            if let Err(e) = self.backend.leave() {
                tracing::warn!(target: "terminal.mode", error = %e, "raw_mode_restore_failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_restores_on_drop() {
        let mut term = MemoryTerminal::new(80, 24);
        {
            let _g = TerminalGuard::enter(&mut term, ModeOptions::default()).unwrap();
        }
        assert!(!term.is_raw());
        assert_eq!(term.mode_transitions(), 2);
    }

    #[test]
    fn guard_restores_on_panic() {
        let mut term = MemoryTerminal::new(80, 24);
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _g = TerminalGuard::enter(&mut term, ModeOptions::default()).unwrap();
            panic!("boom");
        }));
        assert!(res.is_err());
        assert!(!term.is_raw());
    }

    #[test]
    fn explicit_release() {
        let mut term = MemoryTerminal::new(80, 24);
        let g = TerminalGuard::enter(&mut term, ModeOptions::default()).unwrap();
        assert!(g.is_raw());
        g.release().unwrap();
        assert!(!term.is_raw());
        assert_eq!(term.mode_transitions(), 2);
    }
}
