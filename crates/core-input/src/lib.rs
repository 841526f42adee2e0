//! Input decoding: raw terminal bytes to `InputEvent`s.
//!
//! `Decoder` is the pure byte state machine. `KeyReader` drives it from a
//! `TerminalBackend`, applying the escape timeout through poll-with-timeout
//! reads (never fixed sleeps) and surfacing resize notifications.

pub mod decoder;

pub use decoder::{Decoder, Phase};

use std::io;
use std::time::Duration;

use core_events::InputEvent;
use core_terminal::{ByteRead, TerminalBackend};

/// Default wait for the byte following a bare ESC.
pub const DEFAULT_ESC_TIMEOUT: Duration = Duration::from_millis(50);

#[derive(Debug)]
pub struct KeyReader {
    decoder: Decoder,
    esc_timeout: Duration,
    resize_pending: bool,
}

impl Default for KeyReader {
    fn default() -> Self {
        Self::new(DEFAULT_ESC_TIMEOUT)
    }
}

impl KeyReader {
    pub fn new(esc_timeout: Duration) -> Self {
        Self {
            decoder: Decoder::new(),
            esc_timeout,
            resize_pending: false,
        }
    }

    pub fn esc_timeout(&self) -> Duration {
        self.esc_timeout
    }

    /// Block until the next event. `Ok(None)` is end of input.
    ///
    /// The resize flag is checked after every read; a resize observed
    /// alongside a byte is reported on the following call so the byte is
    /// never lost.
    pub fn read<B: TerminalBackend + ?Sized>(
        &mut self,
        term: &mut B,
    ) -> io::Result<Option<InputEvent>> {
        loop {
            if std::mem::take(&mut self.resize_pending) {
                tracing::trace!(target: "input.event", "resize");
                return Ok(Some(InputEvent::Resize));
            }
            let timeout = self.decoder.needs_timeout().then_some(self.esc_timeout);
            let read = term.poll_byte(timeout)?;
            if term.take_resize() {
                self.resize_pending = true;
            }
            match read {
                ByteRead::Byte(b) => {
                    if let Some(ev) = self.decoder.feed(b) {
                        log_event(&ev);
                        return Ok(Some(ev));
                    }
                }
                ByteRead::Timeout => {
                    if let Some(ev) = self.decoder.timeout() {
                        log_event(&ev);
                        return Ok(Some(ev));
                    }
                }
                ByteRead::Interrupted => {}
                ByteRead::Eof => {
                    if let Some(ev) = self.decoder.timeout() {
                        return Ok(Some(ev));
                    }
                    if self.resize_pending {
                        continue;
                    }
                    tracing::debug!(target: "input.event", "eof");
                    return Ok(None);
                }
            }
        }
    }
}

fn log_event(ev: &InputEvent) {
    match ev {
        InputEvent::Key(k) => {
            tracing::trace!(target: "input.event", kind = key_kind(k), mods = k.mods.bits(), "key")
        }
        InputEvent::Paste(_) | InputEvent::Resize => {}
    }
}

fn key_kind(k: &core_events::KeyEvent) -> &'static str {
    match k.token {
        core_events::KeyToken::Char(_) => "char",
        core_events::KeyToken::Named(_) => "named",
    }
}
