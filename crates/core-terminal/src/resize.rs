//! `SIGWINCH` capture.
//!
//! The handler only flips an atomic flag. The blocking poll in `TtyBackend`
//! returns `EINTR` when the signal lands, and the editor drains the flag right
//! after every read.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use signal_hook::SigId;
use signal_hook::consts::SIGWINCH;

#[derive(Debug)]
pub struct ResizeWatcher {
    flag: Arc<AtomicBool>,
    id: Option<SigId>,
}

impl ResizeWatcher {
    /// Register a `SIGWINCH` handler for the lifetime of the watcher.
    pub fn install() -> io::Result<Self> {
        let flag = Arc::new(AtomicBool::new(false));
        let id = signal_hook::flag::register(SIGWINCH, Arc::clone(&flag))?;
        tracing::trace!(target: "terminal.resize", "sigwinch_handler_installed");
        Ok(Self { flag, id: Some(id) })
    }

    /// A watcher with no signal handler; only `notify` raises it.
    pub fn detached() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            id: None,
        }
    }

    pub fn notify(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Return whether a resize happened since the last call and clear the flag.
    pub fn take(&self) -> bool {
        self.flag.swap(false, Ordering::AcqRel)
    }
}

impl Drop for ResizeWatcher {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            signal_hook::low_level::unregister(id);
        }
    }
}
