//! Single slot kill ring.
//!
//! Consecutive kills accumulate into the slot: forward kills append, backward
//! kills prepend, so `C-w C-w` followed by `C-y` restores both words in their
//! original order. Any other command ends the sequence and the next kill
//! replaces the slot.

use core_text::Direction;

#[derive(Debug, Default, Clone)]
pub struct KillRing {
    slot: Option<String>,
    accumulating: bool,
}

impl KillRing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store killed text. `dir` is the direction the kill extended from the cursor.
    pub fn kill(&mut self, text: &str, dir: Direction) {
        if text.is_empty() {
            return;
        }
        match (&mut self.slot, self.accumulating) {
            (Some(slot), true) => match dir {
                Direction::Forward => slot.push_str(text),
                Direction::Backward => slot.insert_str(0, text),
            },
            _ => self.slot = Some(text.to_owned()),
        }
        self.accumulating = true;
        tracing::trace!(
            target: "state.kill",
            len = text.len(),
            slot_len = self.slot.as_ref().map_or(0, String::len),
            "kill"
        );
    }

    /// End the current kill sequence.
    pub fn break_sequence(&mut self) {
        self.accumulating = false;
    }

    pub fn yank(&self) -> Option<&str> {
        self.slot.as_deref()
    }
}
