//! Bounded command history with persistence, navigation and substring search.
//!
//! Design invariants:
//! * Entries are ordered oldest first and never exceed `max_entries`; adding
//!   past the bound evicts the oldest entry (FIFO).
//! * Empty lines are never recorded.
//! * Entry content is never logged; only counts and lengths are.
//! * The backing file is read once on `load` and written once on `save`.

use std::borrow::Cow;
use std::collections::VecDeque;
use std::fs;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub mod codec;
mod navigator;

pub use navigator::HistoryNavigator;

pub const DEFAULT_MAX_ENTRIES: usize = 200;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to read history file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write history file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Duplicate suppression applied by `History::add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Record every line.
    Allow,
    /// Skip a line equal to the most recent entry.
    #[default]
    IgnoreConsecutive,
    /// Remove any earlier equal entry before recording the line.
    IgnoreAll,
}

#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<String>,
    max_entries: usize,
    policy: DuplicatePolicy,
    path: Option<PathBuf>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl History {
    /// A history bounded to `max_entries`. Zero falls back to the default bound.
    pub fn new(max_entries: usize) -> Self {
        let max_entries = if max_entries == 0 {
            DEFAULT_MAX_ENTRIES
        } else {
            max_entries
        };
        Self {
            entries: VecDeque::new(),
            max_entries,
            policy: DuplicatePolicy::default(),
            path: None,
        }
    }

    pub fn with_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: DuplicatePolicy) {
        self.policy = policy;
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Change the bound, evicting the oldest entries if needed.
    pub fn set_max_entries(&mut self, max_entries: usize) {
        self.max_entries = if max_entries == 0 {
            DEFAULT_MAX_ENTRIES
        } else {
            max_entries
        };
        self.trim();
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set_path(&mut self, path: Option<PathBuf>) {
        self.path = path;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry by age: 0 is the oldest.
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.entries.get(idx).map(String::as_str)
    }

    /// Entry by recency: 0 is the most recent.
    pub fn recent(&self, back: usize) -> Option<&str> {
        let len = self.entries.len();
        if back >= len {
            return None;
        }
        self.get(len - 1 - back)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Record a submitted line. Returns whether the line was added.
    pub fn add(&mut self, line: &str) -> bool {
        if line.is_empty() {
            return false;
        }
        match self.policy {
            DuplicatePolicy::Allow => {}
            DuplicatePolicy::IgnoreConsecutive => {
                if self.entries.back().is_some_and(|last| last == line) {
                    tracing::trace!(target: "history", "duplicate_skipped");
                    return false;
                }
            }
            DuplicatePolicy::IgnoreAll => {
                self.entries.retain(|e| e != line);
            }
        }
        self.entries.push_back(line.to_owned());
        self.trim();
        tracing::trace!(target: "history", len = line.len(), entries = self.entries.len(), "added");
        true
    }

    pub fn remove_last(&mut self) -> Option<String> {
        self.entries.pop_back()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Search entries strictly older than `before` (an age index; `None`
    /// searches everything) for `needle`, newest first. Returns the age index
    /// of the match. An empty needle matches the newest candidate.
    pub fn search(&self, needle: &str, before: Option<usize>) -> Option<usize> {
        let end = before.unwrap_or(self.entries.len()).min(self.entries.len());
        (0..end)
            .rev()
            .find(|&i| self.entries[i].contains(needle))
    }

    /// Search entries strictly newer than `after` for `needle`, oldest first.
    pub fn search_forward(&self, needle: &str, after: usize) -> Option<usize> {
        (after + 1..self.entries.len()).find(|&i| self.entries[i].contains(needle))
    }

    /// Load entries from `path` after the current ones, keeping only the most
    /// recent `max_entries`. A missing file is an empty history, not an error.
    /// Invalid UTF-8 is replaced rather than rejected. On a read error the
    /// history is left unchanged.
    pub fn load(&mut self, path: &Path) -> Result<usize, HistoryError> {
        let file = match fs::File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(target: "history.io", path = %path.display(), "history_file_missing");
                return Ok(0);
            }
            Err(source) => {
                return Err(HistoryError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let mut reader = BufReader::new(file);
        let mut fresh = VecDeque::new();
        let mut raw = Vec::new();
        let mut loaded = 0usize;
        let mut replaced = 0usize;
        loop {
            raw.clear();
            let n = reader
                .read_until(b'\n', &mut raw)
                .map_err(|source| HistoryError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
            if n == 0 {
                break;
            }
            let bytes = raw.strip_suffix(b"\n").unwrap_or(&raw);
            let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
            if bytes.is_empty() {
                continue;
            }
            let line = String::from_utf8_lossy(bytes);
            if let Cow::Owned(_) = line {
                replaced += 1;
            }
            fresh.push_back(codec::unescape(&line));
            if fresh.len() > self.max_entries {
                fresh.pop_front();
            }
            loaded += 1;
        }
        if replaced > 0 {
            tracing::warn!(target: "history.io", path = %path.display(), lines = replaced, "history_invalid_utf8_replaced");
        }
        self.entries.extend(fresh);
        self.trim();
        tracing::debug!(target: "history.io", path = %path.display(), loaded, kept = self.entries.len(), "history_loaded");
        Ok(loaded)
    }

    /// Write all entries to `path`, one escaped entry per line.
    pub fn save(&self, path: &Path) -> Result<(), HistoryError> {
        let write_err = |source| HistoryError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let file = fs::File::create(path).map_err(write_err)?;
        let mut out = BufWriter::new(file);
        for entry in &self.entries {
            writeln!(out, "{}", codec::escape(entry)).map_err(write_err)?;
        }
        out.flush().map_err(write_err)?;
        tracing::debug!(target: "history.io", path = %path.display(), entries = self.entries.len(), "history_saved");
        Ok(())
    }

    /// Save to the configured path, if any.
    pub fn persist(&self) -> Result<(), HistoryError> {
        match &self.path {
            Some(path) => self.save(path),
            None => Ok(()),
        }
    }

    fn trim(&mut self) {
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entries(h: &History) -> Vec<&str> {
        h.iter().collect()
    }

    #[test]
    fn bounded_fifo_eviction() {
        let mut h = History::new(3);
        for s in ["a", "b", "c", "d"] {
            h.add(s);
        }
        assert_eq!(entries(&h), vec!["b", "c", "d"]);
    }

    #[test]
    fn empty_lines_are_not_recorded() {
        let mut h = History::default();
        assert!(!h.add(""));
        assert!(h.is_empty());
    }

    #[test]
    fn ignore_consecutive_duplicates() {
        let mut h = History::default();
        assert!(h.add("ls"));
        assert!(!h.add("ls"));
        assert!(h.add("cd"));
        assert!(h.add("ls"));
        assert_eq!(entries(&h), vec!["ls", "cd", "ls"]);
    }

    #[test]
    fn ignore_all_duplicates_moves_entry_to_front() {
        let mut h = History::default().with_policy(DuplicatePolicy::IgnoreAll);
        h.add("ls");
        h.add("cd");
        h.add("ls");
        assert_eq!(entries(&h), vec!["cd", "ls"]);
    }

    #[test]
    fn allow_duplicates() {
        let mut h = History::default().with_policy(DuplicatePolicy::Allow);
        h.add("x");
        h.add("x");
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn remove_last_and_clear() {
        let mut h = History::default();
        h.add("one");
        h.add("two");
        assert_eq!(h.remove_last().as_deref(), Some("two"));
        assert_eq!(entries(&h), vec!["one"]);
        h.clear();
        assert!(h.is_empty());
        assert_eq!(h.remove_last(), None);
    }

    #[test]
    fn search_newest_first() {
        let mut h = History::default();
        for s in ["git status", "ls", "git commit", "make"] {
            h.add(s);
        }
        assert_eq!(h.search("git", None), Some(2));
        assert_eq!(h.search("git", Some(2)), Some(0));
        assert_eq!(h.search("git", Some(0)), None);
        assert_eq!(h.search("nothing", None), None);
        assert_eq!(h.search("", None), Some(3));
        assert_eq!(h.search_forward("git", 0), Some(2));
        assert_eq!(h.search_forward("git", 2), None);
        assert_eq!(h.search_forward("", 10), None);
    }

    #[test]
    fn recent_indexing() {
        let mut h = History::default();
        h.add("foo");
        h.add("bar");
        assert_eq!(h.recent(0), Some("bar"));
        assert_eq!(h.recent(1), Some("foo"));
        assert_eq!(h.recent(2), None);
    }

    #[test]
    fn zero_capacity_defaults() {
        assert_eq!(History::new(0).max_entries(), DEFAULT_MAX_ENTRIES);
    }

    #[test]
    fn shrinking_bound_evicts_oldest() {
        let mut h = History::new(10);
        for s in ["1", "2", "3", "4"] {
            h.add(s);
        }
        h.set_max_entries(2);
        assert_eq!(entries(&h), vec!["3", "4"]);
    }
}
