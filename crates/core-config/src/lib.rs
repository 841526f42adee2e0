//! Configuration loading and parsing.
//!
//! Parses `oxline.toml` (or an override path provided by the binary). Every
//! field is optional; a missing file, an unreadable file or a file that fails
//! to parse all yield the defaults. Unknown fields are ignored so older
//! builds tolerate newer files.
//!
//! Misuse is defaulted rather than rejected: an empty prompt marker, a zero
//! history capacity and a multi-character continuation string are replaced
//! when the effective values are read (see `Config::prompt_marker` and
//! friends), with an `info` event on target `config`.

use anyhow::Result;
use core_history::{DEFAULT_MAX_ENTRIES, DuplicatePolicy};
use serde::Deserialize;
use std::{fs, path::PathBuf, time::Duration};
use tracing::{info, warn};

pub const DEFAULT_MARKER: &str = "> ";
pub const DEFAULT_CONTINUATION_CHAR: char = '\\';
pub const DEFAULT_ESC_TIMEOUT_MS: u64 = 50;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PromptConfig {
    pub marker: String,
    /// Named color (`"green"`, `"bright-blue"`, `"ansi-208"`) or `"none"`.
    pub color: String,
    /// Marker for rows after the first; spaces as wide as `marker` when unset.
    pub continuation_marker: Option<String>,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            color: "green".to_string(),
            continuation_marker: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct EditConfig {
    pub multiline: bool,
    pub continuation_char: String,
    pub color: bool,
    pub beep: bool,
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            multiline: true,
            continuation_char: DEFAULT_CONTINUATION_CHAR.to_string(),
            color: true,
            beep: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct HistoryConfig {
    pub path: Option<PathBuf>,
    pub max_entries: usize,
    pub duplicates: DuplicatePolicy,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_entries: DEFAULT_MAX_ENTRIES,
            duplicates: DuplicatePolicy::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct InputConfig {
    pub esc_timeout_ms: u64,
    pub bracketed_paste: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            esc_timeout_ms: DEFAULT_ESC_TIMEOUT_MS,
            bracketed_paste: true,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub prompt: PromptConfig,
    #[serde(default)]
    pub edit: EditConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub input: InputConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
}

/// Best-effort config path: `./oxline.toml`, then the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("oxline.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("oxline").join("oxline.toml");
    }
    PathBuf::from("oxline.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                raw: Some(content),
                file,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Prompt marker, `"> "` when configured empty.
    pub fn prompt_marker(&self) -> &str {
        let marker = self.file.prompt.marker.as_str();
        if marker.is_empty() {
            info!(target: "config", "empty_prompt_marker_defaulted");
            DEFAULT_MARKER
        } else {
            marker
        }
    }

    pub fn continuation_marker(&self) -> Option<&str> {
        self.file.prompt.continuation_marker.as_deref()
    }

    /// First codepoint of the configured continuation string.
    pub fn continuation_char(&self) -> char {
        let s = &self.file.edit.continuation_char;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            (Some(c), Some(_)) => {
                info!(target: "config", "continuation_char_truncated");
                c
            }
            (None, _) => {
                info!(target: "config", "empty_continuation_char_defaulted");
                DEFAULT_CONTINUATION_CHAR
            }
        }
    }

    pub fn history_max_entries(&self) -> usize {
        match self.file.history.max_entries {
            0 => {
                info!(target: "config", "zero_history_capacity_defaulted");
                DEFAULT_MAX_ENTRIES
            }
            n => n,
        }
    }

    pub fn esc_timeout(&self) -> Duration {
        Duration::from_millis(self.file.input.esc_timeout_ms)
    }
}
