use std::time::Duration;

use core_config::Config;
use core_input::DEFAULT_ESC_TIMEOUT;
use core_render::parse_color;
use crossterm::style::Color;

/// Per-editor settings. `Editor` setters keep these consistent; the fields
/// are public for embedders that build the whole set up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOptions {
    pub prompt_marker: String,
    /// Marker for rows after the first; spaces as wide as the marker when `None`.
    pub continuation_marker: Option<String>,
    pub prompt_color: Option<Color>,
    pub multiline: bool,
    /// A row ending in this char continues on Enter instead of submitting.
    pub continuation_char: char,
    pub color: bool,
    pub beep: bool,
    pub bracketed_paste: bool,
    pub esc_timeout: Duration,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            prompt_marker: core_config::DEFAULT_MARKER.to_string(),
            continuation_marker: None,
            prompt_color: Some(Color::DarkGreen),
            multiline: true,
            continuation_char: core_config::DEFAULT_CONTINUATION_CHAR,
            color: true,
            beep: true,
            bracketed_paste: true,
            esc_timeout: DEFAULT_ESC_TIMEOUT,
        }
    }
}

impl EditorOptions {
    pub fn from_config(cfg: &Config) -> Self {
        let file = &cfg.file;
        Self {
            prompt_marker: cfg.prompt_marker().to_string(),
            continuation_marker: cfg.continuation_marker().map(str::to_string),
            prompt_color: parse_color(&file.prompt.color),
            multiline: file.edit.multiline,
            continuation_char: cfg.continuation_char(),
            color: file.edit.color,
            beep: file.edit.beep,
            bracketed_paste: file.input.bracketed_paste,
            esc_timeout: cfg.esc_timeout(),
        }
    }
}
