//! Span styles.
//!
//! Design invariants:
//! * A style applies to whole codepoint runs; layout never splits a base
//!   codepoint from its attached marks across spans.
//! * With color disabled only `reverse` survives; foreground color and dim
//!   are dropped so the output contains no SGR color sequences.

use crossterm::style::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub fg: Option<Color>,
    pub dim: bool,
    pub reverse: bool,
}

impl Style {
    pub const PLAIN: Style = Style {
        fg: None,
        dim: false,
        reverse: false,
    };

    pub fn fg(color: Color) -> Self {
        Self {
            fg: Some(color),
            ..Self::PLAIN
        }
    }

    pub fn dim() -> Self {
        Self {
            dim: true,
            ..Self::PLAIN
        }
    }

    pub fn reverse() -> Self {
        Self {
            reverse: true,
            ..Self::PLAIN
        }
    }

    pub fn is_plain(&self) -> bool {
        *self == Self::PLAIN
    }

    /// Apply the color capability.
    pub fn for_color(self, color: bool) -> Self {
        if color {
            self
        } else {
            Self {
                fg: None,
                dim: false,
                reverse: self.reverse,
            }
        }
    }
}

/// Parse a color name as used in the configuration file. `"none"` and the
/// empty string mean no color; unknown names yield `None` as well.
pub fn parse_color(name: &str) -> Option<Color> {
    let name = name.trim().to_ascii_lowercase();
    Some(match name.as_str() {
        "black" => Color::Black,
        "red" => Color::DarkRed,
        "green" => Color::DarkGreen,
        "yellow" => Color::DarkYellow,
        "blue" => Color::DarkBlue,
        "magenta" => Color::DarkMagenta,
        "cyan" => Color::DarkCyan,
        "white" => Color::Grey,
        "gray" | "grey" => Color::DarkGrey,
        "bright-red" => Color::Red,
        "bright-green" => Color::Green,
        "bright-yellow" => Color::Yellow,
        "bright-blue" => Color::Blue,
        "bright-magenta" => Color::Magenta,
        "bright-cyan" => Color::Cyan,
        "bright-white" => Color::White,
        _ => {
            if let Some(idx) = name.strip_prefix("ansi-") {
                return idx.parse::<u8>().ok().map(Color::AnsiValue);
            }
            return None;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_disabled_keeps_reverse_only() {
        let s = Style {
            fg: Some(Color::Red),
            dim: true,
            reverse: true,
        };
        assert_eq!(s.for_color(false), Style::reverse());
        assert_eq!(s.for_color(true), s);
    }

    #[test]
    fn color_names() {
        assert_eq!(parse_color("green"), Some(Color::DarkGreen));
        assert_eq!(parse_color(" Bright-Blue "), Some(Color::Blue));
        assert_eq!(parse_color("ansi-208"), Some(Color::AnsiValue(208)));
        assert_eq!(parse_color("none"), None);
        assert_eq!(parse_color("chartreuse"), None);
    }
}
