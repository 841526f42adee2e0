//! Terminal capability probing.
//!
//! No capability database is consulted. Detection runs once per backend and
//! looks at two things: whether the input is a terminal at all, and what the
//! environment says about color.
//!
//! * `interactive` requires the input to be a tty and `TERM` not to be `dumb`.
//!   A non-interactive input makes the editor fall back to a plain line reader.
//! * `color` is disabled by a non-empty `NO_COLOR`, by `TERM=dumb`, and for
//!   non-interactive input.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalCapabilities {
    pub interactive: bool,
    pub color: bool,
}

impl Default for TerminalCapabilities {
    fn default() -> Self {
        Self {
            interactive: true,
            color: true,
        }
    }
}

impl TerminalCapabilities {
    /// Probe an input descriptor plus the process environment.
    #[cfg(unix)]
    pub fn detect<Fd: rustix::fd::AsFd>(input: Fd) -> Self {
        let is_tty = rustix::termios::isatty(input);
        let term = std::env::var("TERM").ok();
        let no_color = std::env::var("NO_COLOR").ok();
        let caps = Self::from_env(is_tty, term.as_deref(), no_color.as_deref());
        tracing::debug!(
            target: "terminal.caps",
            interactive = caps.interactive,
            color = caps.color,
            "capabilities_detected"
        );
        caps
    }

    /// Pure decision used by `detect`.
    pub fn from_env(is_tty: bool, term: Option<&str>, no_color: Option<&str>) -> Self {
        let dumb = term.is_some_and(|t| t.eq_ignore_ascii_case("dumb"));
        let interactive = is_tty && !dumb;
        let color = interactive && no_color.is_none_or(str::is_empty);
        Self { interactive, color }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tty_with_normal_term() {
        let caps = TerminalCapabilities::from_env(true, Some("xterm-256color"), None);
        assert!(caps.interactive);
        assert!(caps.color);
    }

    #[test]
    fn dumb_terminal_is_not_interactive() {
        let caps = TerminalCapabilities::from_env(true, Some("dumb"), None);
        assert!(!caps.interactive);
        assert!(!caps.color);
    }

    #[test]
    fn no_color_disables_color_only() {
        let caps = TerminalCapabilities::from_env(true, Some("xterm"), Some("1"));
        assert!(caps.interactive);
        assert!(!caps.color);
        let caps = TerminalCapabilities::from_env(true, Some("xterm"), Some(""));
        assert!(caps.color);
    }

    #[test]
    fn pipe_is_not_interactive() {
        let caps = TerminalCapabilities::from_env(false, Some("xterm"), None);
        assert!(!caps.interactive);
        assert!(!caps.color);
    }

    #[test]
    fn missing_term_is_still_interactive() {
        assert!(TerminalCapabilities::from_env(true, None, None).interactive);
    }
}
