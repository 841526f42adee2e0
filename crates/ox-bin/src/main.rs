//! oxline-demo: an interactive shell-like loop over the oxline editor.
use anyhow::Result;
use clap::Parser;
use core_config::{Config, discover, load_from};
use oxline::{Candidate, Editor, Readline, TerminalBackend, complete_words};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

const COMMANDS: &[&str] = &[
    "help", "history", "history-clear", "history-drop", "multiline", "color", "beep", "quit",
];

const HELP: &[(&str, &str)] = &[
    ("help", "list commands"),
    ("history", "print history entries"),
    ("history-clear", "forget all entries"),
    ("history-drop", "forget the newest entry"),
    ("multiline", "toggle multi-line editing"),
    ("color", "toggle prompt color"),
    ("beep", "toggle the bell"),
    ("quit", "leave"),
];

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "oxline-demo", version, about = "oxline line editor demo")]
struct Args {
    /// Configuration file (overrides discovery of `oxline.toml`).
    #[arg(long = "config")]
    config: Option<PathBuf>,
    /// History file (overrides the configured path).
    #[arg(long = "history")]
    history: Option<PathBuf>,
    /// Log file; filtered by `RUST_LOG`.
    #[arg(long = "log-file", default_value = "oxline-demo.log")]
    log_file: PathBuf,
    /// Prompt text shown before the marker.
    #[arg(long = "prompt", default_value = "demo")]
    prompt: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging(&args.log_file)?;
    install_panic_hook();
    info!(target: "runtime", "startup");

    let config = load_from(Some(args.config.clone().unwrap_or_else(discover)))?;
    run(&args, &config)?;
    info!(target: "runtime", "shutdown");
    Ok(())
}

#[cfg(unix)]
fn run(args: &Args, config: &Config) -> Result<()> {
    let mut editor = Editor::from_config(oxline::TtyBackend::stdio(), config);
    if let Some(path) = args.history.clone() {
        editor.set_history(Some(path), config.history_max_entries());
    }
    editor.set_completer(demo_completions);
    loop {
        match editor.readline(&args.prompt) {
            Readline::Line(line) => {
                if execute(&mut editor, &line)? {
                    return Ok(());
                }
            }
            Readline::Interrupted => {
                writeln!(editor.backend_mut(), "^C")?;
            }
            Readline::Eof => return Ok(()),
        }
    }
}

#[cfg(not(unix))]
fn run(_args: &Args, _config: &Config) -> Result<()> {
    anyhow::bail!("oxline-demo needs a unix terminal")
}

/// Run one submitted line. Returns true when the demo should exit.
fn execute<B: TerminalBackend>(editor: &mut Editor<B>, line: &str) -> Result<bool> {
    let mut out = Vec::new();
    match line.trim() {
        "quit" => return Ok(true),
        "help" => {
            for (name, what) in HELP {
                writeln!(out, "{name:<14}{what}")?;
            }
        }
        "history" => {
            for (i, entry) in editor.history().iter().enumerate() {
                writeln!(out, "{i:>4}  {}", entry.replace('\n', "\n      "))?;
            }
        }
        "history-clear" => editor.history_clear(),
        "history-drop" => {
            // the command line itself is the newest entry
            editor.history_remove_last();
            editor.history_remove_last();
        }
        "multiline" => {
            let on = !editor.options().multiline;
            editor.enable_multiline(on);
            writeln!(out, "multiline: {on}")?;
        }
        "color" => {
            let on = !editor.options().color;
            editor.enable_color(on);
            writeln!(out, "color: {on}")?;
        }
        "beep" => {
            let on = !editor.options().beep;
            editor.enable_beep(on);
            writeln!(out, "beep: {on}")?;
        }
        _ => writeln!(out, "echo: {line}")?,
    }
    let backend = editor.backend_mut();
    backend.write_all(&out)?;
    backend.flush()?;
    Ok(false)
}

/// Command names for the first word, help text attached.
fn demo_completions(text: &str, cursor: usize) -> Vec<Candidate> {
    complete_words(text, cursor, COMMANDS.iter().copied())
        .into_iter()
        .map(|c| match HELP.iter().find(|(name, _)| *name == c.replacement) {
            Some((_, what)) => c.with_help(*what),
            None => c,
        })
        .collect()
}

fn configure_logging(log_path: &Path) -> Result<Option<WorkerGuard>> {
    let dir = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let Some(file_name) = log_path.file_name() else {
        anyhow::bail!("log path has no file name: {}", log_path.display());
    };
    if log_path.exists() {
        let _ = std::fs::remove_file(log_path);
    }

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .with_ansi(false)
        .try_init()
    {
        Ok(()) => Ok(Some(guard)),
        // Global subscriber already installed; dropping the guard shuts the writer down.
        Err(_) => Ok(None),
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxline::MemoryTerminal;

    #[test]
    fn args_defaults() {
        let args = Args::try_parse_from(["oxline-demo"]).unwrap();
        assert_eq!(args.prompt, "demo");
        assert_eq!(args.log_file, PathBuf::from("oxline-demo.log"));
        assert!(args.config.is_none());
        assert!(args.history.is_none());
    }

    #[test]
    fn args_overrides() {
        let args = Args::try_parse_from([
            "oxline-demo",
            "--config",
            "c.toml",
            "--history",
            "h.txt",
            "--prompt",
            "calc",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("c.toml")));
        assert_eq!(args.history, Some(PathBuf::from("h.txt")));
        assert_eq!(args.prompt, "calc");
    }

    #[test]
    fn completions_carry_help() {
        let cands = demo_completions("his", 3);
        let names: Vec<&str> = cands.iter().map(|c| c.replacement.as_str()).collect();
        assert_eq!(names, vec!["history", "history-clear", "history-drop"]);
        assert_eq!(cands[0].help.as_deref(), Some("print history entries"));
        assert!(demo_completions("zzz", 3).is_empty());
    }

    #[test]
    fn commands_toggle_and_quit() {
        let mut editor = Editor::new(MemoryTerminal::new(80, 24));
        assert!(!execute(&mut editor, "multiline").unwrap());
        assert!(!editor.options().multiline);
        assert!(!execute(&mut editor, "beep").unwrap());
        assert!(!editor.options().beep);
        assert!(execute(&mut editor, " quit ").unwrap());
        assert!(editor.backend().output_lossy().contains("multiline: false"));
    }

    #[test]
    fn history_commands() {
        let mut editor = Editor::new(MemoryTerminal::new(80, 24));
        editor.history_mut().add("one");
        editor.history_mut().add("two");
        editor.history_mut().add("history-drop");
        execute(&mut editor, "history-drop").unwrap();
        let entries: Vec<&str> = editor.history().iter().collect();
        assert_eq!(entries, vec!["one"]);
        execute(&mut editor, "history-clear").unwrap();
        assert!(editor.history().is_empty());
    }
}
