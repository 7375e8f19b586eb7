//! textpad: a small terminal text editor
//!
//! Built with crossterm and ratatui on top of `textpad-core`.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p textpad -- [FILE] [--config PATH] [--log-file PATH] [--no-line-numbers] [--no-wrap]
//! ```
//!
//! Logs go to `<temp dir>/textpad.log` unless `--log-file` is given; the level is read from
//! `TEXTPAD_LOG` (for example `TEXTPAD_LOG=debug`), default `info`.
//!
//! # Shortcuts
//!
//! - Ctrl+F / Ctrl+G: find / find all
//! - Ctrl+N / Ctrl+P: find next / previous
//! - Ctrl+R: find and replace
//! - Ctrl+X / Ctrl+C / Ctrl+V: cut / copy / paste
//! - Ctrl+Z / Ctrl+Shift+Z: undo / redo
//! - Ctrl+L / Ctrl+W: line numbers / word wrap
//! - Ctrl+O / Ctrl+S / Ctrl+Shift+S / Ctrl+Shift+N: open / save / save as / new
//! - F2 / F6: split view / switch focus
//! - F1: all shortcuts
//! - Ctrl+Q or Esc: quit

mod app;
mod help;
mod view;

use app::App;
use clap::Parser;
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    fs::OpenOptions,
    io::{self, stdout},
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};
use textpad_core::EditorConfig;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "TEXTPAD_LOG";

#[derive(Parser, Debug)]
#[command(name = "textpad")]
#[command(about = "A small terminal text editor with find, find all and replace", long_about = None)]
#[command(version)]
struct Args {
    /// File to open
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Path to a JSON configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to log file (default: system temp dir)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Start with the line-number gutter hidden
    #[arg(long)]
    no_line_numbers: bool,

    /// Start with word wrap off
    #[arg(long)]
    no_wrap: bool,
}

impl Args {
    fn editor_config(&self) -> io::Result<EditorConfig> {
        let mut config = match &self.config {
            Some(path) => EditorConfig::load(path).map_err(io::Error::other)?,
            None => EditorConfig::default(),
        };
        if self.no_line_numbers {
            config.line_numbers = false;
        }
        if self.no_wrap {
            config.word_wrap = false;
        }
        Ok(config)
    }
}

fn init_logging(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(io::Error::other)
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    let log_file = args
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("textpad.log"));
    if let Err(err) = init_logging(&log_file) {
        eprintln!("warning: logging disabled ({}): {err}", log_file.display());
    }

    let config = args.editor_config()?;
    tracing::info!(?config, file = ?args.file, "starting");

    let mut app = App::new(&config);
    if let Some(path) = &args.file {
        app.open_file(path);
    }

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore the terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableBracketedPaste, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        tracing::error!(error = %err, "terminal loop failed");
    }
    tracing::info!("exiting");
    result
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        if app.should_quit() {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => app.handle_key_event(key),
                Event::Paste(text) => app.handle_paste(text),
                // Redrawn on the next iteration.
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    Ok(())
}
