use std::io::stdout;
use std::path::Path;
use std::path::PathBuf;

use clap::Parser;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::EnableBracketedPaste;
use crossterm::execute;
use toneshift_core::config::Config;
use toneshift_core::config::ConfigOverrides;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

mod app;
mod app_event;
mod app_state;
mod clipboard;
mod editor;
mod render;

use app::App;

/// Rewrite text in a chosen tone of voice.
#[derive(Debug, Parser)]
#[command(name = "toneshift", version)]
pub struct Cli {
    /// Directory for custom tones and logs (defaults to `~/.toneshift`).
    #[arg(long, value_name = "DIR")]
    pub toneshift_home: Option<PathBuf>,

    /// Model identifier sent to the generation service.
    #[arg(long)]
    pub model: Option<String>,

    /// Base URL of the generation service.
    #[arg(long)]
    pub base_url: Option<String>,
}

pub async fn run_main(cli: Cli) -> anyhow::Result<()> {
    // Missing credentials abort here, before the terminal is touched.
    let config = Config::load(ConfigOverrides {
        toneshift_home: cli.toneshift_home,
        model: cli.model,
        base_url: cli.base_url,
    })?;
    let _logging_guard = init_logging(&config.toneshift_home)?;

    let mut terminal = ratatui::init();
    let _ = execute!(stdout(), EnableBracketedPaste);
    let result = App::new(&config).run(&mut terminal).await;
    let _ = execute!(stdout(), DisableBracketedPaste);
    ratatui::restore();
    result
}

/// Logs go to a file, never stdout: the alternate screen owns stdout while
/// the TUI is running.
fn init_logging(toneshift_home: &Path) -> anyhow::Result<WorkerGuard> {
    let log_dir = toneshift_home.join("log");
    std::fs::create_dir_all(&log_dir)?;
    let appender = tracing_appender::rolling::never(log_dir, "toneshift-tui.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("toneshift=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}
