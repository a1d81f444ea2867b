//! `census` — terminal UI for the citizen records API.
//!
//! # Usage
//!
//! ```
//! census --url http://127.0.0.1:8000
//! census --config ~/.config/census/config.toml --log-file census.log
//! ```

mod alert;
mod app;
mod client;
#[cfg(test)]
mod testing;
mod ui;

use std::{
  fs::File,
  io,
  path::{Path, PathBuf},
  sync::Mutex,
  time::Duration,
};

use anyhow::{Context, Result};
use app::App;
use census_core::form::PrefillPolicy;
use clap::Parser;
use client::{ApiClient, ApiConfig};
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "census", version, about = "Terminal UI for the citizen records API")]
struct Args {
  /// Path to a TOML config file (url, timeout_secs, prefill, log_file).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the records API (default: http://127.0.0.1:8000).
  #[arg(long)]
  url: Option<String>,

  /// Request timeout in seconds (default: 30).
  #[arg(long, value_name = "SECS")]
  timeout: Option<u64>,

  /// Which fields an edit form copies from the loaded record.
  #[arg(long, value_name = "all|identity")]
  prefill: Option<PrefillPolicy>,

  /// Write logs to this file. The terminal is owned by the UI, so there is no
  /// logging without it.
  #[arg(long, value_name = "FILE")]
  log_file: Option<PathBuf>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Settings from the config file and `CENSUS_*` environment variables.
#[derive(Deserialize, Default, Debug)]
struct FileConfig {
  url:          Option<String>,
  timeout_secs: Option<u64>,
  prefill:      Option<PrefillPolicy>,
  log_file:     Option<PathBuf>,
}

fn environment() -> config::Environment {
  config::Environment::with_prefix("CENSUS").try_parsing(true)
}

fn load_file_config(path: Option<&Path>, env: config::Environment) -> Result<FileConfig> {
  let mut builder = config::Config::builder();
  if let Some(path) = path {
    builder = builder.add_source(config::File::from(path).required(true));
  }
  builder
    .add_source(env)
    .build()
    .context("failed to read configuration")?
    .try_deserialize()
    .context("failed to deserialise configuration")
}

/// Resolved settings: flags win over the environment, which wins over the
/// file, which wins over the defaults.
#[derive(Debug)]
struct Settings {
  api:      ApiConfig,
  prefill:  PrefillPolicy,
  log_file: Option<PathBuf>,
}

fn resolve(args: Args, file: FileConfig) -> Settings {
  let timeout = args
    .timeout
    .or(file.timeout_secs)
    .unwrap_or(DEFAULT_TIMEOUT_SECS);
  Settings {
    api:      ApiConfig {
      base_url: args
        .url
        .or(file.url)
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| DEFAULT_URL.to_string()),
      timeout:  Duration::from_secs(timeout),
    },
    prefill:  args.prefill.or(file.prefill).unwrap_or_default(),
    log_file: args.log_file.or(file.log_file),
  }
}

fn init_tracing(path: &Path) -> Result<()> {
  let file = File::create(path)
    .with_context(|| format!("creating log file {}", path.display()))?;
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_ansi(false)
    .with_writer(Mutex::new(file))
    .init();
  Ok(())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let file_cfg = load_file_config(args.config.as_deref(), environment())?;
  let settings = resolve(args, file_cfg);

  if let Some(path) = &settings.log_file {
    init_tracing(path)?;
  }
  tracing::info!(url = %settings.api.base_url, prefill = %settings.prefill, "starting");

  let client = ApiClient::new(settings.api)?;
  let mut app = App::new(client, settings.prefill);

  // Load initial data before taking over the terminal.
  app
    .load_citizens()
    .await
    .context("loading the citizen listing")?;

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // The frame above shows the progress of any scheduled request; run it
    // now and drop whatever was typed in the meantime.
    if app.is_busy() {
      app.run_pending().await;
      tokio::task::block_in_place(discard_input).context("reading terminal input")?;
      continue;
    }

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    match maybe_event {
      Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
        if !app.handle_key(key)? {
          break;
        }
      }
      // Resize and the rest redraw on the next iteration.
      _ => {}
    }
  }

  Ok(())
}

/// Drain key presses buffered while a request ran.
fn discard_input() -> io::Result<()> {
  while event::poll(Duration::ZERO)? {
    event::read()?;
  }
  Ok(())
}
