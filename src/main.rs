use anyhow::{Context, Result};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use schulte::{
    app::{App, Flow},
    config::{Config, ConfigStore, FileConfigStore, API_URL_ENV},
    app_dirs::AppDirs,
    diagnostics,
    history::ResultsLog,
    runtime::{CrosstermEventSource, GameEventSource, Runner},
    session::{GameMode, MAX_GRID_SIZE, MIN_GRID_SIZE},
    stats::{HttpStatsClient, StatsSync},
    ui,
};
use std::{
    io::{self, stdin, Stdout},
    sync::Arc,
    time::{Duration, Instant},
};

const POLL_INTERVAL_MS: u64 = 250;

/// schulte table attention trainer for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Find the numbers of a shuffled grid in order as fast as you can. The clock starts on the first number and your best, average and last times are kept by the stats server."
)]
pub struct Cli {
    /// grid size n for an n×n table (defaults to the last one played)
    #[clap(short = 's', long, value_parser = clap::value_parser!(u32).range((MIN_GRID_SIZE as i64)..=(MAX_GRID_SIZE as i64)))]
    size: Option<u32>,

    /// click order: standard (1 up to n²) or reverse (n² down to 1)
    #[clap(short = 'm', long, value_enum)]
    mode: Option<GameMode>,

    /// don't highlight cells that were already found
    #[clap(long)]
    no_feedback: bool,

    /// base url of the stats server
    #[clap(long, env = API_URL_ENV)]
    api_url: Option<String>,

    /// play without talking to the stats server
    #[clap(long)]
    offline: bool,
}

impl Cli {
    /// Command-line flags win over the saved config
    fn apply(&self, config: &mut Config) {
        if let Some(size) = self.size {
            config.grid_size = size;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if self.no_feedback {
            config.visual_feedback = false;
        }
    }

    fn api_url(&self, config: &Config) -> String {
        self.api_url
            .clone()
            .unwrap_or_else(|| config.api_base_url.clone())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let mut config = store.load();
    cli.apply(&mut config);
    if let Some(path) = AppDirs::log_path() {
        // the game is playable without a log file
        let _ = diagnostics::init_file_logging(&path);
    }

    let mut terminal = setup_terminal()?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(POLL_INTERVAL_MS),
    );
    let mut app = App::new(config.clone(), runner.sender()).with_config_store(Box::new(store));
    if let Some(log) = ResultsLog::new() {
        app = app.with_results_log(log);
    }
    if !cli.offline {
        match HttpStatsClient::new(&cli.api_url(&config)) {
            Ok(client) => {
                app = app.with_stats_sync(StatsSync::new(Arc::new(client), runner.sender()));
            }
            Err(e) => tracing::warn!("stats sync disabled: {e:#}"),
        }
    }
    app.load_stats();

    let res = start_tui(&mut terminal, &mut app, &runner);
    restore_terminal(&mut terminal)?;
    res
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn start_tui<B: Backend, E: GameEventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E>,
) -> Result<()> {
    terminal.draw(|f| ui::draw(app, f))?;

    loop {
        let Some(event) = runner.step() else {
            continue;
        };
        if app.handle_event(event, Instant::now()) == Flow::Quit {
            break;
        }
        terminal.draw(|f| ui::draw(app, f))?;
    }

    Ok(())
}
