mod app;

use std::{
    fs::{self, OpenOptions},
    io,
    path::PathBuf,
    sync::Mutex,
};

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{prelude::*, EnvFilter};

use app::{App, StartMode};
use chainhunt_core::config::{self, AppConfig};

/// Run a chain elimination game from the terminal.
#[derive(Parser, Debug)]
#[command(name = "chainhunt", version, about)]
struct Cli {
    /// Start a new game from the roster file
    #[arg(long, conflicts_with = "load")]
    new: bool,

    /// Resume the game stored in the save file
    #[arg(long)]
    load: bool,

    /// Roster file, one player per line
    #[arg(long)]
    roster: Option<PathBuf>,

    /// Save file location
    #[arg(long)]
    save: Option<PathBuf>,

    /// Players per team
    #[arg(long)]
    team_size: Option<usize>,

    /// Seed for reproducible team and target draws
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    fn start_mode(&self) -> Option<StartMode> {
        if self.new {
            Some(StartMode::New)
        } else if self.load {
            Some(StartMode::Load)
        } else {
            None
        }
    }

    fn apply(&self, config: &mut AppConfig) {
        if let Some(roster) = &self.roster {
            config.roster_path = roster.clone();
        }
        if let Some(save) = &self.save {
            config.save_path = save.clone();
        }
        if let Some(team_size) = self.team_size {
            config.team_size = team_size;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    config::ensure_default_config()?;
    let mut config = AppConfig::load()?;
    cli.apply(&mut config);
    tracing::info!(?config, "configuration loaded");

    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();

    let mode = match cli.start_mode() {
        Some(mode) => mode,
        None => app::prompt_start_mode(&mut input, &mut output)?,
    };
    let mut app = App::start(&config, mode)?;
    app.run(&mut input, &mut output)?;
    tracing::info!(phase = ?app.game().phase(), "session ended");
    Ok(())
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("chainhunt.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(file_layer)
        .init();

    Ok(())
}
