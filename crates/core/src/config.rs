//! Application configuration.
//!
//! Values are layered from built-in defaults, an optional TOML file in the
//! user's config directory and `CHAINHUNT_*` environment variables.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use ::config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::{roster::DEFAULT_ROSTER_FILE, save::DEFAULT_SAVE_FILE};

/// Directory under `~/.config` holding the configuration file.
pub const CONFIG_DIR: &str = "chainhunt";
/// Configuration file name.
pub const CONFIG_FILE: &str = "config.toml";
/// Players per team when nothing else is configured.
pub const DEFAULT_TEAM_SIZE: usize = 2;

const DEFAULT_CONFIG: &str = r#"# chainhunt configuration
#
# Every key can also be set through a CHAINHUNT_<KEY> environment variable.

# Player list used when starting a new game, one name per line.
roster_path = "Players.txt"

# Where the game is saved and loaded from.
save_path = "game_state.json"

# Players per team. Leftover players join the first teams.
team_size = 2

# Fixed seed for team and target draws. Leave unset for a fresh draw each game.
# seed = 42
"#;

/// Settings used by the command-line front end.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Roster file read when starting a new game.
    pub roster_path: PathBuf,
    /// Save file used by `save` and by loading a game.
    pub save_path: PathBuf,
    /// Players per team.
    pub team_size: usize,
    /// Optional seed for reproducible draws.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            roster_path: PathBuf::from(DEFAULT_ROSTER_FILE),
            save_path: PathBuf::from(DEFAULT_SAVE_FILE),
            team_size: DEFAULT_TEAM_SIZE,
            seed: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load configuration using `path` as the optional file layer.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Config::builder()
            .set_default("roster_path", DEFAULT_ROSTER_FILE)?
            .set_default("save_path", DEFAULT_SAVE_FILE)?
            .set_default("team_size", DEFAULT_TEAM_SIZE as i64)?
            .add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::with_prefix("CHAINHUNT").try_parsing(true))
            .build()
            .with_context(|| format!("failed to read configuration from {}", path.display()))?;

        settings
            .try_deserialize()
            .context("failed to parse configuration")
    }
}

/// Default configuration file path.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}

/// Write the commented default configuration if no file exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = config_path();
    write_default_config(&path)?;
    Ok(path)
}

fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))
}
