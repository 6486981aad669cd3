use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use rand::{thread_rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use chainhunt_core::{roster, AppConfig, Game, SaveStore};

const HELP: &str = "\
Available commands:
- eliminate <team_name>: Eliminate a team
- save: Save the current game state
- status: Show current game status
- help: Show this list
- quit: Exit the game";

/// How the session obtains its game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartMode {
    New,
    Load,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Eliminate(String),
    Save,
    Status,
    Help,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        match (word.to_lowercase().as_str(), rest.is_empty()) {
            ("eliminate", false) => Some(Self::Eliminate(rest.to_string())),
            ("save", true) => Some(Self::Save),
            ("status", true) => Some(Self::Status),
            ("help", true) => Some(Self::Help),
            ("quit", true) => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Ask whether to start a new game or load the saved one.
pub fn prompt_start_mode(input: &mut impl BufRead, output: &mut impl Write) -> Result<StartMode> {
    loop {
        let Some(answer) = prompt(input, output, "Would you like to (n)ew game or (l)oad game? ")?
        else {
            bail!("no game selected");
        };
        match answer.to_lowercase().as_str() {
            "n" => return Ok(StartMode::New),
            "l" => return Ok(StartMode::Load),
            _ => writeln!(output, "Please enter 'n' for new game or 'l' for load game.")?,
        }
    }
}

/// Interactive session driving a single game.
pub struct App {
    game: Game,
    store: SaveStore,
}

impl App {
    pub fn new(game: Game, store: SaveStore) -> Self {
        Self { game, store }
    }

    /// Build the session described by `config`.
    pub fn start(config: &AppConfig, mode: StartMode) -> Result<Self> {
        let store = SaveStore::new(&config.save_path);
        let game = match mode {
            StartMode::New => new_game(config)?,
            StartMode::Load => store
                .load()
                .with_context(|| format!("failed to load {}", store.path().display()))?,
        };
        info!(?mode, teams = game.teams().len(), "game ready");
        Ok(Self::new(game, store))
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Read commands until the game ends or the player quits.
    pub fn run(&mut self, input: &mut impl BufRead, output: &mut impl Write) -> Result<()> {
        self.print_status(output)?;
        writeln!(output, "\n{HELP}")?;

        while !self.game.is_game_over() {
            let Some(line) = prompt(input, output, "\nEnter command: ")? else {
                break;
            };
            match Command::parse(&line) {
                Some(Command::Eliminate(name)) => self.eliminate(&name, output)?,
                Some(Command::Save) => self.save(output)?,
                Some(Command::Status) => self.print_status(output)?,
                Some(Command::Help) => writeln!(output, "{HELP}")?,
                Some(Command::Quit) => {
                    let answer = prompt(
                        input,
                        output,
                        "Would you like to save before quitting? (y/n): ",
                    )?;
                    if answer.is_some_and(|answer| answer.eq_ignore_ascii_case("y")) {
                        self.save(output)?;
                    }
                    break;
                }
                None => writeln!(output, "Invalid command!")?,
            }
        }

        if self.game.is_game_over() {
            match self.game.winner() {
                Some(winner) => writeln!(output, "\nGame Over! Winner: {}", winner.name())?,
                None => writeln!(output, "\nGame Over! No teams remain.")?,
            }
        }
        Ok(())
    }

    fn eliminate(&mut self, name: &str, output: &mut impl Write) -> Result<()> {
        match self.game.eliminate_team(name) {
            Ok(outcome) => {
                info!(
                    eliminated = %outcome.eliminated,
                    hunter = %outcome.hunter,
                    "elimination recorded"
                );
                writeln!(output, "\n{} has been eliminated!", outcome.eliminated)?;
                if let Some(target) = &outcome.new_target {
                    writeln!(output, "{} now hunts {}.", outcome.hunter, target)?;
                }
                self.print_status(output)?;
            }
            Err(err) => {
                warn!(team = name, %err, "elimination rejected");
                writeln!(output, "Error: {err}")?;
            }
        }
        Ok(())
    }

    fn save(&self, output: &mut impl Write) -> Result<()> {
        match self.store.save(&self.game) {
            Ok(()) => writeln!(output, "Game saved to {}", self.store.path().display())?,
            Err(err) => {
                warn!(%err, "save failed");
                writeln!(output, "Error: failed to save game: {err}")?;
            }
        }
        Ok(())
    }

    fn print_status(&self, output: &mut impl Write) -> Result<()> {
        writeln!(output, "\nCurrent game state:")?;
        for team in self.game.active_teams() {
            writeln!(output, "{team}")?;
        }
        Ok(())
    }
}

fn new_game(config: &AppConfig) -> Result<Game> {
    let players = roster::load_roster(&config.roster_path)
        .with_context(|| format!("failed to read roster {}", config.roster_path.display()))?;
    let mut rng = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_rng(thread_rng()).context("failed to seed random generator")?,
    };
    let mut game = Game::from_roster(players, config.team_size, &mut rng)?;
    game.assign_targets(&mut rng)?;
    Ok(game)
}

fn prompt(
    input: &mut impl BufRead,
    output: &mut impl Write,
    message: &str,
) -> Result<Option<String>> {
    write!(output, "{message}")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainhunt_core::save::DEFAULT_SAVE_FILE;
    use std::{fs, io::Cursor, path::Path};
    use tempfile::tempdir;

    fn config_in(dir: &Path, players: usize) -> Result<AppConfig> {
        let roster_path = dir.join("Players.txt");
        let names: Vec<_> = (1..=players).map(|n| format!("Player {n}")).collect();
        fs::write(&roster_path, names.join("\n"))?;
        Ok(AppConfig {
            roster_path,
            save_path: dir.join(DEFAULT_SAVE_FILE),
            team_size: 2,
            seed: Some(7),
        })
    }

    fn run_script(app: &mut App, script: &str) -> Result<String> {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut output = Vec::new();
        app.run(&mut input, &mut output)?;
        Ok(String::from_utf8(output)?)
    }

    #[test]
    fn parses_commands() {
        assert_eq!(
            Command::parse("eliminate Team 3"),
            Some(Command::Eliminate("Team 3".to_string()))
        );
        assert_eq!(
            Command::parse("  ELIMINATE   Team 12 "),
            Some(Command::Eliminate("Team 12".to_string()))
        );
        assert_eq!(Command::parse("Status"), Some(Command::Status));
        assert_eq!(Command::parse("save"), Some(Command::Save));
        assert_eq!(Command::parse("quit"), Some(Command::Quit));
        assert_eq!(Command::parse("eliminate"), None);
        assert_eq!(Command::parse("save now"), None);
        assert_eq!(Command::parse("dance"), None);
    }

    #[test]
    fn start_mode_prompt_retries() -> Result<()> {
        let mut input = Cursor::new(b"x\nL\n".to_vec());
        let mut output = Vec::new();
        let mode = prompt_start_mode(&mut input, &mut output)?;
        assert_eq!(mode, StartMode::Load);
        assert!(String::from_utf8(output)?.contains("Please enter 'n'"));
        Ok(())
    }

    #[test]
    fn plays_a_game_to_the_end() -> Result<()> {
        let dir = tempdir()?;
        let config = config_in(dir.path(), 4)?;
        let mut app = App::start(&config, StartMode::New)?;

        let output = run_script(&mut app, "eliminate Team 9\neliminate Team 1\n")?;
        assert!(output.contains("Error: Team 9 does not exist"));
        assert!(output.contains("Team 1 has been eliminated!"));
        assert!(output.contains("Game Over! Winner: Team 2"));
        assert_eq!(app.game().winner().map(|team| team.name()), Some("Team 2"));
        Ok(())
    }

    #[test]
    fn quit_with_save_can_be_resumed() -> Result<()> {
        let dir = tempdir()?;
        let config = config_in(dir.path(), 8)?;
        let mut app = App::start(&config, StartMode::New)?;

        let output = run_script(&mut app, "bogus\neliminate Team 3\nquit\ny\n")?;
        assert!(output.contains("Invalid command!"));
        assert!(output.contains("Game saved to"));
        assert!(!output.contains("Game Over!"));

        let resumed = App::start(&config, StartMode::Load)?;
        assert!(!resumed.game().team("Team 3")?.is_alive());
        assert_eq!(resumed.game().active_teams().len(), 3);
        Ok(())
    }

    #[test]
    fn quit_without_save_leaves_no_file() -> Result<()> {
        let dir = tempdir()?;
        let config = config_in(dir.path(), 6)?;
        let mut app = App::start(&config, StartMode::New)?;

        run_script(&mut app, "status\nquit\nn\n")?;
        assert!(!config.save_path.exists());
        Ok(())
    }

    #[test]
    fn loading_without_save_fails() -> Result<()> {
        let dir = tempdir()?;
        let config = config_in(dir.path(), 6)?;
        assert!(App::start(&config, StartMode::Load).is_err());
        Ok(())
    }
}
