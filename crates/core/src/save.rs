//! Save-game persistence.
//!
//! A save is a JSON document mapping team names to team records. Targets are
//! stored by name and relinked after every team has been restored.

use std::{
    fmt, fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::{
    error::{GameError, Result},
    game::{Game, Phase},
    registry::TeamRegistry,
    team::{Team, TeamRecord},
};

/// Default save file name, relative to the working directory.
pub const DEFAULT_SAVE_FILE: &str = "game_state.json";

/// Serialized representation of a whole game.
///
/// Teams keep their registry order when written and read back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveDocument {
    #[serde(serialize_with = "serialize_teams", deserialize_with = "deserialize_teams")]
    teams: Vec<(String, TeamRecord)>,
}

impl SaveDocument {
    /// Capture every team of `game`.
    pub fn from_game(game: &Game) -> Self {
        let teams = game
            .teams()
            .iter()
            .map(|team| (team.name().to_string(), team.to_record()))
            .collect();
        Self { teams }
    }

    /// Records in document order, keyed by team name.
    pub fn teams(&self) -> &[(String, TeamRecord)] {
        &self.teams
    }

    /// Rebuild the game: create every team first, then restore targets.
    pub fn into_game(self) -> Result<Game> {
        let mut registry = TeamRegistry::new();
        let mut links = Vec::new();

        for (key, mut record) in self.teams {
            if key != record.name {
                return Err(GameError::CorruptState(format!(
                    "entry {key} holds team {}",
                    record.name
                )));
            }
            if record.players.is_empty() {
                return Err(GameError::CorruptState(format!("{key} has no players")));
            }
            if let Some(target) = record.target_name.take() {
                links.push((key.clone(), target));
            }
            registry
                .insert(Team::from_record(record))
                .map_err(|_| GameError::CorruptState(format!("{key} appears more than once")))?;
        }

        for (name, target) in links {
            if !registry.contains(&target) {
                return Err(GameError::CorruptState(format!(
                    "{name} targets unknown team {target}"
                )));
            }
            registry.lookup_mut(&name)?.assign_target(Some(target));
        }

        let game = Game::from_registry(registry);
        if game.phase() == Phase::Active {
            game.verify_cycle()?;
        }
        Ok(game)
    }
}

/// Encode a game as a pretty-printed JSON document.
pub fn encode(game: &Game) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&SaveDocument::from_game(game))
}

/// Decode a JSON document into a game.
pub fn decode(content: &str) -> Result<Game> {
    let document: SaveDocument =
        serde_json::from_str(content).map_err(GameError::MalformedDocument)?;
    document.into_game()
}

/// Reads and writes a single save file.
#[derive(Debug, Clone)]
pub struct SaveStore {
    path: PathBuf,
}

impl SaveStore {
    /// Create a store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the save file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a save file is present.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Write `game` to disk.
    ///
    /// The document goes to a temporary file next to the destination, which
    /// is renamed over the old save only once fully written.
    pub fn save(&self, game: &Game) -> Result<()> {
        let serialised = encode(game).map_err(|err| self.io_error(err.into()))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|err| GameError::from_io(dir, err))?;

        let mut staged = NamedTempFile::new_in(dir).map_err(|err| GameError::from_io(dir, err))?;
        staged
            .write_all(serialised.as_bytes())
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|err| self.io_error(err))?;
        staged
            .persist(&self.path)
            .map_err(|err| self.io_error(err.error))?;

        debug!(path = %self.path.display(), teams = game.teams().len(), "game saved");
        Ok(())
    }

    /// Read the game back from disk.
    pub fn load(&self) -> Result<Game> {
        let content = fs::read_to_string(&self.path)
            .map_err(|err| GameError::from_io(&self.path, err))?;
        let game = decode(&content)?;
        debug!(path = %self.path.display(), teams = game.teams().len(), "game loaded");
        Ok(game)
    }

    fn io_error(&self, source: io::Error) -> GameError {
        GameError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

fn serialize_teams<S>(teams: &[(String, TeamRecord)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(teams.len()))?;
    for (name, record) in teams {
        map.serialize_entry(name, record)?;
    }
    map.end()
}

fn deserialize_teams<'de, D>(deserializer: D) -> Result<Vec<(String, TeamRecord)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct TeamsVisitor;

    impl<'de> Visitor<'de> for TeamsVisitor {
        type Value = Vec<(String, TeamRecord)>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a map of team names to team records")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut teams = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some(entry) = access.next_entry::<String, TeamRecord>()? {
                teams.push(entry);
            }
            Ok(teams)
        }
    }

    deserializer.deserialize_map(TeamsVisitor)
}
