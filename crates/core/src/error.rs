//! Error type shared by every core operation.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Convenience alias for results produced by the core crate.
pub type Result<T, E = GameError> = std::result::Result<T, E>;

/// Failures reported by the team registry, cycle manager and persistence layer.
#[derive(Debug, Error)]
pub enum GameError {
    /// The roster cannot fill two teams of the requested size.
    #[error("not enough players: need at least {required}, got {available}")]
    InsufficientPlayers {
        /// Minimum number of players required.
        required: usize,
        /// Number of players supplied.
        available: usize,
    },
    /// Teams must hold at least one player.
    #[error("team size must be at least 1")]
    InvalidTeamSize,
    /// Targets need a cycle of at least two active teams.
    #[error("need at least 2 active teams to assign targets, found {active}")]
    InsufficientTeams {
        /// Number of active teams at the time of the call.
        active: usize,
    },
    /// No team is registered under the given name.
    #[error("{0} does not exist")]
    TeamNotFound(String),
    /// A team with this name is already registered.
    #[error("team {0} already exists")]
    DuplicateTeam(String),
    /// The team has already been eliminated.
    #[error("{0} is already eliminated")]
    AlreadyEliminated(String),
    /// Eliminations need targets, which have not been handed out yet.
    #[error("targets have not been assigned yet")]
    TargetsNotAssigned,
    /// The game has finished and accepts no further eliminations.
    #[error("the game is already over")]
    GameOver,
    /// The save document could not be parsed.
    #[error("malformed save document: {0}")]
    MalformedDocument(#[source] serde_json::Error),
    /// The document parsed but describes an impossible game.
    #[error("corrupt game state: {0}")]
    CorruptState(String),
    /// A roster or save file does not exist.
    #[error("{} is unavailable", .path.display())]
    SourceUnavailable {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// Any other I/O failure while reading or writing a file.
    #[error("i/o error on {}", .path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

impl GameError {
    /// Map an I/O error for `path`, distinguishing missing files from other failures.
    pub(crate) fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Self::SourceUnavailable { path, source }
        } else {
            Self::Io { path, source }
        }
    }
}
