//! Team entities and their persisted record form.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A group of players hunting a single target team.
///
/// The target is stored by name and resolved through the owning
/// [`TeamRegistry`](crate::registry::TeamRegistry), so teams never hold
/// references to each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    name: String,
    players: Vec<String>,
    target: Option<String>,
    alive: bool,
}

impl Team {
    /// Create a living team with no target.
    pub fn new(name: impl Into<String>, players: Vec<String>) -> Self {
        Self {
            name: name.into(),
            players,
            target: None,
            alive: true,
        }
    }

    /// Unique team name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Players on the team, in roster order.
    pub fn players(&self) -> &[String] {
        &self.players
    }

    /// Name of the team currently being hunted, if any.
    ///
    /// Eliminated teams keep the target they held when they were knocked out.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Whether the team is still part of the hunt.
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub(crate) fn assign_target(&mut self, target: Option<String>) {
        self.target = target;
    }

    pub(crate) fn eliminate(&mut self) {
        self.alive = false;
    }

    /// Snapshot the team into its persisted form.
    pub fn to_record(&self) -> TeamRecord {
        TeamRecord {
            name: self.name.clone(),
            players: self.players.clone(),
            target_name: self.target.clone(),
            is_alive: self.alive,
        }
    }

    /// Rebuild a team from a record, leaving the target unresolved.
    ///
    /// Targets can only be restored once every team of the game exists, so the
    /// owning collection links them in a second pass.
    pub fn from_record(record: TeamRecord) -> Self {
        Self {
            name: record.name,
            players: record.players,
            target: None,
            alive: record.is_alive,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - Players: {} - Target: {}",
            self.name,
            self.players.join(", "),
            self.target.as_deref().unwrap_or("None")
        )
    }
}

/// Serialized representation of a team inside a save document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    /// Team name, identical to the key the record is stored under.
    pub name: String,
    /// Players in roster order.
    pub players: Vec<String>,
    /// Name of the hunted team, or `None` when no target is held.
    pub target_name: Option<String>,
    /// Whether the team was still in the game when saved.
    pub is_alive: bool,
}
