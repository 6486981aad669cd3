//! Insertion-ordered storage for the teams of a game.

use std::collections::HashMap;

use crate::{
    error::{GameError, Result},
    team::Team,
};

/// Arena of teams keyed by name.
///
/// Iteration follows insertion order, which is also the order teams are
/// written to and restored from save documents.
#[derive(Debug, Clone, Default)]
pub struct TeamRegistry {
    teams: Vec<Team>,
    index: HashMap<String, usize>,
}

impl TeamRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new living team without a target.
    pub fn create(&mut self, name: impl Into<String>, players: Vec<String>) -> Result<&mut Team> {
        self.insert(Team::new(name, players))
    }

    /// Register an already constructed team.
    pub fn insert(&mut self, team: Team) -> Result<&mut Team> {
        if self.index.contains_key(team.name()) {
            return Err(GameError::DuplicateTeam(team.name().to_string()));
        }
        let position = self.teams.len();
        self.index.insert(team.name().to_string(), position);
        self.teams.push(team);
        Ok(&mut self.teams[position])
    }

    /// Find a team by name.
    pub fn get(&self, name: &str) -> Option<&Team> {
        self.position(name).map(|position| &self.teams[position])
    }

    /// Find a team by name, failing with [`GameError::TeamNotFound`].
    pub fn lookup(&self, name: &str) -> Result<&Team> {
        self.get(name)
            .ok_or_else(|| GameError::TeamNotFound(name.to_string()))
    }

    pub(crate) fn lookup_mut(&mut self, name: &str) -> Result<&mut Team> {
        match self.position(name) {
            Some(position) => Ok(&mut self.teams[position]),
            None => Err(GameError::TeamNotFound(name.to_string())),
        }
    }

    /// Whether a team with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Insertion position of the named team.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Number of registered teams, alive or not.
    pub fn len(&self) -> usize {
        self.teams.len()
    }

    /// Whether no team has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Iterate over all teams in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Team> {
        self.teams.iter()
    }

    pub(crate) fn at(&self, position: usize) -> &Team {
        &self.teams[position]
    }

    pub(crate) fn at_mut(&mut self, position: usize) -> &mut Team {
        &mut self.teams[position]
    }
}

impl<'a> IntoIterator for &'a TeamRegistry {
    type Item = &'a Team;
    type IntoIter = std::slice::Iter<'a, Team>;

    fn into_iter(self) -> Self::IntoIter {
        self.teams.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn create_registers_living_team() -> Result<()> {
        let mut registry = TeamRegistry::new();
        registry.create("Team 1", players(&["A", "B"]))?;

        let team = registry.lookup("Team 1")?;
        assert!(team.is_alive());
        assert_eq!(team.target(), None);
        assert_eq!(registry.len(), 1);
        Ok(())
    }

    #[test]
    fn duplicate_names_are_rejected() -> Result<()> {
        let mut registry = TeamRegistry::new();
        registry.create("Team 1", players(&["A"]))?;

        let err = registry.create("Team 1", players(&["B"])).unwrap_err();
        assert!(matches!(err, GameError::DuplicateTeam(name) if name == "Team 1"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("Team 1")?.players(), ["A"]);
        Ok(())
    }

    #[test]
    fn lookup_unknown_team_fails() {
        let registry = TeamRegistry::new();
        let err = registry.lookup("Team 9").unwrap_err();
        assert!(matches!(err, GameError::TeamNotFound(name) if name == "Team 9"));
    }

    #[test]
    fn iteration_follows_insertion_order() -> Result<()> {
        let mut registry = TeamRegistry::new();
        for name in ["Team 2", "Team 10", "Team 1"] {
            registry.create(name, players(&["x"]))?;
        }

        let names: Vec<_> = registry.iter().map(Team::name).collect();
        assert_eq!(names, ["Team 2", "Team 10", "Team 1"]);
        assert_eq!(registry.position("Team 10"), Some(1));
        Ok(())
    }
}
