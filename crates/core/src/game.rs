//! Target cycle management.
//!
//! Every living team hunts exactly one other living team, and the hunt
//! relations form a single cycle. Eliminating a team hands its target to
//! whoever was hunting it, which closes the gap and keeps the cycle intact.

use std::collections::HashSet;

use rand::{seq::SliceRandom, Rng};
use tracing::debug;

use crate::{
    error::{GameError, Result},
    registry::TeamRegistry,
    team::Team,
};

/// Position of a game in its lifecycle, derived from the team states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Teams exist but no targets have been handed out.
    Setup,
    /// At least two teams are alive and hunting each other.
    Active,
    /// One team (or none) remains.
    Finished,
}

/// Outcome of a successful elimination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Elimination {
    /// Team that was knocked out.
    pub eliminated: String,
    /// Team that had been hunting the eliminated team.
    pub hunter: String,
    /// Hunter's new target; `None` once the hunter is the last team standing.
    pub new_target: Option<String>,
}

/// A single elimination game and its teams.
#[derive(Debug, Clone, Default)]
pub struct Game {
    teams: TeamRegistry,
}

impl Game {
    /// Create a game with no teams.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing registry, e.g. one restored from a save document.
    pub fn from_registry(teams: TeamRegistry) -> Self {
        Self { teams }
    }

    /// Create a game whose teams are drawn from `players`.
    pub fn from_roster<R>(players: Vec<String>, team_size: usize, rng: &mut R) -> Result<Self>
    where
        R: Rng + ?Sized,
    {
        let mut game = Self::new();
        game.build_teams_from_roster(players, team_size, rng)?;
        Ok(game)
    }

    /// All teams, alive or eliminated, in creation order.
    pub fn teams(&self) -> &TeamRegistry {
        &self.teams
    }

    /// Look up a team by name.
    pub fn team(&self, name: &str) -> Result<&Team> {
        self.teams.lookup(name)
    }

    /// Shuffle `players` and split them into teams named `Team 1`, `Team 2`, ...
    ///
    /// Players left over after filling whole teams are dealt round-robin
    /// starting from `Team 1`, so no team ends up smaller than `team_size`.
    pub fn build_teams_from_roster<R>(
        &mut self,
        mut players: Vec<String>,
        team_size: usize,
        rng: &mut R,
    ) -> Result<()>
    where
        R: Rng + ?Sized,
    {
        if team_size == 0 {
            return Err(GameError::InvalidTeamSize);
        }
        let required = team_size.saturating_mul(2);
        if players.len() < required {
            return Err(GameError::InsufficientPlayers {
                required,
                available: players.len(),
            });
        }

        players.shuffle(rng);
        let team_count = players.len() / team_size;
        let names: Vec<String> = (1..=team_count).map(|n| format!("Team {n}")).collect();
        if let Some(taken) = names.iter().find(|name| self.teams.contains(name)) {
            return Err(GameError::DuplicateTeam(taken.clone()));
        }

        let mut remaining = players.into_iter();
        let mut groups: Vec<Vec<String>> = (0..team_count)
            .map(|_| remaining.by_ref().take(team_size).collect())
            .collect();
        for (i, player) in remaining.enumerate() {
            groups[i % team_count].push(player);
        }

        for (name, group) in names.into_iter().zip(groups) {
            self.teams.create(name, group)?;
        }
        debug!(teams = team_count, team_size, "built teams from roster");
        Ok(())
    }

    /// Link the active teams into one randomly ordered cycle.
    pub fn assign_targets<R>(&mut self, rng: &mut R) -> Result<()>
    where
        R: Rng + ?Sized,
    {
        let mut order: Vec<usize> = self
            .teams
            .iter()
            .enumerate()
            .filter(|(_, team)| team.is_alive())
            .map(|(position, _)| position)
            .collect();
        if order.len() < 2 {
            return Err(GameError::InsufficientTeams {
                active: order.len(),
            });
        }

        order.shuffle(rng);
        for (i, &position) in order.iter().enumerate() {
            let next = order[(i + 1) % order.len()];
            let target = self.teams.at(next).name().to_string();
            self.teams.at_mut(position).assign_target(Some(target));
        }
        debug!(active = order.len(), "assigned targets");
        Ok(())
    }

    /// Knock `name` out of the game and hand its target to its hunter.
    ///
    /// Nothing is modified unless the elimination succeeds. When only one team
    /// remains afterwards, that team's target is cleared.
    pub fn eliminate_team(&mut self, name: &str) -> Result<Elimination> {
        let victim = self.teams.lookup(name)?;
        if !victim.is_alive() {
            return Err(GameError::AlreadyEliminated(name.to_string()));
        }
        if self.is_game_over() {
            return Err(GameError::GameOver);
        }
        if self.phase() == Phase::Setup {
            return Err(GameError::TargetsNotAssigned);
        }

        let inherited = victim.target().map(str::to_string);
        let hunter_position = self.hunter_position(name)?;
        let hunter = self.teams.at(hunter_position).name().to_string();

        let survivors = self.active_count() - 1;
        let new_target = if survivors > 1 {
            match inherited {
                Some(target) if target != hunter => Some(target),
                _ => {
                    return Err(GameError::CorruptState(format!(
                        "{name} has no target to pass on to {hunter}"
                    )))
                }
            }
        } else {
            None
        };

        self.teams
            .at_mut(hunter_position)
            .assign_target(new_target.clone());
        self.teams.lookup_mut(name)?.eliminate();
        debug!(eliminated = name, hunter = %hunter, survivors, "team eliminated");

        Ok(Elimination {
            eliminated: name.to_string(),
            hunter,
            new_target,
        })
    }

    /// Living teams in creation order.
    pub fn active_teams(&self) -> Vec<&Team> {
        self.teams.iter().filter(|team| team.is_alive()).collect()
    }

    fn active_count(&self) -> usize {
        self.teams.iter().filter(|team| team.is_alive()).count()
    }

    /// Whether at most one team is still alive.
    pub fn is_game_over(&self) -> bool {
        self.active_count() <= 1
    }

    /// The last team standing, once the game is over.
    pub fn winner(&self) -> Option<&Team> {
        if !self.is_game_over() {
            return None;
        }
        self.teams.iter().find(|team| team.is_alive())
    }

    /// Current lifecycle phase.
    ///
    /// An empty game reports [`Phase::Finished`], in line with
    /// [`is_game_over`](Self::is_game_over).
    pub fn phase(&self) -> Phase {
        if self.is_game_over() {
            Phase::Finished
        } else if self
            .teams
            .iter()
            .filter(|team| team.is_alive())
            .all(|team| team.target().is_none())
        {
            Phase::Setup
        } else {
            Phase::Active
        }
    }

    /// The living team currently hunting `name`, if exactly one exists.
    pub fn hunter_of(&self, name: &str) -> Option<&Team> {
        self.hunter_position(name)
            .ok()
            .map(|position| self.teams.at(position))
    }

    fn hunter_position(&self, name: &str) -> Result<usize> {
        let mut hunters = self
            .teams
            .iter()
            .enumerate()
            .filter(|(_, team)| team.is_alive() && team.name() != name)
            .filter(|(_, team)| team.target() == Some(name))
            .map(|(position, _)| position);

        match (hunters.next(), hunters.next()) {
            (Some(position), None) => Ok(position),
            (None, _) => Err(GameError::CorruptState(format!(
                "no active team is hunting {name}"
            ))),
            (Some(_), Some(_)) => Err(GameError::CorruptState(format!(
                "more than one team is hunting {name}"
            ))),
        }
    }

    /// Check that the living teams form exactly one target cycle.
    ///
    /// Games with fewer than two living teams trivially pass.
    pub fn verify_cycle(&self) -> Result<()> {
        let active = self.active_teams();
        let Some(&start) = active.first() else {
            return Ok(());
        };
        if active.len() < 2 {
            return Ok(());
        }

        let mut seen = HashSet::with_capacity(active.len());
        let mut current = start;
        for _ in 0..active.len() {
            let target_name = current.target().ok_or_else(|| {
                GameError::CorruptState(format!("{} has no target", current.name()))
            })?;
            let target = self.teams.get(target_name).ok_or_else(|| {
                GameError::CorruptState(format!(
                    "{} targets unknown team {target_name}",
                    current.name()
                ))
            })?;
            if !target.is_alive() {
                return Err(GameError::CorruptState(format!(
                    "{} targets eliminated team {target_name}",
                    current.name()
                )));
            }
            if !seen.insert(target.name()) {
                return Err(GameError::CorruptState(format!(
                    "target chain from {} does not reach every active team",
                    start.name()
                )));
            }
            current = target;
        }

        if current.name() != start.name() {
            return Err(GameError::CorruptState(format!(
                "target chain from {} does not close",
                start.name()
            )));
        }
        Ok(())
    }
}
