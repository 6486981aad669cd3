#![warn(clippy::all, missing_docs)]

//! Core logic for running a chain elimination game.
//!
//! Teams hunt one another in a single cycle. This crate owns the team
//! registry, target assignment, elimination bookkeeping and save files,
//! and leaves all console interaction to its callers.

pub mod config;
pub mod error;
pub mod game;
pub mod registry;
pub mod roster;
pub mod save;
pub mod team;

pub use config::AppConfig;
pub use error::{GameError, Result};
pub use game::{Elimination, Game, Phase};
pub use registry::TeamRegistry;
pub use save::{SaveDocument, SaveStore};
pub use team::{Team, TeamRecord};
