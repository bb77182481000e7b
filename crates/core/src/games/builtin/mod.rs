//! Games bundled with the core crate.

pub mod runner;

use super::domain::game_plugin::GameFactory;

/// Name and factory of each bundled game.
pub const GAMES: [(&str, GameFactory); 2] = [("runner", runner::create), ("test", input_test::create)];
