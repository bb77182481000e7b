use crate::games::builtin;
use crate::games::domain::game_registry::{GameDescriptor, GameOrigin, GameSource};

/// Games compiled into this crate.
pub struct LocalGameSource;

impl GameSource for LocalGameSource {
    fn label(&self) -> String {
        "local".to_string()
    }

    fn entries(&self) -> Vec<GameDescriptor> {
        builtin::GAMES
            .iter()
            .map(|&(name, factory)| GameDescriptor::new(name, GameOrigin::Local, factory))
            .collect()
    }
}
