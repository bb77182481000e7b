use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use super::game_plugin::{GameFactory, GamePlugin};

/// Where a game was discovered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameOrigin {
    Local,
    /// Registered by an external package under the games namespace.
    Package(String),
}

impl fmt::Display for GameOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOrigin::Local => f.write_str("local"),
            GameOrigin::Package(name) => f.write_str(name),
        }
    }
}

#[derive(Clone)]
pub struct GameDescriptor {
    pub name: String,
    pub origin: GameOrigin,
    pub factory: GameFactory,
}

impl GameDescriptor {
    pub fn new(name: impl Into<String>, origin: GameOrigin, factory: GameFactory) -> Self {
        Self {
            name: name.into(),
            origin,
            factory,
        }
    }
}

impl fmt::Debug for GameDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameDescriptor")
            .field("name", &self.name)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum RegistryError {
    #[error("unknown game '{name}' (available: {available})")]
    GameNotFound { name: String, available: String },
    #[error("duplicate game '{name}' from {skipped}; keeping the one from {kept}")]
    DuplicateName {
        name: String,
        kept: String,
        skipped: String,
    },
}

/// A place games are discovered from.
pub trait GameSource {
    fn label(&self) -> String;

    fn entries(&self) -> Vec<GameDescriptor>;
}

/// Games by name, built once at startup.
#[derive(Debug, Default)]
pub struct GameRegistry {
    games: BTreeMap<String, GameDescriptor>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect games from `sources` in order. On a name collision the first
    /// game seen is kept and the later one skipped with a warning.
    pub fn discover(sources: &[&dyn GameSource]) -> Self {
        let mut registry = Self::new();
        for source in sources {
            let entries = source.entries();
            log::debug!("{} game(s) from {}", entries.len(), source.label());
            for descriptor in entries {
                if let Err(e) = registry.register(descriptor) {
                    log::warn!("{e}");
                }
            }
        }
        log::debug!("Discovered {} games", registry.len());
        registry
    }

    pub fn register(&mut self, descriptor: GameDescriptor) -> Result<(), RegistryError> {
        if let Some(existing) = self.games.get(&descriptor.name) {
            return Err(RegistryError::DuplicateName {
                name: descriptor.name,
                kept: existing.origin.to_string(),
                skipped: descriptor.origin.to_string(),
            });
        }
        self.games.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&GameDescriptor> {
        self.games.get(name)
    }

    /// Build a fresh instance of the named game.
    pub fn instantiate(&self, name: &str) -> Result<Box<dyn GamePlugin>, RegistryError> {
        let descriptor = self
            .get(name)
            .ok_or_else(|| RegistryError::GameNotFound {
                name: name.to_string(),
                available: if self.is_empty() {
                    "none".to_string()
                } else {
                    self.names().join(", ")
                },
            })?;
        Ok((descriptor.factory)())
    }

    /// Sorted by name.
    pub fn names(&self) -> Vec<&str> {
        self.games.keys().map(String::as_str).collect()
    }

    /// Sorted by name.
    pub fn descriptors(&self) -> impl Iterator<Item = &GameDescriptor> {
        self.games.values()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}
