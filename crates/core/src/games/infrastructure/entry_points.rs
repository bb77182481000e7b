//! Games contributed by other crates.
//!
//! A crate that ships games exposes a `register(&mut EntryPointTable)`
//! function; the binary calls it at startup and the registry reads the
//! table back through [`EntryPointSource`].

use crate::games::domain::game_plugin::GameFactory;
use crate::games::domain::game_registry::{GameDescriptor, GameOrigin, GameSource};

#[derive(Clone, Debug)]
pub struct EntryPoint {
    pub namespace: String,
    pub name: String,
    pub package: String,
    pub factory: GameFactory,
}

/// Registered entry points, in registration order.
#[derive(Clone, Debug, Default)]
pub struct EntryPointTable {
    entries: Vec<EntryPoint>,
}

impl EntryPointTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, namespace: &str, name: &str, package: &str, factory: GameFactory) {
        self.entries.push(EntryPoint {
            namespace: namespace.to_string(),
            name: name.to_string(),
            package: package.to_string(),
            factory,
        });
    }

    pub fn in_namespace<'a>(&'a self, namespace: &'a str) -> impl Iterator<Item = &'a EntryPoint> {
        self.entries.iter().filter(move |e| e.namespace == namespace)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Reads one namespace of an [`EntryPointTable`] as a game source.
pub struct EntryPointSource<'a> {
    table: &'a EntryPointTable,
    namespace: &'a str,
}

impl<'a> EntryPointSource<'a> {
    pub fn new(table: &'a EntryPointTable, namespace: &'a str) -> Self {
        Self { table, namespace }
    }
}

impl GameSource for EntryPointSource<'_> {
    fn label(&self) -> String {
        format!("entry points '{}'", self.namespace)
    }

    fn entries(&self) -> Vec<GameDescriptor> {
        self.table
            .in_namespace(self.namespace)
            .map(|e| GameDescriptor::new(&e.name, GameOrigin::Package(e.package.clone()), e.factory))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::domain::game_registry::fakes::recording;
    use crate::shared::constants::ENTRY_POINT_NAMESPACE;

    #[test]
    fn test_source_filters_by_namespace() {
        let mut table = EntryPointTable::new();
        table.register(ENTRY_POINT_NAMESPACE, "reaction", "faceplay-arcade", recording);
        table.register("other.plugins", "ignored", "elsewhere", recording);

        let entries = EntryPointSource::new(&table, ENTRY_POINT_NAMESPACE).entries();

        assert_eq!(table.len(), 2);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "reaction");
        assert_eq!(
            entries[0].origin,
            GameOrigin::Package("faceplay-arcade".into())
        );
    }

    #[test]
    fn test_empty_table_yields_no_games() {
        let table = EntryPointTable::new();
        assert!(table.is_empty());
        assert!(EntryPointSource::new(&table, ENTRY_POINT_NAMESPACE)
            .entries()
            .is_empty());
    }
}
