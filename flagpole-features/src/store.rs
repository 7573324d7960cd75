//! Flag definition storage.

use crate::definition::FeatureDefinition;
use parking_lot::RwLock;

/// Result of a [`FlagStore::upsert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The first entry with the same name, at this position, was replaced
    Replaced(usize),
    /// No entry had the name, so the definition was appended
    Inserted,
}

/// Storage backend for feature definitions.
///
/// Entries keep insertion order. Names are not deduplicated on insert, and
/// every name lookup resolves to the first matching entry.
///
/// Only the core operations are required; the filtered queries have default
/// implementations on top of [`list_all`](FlagStore::list_all) and
/// [`get`](FlagStore::get).
pub trait FlagStore: Send + Sync {
    /// Append a definition.
    fn insert(&self, definition: FeatureDefinition);

    /// Append definitions in order.
    fn insert_many(&self, definitions: Vec<FeatureDefinition>);

    /// Replace the first definition with the same name, or append it.
    fn upsert(&self, definition: FeatureDefinition) -> UpsertOutcome;

    /// First definition with this name.
    fn get(&self, name: &str) -> Option<FeatureDefinition>;

    /// Snapshot of every definition.
    fn list_all(&self) -> Vec<FeatureDefinition>;

    /// Remove every definition.
    fn clear_all(&self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn list_enabled(&self) -> Vec<FeatureDefinition> {
        self.list_all().into_iter().filter(|d| d.enabled).collect()
    }

    fn list_disabled(&self) -> Vec<FeatureDefinition> {
        self.list_all().into_iter().filter(|d| !d.enabled).collect()
    }

    fn exists(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// `false` when the name is unknown.
    fn is_enabled(&self, name: &str) -> bool {
        self.get(name).map(|d| d.enabled).unwrap_or(false)
    }

    fn has_any_enabled(&self) -> bool {
        self.list_all().iter().any(|d| d.enabled)
    }
}

/// In-memory store guarded by a single read/write lock.
#[derive(Debug, Default)]
pub struct InMemoryFlagStore {
    flags: RwLock<Vec<FeatureDefinition>>,
}

impl InMemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with definitions.
    pub fn with_definitions(definitions: Vec<FeatureDefinition>) -> Self {
        Self {
            flags: RwLock::new(definitions),
        }
    }

    fn filtered(&self, enabled: bool) -> Vec<FeatureDefinition> {
        self.flags
            .read()
            .iter()
            .filter(|d| d.enabled == enabled)
            .cloned()
            .collect()
    }
}

impl FlagStore for InMemoryFlagStore {
    fn insert(&self, definition: FeatureDefinition) {
        self.flags.write().push(definition);
    }

    fn insert_many(&self, definitions: Vec<FeatureDefinition>) {
        self.flags.write().extend(definitions);
    }

    fn upsert(&self, definition: FeatureDefinition) -> UpsertOutcome {
        let mut flags = self.flags.write();
        match flags.iter().position(|d| d.name == definition.name) {
            Some(index) => {
                flags[index] = definition;
                UpsertOutcome::Replaced(index)
            }
            None => {
                flags.push(definition);
                UpsertOutcome::Inserted
            }
        }
    }

    fn get(&self, name: &str) -> Option<FeatureDefinition> {
        self.flags.read().iter().find(|d| d.name == name).cloned()
    }

    fn list_all(&self) -> Vec<FeatureDefinition> {
        self.flags.read().clone()
    }

    fn clear_all(&self) {
        self.flags.write().clear();
    }

    fn len(&self) -> usize {
        self.flags.read().len()
    }

    fn list_enabled(&self) -> Vec<FeatureDefinition> {
        self.filtered(true)
    }

    fn list_disabled(&self) -> Vec<FeatureDefinition> {
        self.filtered(false)
    }

    fn exists(&self, name: &str) -> bool {
        self.flags.read().iter().any(|d| d.name == name)
    }

    fn is_enabled(&self, name: &str) -> bool {
        self.flags
            .read()
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.enabled)
            .unwrap_or(false)
    }

    fn has_any_enabled(&self) -> bool {
        self.flags.read().iter().any(|d| d.enabled)
    }
}
