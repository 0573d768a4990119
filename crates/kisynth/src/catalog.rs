//! Keyed tables of shared component definitions.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::definition::ComponentDefinition;

/// Read-only lookup of shared definitions by catalog key.
///
/// Keys are short handles ("R_0805") and need not equal the definition's
/// own name ("R_0805_2012Metric").
#[derive(Debug, Clone)]
pub struct Catalog<T> {
    entries: BTreeMap<String, Arc<ComponentDefinition<T>>>,
}

impl<T> Default for Catalog<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T> Catalog<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, replacing any previous definition under `key`.
    pub fn with(mut self, key: impl Into<String>, definition: Arc<ComponentDefinition<T>>) -> Self {
        self.insert(key, definition);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, definition: Arc<ComponentDefinition<T>>) {
        self.entries.insert(key.into(), definition);
    }

    pub fn get(&self, key: &str) -> Option<Arc<ComponentDefinition<T>>> {
        self.entries.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<ComponentDefinition<T>>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
