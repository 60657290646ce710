//! Manifest entity - logical asset names to emitted public paths
//!
//! A full build produces a fresh manifest; an incremental build patches the
//! previous one. Entries are only inserted once the asset's bytes are written.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: BTreeMap<String, String>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, logical_name: impl Into<String>, path: impl Into<String>) {
        self.entries.insert(logical_name.into(), path.into());
    }

    pub fn remove(&mut self, logical_name: &str) -> Option<String> {
        self.entries.remove(logical_name)
    }

    pub fn get(&self, logical_name: &str) -> Option<&str> {
        self.entries.get(logical_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by logical name
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Logical names that were added, removed, or point elsewhere in `next`
    pub fn changed_names(&self, next: &Manifest) -> Vec<String> {
        let mut changed: Vec<String> = next
            .entries
            .iter()
            .filter(|(name, path)| self.entries.get(*name) != Some(path))
            .map(|(name, _)| name.clone())
            .collect();
        changed.extend(
            self.entries
                .keys()
                .filter(|name| !next.entries.contains_key(*name))
                .cloned(),
        );
        changed.sort();
        changed
    }

    /// Replace this manifest's entries with `next`, keeping names that `next`
    /// does not mention unless listed in `removed`.
    pub fn patch(&mut self, next: &Manifest, removed: &[String]) {
        for name in removed {
            self.entries.remove(name);
        }
        for (name, path) in &next.entries {
            self.entries.insert(name.clone(), path.clone());
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
