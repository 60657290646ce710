//! Content filter for file events
//!
//! Editors often rewrite a file without changing it. The filter remembers the
//! hash of every file it has seen and drops events whose content is
//! identical.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::domain::entities::ModuleGraph;
use crate::domain::value_objects::ContentHash;

#[derive(Debug, Default)]
pub struct ContentFilter {
    hashes: HashMap<PathBuf, ContentHash>,
}

impl ContentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Remember the source hash of every module in `graph`.
    pub fn seed(&mut self, graph: &ModuleGraph) {
        for record in graph.modules() {
            self.hashes
                .insert(record.id().path().to_path_buf(), record.source_hash().clone());
        }
    }

    /// Whether an event for `path` is a real change. `content` is `None`
    /// when the file no longer exists.
    pub fn admit(&mut self, path: &Path, content: Option<&[u8]>) -> bool {
        match content {
            Some(bytes) => {
                let hash = ContentHash::from_bytes(bytes);
                match self.hashes.get(path) {
                    Some(known) if *known == hash => false,
                    _ => {
                        self.hashes.insert(path.to_path_buf(), hash);
                        true
                    }
                }
            }
            None => self.hashes.remove(path).is_some(),
        }
    }
}
