//! Chunk entity - a named group of modules emitted as one script

use serde::Serialize;

use crate::domain::value_objects::ModuleId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkKind {
    /// One per configured entry point; carries the runtime and bootstrap
    Entry,
    /// Modules promoted out of entry/async chunks by a split group
    Shared,
    /// Rooted at a split point target, loaded on demand
    Async,
}

/// A named, ordered group of modules.
///
/// Modules are stored dependencies-first, so every module's static
/// dependencies inside the chunk precede it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    name: String,
    kind: ChunkKind,
    root: Option<ModuleId>,
    modules: Vec<ModuleId>,
}

impl Chunk {
    pub fn new(name: impl Into<String>, kind: ChunkKind, root: Option<ModuleId>) -> Self {
        Self {
            name: name.into(),
            kind,
            root,
            modules: Vec::new(),
        }
    }

    pub fn with_modules(mut self, modules: Vec<ModuleId>) -> Self {
        self.modules = modules;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ChunkKind {
        self.kind
    }

    /// Entry or split-point module this chunk is rooted at (none for shared)
    pub fn root(&self) -> Option<&ModuleId> {
        self.root.as_ref()
    }

    pub fn modules(&self) -> &[ModuleId] {
        &self.modules
    }

    pub fn contains(&self, id: &ModuleId) -> bool {
        self.modules.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
