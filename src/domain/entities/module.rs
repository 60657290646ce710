//! ModuleRecord entity - one resolved source file and its transform results

use serde::Serialize;

use crate::domain::value_objects::{ContentHash, ModuleId, ModuleType};

/// Raw or transformed module content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleContent {
    Text(String),
    Binary(Vec<u8>),
}

impl ModuleContent {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ModuleContent::Text(s) => s.as_bytes(),
            ModuleContent::Binary(b) => b,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ModuleContent::Text(s) => Some(s),
            ModuleContent::Binary(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take the text, decoding binary content as UTF-8.
    pub fn into_text(self) -> Result<String, std::string::FromUtf8Error> {
        match self {
            ModuleContent::Text(s) => Ok(s),
            ModuleContent::Binary(b) => String::from_utf8(b),
        }
    }
}

/// How an importer depends on a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    /// Must be registered before the importer runs
    Static,
    /// Split point (`import()`); loaded on demand from its own chunk
    Async,
}

/// A dependency specifier as written in source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dependency {
    pub specifier: String,
    pub kind: DependencyKind,
}

impl Dependency {
    pub fn new(specifier: impl Into<String>) -> Self {
        Self {
            specifier: specifier.into(),
            kind: DependencyKind::Static,
        }
    }

    pub fn split_point(specifier: impl Into<String>) -> Self {
        Self {
            specifier: specifier.into(),
            kind: DependencyKind::Async,
        }
    }
}

/// Non-script output extracted during transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideArtifact {
    /// Stylesheet text, aggregated per chunk
    Stylesheet { text: String },
    /// A binary file emitted on its own
    Resource {
        /// Source file name, used for `[name]` and `[ext]`
        file_name: String,
        bytes: Vec<u8>,
        /// Per-rule filename template, overriding `output.asset_filename`
        filename: Option<String>,
    },
}

/// One module in the graph.
///
/// Created by the graph builder on first discovery, replaced wholesale when
/// the watcher rebuilds it.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleRecord {
    id: ModuleId,
    module_type: ModuleType,
    source_hash: ContentHash,
    dependencies: Vec<Dependency>,
    resolved: Vec<ModuleId>,
    output: String,
    side_artifacts: Vec<SideArtifact>,
    inline_url: Option<String>,
    discovery: usize,
}

impl ModuleRecord {
    pub fn new(id: ModuleId, module_type: ModuleType, source_hash: ContentHash) -> Self {
        Self {
            id,
            module_type,
            source_hash,
            dependencies: Vec::new(),
            resolved: Vec::new(),
            output: String::new(),
            side_artifacts: Vec::new(),
            inline_url: None,
            discovery: usize::MAX,
        }
    }

    pub fn with_output(
        mut self,
        output: String,
        side_artifacts: Vec<SideArtifact>,
        inline_url: Option<String>,
    ) -> Self {
        self.output = output;
        self.side_artifacts = side_artifacts;
        self.inline_url = inline_url;
        self
    }

    pub fn with_dependencies(mut self, deps: Vec<Dependency>, resolved: Vec<ModuleId>) -> Self {
        debug_assert_eq!(deps.len(), resolved.len());
        self.dependencies = deps;
        self.resolved = resolved;
        self
    }

    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    pub fn module_type(&self) -> ModuleType {
        self.module_type
    }

    pub fn source_hash(&self) -> &ContentHash {
        &self.source_hash
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// Resolved identities, index-aligned with [`Self::dependencies`]
    pub fn resolved(&self) -> &[ModuleId] {
        &self.resolved
    }

    /// `(dependency, resolved identity)` pairs in declared order
    pub fn resolved_dependencies(&self) -> impl Iterator<Item = (&Dependency, &ModuleId)> {
        self.dependencies.iter().zip(self.resolved.iter())
    }

    /// Resolved identity of a specifier written in this module
    pub fn resolve_specifier(&self, specifier: &str) -> Option<&ModuleId> {
        self.resolved_dependencies()
            .find(|(dep, _)| dep.specifier == specifier)
            .map(|(_, id)| id)
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn side_artifacts(&self) -> &[SideArtifact] {
        &self.side_artifacts
    }

    pub fn inline_url(&self) -> Option<&str> {
        self.inline_url.as_deref()
    }

    pub fn discovery(&self) -> usize {
        self.discovery
    }

    pub(crate) fn set_discovery(&mut self, index: usize) {
        self.discovery = index;
    }

    /// Hash of everything this record contributes to a rendered chunk.
    pub fn output_hash(&self) -> ContentHash {
        let mut parts: Vec<&[u8]> = vec![self.output.as_bytes()];
        for (dep, id) in self.resolved_dependencies() {
            parts.push(dep.specifier.as_bytes());
            parts.push(id.path().as_os_str().as_encoded_bytes());
        }
        for artifact in &self.side_artifacts {
            match artifact {
                SideArtifact::Stylesheet { text } => parts.push(text.as_bytes()),
                SideArtifact::Resource { bytes, .. } => parts.push(bytes),
            }
        }
        if let Some(url) = &self.inline_url {
            parts.push(url.as_bytes());
        }
        ContentHash::from_parts(parts)
    }
}
