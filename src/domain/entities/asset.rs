//! EmittedAsset entity - a finalized output file

use serde::Serialize;

use crate::domain::value_objects::ContentHash;

/// What an emitted file holds; selects the optimizer that applies to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Script,
    Stylesheet,
    Resource,
    /// Copied verbatim from a copy pattern
    Copy,
    /// `.map` sibling of a chunk script
    SourceMap,
}

/// One output file with its final bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedAsset {
    logical_name: String,
    path: String,
    hash: ContentHash,
    kind: AssetKind,
    bytes: Vec<u8>,
}

impl EmittedAsset {
    /// `path` is relative to the output root, using `/` separators.
    pub fn new(
        logical_name: impl Into<String>,
        path: impl Into<String>,
        kind: AssetKind,
        bytes: Vec<u8>,
    ) -> Self {
        let hash = ContentHash::from_bytes(&bytes);
        Self {
            logical_name: logical_name.into(),
            path: path.into(),
            hash,
            kind,
            bytes,
        }
    }

    pub fn logical_name(&self) -> &str {
        &self.logical_name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn hash(&self) -> &ContentHash {
        &self.hash
    }

    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
