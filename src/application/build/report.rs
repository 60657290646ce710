//! Build report types

use serde::Serialize;

use crate::domain::entities::{AssetKind, Chunk, ChunkKind, EmittedAsset, GraphDiagnostic};
use crate::domain::services::EmitWarning;
use crate::domain::value_objects::Mode;

/// One chunk as reported to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkSummary {
    pub name: String,
    pub kind: ChunkKind,
    pub modules: usize,
}

impl From<&Chunk> for ChunkSummary {
    fn from(chunk: &Chunk) -> Self {
        Self {
            name: chunk.name().to_string(),
            kind: chunk.kind(),
            modules: chunk.modules().len(),
        }
    }
}

/// One emitted file as reported to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetSummary {
    pub logical_name: String,
    pub path: String,
    pub kind: AssetKind,
    pub size: usize,
}

impl From<&EmittedAsset> for AssetSummary {
    fn from(asset: &EmittedAsset) -> Self {
        Self {
            logical_name: asset.logical_name().to_string(),
            path: asset.path().to_string(),
            kind: asset.kind(),
            size: asset.len(),
        }
    }
}

/// Result of one successful build pass
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub mode: Mode,
    pub modules: usize,
    pub chunks: Vec<ChunkSummary>,
    pub assets: Vec<AssetSummary>,
    /// Output paths written this pass
    pub written: Vec<String>,
    /// Logical names whose content changed since the previous pass; every
    /// name on a full build
    pub changed: Vec<String>,
    pub warnings: Vec<EmitWarning>,
    pub diagnostics: Vec<GraphDiagnostic>,
    pub duration_ms: u64,
}

impl BuildReport {
    pub fn total_size(&self) -> usize {
        self.assets.iter().map(|a| a.size).sum()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty() || !self.diagnostics.is_empty()
    }
}
