//! Domain Entities
//!
//! The data model of one build: module records and the graph that owns them,
//! the chunks the graph is split into, and what ends up on disk.

mod asset;
mod chunk;
mod graph;
mod manifest;
mod module;

pub use asset::{AssetKind, EmittedAsset};
pub use chunk::{Chunk, ChunkKind};
pub use graph::{DependencyEdge, GraphDiagnostic, ModuleGraph};
pub use manifest::Manifest;
pub use module::{Dependency, DependencyKind, ModuleContent, ModuleRecord, SideArtifact};
