//! Build Use Case
//!
//! One-shot and incremental builds of a project:
//! - `Pipeline` - wires resolver, transform chain, graph builder, splitter and emitter
//! - `BuildState` - last good graph, chunks, manifest and emit cache
//! - `BuildReport` - what a pass produced, for the UI and NDJSON events

mod copy;
mod pipeline;
mod report;

#[cfg(test)]
mod tests;

pub use copy::collect_copies;
pub use pipeline::{BuildState, Pipeline};
pub use report::{AssetSummary, BuildReport, ChunkSummary};
