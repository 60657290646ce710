//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `Pipeline` - One-shot and incremental builds
//! - `WatchUseCase` - File watching with incremental rebuilds and live reload
//! - `GraphReport` - Module graph and chunk listing for inspection

pub mod build;
pub mod inspect;
pub mod watch;

pub use build::{collect_copies, AssetSummary, BuildReport, BuildState, ChunkSummary, Pipeline};
pub use inspect::GraphReport;
pub use watch::{
    ChangeBatch, ContentFilter, Debouncer, Phase, WatchController, WatchEvent, WatchUseCase,
    DEBOUNCE_MS,
};
