//! Sheaf - asset bundler
//!
//! Sheaf walks the module graph of a web project from its entry points,
//! runs each module through a chain of transform units, splits the graph
//! into chunks and emits content-hashed files plus a manifest. A watch mode
//! rebuilds incrementally and notifies browsers over a live-reload endpoint.
//!
//! ## Layers
//!
//! - `domain` - entities, value objects, pipeline services and ports
//! - `application` - build and watch use cases
//! - `infrastructure` - file systems, transform units, optimizers, live reload
//! - `config` - `sheaf.toml` loading and resolved build options

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{BuildReport, BuildState, GraphReport, Pipeline, WatchEvent, WatchUseCase};
pub use config::{BuildOptions, Config, ModeProfile};
pub use domain::entities::{Chunk, Manifest, ModuleGraph};
pub use domain::value_objects::{Mode, ModuleId};
pub use error::{BuildFailure, SheafError, SheafResult};
