//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure provides the concrete implementations; transform units and
//! optimizers are ports too, so the pipeline never knows what they do.

pub mod file_system;
pub mod optimizer;
pub mod output_sink;
pub mod reload;
pub mod transform;

pub use file_system::{FileSystem, FsError, FsResult};
pub use optimizer::{Compressor, ContentType, Optimizer};
pub use output_sink::OutputSink;
pub use reload::{NoopNotifier, ReloadNotifier};
pub use transform::{TransformContext, TransformUnit, UnitFailure, UnitOutput, UnitResult};
