//! Domain Services
//!
//! The pipeline stages. Each one works on domain entities and reaches the
//! outside world only through ports, so all of them run against an
//! in-memory file system in tests.

pub mod emitter;
pub mod graph_builder;
pub mod naming;
pub mod optimization;
pub mod render;
pub mod resolver;
pub mod scc;
pub mod source_map;
pub mod splitter;
pub mod transform_chain;

pub use emitter::{EmitCache, EmitOptions, EmitResult, EmitWarning, Emitter};
pub use graph_builder::{GraphBuilder, GraphSettings, Rebuild};
pub use optimization::{OptimizationWarning, OptimizeItem, OptimizerSet};
pub use resolver::{ResolveOptions, Resolver};
pub use splitter::{split, SplitGroup, SplitPolicy};
pub use transform_chain::{Rule, TransformChain, TransformRegistry};
