//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - File system implementations (Local, Memory), output root guard, build lock
//! - `transforms/` - Built-in transform units
//! - `optimizers/` - Built-in optimizers and the gzip compressor
//! - `livereload/` - Reload hub and HTTP endpoint

pub mod fs;
pub mod livereload;
pub mod optimizers;
pub mod transforms;

// Re-export for convenience
pub use fs::{BuildLock, LocalFs, MemoryFs, OutputRoot};
pub use livereload::{LiveReloadServer, ReloadHub};
pub use optimizers::standard_optimizers;
pub use transforms::builtin_registry;
