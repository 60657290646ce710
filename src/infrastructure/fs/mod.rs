//! File System Implementations
//!
//! Concrete implementations of the FileSystem port, the output-root guard the
//! emitter writes through, and the output directory lock.

mod local;
mod lock;
mod memory;
mod output;

pub use local::{atomic_write, LocalFs};
pub use lock::{BuildLock, LOCK_FILE};
pub use memory::MemoryFs;
pub use output::OutputRoot;
