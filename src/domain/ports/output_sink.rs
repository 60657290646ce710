//! OutputSink port - the only way the emitter writes files

use crate::error::SheafResult;

/// Destination for emitted files. Paths are relative to the output root and
/// use `/` separators; implementations must refuse anything that escapes it.
pub trait OutputSink: Send + Sync {
    fn write(&self, relative_path: &str, bytes: &[u8]) -> SheafResult<()>;
}
