//! FileSystem port - abstraction over source and output file I/O
//!
//! The resolver and graph builder only read through this trait, which lets
//! tests run the whole pipeline against an in-memory tree.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for file system operations
pub type FsResult<T> = Result<T, FsError>;

/// File system operation errors
#[derive(Debug, Error)]
pub enum FsError {
    /// File not found
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => FsError::NotFound(path.to_path_buf()),
            _ => FsError::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }
}

impl From<FsError> for crate::error::SheafError {
    fn from(err: FsError) -> Self {
        match err {
            FsError::NotFound(path) => crate::error::SheafError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("file not found: {}", path.display()),
            )),
            FsError::Io { source, .. } => crate::error::SheafError::Io(source),
        }
    }
}

/// Abstract file system interface
///
/// Implementations:
/// - `LocalFs` - standard file I/O with atomic writes
/// - `MemoryFs` - in-memory tree for tests
pub trait FileSystem: Send + Sync {
    /// Read a file's bytes
    fn read(&self, path: &Path) -> FsResult<Vec<u8>>;

    /// Write bytes atomically, creating parent directories
    fn write(&self, path: &Path, content: &[u8]) -> FsResult<()>;

    /// True if `path` is an existing regular file
    fn is_file(&self, path: &Path) -> bool;

    /// True if `path` is an existing directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Remove one file (no error if missing)
    fn remove_file(&self, path: &Path) -> FsResult<()>;

    /// Remove a directory and everything below it (no error if missing)
    fn remove_dir_all(&self, path: &Path) -> FsResult<()>;

    /// Regular files below `dir`, sorted
    fn list_files(&self, dir: &Path) -> FsResult<Vec<PathBuf>>;

    /// Read a file as UTF-8 text
    fn read_to_string(&self, path: &Path) -> FsResult<String> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes).map_err(|e| FsError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })
    }
}
