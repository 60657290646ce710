//! In-memory file system
//!
//! Used by tests to run the resolver, graph builder and emitter without
//! touching disk. Cloning shares the underlying tree.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::ports::file_system::{FileSystem, FsError, FsResult};

#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: Arc<Mutex<BTreeMap<PathBuf, Vec<u8>>>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl AsRef<[u8]>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn insert(&self, path: impl Into<PathBuf>, content: impl AsRef<[u8]>) {
        self.files
            .lock()
            .insert(path.into(), content.as_ref().to_vec());
    }

    pub fn remove(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.lock().remove(path)
    }

    pub fn get(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.lock().get(path).cloned()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.lock().keys().cloned().collect()
    }
}

impl FileSystem for MemoryFs {
    fn read(&self, path: &Path) -> FsResult<Vec<u8>> {
        self.get(path)
            .ok_or_else(|| FsError::NotFound(path.to_path_buf()))
    }

    fn write(&self, path: &Path, content: &[u8]) -> FsResult<()> {
        self.insert(path, content);
        Ok(())
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.lock().contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.files
            .lock()
            .keys()
            .any(|p| p != path && p.starts_with(path))
    }

    fn remove_file(&self, path: &Path) -> FsResult<()> {
        self.files.lock().remove(path);
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> FsResult<()> {
        self.files.lock().retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn list_files(&self, dir: &Path) -> FsResult<Vec<PathBuf>> {
        Ok(self
            .files
            .lock()
            .keys()
            .filter(|p| p.starts_with(dir) && p.as_path() != dir)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directories_are_implied_by_files() {
        let fs = MemoryFs::new().with_file("/p/src/a.js", "a");
        assert!(fs.is_dir(Path::new("/p/src")));
        assert!(fs.is_dir(Path::new("/p")));
        assert!(!fs.is_dir(Path::new("/p/src/a.js")));
        assert!(fs.is_file(Path::new("/p/src/a.js")));
    }

    #[test]
    fn remove_dir_all_drops_subtree() {
        let fs = MemoryFs::new()
            .with_file("/out/js/a.js", "a")
            .with_file("/src/b.js", "b");
        fs.remove_dir_all(Path::new("/out")).unwrap();
        assert_eq!(fs.paths(), vec![PathBuf::from("/src/b.js")]);
    }

    #[test]
    fn clones_share_state() {
        let fs = MemoryFs::new();
        let other = fs.clone();
        other.insert("/x", "1");
        assert_eq!(fs.read(Path::new("/x")).unwrap(), b"1");
    }
}
