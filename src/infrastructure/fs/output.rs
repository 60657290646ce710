//! Output root guard
//!
//! Every emitted file goes through [`OutputRoot`], which refuses relative
//! paths that would land outside the output directory.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::domain::ports::{FileSystem, OutputSink};
use crate::error::{EmissionError, SheafError, SheafResult};
use crate::infrastructure::fs::lock::LOCK_FILE;

pub struct OutputRoot {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
}

impl OutputRoot {
    pub fn new(fs: Arc<dyn FileSystem>, root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of `relative`, or `PathEscape` if it leaves the root.
    pub fn resolve(&self, relative: &str) -> SheafResult<PathBuf> {
        let escape = || SheafError::PathEscape {
            path: PathBuf::from(relative),
            root: self.root.clone(),
        };
        if relative.is_empty() || relative.contains('\\') {
            return Err(escape());
        }
        let rel = Path::new(relative);
        let mut out = self.root.clone();
        for component in rel.components() {
            match component {
                Component::Normal(part) => out.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(escape());
                }
            }
        }
        if out == self.root {
            return Err(escape());
        }
        Ok(out)
    }

    /// Delete every file under the root except the build lock.
    pub fn clean(&self) -> SheafResult<usize> {
        if !self.fs.is_dir(&self.root) {
            return Ok(0);
        }
        let lock = self.root.join(LOCK_FILE);
        let mut removed = 0;
        for file in self.fs.list_files(&self.root)? {
            if file == lock {
                continue;
            }
            self.fs.remove_file(&file)?;
            removed += 1;
        }
        debug!(root = %self.root.display(), removed, "cleaned output directory");
        Ok(removed)
    }

    /// Read back a previously written file, if any.
    pub fn read(&self, relative: &str) -> Option<Vec<u8>> {
        let path = self.resolve(relative).ok()?;
        self.fs.read(&path).ok()
    }
}

impl OutputSink for OutputRoot {
    fn write(&self, relative_path: &str, bytes: &[u8]) -> SheafResult<()> {
        let path = self.resolve(relative_path)?;
        self.fs.write(&path, bytes).map_err(|e| {
            let source = match e {
                crate::domain::ports::FsError::Io { source, .. } => source,
                other => std::io::Error::other(other.to_string()),
            };
            SheafError::Emission(EmissionError::Write { path, source })
        })
    }
}
