//! Output directory lock
//!
//! Two builds writing the same output root would interleave assets and
//! manifests. The first build takes an exclusive `fs2` lock on
//! `<out>/.sheaf.lock`; a second one fails fast with `OutputLocked`.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::error::{SheafError, SheafResult};

pub const LOCK_FILE: &str = ".sheaf.lock";

/// Held for the lifetime of a build or watch session; released on drop.
#[derive(Debug)]
pub struct BuildLock {
    file: File,
    path: PathBuf,
}

impl BuildLock {
    pub fn acquire(out_dir: &Path) -> SheafResult<Self> {
        fs::create_dir_all(out_dir)?;
        let path = out_dir.join(LOCK_FILE);
        let file = File::create(&path)?;
        if file.try_lock_exclusive().is_err() {
            return Err(SheafError::OutputLocked(out_dir.to_path_buf()));
        }
        debug!(path = %path.display(), "acquired output lock");
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for BuildLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}
