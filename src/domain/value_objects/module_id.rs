//! Module identity value object
//!
//! A module is identified by its resolved absolute path plus an optional
//! resource query (`./icon.svg?inline` and `./icon.svg` are distinct modules).

use std::fmt;
use std::path::{Path, PathBuf};

/// Resolved identity of one module in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId {
    path: PathBuf,
    query: Option<String>,
}

impl ModuleId {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            query: None,
        }
    }

    pub fn with_query(path: impl Into<PathBuf>, query: Option<String>) -> Self {
        Self {
            path: path.into(),
            query: query.filter(|q| !q.is_empty()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// File stem without extension (`logo` for `img/logo.png`)
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Extension including the leading dot, or empty
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default()
    }

    /// Stable, root-relative name used inside emitted bundles.
    ///
    /// Always uses forward slashes so output is identical across platforms.
    pub fn display_name(&self, root: &Path) -> String {
        let rel = self.path.strip_prefix(root).unwrap_or(&self.path);
        let mut name = rel.to_string_lossy().replace('\\', "/");
        if let Some(query) = &self.query {
            name.push('?');
            name.push_str(query);
        }
        name
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())?;
        if let Some(query) = &self.query {
            write!(f, "?{}", query)?;
        }
        Ok(())
    }
}
