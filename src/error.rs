//! Error types for Sheaf
//!
//! Library code returns [`SheafResult`]; the CLI wraps it in `anyhow` at the
//! command boundary. Failures discovered while building the module graph are
//! collected into a [`BuildFailure`] batch instead of stopping at the first one.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::value_objects::ModuleId;

/// Result type alias for Sheaf operations
pub type SheafResult<T> = Result<T, SheafError>;

/// An import specifier that no candidate path could satisfy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot resolve '{specifier}' from {importer}")]
pub struct ResolutionError {
    pub specifier: String,
    pub importer: String,
}

/// A transform unit rejected a module's content.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("transform '{unit}' failed on {module}: {cause}")]
pub struct TransformError {
    pub unit: String,
    pub module: String,
    pub cause: String,
}

/// Failures while naming or writing output files.
#[derive(Error, Debug)]
pub enum EmissionError {
    /// Two assets were assigned the same output path
    #[error("output path '{path}' claimed by both '{first}' and '{second}'")]
    Collision {
        path: String,
        first: String,
        second: String,
    },

    /// Writing an output file failed
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A filename template produced an unusable path
    #[error("filename template '{template}' produced invalid path '{path}'")]
    InvalidTemplate { template: String, path: String },
}

/// Main error type for Sheaf operations
#[derive(Error, Debug)]
pub enum SheafError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Emission(#[from] EmissionError),

    /// The build ran to quiescence and collected one or more errors
    #[error("{0}")]
    Build(BuildFailure),

    /// A cycle through async split points while the split policy requires a DAG
    #[error("async chunk cycle: {}", .chunks.join(" -> "))]
    ChunkCycle { chunks: Vec<String> },

    /// Invalid configuration file or value
    #[error("invalid config in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// A transform unit or optimizer name registered twice
    #[error("duplicate {kind} '{name}'")]
    DuplicateRegistration { kind: &'static str, name: String },

    /// A rule names a transform unit the registry does not know
    #[error("unknown transform unit '{0}'")]
    UnknownUnit(String),

    /// An entry point listed in the config does not exist
    #[error("entry '{name}' not found: {path}")]
    MissingEntry { name: String, path: PathBuf },

    /// Path escapes the output root
    #[error("path '{path}' escapes output root '{root}'")]
    PathEscape { path: PathBuf, root: PathBuf },

    /// Another build holds the output lock
    #[error("output directory {0} is locked by another build")]
    OutputLocked(PathBuf),

    /// The build was cancelled between module tasks
    #[error("build cancelled")]
    Cancelled,

    /// A regular expression failed to compile
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File watcher error
    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),
}

impl SheafError {
    /// Every individual error carried by this value, flattening batches.
    pub fn flatten(&self) -> Vec<String> {
        match self {
            SheafError::Build(batch) => batch.errors.iter().map(|e| e.to_string()).collect(),
            other => vec![other.to_string()],
        }
    }
}

/// The full error batch of one failed build pass.
#[derive(Debug, Default)]
pub struct BuildFailure {
    pub errors: Vec<SheafError>,
}

impl BuildFailure {
    pub fn new(errors: Vec<SheafError>) -> Self {
        Self { errors }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn resolution_errors(&self) -> impl Iterator<Item = &ResolutionError> {
        self.errors.iter().filter_map(|e| match e {
            SheafError::Resolution(r) => Some(r),
            _ => None,
        })
    }

    pub fn transform_errors(&self) -> impl Iterator<Item = &TransformError> {
        self.errors.iter().filter_map(|e| match e {
            SheafError::Transform(t) => Some(t),
            _ => None,
        })
    }
}

impl fmt::Display for BuildFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.errors.len() == 1 { "error" } else { "errors" };
        write!(f, "build failed with {} {}", self.errors.len(), noun)?;
        for err in &self.errors {
            write!(f, "\n  - {}", err)?;
        }
        Ok(())
    }
}

impl From<BuildFailure> for SheafError {
    fn from(batch: BuildFailure) -> Self {
        SheafError::Build(batch)
    }
}

impl ResolutionError {
    pub fn new(specifier: impl Into<String>, importer: &ModuleId) -> Self {
        Self {
            specifier: specifier.into(),
            importer: importer.to_string(),
        }
    }
}
