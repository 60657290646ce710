//! Transform port - the contract every unit transform implements
//!
//! The chain framework guarantees ordering and data threading; units
//! guarantee content semantics. A unit sees the previous unit's content and
//! may rewrite it, extract side artifacts, and report dependency specifiers.
//!
//! Units that need to refer to another module's final URL (a stylesheet
//! `url()`, an emitted image) cannot know it at transform time, so they write
//! a marker instead and the emitter substitutes it once names are final.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Dependency, ModuleContent, SideArtifact};
use crate::domain::value_objects::{Mode, ModuleId, ModuleType};

const MARKER: char = '\u{1}';

/// How binary assets are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssetMode {
    /// Inline below the size threshold, separate file above it
    #[default]
    Auto,
    /// Always a separate file
    Resource,
    /// Always an inline `data:` URI
    Inline,
}

/// Everything a unit may know about the module it transforms.
#[derive(Debug, Clone)]
pub struct TransformContext<'a> {
    pub module: &'a ModuleId,
    pub module_type: ModuleType,
    pub root: &'a Path,
    pub mode: Mode,
    pub asset_mode: AssetMode,
    /// Filename template for resource artifacts from the matched rule
    pub asset_filename: Option<&'a str>,
    /// Inline threshold in bytes for [`AssetMode::Auto`]
    pub inline_limit: usize,
    pub define: &'a BTreeMap<String, String>,
}

impl TransformContext<'_> {
    pub fn display_name(&self) -> String {
        self.module.display_name(self.root)
    }
}

/// What one unit hands to the next.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitOutput {
    pub content: ModuleContent,
    pub side_artifacts: Vec<SideArtifact>,
    pub dependencies: Vec<Dependency>,
    /// Set by units that turn a binary module into a `data:` URI
    pub inline_url: Option<String>,
}

impl UnitOutput {
    pub fn new(content: ModuleContent) -> Self {
        Self {
            content,
            side_artifacts: Vec::new(),
            dependencies: Vec::new(),
            inline_url: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(ModuleContent::Text(text.into()))
    }

    pub fn with_dependencies(mut self, deps: Vec<Dependency>) -> Self {
        self.dependencies = deps;
        self
    }

    pub fn with_artifact(mut self, artifact: SideArtifact) -> Self {
        self.side_artifacts.push(artifact);
        self
    }
}

/// Why a unit rejected its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitFailure(pub String);

impl std::fmt::Display for UnitFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for UnitFailure {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UnitFailure {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<std::string::FromUtf8Error> for UnitFailure {
    fn from(e: std::string::FromUtf8Error) -> Self {
        Self(format!("content is not valid UTF-8: {}", e))
    }
}

impl From<serde_json::Error> for UnitFailure {
    fn from(e: serde_json::Error) -> Self {
        Self(e.to_string())
    }
}

pub type UnitResult = Result<UnitOutput, UnitFailure>;

/// A pluggable unit transform.
pub trait TransformUnit: Send + Sync {
    /// Name used in rule `use` lists
    fn name(&self) -> &str;

    /// Capability check; chains skip units that do not accept the module type
    fn accepts(&self, module_type: ModuleType) -> bool;

    fn run(&self, input: ModuleContent, ctx: &TransformContext<'_>) -> UnitResult;
}

/// A marker found in transformed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker<'a> {
    /// URL of the module a specifier resolves to
    Reference(&'a str),
    /// URL of the module's own emitted resource
    SelfUrl,
}

/// Marker for the final URL of the module `specifier` resolves to
pub fn reference_marker(specifier: &str) -> String {
    format!("{MARKER}ref:{specifier}{MARKER}")
}

/// Marker for the final URL of the current module's resource artifact
pub fn self_url_marker() -> String {
    format!("{MARKER}self{MARKER}")
}

/// Replace every marker in `text` with `replace(marker)`. Unknown or
/// unterminated markers are left as they are.
pub fn substitute_markers(text: &str, mut replace: impl FnMut(Marker<'_>) -> String) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(MARKER) {
        out.push_str(&rest[..start]);
        let after = &rest[start + MARKER.len_utf8()..];
        let Some(end) = after.find(MARKER) else {
            out.push_str(&rest[start..]);
            return out;
        };
        let body = &after[..end];
        let marker = if body == "self" {
            Some(Marker::SelfUrl)
        } else {
            body.strip_prefix("ref:").map(Marker::Reference)
        };
        match marker {
            Some(marker) => out.push_str(&replace(marker)),
            None => out.push_str(&rest[start..start + MARKER.len_utf8() * 2 + end]),
        }
        rest = &after[end + MARKER.len_utf8()..];
    }
    out.push_str(rest);
    out
}
