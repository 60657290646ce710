//! Specifier resolution
//!
//! Maps an import specifier written in one module to the absolute identity of
//! the module it names. Probing order:
//!
//! 1. split off `?query`
//! 2. alias substitution (longest matching key wins)
//! 3. relative/absolute paths: literal file, file + extension, directory index
//! 4. bare specifiers: `<modules_dir>/<package>` in every ancestor directory,
//!    then the package's `package.json` main fields, then `index`

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::trace;

use crate::domain::ports::FileSystem;
use crate::domain::value_objects::ModuleId;
use crate::error::ResolutionError;

/// Resolver configuration, already anchored at the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Extensions tried in priority order, with leading dot
    pub extensions: Vec<String>,
    /// Alias key and absolute replacement path
    pub alias: Vec<(String, PathBuf)>,
    /// Package directory names (`node_modules`)
    pub modules: Vec<String>,
    /// `package.json` fields consulted for a bare package name
    pub main_fields: Vec<String>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            extensions: vec![
                ".mjs".to_string(),
                ".js".to_string(),
                ".json".to_string(),
                ".vue".to_string(),
            ],
            alias: Vec::new(),
            modules: vec!["node_modules".to_string()],
            main_fields: vec!["module".to_string(), "main".to_string()],
        }
    }
}

pub struct Resolver {
    fs: Arc<dyn FileSystem>,
    options: ResolveOptions,
}

impl Resolver {
    pub fn new(fs: Arc<dyn FileSystem>, options: ResolveOptions) -> Self {
        Self { fs, options }
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Resolve `specifier` as written in module `from`.
    pub fn resolve(&self, specifier: &str, from: &ModuleId) -> Result<ModuleId, ResolutionError> {
        let dir = from.path().parent().unwrap_or_else(|| Path::new("/"));
        self.resolve_in(specifier, dir, false)
            .ok_or_else(|| ResolutionError::new(specifier, from))
    }

    /// Resolve an entry point. Entries are relative to `root` even without a
    /// leading `./`.
    pub fn resolve_entry(&self, specifier: &str, root: &Path) -> Option<ModuleId> {
        self.resolve_in(specifier, root, true)
    }

    fn resolve_in(&self, specifier: &str, dir: &Path, root_relative: bool) -> Option<ModuleId> {
        let (request, query) = match specifier.split_once('?') {
            Some((request, query)) => (request, Some(query.to_string())),
            None => (specifier, None),
        };

        let path = if let Some(aliased) = self.apply_alias(request) {
            self.try_path(&aliased)
        } else if is_path_like(request) || root_relative {
            self.try_path(&normalize(&dir.join(request)))
        } else {
            self.try_package(request, dir)
        }?;

        trace!(specifier, resolved = %path.display(), "resolved");
        Some(ModuleId::with_query(path, query))
    }

    /// Replace the longest alias key matching `request` exactly or as a
    /// `key/` prefix.
    fn apply_alias(&self, request: &str) -> Option<PathBuf> {
        let (key, target) = self
            .options
            .alias
            .iter()
            .filter(|(key, _)| {
                request == key
                    || request
                        .strip_prefix(key.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            })
            .max_by_key(|(key, _)| key.len())?;
        let rest = request[key.len()..].trim_start_matches('/');
        Some(normalize(&if rest.is_empty() {
            target.clone()
        } else {
            target.join(rest)
        }))
    }

    /// Literal file, then file + each extension, then directory index.
    fn try_path(&self, path: &Path) -> Option<PathBuf> {
        if self.fs.is_file(path) {
            return Some(path.to_path_buf());
        }
        for ext in &self.options.extensions {
            let candidate = with_suffix(path, ext);
            if self.fs.is_file(&candidate) {
                return Some(candidate);
            }
        }
        self.try_index(path)
    }

    fn try_index(&self, dir: &Path) -> Option<PathBuf> {
        self.options
            .extensions
            .iter()
            .map(|ext| dir.join(format!("index{}", ext)))
            .find(|candidate| self.fs.is_file(candidate))
    }

    fn try_package(&self, request: &str, dir: &Path) -> Option<PathBuf> {
        let (package, subpath) = split_package(request);
        for ancestor in dir.ancestors() {
            for modules_dir in &self.options.modules {
                let package_dir = ancestor.join(modules_dir).join(package);
                if !self.fs.is_dir(&package_dir) {
                    continue;
                }
                let found = match subpath {
                    Some(sub) => self.try_path(&normalize(&package_dir.join(sub))),
                    None => self.try_package_main(&package_dir),
                };
                if found.is_some() {
                    return found;
                }
            }
        }
        None
    }

    /// The first present main field wins; a missing target falls back to
    /// `index`.
    fn try_package_main(&self, package_dir: &Path) -> Option<PathBuf> {
        let manifest = package_dir.join("package.json");
        if let Ok(text) = self.fs.read_to_string(&manifest) {
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(&text) {
                let main = self
                    .options
                    .main_fields
                    .iter()
                    .find_map(|field| json.get(field).and_then(|v| v.as_str()));
                if let Some(main) = main {
                    if let Some(found) = self.try_path(&normalize(&package_dir.join(main))) {
                        return Some(found);
                    }
                }
            }
        }
        self.try_index(package_dir)
    }
}

fn is_path_like(request: &str) -> bool {
    request == "."
        || request == ".."
        || request.starts_with("./")
        || request.starts_with("../")
        || Path::new(request).is_absolute()
}

/// `@scope/pkg/sub` -> (`@scope/pkg`, `sub`)
fn split_package(request: &str) -> (&str, Option<&str>) {
    let segments = if request.starts_with('@') { 2 } else { 1 };
    let mut split_at = None;
    let mut seen = 0;
    for (i, c) in request.char_indices() {
        if c == '/' {
            seen += 1;
            if seen == segments {
                split_at = Some(i);
                break;
            }
        }
    }
    match split_at {
        Some(i) => (&request[..i], Some(&request[i + 1..]).filter(|s| !s.is_empty())),
        None => (request, None),
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(suffix);
    PathBuf::from(os)
}

/// Lexically normalize `.` and `..` so one file has one identity.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
