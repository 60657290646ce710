//! Configuration lookup and loading

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::value_objects::Mode;
use crate::error::{SheafError, SheafResult};

use super::types::Config;
use super::ConfigWarning;

/// Project config file name, looked up in the project root
pub const CONFIG_FILE: &str = "sheaf.toml";

/// A loaded configuration and where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    /// `None` when built-in defaults were used
    pub source: Option<PathBuf>,
    pub warnings: Vec<ConfigWarning>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> SheafResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;
    parse_with_warnings(&content, path)
}

/// Parse TOML text; `path` only labels warnings and errors.
pub fn parse_with_warnings(content: &str, path: &Path) -> SheafResult<(Config, Vec<ConfigWarning>)> {
    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| SheafError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Config file to use: the explicit path, then `<root>/sheaf.toml`, then the
/// user config. `None` means built-in defaults.
pub fn find_config(root: &Path, explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let project = root.join(CONFIG_FILE);
    if project.is_file() {
        return Some(project);
    }
    let user = dirs::config_dir()?.join("sheaf/config.toml");
    user.is_file().then_some(user)
}

/// Find, parse and apply environment overrides.
///
/// An explicit `--config` path that does not exist is an error; a missing
/// project or user config silently falls back to defaults.
pub fn load(root: &Path, explicit: Option<&Path>) -> SheafResult<LoadedConfig> {
    let source = find_config(root, explicit);
    let (config, warnings) = match &source {
        Some(path) => {
            if !path.is_file() {
                return Err(SheafError::InvalidConfig {
                    file: path.clone(),
                    message: "config file not found".to_string(),
                });
            }
            debug!(path = %path.display(), "loading config");
            load_with_warnings(path)?
        }
        None => {
            debug!("no config file, using defaults");
            (Config::default(), Vec::new())
        }
    };
    Ok(LoadedConfig {
        config: with_env_overrides(config)?,
        source,
        warnings,
    })
}

/// Apply environment variable overrides (SHEAF_* prefix)
pub fn with_env_overrides(config: Config) -> SheafResult<Config> {
    apply_overrides(config, |key| std::env::var(key).ok())
}

/// `SHEAF_MODE`, `SHEAF_OUT_DIR` and `SHEAF_JOBS`, read through `var`.
pub fn apply_overrides(
    mut config: Config,
    var: impl Fn(&str) -> Option<String>,
) -> SheafResult<Config> {
    let invalid = |key: &str, message: String| SheafError::InvalidConfig {
        file: PathBuf::from(format!("${}", key)),
        message,
    };

    if let Some(mode) = var("SHEAF_MODE") {
        config.mode = Some(
            mode.parse::<Mode>()
                .map_err(|e| invalid("SHEAF_MODE", e))?,
        );
    }

    if let Some(dir) = var("SHEAF_OUT_DIR").filter(|d| !d.is_empty()) {
        config.output.path = PathBuf::from(dir);
    }

    if let Some(jobs) = var("SHEAF_JOBS") {
        config.jobs = jobs
            .trim()
            .parse()
            .map_err(|_| invalid("SHEAF_JOBS", format!("expected a number, got '{}'", jobs)))?;
    }

    Ok(config)
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "mode",
        "jobs",
        "entry",
        "output",
        "path",
        "public_path",
        "filename",
        "chunk_filename",
        "css_filename",
        "asset_filename",
        "manifest",
        "clean",
        "resolve",
        "extensions",
        "modules",
        "main_fields",
        "alias",
        "rules",
        "test",
        "exclude",
        "resource_query",
        "use",
        "asset",
        "split",
        "enabled",
        "require_dag",
        "groups",
        "name",
        "min_roots",
        "define",
        "optimization",
        "inline_limit",
        "modes",
        "development",
        "production",
        "content_hash",
        "minify_scripts",
        "minify_styles",
        "optimize_images",
        "compress",
        "module_comments",
        "source_maps",
        "watch",
        "debounce_ms",
        "livereload",
        "livereload_port",
        "queue_capacity",
        "copy",
        "from",
        "to",
        "ui",
        "color",
        "unicode",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
