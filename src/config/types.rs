//! Configuration type definitions
//!
//! Every section is optional in `sheaf.toml`; missing keys take the defaults
//! below, so older and newer config files deserialize into the same schema.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::ports::transform::AssetMode;
use crate::domain::value_objects::Mode;
use crate::error::SheafResult;

use super::loader;
use super::ConfigWarning;

/// `[output]`: where and under which names files are written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_out_dir")]
    pub path: PathBuf,

    /// Prefix of manifest values and runtime chunk URLs
    #[serde(default)]
    pub public_path: String,

    #[serde(default = "default_filename")]
    pub filename: String,

    #[serde(default = "default_filename")]
    pub chunk_filename: String,

    #[serde(default = "default_css_filename")]
    pub css_filename: String,

    #[serde(default = "default_asset_filename")]
    pub asset_filename: String,

    #[serde(default = "default_manifest")]
    pub manifest: String,

    /// Empty the output directory before the first build
    #[serde(default = "default_true")]
    pub clean: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_out_dir(),
            public_path: String::new(),
            filename: default_filename(),
            chunk_filename: default_filename(),
            css_filename: default_css_filename(),
            asset_filename: default_asset_filename(),
            manifest: default_manifest(),
            clean: true,
        }
    }
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("dist")
}

fn default_filename() -> String {
    "js/[name].[hash].js".to_string()
}

fn default_css_filename() -> String {
    "css/[name].[hash].css".to_string()
}

fn default_asset_filename() -> String {
    "assets/[name].[hash][ext]".to_string()
}

fn default_manifest() -> String {
    "manifest.json".to_string()
}

fn default_true() -> bool {
    true
}

/// `[resolve]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveConfig {
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    #[serde(default = "default_modules")]
    pub modules: Vec<String>,

    #[serde(default = "default_main_fields")]
    pub main_fields: Vec<String>,

    /// Alias key to project-relative path
    #[serde(default)]
    pub alias: BTreeMap<String, String>,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            modules: default_modules(),
            main_fields: default_main_fields(),
            alias: BTreeMap::new(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    [".mjs", ".js", ".json", ".vue"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_modules() -> Vec<String> {
    vec!["node_modules".to_string()]
}

fn default_main_fields() -> Vec<String> {
    vec!["module".to_string(), "main".to_string()]
}

/// `[[rules]]`: one transform rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Regex matched against the module path
    pub test: String,

    #[serde(default)]
    pub exclude: Vec<String>,

    /// Regex matched against the `?query` of the specifier
    #[serde(default)]
    pub resource_query: Option<String>,

    /// Unit names in execution order
    #[serde(default, rename = "use")]
    pub units: Vec<String>,

    /// Asset kind; implies the `asset` unit when `use` is empty
    #[serde(default)]
    pub asset: Option<AssetMode>,

    /// Filename template for resources this rule emits
    #[serde(default)]
    pub filename: Option<String>,
}

/// `[split]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub require_dag: bool,

    #[serde(default = "default_groups")]
    pub groups: Vec<GroupConfig>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            require_dag: false,
            groups: default_groups(),
        }
    }
}

/// `[[split.groups]]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
    pub name: String,

    #[serde(default)]
    pub test: Option<String>,

    #[serde(default = "default_min_roots")]
    pub min_roots: usize,
}

fn default_groups() -> Vec<GroupConfig> {
    vec![GroupConfig {
        name: "lib".to_string(),
        test: None,
        min_roots: default_min_roots(),
    }]
}

fn default_min_roots() -> usize {
    2
}

/// `[optimization]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationConfig {
    /// Binary assets strictly smaller than this many bytes are inlined
    #[serde(default = "default_inline_limit")]
    pub inline_limit: usize,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            inline_limit: default_inline_limit(),
        }
    }
}

fn default_inline_limit() -> usize {
    8192
}

/// `[modes.<mode>]`: per-mode overrides of [`ModeProfile`](super::ModeProfile)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default)]
    pub content_hash: Option<bool>,
    #[serde(default)]
    pub minify_scripts: Option<bool>,
    #[serde(default)]
    pub minify_styles: Option<bool>,
    #[serde(default)]
    pub optimize_images: Option<bool>,
    #[serde(default)]
    pub compress: Option<bool>,
    #[serde(default)]
    pub module_comments: Option<bool>,
    #[serde(default)]
    pub source_maps: Option<bool>,
}

/// `[modes]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModesConfig {
    #[serde(default)]
    pub development: ProfileConfig,
    #[serde(default)]
    pub production: ProfileConfig,
}

impl ModesConfig {
    pub fn for_mode(&self, mode: Mode) -> &ProfileConfig {
        match mode {
            Mode::Development => &self.development,
            Mode::Production => &self.production,
        }
    }
}

/// `[watch]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Quiet window before a batch of changes is rebuilt
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_true")]
    pub livereload: bool,

    #[serde(default = "default_livereload_port")]
    pub livereload_port: u16,

    /// File events buffered before the watcher forces a full rebuild
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            livereload: true,
            livereload_port: default_livereload_port(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    100
}

fn default_livereload_port() -> u16 {
    35729
}

fn default_queue_capacity() -> usize {
    1024
}

/// `[[copy]]`: files copied verbatim into the output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyConfig {
    /// Project-relative source directory
    pub from: String,
    /// Output-relative target directory
    #[serde(default)]
    pub to: String,
}

/// `[ui]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub color: ColorMode,

    #[serde(default = "default_true")]
    pub unicode: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::default(),
            unicode: true,
        }
    }
}

/// Color output mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Mode used when neither the CLI nor `SHEAF_MODE` picks one
    #[serde(default)]
    pub mode: Option<Mode>,

    /// Worker threads for module transforms; 0 lets rayon decide
    #[serde(default)]
    pub jobs: usize,

    /// Logical entry name to project-relative specifier
    #[serde(default)]
    pub entry: BTreeMap<String, String>,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub resolve: ResolveConfig,

    #[serde(default)]
    pub rules: Vec<RuleConfig>,

    #[serde(default)]
    pub split: SplitConfig,

    /// Identifier to literal replacement text
    #[serde(default)]
    pub define: BTreeMap<String, String>,

    #[serde(default)]
    pub optimization: OptimizationConfig,

    #[serde(default)]
    pub modes: ModesConfig,

    #[serde(default)]
    pub watch: WatchConfig,

    #[serde(default)]
    pub copy: Vec<CopyConfig>,

    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> SheafResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> SheafResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Apply environment variable overrides (SHEAF_* prefix)
    pub fn with_env_overrides(self) -> SheafResult<Self> {
        loader::with_env_overrides(self)
    }
}
