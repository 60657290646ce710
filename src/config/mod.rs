//! Configuration module for Sheaf
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (SHEAF_MODE, SHEAF_OUT_DIR, SHEAF_JOBS)
//! 3. `--config FILE`, else project config (`<root>/sheaf.toml`)
//! 4. User config (`<config dir>/sheaf/config.toml`)
//! 5. Built-in defaults (lowest priority)

mod loader;
mod options;
mod types;

// Re-export ConfigWarning from domain layer
pub use crate::domain::value_objects::ConfigWarning;

pub use loader::{
    apply_overrides, find_config, load, parse_with_warnings, LoadedConfig, CONFIG_FILE,
};
pub use options::{BuildOptions, CopyPattern, ModeProfile, WatchOptions};
pub use types::{
    ColorMode, Config, CopyConfig, GroupConfig, ModesConfig, OptimizationConfig, OutputConfig,
    ProfileConfig, ResolveConfig, RuleConfig, SplitConfig, UiConfig, WatchConfig,
};
