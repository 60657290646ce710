//! Resolved build options
//!
//! [`BuildOptions::resolve`] turns a [`Config`] into the explicit option
//! objects every pipeline stage takes: paths anchored at the project root,
//! regexes compiled, and mode-dependent switches fixed for this build.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use regex::Regex;

use crate::domain::ports::transform::AssetMode;
use crate::domain::services::resolver::normalize;
use crate::domain::services::{
    EmitOptions, GraphSettings, ResolveOptions, Rule, SplitGroup, SplitPolicy,
};
use crate::domain::value_objects::Mode;
use crate::error::{SheafError, SheafResult};

use super::types::{Config, ProfileConfig, RuleConfig};

/// Mode-sensitive switches, resolved once per build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeProfile {
    pub content_hash: bool,
    pub minify_scripts: bool,
    pub minify_styles: bool,
    pub optimize_images: bool,
    /// Write `.gz` siblings of text assets
    pub compress: bool,
    /// Precede each module registration with a comment naming it
    pub module_comments: bool,
    /// Write a `.map` sibling of every chunk script
    pub source_maps: bool,
}

impl ModeProfile {
    /// Built-in profile of a mode.
    pub fn defaults(mode: Mode) -> Self {
        let prod = mode.is_production();
        Self {
            content_hash: prod,
            minify_scripts: prod,
            minify_styles: prod,
            optimize_images: prod,
            compress: false,
            module_comments: !prod,
            source_maps: !prod,
        }
    }

    /// Overlay the keys set in a `[modes.<mode>]` table.
    pub fn apply(self, overrides: &ProfileConfig) -> Self {
        Self {
            content_hash: overrides.content_hash.unwrap_or(self.content_hash),
            minify_scripts: overrides.minify_scripts.unwrap_or(self.minify_scripts),
            minify_styles: overrides.minify_styles.unwrap_or(self.minify_styles),
            optimize_images: overrides.optimize_images.unwrap_or(self.optimize_images),
            compress: overrides.compress.unwrap_or(self.compress),
            module_comments: overrides.module_comments.unwrap_or(self.module_comments),
            source_maps: overrides.source_maps.unwrap_or(self.source_maps),
        }
    }
}

/// Watch controller settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchOptions {
    pub debounce: Duration,
    /// `None` disables the live-reload endpoint
    pub livereload_port: Option<u16>,
    pub queue_capacity: usize,
}

/// Files under `from` copied verbatim below `to` in the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyPattern {
    pub from: PathBuf,
    pub to: String,
}

/// Everything one build needs, with no further lookups.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub root: PathBuf,
    pub mode: Mode,
    pub profile: ModeProfile,
    /// `(logical name, project-relative specifier)`, sorted by name
    pub entries: Vec<(String, String)>,
    pub out_dir: PathBuf,
    pub clean: bool,
    pub graph: GraphSettings,
    pub resolve: ResolveOptions,
    pub rules: Vec<Rule>,
    pub split: SplitPolicy,
    pub emit: EmitOptions,
    pub copy: Vec<CopyPattern>,
    pub watch: WatchOptions,
}

impl BuildOptions {
    /// Resolve `config` for a build of `root` in `mode`.
    pub fn resolve(config: &Config, root: &Path, mode: Mode) -> SheafResult<Self> {
        let profile = ModeProfile::defaults(mode).apply(config.modes.for_mode(mode));

        let mut define: BTreeMap<String, String> = config.define.clone();
        define
            .entry("process.env.NODE_ENV".to_string())
            .or_insert_with(|| format!("\"{}\"", mode.as_str()));

        let rules = config
            .rules
            .iter()
            .map(compile_rule)
            .collect::<SheafResult<Vec<_>>>()?;

        let groups = config
            .split
            .groups
            .iter()
            .map(|g| -> SheafResult<SplitGroup> {
                let mut group = SplitGroup::new(g.name.clone(), g.min_roots.max(1));
                group.test = g.test.as_deref().map(Regex::new).transpose()?;
                Ok(group)
            })
            .collect::<SheafResult<Vec<_>>>()?;

        let alias = config
            .resolve
            .alias
            .iter()
            .map(|(key, target)| (key.clone(), root.join(target)))
            .collect();

        // `clean` empties this directory, so it may never contain the sources
        let out_dir = normalize(&root.join(&config.output.path));
        if root.starts_with(&out_dir) {
            return Err(SheafError::InvalidConfig {
                file: PathBuf::from("output.path"),
                message: "output directory must not be the project root or one of its ancestors"
                    .to_string(),
            });
        }

        Ok(Self {
            root: root.to_path_buf(),
            mode,
            profile,
            entries: config
                .entry
                .iter()
                .map(|(name, spec)| (name.clone(), spec.clone()))
                .collect(),
            out_dir,
            clean: config.output.clean,
            graph: GraphSettings {
                root: root.to_path_buf(),
                mode,
                define,
                asset_mode: AssetMode::Auto,
                inline_limit: config.optimization.inline_limit,
                jobs: config.jobs,
            },
            resolve: ResolveOptions {
                extensions: config.resolve.extensions.clone(),
                alias,
                modules: config.resolve.modules.clone(),
                main_fields: config.resolve.main_fields.clone(),
            },
            rules,
            split: SplitPolicy {
                enabled: config.split.enabled,
                require_dag: config.split.require_dag,
                groups,
            },
            emit: EmitOptions {
                filename: config.output.filename.clone(),
                chunk_filename: config.output.chunk_filename.clone(),
                css_filename: config.output.css_filename.clone(),
                asset_filename: config.output.asset_filename.clone(),
                manifest: config.output.manifest.clone(),
                public_path: config.output.public_path.clone(),
                content_hash: profile.content_hash,
                module_comments: profile.module_comments,
                source_maps: profile.source_maps,
                require_dag: config.split.require_dag,
            },
            copy: config
                .copy
                .iter()
                .map(|c| CopyPattern {
                    from: root.join(&c.from),
                    to: c.to.trim_matches('/').to_string(),
                })
                .collect(),
            watch: WatchOptions {
                debounce: Duration::from_millis(config.watch.debounce_ms),
                livereload_port: config
                    .watch
                    .livereload
                    .then_some(config.watch.livereload_port),
                queue_capacity: config.watch.queue_capacity.max(1),
            },
        })
    }
}

fn compile_rule(config: &RuleConfig) -> SheafResult<Rule> {
    let units = if !config.units.is_empty() {
        config.units.clone()
    } else if config.asset.is_some() {
        vec!["asset".to_string()]
    } else {
        return Err(SheafError::InvalidConfig {
            file: PathBuf::from("rules"),
            message: format!("rule '{}' needs a `use` list or an `asset` kind", config.test),
        });
    };

    let mut rule = Rule::new(Regex::new(&config.test)?, units);
    rule.exclude = config
        .exclude
        .iter()
        .map(|e| Regex::new(e))
        .collect::<Result<_, _>>()?;
    rule.resource_query = config.resource_query.as_deref().map(Regex::new).transpose()?;
    rule.asset = config.asset;
    rule.filename = config.filename.clone();
    Ok(rule)
}
