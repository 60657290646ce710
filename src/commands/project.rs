use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sheaf::config::{self, Config, ConfigWarning};
use sheaf::infrastructure::LocalFs;
use sheaf::{BuildOptions, Mode, Pipeline};

use crate::cli::{ColorWhen, ProjectArgs};
use crate::ui::context::UiContext;
use crate::ui::json::{emit_event, ConfigWarningEvent};
use crate::ui::primitives::icon::Icon;

/// A project root with its loaded config.
pub(crate) struct Project {
    pub root: PathBuf,
    pub config: Config,
    pub ui: UiContext,
}

/// Global flags shared by every command.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Globals {
    pub json: bool,
    pub verbose: u8,
    pub color: Option<ColorWhen>,
}

impl Project {
    /// Canonicalize the root, load its config and report config warnings.
    pub(crate) fn open(command: &str, args: &ProjectArgs, globals: Globals) -> Result<Self> {
        let root = std::fs::canonicalize(&args.root)
            .with_context(|| format!("project root not found: {}", args.root.display()))?;
        let loaded = config::load(&root, args.config.as_deref())?;
        let ui = UiContext::new(globals.json, globals.verbose, globals.color, &loaded.config);
        report_warnings(command, &loaded.warnings, &ui)?;
        Ok(Self {
            root,
            config: loaded.config,
            ui,
        })
    }

    /// CLI flag, then `SHEAF_MODE` or the config's `mode`, then the command default.
    pub(crate) fn mode(&self, flag: Option<Mode>, default: Mode) -> Mode {
        select_mode(flag, self.config.mode, default)
    }

    pub(crate) fn options(&self, mode: Mode) -> Result<BuildOptions> {
        Ok(BuildOptions::resolve(&self.config, &self.root, mode)?)
    }

    pub(crate) fn pipeline(&self, options: BuildOptions) -> Result<Pipeline> {
        Ok(Pipeline::standard(options, Arc::new(LocalFs::new()))?)
    }
}

pub(crate) fn select_mode(flag: Option<Mode>, configured: Option<Mode>, default: Mode) -> Mode {
    flag.or(configured).unwrap_or(default)
}

fn report_warnings(command: &str, warnings: &[ConfigWarning], ui: &UiContext) -> Result<()> {
    for warning in warnings {
        if ui.json {
            emit_event(&ConfigWarningEvent::new(command, warning))?;
            continue;
        }
        eprintln!("{} {}", Icon::Warning.colored(ui.color, ui.unicode), warning);
    }
    Ok(())
}
