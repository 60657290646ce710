use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use sheaf::{Mode, ModuleId};

use crate::cli::ProjectArgs;
use crate::commands::project::{Globals, Project};
use crate::ui::json::emit_event;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

#[derive(Debug, Serialize)]
struct ResolvedEvent<'a> {
    event: &'static str,
    command: &'static str,
    specifier: &'a str,
    from: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    resolved: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Resolve `specifier` as if imported from `from`. Returns `false` when
/// nothing matched.
pub fn cmd_resolve(specifier: &str, from: &Path, args: &ProjectArgs, globals: Globals) -> Result<bool> {
    let project = Project::open("resolve", args, globals)?;
    let ui = project.ui;
    let mode = project.mode(None, Mode::Production);
    let pipeline = project.pipeline(project.options(mode)?)?;

    let importer = std::fs::canonicalize(from)
        .or_else(|_| std::fs::canonicalize(project.root.join(from)))
        .with_context(|| format!("importing file not found: {}", from.display()))?;
    let importer = ModuleId::new(importer);
    let result = pipeline.resolve(specifier, &importer);

    let from_name = importer.display_name(&project.root);
    if ui.json {
        let (resolved, error) = match &result {
            Ok(id) => (Some(id.display_name(&project.root)), None),
            Err(e) => (None, Some(e.to_string())),
        };
        emit_event(&ResolvedEvent {
            event: "resolved",
            command: "resolve",
            specifier,
            from: from_name,
            resolved,
            error,
        })?;
        return Ok(result.is_ok());
    }

    match result {
        Ok(id) => {
            println!(
                "{} {} {}",
                Icon::Resolve.colored(ui.color, ui.unicode),
                ColoredText::dim(format!("{} from {}:", specifier, from_name)).render(ui.color),
                ColoredText::success(id.display_name(&project.root)).render(ui.color)
            );
            Ok(true)
        }
        Err(e) => {
            eprintln!("{} {}", Icon::Error.colored(ui.color, ui.unicode), e);
            Ok(false)
        }
    }
}
