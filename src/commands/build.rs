use anyhow::Result;
use sheaf::infrastructure::BuildLock;
use sheaf::{Mode, SheafError};

use crate::cli::ProjectArgs;
use crate::commands::project::{Globals, Project};
use crate::ui::blocks::error::ErrorBlock;
use crate::ui::json::{emit_event, DataEvent, FailedEvent, StartEvent};
use crate::ui::views::build::{render_build_header, render_build_report};

/// One-shot build. Returns `false` when the build failed and the error
/// batch was already printed.
pub fn cmd_build(args: &ProjectArgs, mode: Option<Mode>, globals: Globals) -> Result<bool> {
    let project = Project::open("build", args, globals)?;
    let ui = project.ui;
    let mode = project.mode(mode, Mode::Production);
    let options = project.options(mode)?;
    let out_dir = options.out_dir.clone();

    if ui.json {
        emit_event(&StartEvent::build(mode.as_str()))?;
    } else {
        print!(
            "{}",
            render_build_header(
                &project.root.display().to_string(),
                &out_dir.display().to_string(),
                mode.as_str(),
                ui.color,
                ui.unicode
            )
        );
    }

    let pipeline = project.pipeline(options)?;
    let result = BuildLock::acquire(&out_dir).and_then(|_lock| {
        pipeline.prepare_output()?;
        pipeline.build()
    });

    match result {
        Ok((report, _state)) => {
            if ui.json {
                emit_event(&DataEvent::new("build_complete", "build", &report))?;
            } else {
                print!("{}", render_build_report(&report, ui.color, ui.unicode));
            }
            Ok(true)
        }
        Err(err) => {
            report_failure(&err, ui.json, ui.color, ui.unicode)?;
            Ok(false)
        }
    }
}

fn report_failure(err: &SheafError, json: bool, color: bool, unicode: bool) -> Result<()> {
    if json {
        emit_event(&FailedEvent::new("build", err.flatten()))?;
    } else {
        eprint!("{}", ErrorBlock::from_error(err).render(color, unicode));
    }
    Ok(())
}
