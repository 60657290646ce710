use anyhow::Result;
use sheaf::{GraphReport, Mode};

use crate::cli::ProjectArgs;
use crate::commands::project::{Globals, Project};
use crate::ui::blocks::error::ErrorBlock;
use crate::ui::json::{emit_event, DataEvent, FailedEvent};
use crate::ui::views::graph::render_graph;

/// Print the module graph and its chunks without writing output.
pub fn cmd_graph(args: &ProjectArgs, globals: Globals) -> Result<bool> {
    let project = Project::open("graph", args, globals)?;
    let ui = project.ui;
    let mode = project.mode(None, Mode::Production);
    let pipeline = project.pipeline(project.options(mode)?)?;

    match pipeline.plan() {
        Ok((graph, chunks)) => {
            let report = GraphReport::new(&graph, &chunks);
            if ui.json {
                emit_event(&DataEvent::new("graph", "graph", &report))?;
            } else {
                print!("{}", render_graph(&report, ui.color, ui.unicode));
            }
            Ok(true)
        }
        Err(err) => {
            if ui.json {
                emit_event(&FailedEvent::new("graph", err.flatten()))?;
            } else {
                eprint!("{}", ErrorBlock::from_error(&err).render(ui.color, ui.unicode));
            }
            Ok(false)
        }
    }
}
