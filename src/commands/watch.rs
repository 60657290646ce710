use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use sheaf::domain::ports::ReloadNotifier;
use sheaf::infrastructure::{LiveReloadServer, ReloadHub};
use sheaf::{Mode, WatchEvent, WatchUseCase};

use crate::cli::ProjectArgs;
use crate::commands::project::{Globals, Project};
use crate::ui::views::watch::{render_watch_event, render_watch_header};

pub struct WatchArgs<'a> {
    pub project: &'a ProjectArgs,
    pub mode: Option<Mode>,
    pub port: Option<u16>,
    pub no_livereload: bool,
}

pub fn cmd_watch(args: WatchArgs<'_>, globals: Globals) -> Result<()> {
    let project = Project::open("watch", args.project, globals)?;
    let ui = project.ui;
    let mode = project.mode(args.mode, Mode::Development);
    let mut options = project.options(mode)?;
    if args.no_livereload {
        options.watch.livereload_port = None;
    } else if let Some(port) = args.port {
        options.watch.livereload_port = Some(port);
    }

    let running = Arc::new(AtomicBool::new(true));
    let cancel = Arc::new(AtomicBool::new(false));
    let livereload_port = options.watch.livereload_port;
    let pipeline = project.pipeline(options)?.with_cancel(cancel.clone());

    let hub = Arc::new(ReloadHub::new());
    // Kept alive for the whole session; dropping it stops the endpoint.
    let server = match livereload_port {
        Some(port) => Some(LiveReloadServer::start(port, hub.clone())?),
        None => None,
    };

    let notifier: Arc<dyn ReloadNotifier> = hub;
    let mut use_case = WatchUseCase::new(pipeline, notifier);
    if let Some(server) = &server {
        use_case = use_case.with_livereload_url(server.script_url());
    }

    // Ctrl+C stops the loop and aborts a build in flight
    let running_clone = running.clone();
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
        cancel.store(true, Ordering::SeqCst);
    })
    .context("failed to install Ctrl+C handler")?;

    if !ui.json {
        print!(
            "{}",
            render_watch_header(&project.root.display().to_string(), mode.as_str(), ui.color, ui.unicode)
        );
    }

    use_case.start(running, |event| {
        if ui.json {
            println!("{}", event.to_json());
            return;
        }
        let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();
        let rendered = render_watch_event(&timestamp, &event, ui.color, ui.unicode);
        match event {
            WatchEvent::Error { .. } | WatchEvent::BuildFailed { .. } => eprint!("{rendered}"),
            _ => print!("{rendered}"),
        }
    })?;

    drop(server);
    Ok(())
}
