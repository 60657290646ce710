//! Sheaf CLI - asset bundler
//!
//! Usage: sheaf [--json] [-v...] [--color WHEN] <COMMAND>
//!
//! Commands:
//!   build    Build the project once
//!   watch    Build, then rebuild on every change
//!   graph    Print modules, edges, chunks and cycle diagnostics
//!   resolve  Resolve a specifier the way an import would

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod ui;

use cli::{Cli, Commands};
use commands::project::Globals;

/// `SHEAF_LOG` wins; otherwise the `-v` count picks the level.
fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("SHEAF_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let globals = Globals {
        json: cli.json,
        verbose: cli.verbose,
        color: cli.color,
    };

    match cli.command {
        Commands::Build { project, mode } => commands::build::cmd_build(&project, mode, globals),
        Commands::Watch {
            project,
            mode,
            port,
            no_livereload,
        } => commands::watch::cmd_watch(
            commands::watch::WatchArgs {
                project: &project,
                mode,
                port,
                no_livereload,
            },
            globals,
        )
        .map(|()| true),
        Commands::Graph { project } => commands::graph::cmd_graph(&project, globals),
        Commands::Resolve {
            specifier,
            from,
            project,
        } => commands::resolve::cmd_resolve(&specifier, &from, &project, globals),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json = cli.json;
    let command = match &cli.command {
        Commands::Build { .. } => "build",
        Commands::Watch { .. } => "watch",
        Commands::Graph { .. } => "graph",
        Commands::Resolve { .. } => "resolve",
    };

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            if json {
                let _ = ui::json::emit_event(&ui::json::ErrorEvent::new(command, format!("{:#}", err)));
            } else {
                eprintln!("Error: {:#}", err);
            }
            ExitCode::FAILURE
        }
    }
}
