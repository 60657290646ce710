use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use sheaf::Mode;

/// Sheaf - asset bundler with code splitting and live reload
#[derive(Parser, Debug)]
#[command(name = "sheaf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output NDJSON events instead of human text
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Color output
    #[arg(long, value_enum, global = true)]
    pub color: Option<ColorWhen>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// Where the project is and which config describes it
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ProjectArgs {
    /// Project root directory
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Config file (default: <root>/sheaf.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the project once
    Build {
        #[command(flatten)]
        project: ProjectArgs,

        /// Build mode (default: production)
        #[arg(long)]
        mode: Option<Mode>,
    },

    /// Build, then rebuild on every change
    Watch {
        #[command(flatten)]
        project: ProjectArgs,

        /// Build mode (default: development)
        #[arg(long)]
        mode: Option<Mode>,

        /// Live-reload port
        #[arg(long)]
        port: Option<u16>,

        /// Disable the live-reload endpoint
        #[arg(long)]
        no_livereload: bool,
    },

    /// Print modules, edges, chunks and cycle diagnostics
    Graph {
        #[command(flatten)]
        project: ProjectArgs,
    },

    /// Resolve a specifier the way an import would
    Resolve {
        /// Specifier as written in an import
        specifier: String,

        /// Importing file
        #[arg(long)]
        from: PathBuf,

        #[command(flatten)]
        project: ProjectArgs,
    },
}
