//! DeltaView CLI
//!
//! Command-line interface for comparing JSON snapshots

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "deltaview")]
#[command(about = "DeltaView - Structural deltas between JSON snapshots", long_about = None)]
struct Cli {
    /// Viewer configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit operation logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit operation logs on stderr as JSON (implies --verbose)
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare two snapshots and render the delta
    Diff(commands::diff::DiffArgs),
    /// Apply a delta to the left snapshot
    Apply(commands::patch::ApplyArgs),
    /// Undo a delta on the right snapshot
    Revert(commands::patch::RevertArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = commands::load_config(cli.config.as_deref()).and_then(|config| {
        commands::init_logging(&config, cli.verbose, cli.log_json);
        match cli.command {
            Commands::Diff(args) => commands::diff::execute(args, config),
            Commands::Apply(args) => commands::patch::execute_apply(args),
            Commands::Revert(args) => commands::patch::execute_revert(args),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
