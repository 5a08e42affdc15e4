//! Apply and revert commands
//!
//! Usage: deltaview apply <LEFT> <DELTA> [--output <FILE>]
//!        deltaview revert <RIGHT> <DELTA> [--output <FILE>]

use super::{ensure_single_stdin, read_input, write_output, CommandResult};
use clap::Args;
use deltaview_core::errors::{ExError, ExErrorKind};
use deltaview_core::{apply_delta, revert_delta, Delta, Side, Snapshot};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Snapshot the delta was computed from (`-` for stdin)
    pub left: PathBuf,

    /// Delta in JSON form, as written by `diff --format json` (`-` for stdin)
    pub delta: PathBuf,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct RevertArgs {
    /// Snapshot the delta produced (`-` for stdin)
    pub right: PathBuf,

    /// Delta in JSON form (`-` for stdin)
    pub delta: PathBuf,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute apply command
pub fn execute_apply(args: ApplyArgs) -> CommandResult {
    ensure_single_stdin(&args.left, &args.delta)?;
    let left = Snapshot::parse_bytes(Side::Left, &read_input(&args.left)?)?;
    let delta = read_delta(&args.delta)?;

    let right = apply_delta(left.value(), &delta)?;
    write_document(args.output.as_deref(), &right)
}

/// Execute revert command
pub fn execute_revert(args: RevertArgs) -> CommandResult {
    ensure_single_stdin(&args.right, &args.delta)?;
    let right = Snapshot::parse_bytes(Side::Right, &read_input(&args.right)?)?;
    let delta = read_delta(&args.delta)?;

    let left = revert_delta(right.value(), &delta)?;
    write_document(args.output.as_deref(), &left)
}

fn read_delta(path: &Path) -> Result<Delta, ExError> {
    let bytes = read_input(path)?;
    serde_json::from_slice(&bytes).map_err(|e| {
        ExError::new(ExErrorKind::InvalidInput)
            .with_op("read_delta")
            .with_path(path.display().to_string())
            .with_message(format!("not a delta: {}", e))
    })
}

fn write_document(output: Option<&Path>, value: &serde_json::Value) -> CommandResult {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    write_output(output, &json)
}
