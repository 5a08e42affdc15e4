//! Subcommands and the input/output plumbing they share.

pub mod diff;
pub mod patch;

use deltaview_core::errors::{DeltaViewError, ExError, ExErrorKind};
use deltaview_core::logging_facility::{self, Profile};
use deltaview_core::ViewerConfig;
use std::io::{Read, Write};
use std::path::Path;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Path argument naming standard input
const STDIN_PATH: &str = "-";

pub fn load_config(path: Option<&Path>) -> Result<ViewerConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(ViewerConfig::load(path)?),
        None => Ok(ViewerConfig::default()),
    }
}

/// Logging stays off unless asked for, keeping stderr free for errors.
pub fn init_logging(config: &ViewerConfig, verbose: bool, log_json: bool) {
    if log_json {
        logging_facility::init(Profile::Production);
    } else if verbose {
        logging_facility::init(config.log_profile);
    }
}

pub(crate) fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == STDIN_PATH
}

/// Reject invocations that would read standard input twice.
pub(crate) fn ensure_single_stdin(a: &Path, b: &Path) -> Result<(), ExError> {
    if is_stdin(a) && is_stdin(b) {
        return Err(ExError::new(ExErrorKind::InvalidInput)
            .with_op("read_input")
            .with_message("only one input can be read from stdin"));
    }
    Ok(())
}

/// Read a file, or standard input for `-`, as raw bytes.
///
/// Decoding is left to the snapshot parser so bad UTF-8 surfaces as a
/// parse error for its side.
pub(crate) fn read_input(path: &Path) -> Result<Vec<u8>, ExError> {
    let read = if is_stdin(path) {
        let mut bytes = Vec::new();
        std::io::stdin().read_to_end(&mut bytes).map(|_| bytes)
    } else {
        std::fs::read(path)
    };
    read.map_err(|e| {
        ExError::from(DeltaViewError::from(e))
            .with_op("read_input")
            .with_path(path.display().to_string())
    })
}

/// Write to a file, or standard output when no path is given.
pub(crate) fn write_output(output: Option<&Path>, content: &str) -> CommandResult {
    match output {
        Some(path) => {
            std::fs::write(path, content)?;
            tracing::debug!(path = %path.display(), bytes = content.len(), "output written");
            println!("✓ Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
