//! Diff command
//!
//! Usage: deltaview diff <LEFT> <RIGHT> [--format text|html|json|summary] [--hide-unchanged]

use super::{ensure_single_stdin, read_input, write_output, CommandResult};
use clap::{Args, ValueEnum};
use deltaview_core::render::{render_document, render_error_html};
use deltaview_core::{open_session_from_bytes, ArrayStrategy, ViewerConfig};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Indented tree with +/-/~ markers
    Text,
    /// Standalone HTML page (or fragment with --fragment)
    Html,
    /// The delta itself
    Json,
    /// Markdown summary
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Lcs,
    Positional,
}

impl From<StrategyArg> for ArrayStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Lcs => ArrayStrategy::Lcs,
            StrategyArg::Positional => ArrayStrategy::Positional,
        }
    }
}

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Older snapshot (`-` for stdin)
    pub left: PathBuf,

    /// Newer snapshot (`-` for stdin)
    pub right: PathBuf,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Start with unchanged nodes hidden
    #[arg(long)]
    pub hide_unchanged: bool,

    /// Array alignment strategy (overrides the config file)
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Id of the HTML container element
    #[arg(long, default_value = "deltaview")]
    pub container_id: String,

    /// Emit only the HTML container, without the page around it
    #[arg(long)]
    pub fragment: bool,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute diff command
pub fn execute(args: DiffArgs, mut config: ViewerConfig) -> CommandResult {
    if let Some(strategy) = args.strategy {
        config.array_strategy = strategy.into();
    }
    if args.hide_unchanged {
        config.show_unchanged = false;
    }

    let opened = ensure_single_stdin(&args.left, &args.right)
        .and_then(|()| Ok((read_input(&args.left)?, read_input(&args.right)?)))
        .and_then(|(left, right)| open_session_from_bytes(&left, &right, &config));

    let session = match opened {
        Ok(session) => session,
        Err(err) => {
            // The host still gets a visible error state in place of the tree.
            if args.format == OutputFormat::Html {
                let panel = render_error_html(&err, &args.container_id);
                write_output(args.output.as_deref(), &wrap_html(panel, args.fragment))?;
            }
            return Err(err.into());
        }
    };

    let rendered = match args.format {
        OutputFormat::Text => session.render_text(),
        OutputFormat::Html => wrap_html(session.render_html(&args.container_id), args.fragment),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(session.delta())?;
            json.push('\n');
            json
        }
        OutputFormat::Summary => session.render_summary(),
    };

    write_output(args.output.as_deref(), &rendered)
}

fn wrap_html(fragment: String, fragment_only: bool) -> String {
    if fragment_only {
        fragment
    } else {
        render_document(&fragment, "Delta")
    }
}
