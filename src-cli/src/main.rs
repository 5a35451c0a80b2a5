use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use serde::Serialize;

use comment_overlay::{ExternalComment, LinterMessage};
use linemark_cli::commands::{self, NavigateInput, ViewInput, WindowInput};
use linemark_cli::config::load_config;
use linemark_cli::input::{read_json, read_optional_json};
use linemark_core::models::external::{ExternalDiff, ExternalVersion};
use linemark_types::{RelativePathPosition, VersionId};

#[derive(Parser)]
#[command(
    name = "lmk",
    about = "Line anchors, change navigation and row windows for add-on code review"
)]
struct Cli {
    /// Viewer config file (defaults to the global config, if any)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// JSON inputs are read from a file path, or stdin for `-`.
#[derive(Subcommand)]
enum Command {
    /// Anchor id and fragment of a line
    Anchor { line: u32 },
    /// Line number of an anchor id or fragment
    Line { anchor: String },
    /// Anchors of the changed regions of a diff
    Anchors {
        #[arg(long)]
        diff: PathBuf,
        #[arg(long)]
        base: VersionId,
        #[arg(long)]
        head: VersionId,
    },
    /// Where the next (or previous) change is, from the selected file of a version
    Navigate {
        #[arg(long)]
        version: PathBuf,
        /// Diff of the selected file; defaults to the diff embedded in the version
        #[arg(long)]
        diff: Option<PathBuf>,
        #[arg(long)]
        base: VersionId,
        /// Current anchor, without `#`
        #[arg(long)]
        anchor: Option<String>,
        #[arg(long)]
        previous: bool,
    },
    /// Badge status of a file or directory
    Status {
        #[arg(long)]
        version: PathBuf,
        #[arg(long)]
        base: Option<VersionId>,
        path: String,
    },
    /// Rows to mount for a scroll position
    Window {
        #[arg(long)]
        rows: usize,
        #[arg(long, default_value_t = 0.0)]
        scroll_top: f64,
        #[arg(long)]
        viewport: f64,
        /// JSON array of measured heights of the first rows
        #[arg(long)]
        heights: Option<PathBuf>,
        #[arg(long)]
        width: Option<f64>,
    },
    /// Mounted code rows of the selected file with linter messages and comments
    View {
        #[arg(long)]
        version: PathBuf,
        #[arg(long)]
        diff: Option<PathBuf>,
        #[arg(long)]
        base: Option<VersionId>,
        #[arg(long)]
        linter: Option<PathBuf>,
        #[arg(long)]
        comments: Option<PathBuf>,
        /// Current location hash, e.g. `#L12`
        #[arg(long, default_value = "")]
        hash: String,
        #[arg(long)]
        scroll_top: Option<f64>,
        #[arg(long, default_value_t = 600.0)]
        viewport: f64,
        /// Render files past the slow-loading threshold in full
        #[arg(long)]
        allow_slow_pages: bool,
    },
    /// Key of a comment location
    CommentKey {
        #[arg(long)]
        file: Option<String>,
        #[arg(long)]
        line: Option<u32>,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .init();
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    log::debug!("viewer config: {config:?}");

    match cli.command {
        Command::Anchor { line } => print_json(&commands::anchor(line)),
        Command::Line { anchor } => print_json(&commands::line(&anchor)),
        Command::Anchors { diff, base, head } => {
            let diff: ExternalDiff = read_json(&diff)?;
            print_json(&commands::anchors(&diff, base, head))
        }
        Command::Navigate {
            version,
            diff,
            base,
            anchor,
            previous,
        } => {
            let version: ExternalVersion = read_json(&version)?;
            let diff: Option<ExternalDiff> = read_optional_json(diff.as_deref())?;
            let position = if previous {
                RelativePathPosition::Previous
            } else {
                RelativePathPosition::Next
            };
            let outcome = commands::navigate(&NavigateInput {
                version: &version,
                diff: diff.as_ref().or(version.file.diff.as_ref()),
                base,
                anchor: anchor.as_deref(),
                position,
            })?;
            print_json(&outcome)
        }
        Command::Status {
            version,
            base,
            path,
        } => {
            let version: ExternalVersion = read_json(&version)?;
            print_json(&commands::status(&version, base, &path))
        }
        Command::Window {
            rows,
            scroll_top,
            viewport,
            heights,
            width,
        } => {
            let heights: Vec<f64> = read_optional_json(heights.as_deref())?.unwrap_or_default();
            let output = commands::window(
                config.row_host_config(),
                &WindowInput {
                    rows,
                    scroll_top,
                    viewport,
                    heights: &heights,
                    width,
                },
            )?;
            print_json(&output)
        }
        Command::View {
            version,
            diff,
            base,
            linter,
            comments,
            hash,
            scroll_top,
            viewport,
            allow_slow_pages,
        } => {
            let version: ExternalVersion = read_json(&version)?;
            let diff: Option<ExternalDiff> = read_optional_json(diff.as_deref())?;
            let linter: Vec<LinterMessage> =
                read_optional_json(linter.as_deref())?.unwrap_or_default();
            let comments: Vec<ExternalComment> =
                read_optional_json(comments.as_deref())?.unwrap_or_default();

            let mut options = config.code_view_options();
            options.allow_slow_pages |= allow_slow_pages;

            let output = commands::view(
                &ViewInput {
                    version: &version,
                    diff: diff.as_ref().or(version.file.diff.as_ref()),
                    base,
                    linter: &linter,
                    comments: &comments,
                    location_hash: &hash,
                    scroll_top,
                    viewport,
                },
                options,
                config.code_row_host_config(),
            )?;
            print_json(&output)
        }
        Command::CommentKey { file, line } => {
            print_json(&commands::comment_key(file.as_deref(), line)?)
        }
    }
}
