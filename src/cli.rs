use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::diff::compare;
use crate::record::{record, Recorded};
use crate::report;
use crate::store::Store;

#[derive(Parser)]
#[command(name = "linehist")]
#[command(about = "Track the line count history of a source directory")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Clone, Debug)]
pub struct CommonArgs {
    #[arg(long, global = true, help = "Directory to scan (defaults to the current directory)")]
    pub dir: Option<PathBuf>,

    #[arg(long, global = true, help = "Path to the history database (defaults to <dir>/line_history.db)")]
    pub db: Option<PathBuf>,

    #[arg(long, global = true, help = "File name that is never counted (defaults to this executable)")]
    pub exclude: Option<String>,

    #[arg(long, global = true, value_delimiter = ',', help = "Extensions to count, comma separated (default: py,c,h,cpp,hpp)")]
    pub ext: Option<Vec<String>>,

    #[arg(long, global = true, help = "Only read the history, do not scan or record")]
    pub no_record: bool,

    #[arg(long, short = 'v', global = true, help = "Show debug logging on stderr")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a snapshot if anything changed, then open the interactive viewer
    View,
    /// Record a snapshot if anything changed
    Record {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    /// List every snapshot, newest first
    Snapshots {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON", conflicts_with = "json")]
        ndjson: bool,
    },
    /// Compare a snapshot with the one recorded before it
    Diff {
        #[arg(long, help = "Snapshot number, 1 = oldest (defaults to the latest)")]
        snapshot: Option<usize>,

        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
}

impl Cli {
    pub fn execute(self) -> Result<()> {
        let config = Config::from_args(&self.common).context("Failed to resolve configuration")?;

        match self.command.unwrap_or(Commands::View) {
            Commands::View => {
                let recorded = prepare(&config)?;
                crate::tui::run(recorded.history).context("Interactive viewer failed")
            }
            Commands::Record { json } => {
                let recorded = prepare(&config)?;
                if json {
                    let output = report::record_output(&recorded, &config);
                    println!("{}", serde_json::to_string_pretty(&output)?);
                } else {
                    report::print_record_summary(&recorded);
                }
                Ok(())
            }
            Commands::Snapshots { json, ndjson } => {
                let recorded = prepare(&config)?;
                if json {
                    report::output_history_json(&recorded.history, &config)
                } else if ndjson {
                    report::output_history_ndjson(&recorded.history)
                } else {
                    report::output_history_text(&recorded.history)
                }
            }
            Commands::Diff { snapshot, json } => {
                let recorded = prepare(&config)?;
                let count = recorded.history.len();
                let index = snapshot_index(snapshot, count)
                    .context("Invalid --snapshot value")?;
                let outcome = compare(&recorded.history, index);
                if json {
                    report::output_diff_json(&outcome, count, &config)
                } else {
                    report::output_diff_text(&outcome, count)
                }
            }
        }
    }
}

/// Open the store and run the record pipeline shared by every command.
fn prepare(config: &Config) -> Result<Recorded> {
    let mut store = Store::open(&config.db_path).context("Failed to open history database")?;
    record(config, &mut store).context("Failed to record line counts")
}

/// Chronological index for a 1-based snapshot number; the latest when none
/// is given. An empty history maps to 0 so the diff reports no snapshots.
fn snapshot_index(number: Option<usize>, count: usize) -> Result<usize> {
    match number {
        _ if count == 0 => Ok(0),
        None => Ok(count - 1),
        Some(n) if (1..=count).contains(&n) => Ok(n - 1),
        Some(n) => bail!("snapshot {n} does not exist, the history holds snapshots 1 to {count}"),
    }
}
