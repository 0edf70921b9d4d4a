//! Terminal and JSON output for the non-interactive commands.
//!
//! The snapshot listing is printed newest first while numbering stays
//! chronological, and only the last snapshot of each day carries its weekday.

use std::time::Duration;

use chrono::{Local, NaiveDateTime, Utc};
use console::style;

use crate::config::Config;
use crate::diff::{DiffOutcome, DiffRow, Direction, NoDataReason, SnapshotDiff};
use crate::model::{
    DiffOutput, FileMeasurement, HistoryOutput, RecordOutput, Snapshot, SnapshotEntry, Totals,
    SCHEMA_VERSION,
};
use crate::record::{RecordStatus, Recorded};
use crate::store::TIMESTAMP_FORMAT;
use crate::timeline::{annotate, TimelineEntry};

/// Width of the bar column in `diff` output.
pub const BAR_WIDTH: usize = 40;

/// Split a row's bar into `(base, added, removed)` cell counts for a bar
/// area of `width` cells where `max_extent` fills the whole area.
pub fn bar_segments(row: &DiffRow, max_extent: u64, width: usize) -> (usize, usize, usize) {
    if max_extent == 0 {
        return (0, 0, 0);
    }
    let scale = |value: u64| ((value as f64 / max_extent as f64) * width as f64).round() as usize;
    let base = scale(row.base_portion());
    let end = scale(row.extent()).max(base);
    if row.added() > 0 {
        (base, end - base, 0)
    } else if row.removed() > 0 {
        (base, 0, end - base)
    } else {
        (base, 0, 0)
    }
}

/// Human readable age of a stored timestamp relative to `now`.
pub fn format_age(timestamp: &str, now: NaiveDateTime) -> Option<String> {
    let recorded = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).ok()?;
    let secs = (now - recorded).num_seconds().max(0) as u64;
    Some(humantime::format_duration(Duration::from_secs(secs)).to_string())
}

fn directory(config: &Config) -> String {
    config.dir.to_string_lossy().to_string()
}

pub fn record_output(recorded: &Recorded, config: &Config) -> RecordOutput {
    let (created, snapshot_id, timestamp, error) = match &recorded.status {
        RecordStatus::Created { id, timestamp } => (true, Some(*id), Some(timestamp.clone()), None),
        RecordStatus::AppendFailed(e) => (false, None, None, Some(e.clone())),
        RecordStatus::Unchanged | RecordStatus::NotRecorded => (false, None, None, None),
    };
    let (total_lines, total_non_empty, skipped) = match &recorded.scan {
        Some(scan) => (scan.total_lines, scan.total_non_empty, scan.skipped.clone()),
        None => (0, 0, Vec::new()),
    };
    RecordOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        directory: directory(config),
        created,
        snapshot_id,
        timestamp,
        error,
        snapshot_count: recorded.history.len(),
        total_lines,
        total_non_empty,
        skipped,
    }
}

pub fn print_record_summary(recorded: &Recorded) {
    if let Some(scan) = &recorded.scan {
        for skipped in &scan.skipped {
            eprintln!(
                "{} {}: {}",
                style("skipped").yellow(),
                skipped.filename,
                skipped.reason
            );
        }
    }

    match &recorded.status {
        RecordStatus::Created { id, timestamp } => {
            println!("Recorded snapshot #{} at {}", style(id).cyan(), timestamp);
        }
        RecordStatus::Unchanged => {
            let age = recorded
                .history
                .last()
                .and_then(|s| format_age(&s.timestamp, Local::now().naive_local()));
            match age {
                Some(age) => println!("No changes since the last snapshot ({age} ago)"),
                None => println!("No changes since the last snapshot"),
            }
        }
        RecordStatus::NotRecorded => {}
        RecordStatus::AppendFailed(e) => {
            eprintln!("{} failed to save snapshot: {e}", style("warning:").yellow());
        }
    }

    if let Some(scan) = &recorded.scan {
        println!(
            "Total lines: {}  Non-empty: {}  Snapshots: {}",
            style(scan.total_lines).yellow(),
            style(scan.total_non_empty).green(),
            recorded.history.len()
        );
    }
}

pub fn history_output(history: &[Snapshot], config: &Config) -> HistoryOutput {
    HistoryOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        directory: directory(config),
        snapshots: snapshot_entries(history),
    }
}

pub fn snapshot_entries(history: &[Snapshot]) -> Vec<SnapshotEntry> {
    history
        .iter()
        .zip(annotate(history))
        .map(|(snapshot, entry)| {
            let totals = snapshot.totals();
            SnapshotEntry {
                number: entry.index + 1,
                id: snapshot.id,
                timestamp: snapshot.timestamp.clone(),
                last_of_day: entry.last_of_day,
                weekday: entry.weekday,
                total_lines: totals.total_lines,
                non_empty_lines: totals.non_empty_lines,
                files: snapshot.files.clone(),
            }
        })
        .collect()
}

pub fn output_history_json(history: &[Snapshot], config: &Config) -> anyhow::Result<()> {
    let output = history_output(history, config);
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn output_history_ndjson(history: &[Snapshot]) -> anyhow::Result<()> {
    for entry in snapshot_entries(history) {
        println!("{}", serde_json::to_string(&entry)?);
    }
    Ok(())
}

pub fn output_history_text(history: &[Snapshot]) -> anyhow::Result<()> {
    print!("{}", render_history(history, &annotate(history)));
    Ok(())
}

pub const EMPTY_HISTORY: &str = "No snapshots yet. Run again to create one.";
pub const TOTAL_LINES_LABEL: &str = "Total lines (including empty): ";
pub const NON_EMPTY_LINES_LABEL: &str = "Total non-empty lines:         ";

pub fn snapshot_title(snapshot: &Snapshot, entry: &TimelineEntry) -> String {
    format!("Snapshot {} - {}", entry.index + 1, snapshot.timestamp)
}

/// Column layout of one snapshot's file table, shared by the printed
/// listing and the interactive one.
pub struct FileTable {
    name_width: usize,
}

impl FileTable {
    pub fn new(files: &[FileMeasurement]) -> Self {
        let longest = files
            .iter()
            .map(|f| f.filename.chars().count())
            .max()
            .unwrap_or(0);
        Self {
            name_width: longest + 2,
        }
    }

    pub fn header(&self) -> String {
        format!(
            "{:<width$}{:>10}  {:>12}  {:>7}",
            "File",
            "Total",
            "Non-empty",
            "Code %",
            width = self.name_width
        )
    }

    /// A line of `fill` as wide as the header.
    pub fn rule(&self, fill: char) -> String {
        fill.to_string().repeat(self.header().chars().count())
    }

    /// Padded name, total, non-empty and code percentage cells; the total and
    /// non-empty cells are separated from their neighbours by two spaces.
    pub fn cells(&self, f: &FileMeasurement) -> [String; 4] {
        [
            format!("{:<width$}", f.filename, width = self.name_width),
            format!("{:>10}", f.total_lines),
            format!("{:>12}", f.non_empty_lines),
            format!("{:>6.1}%", f.code_percent()),
        ]
    }
}

/// Plain-text listing of the whole history, newest snapshot first.
pub fn render_history(history: &[Snapshot], timeline: &[TimelineEntry]) -> String {
    if history.is_empty() {
        return format!("{EMPTY_HISTORY}\n");
    }

    let mut out = String::new();
    for (snapshot, entry) in history.iter().zip(timeline).rev() {
        out.push_str(&format!(
            "{}",
            style(snapshot_title(snapshot, entry)).magenta().bold()
        ));
        if !entry.weekday.is_empty() {
            out.push_str(&format!("  {}", style(&entry.weekday).blue().bold()));
        }
        out.push('\n');

        if snapshot.files.is_empty() {
            out.push_str("(no files)\n\n");
            continue;
        }

        let table = FileTable::new(&snapshot.files);
        out.push_str(&format!("{}\n", style(table.header()).magenta()));
        out.push_str(&table.rule('-'));
        out.push('\n');

        for f in &snapshot.files {
            let [name, total, non_empty, percent] = table.cells(f);
            out.push_str(&format!(
                "{name}{}  {}  {percent}\n",
                style(total).yellow(),
                style(non_empty).green()
            ));
        }

        let totals = snapshot.totals();
        out.push('\n');
        out.push_str(&format!(
            "{TOTAL_LINES_LABEL}{}\n",
            style(totals.total_lines).yellow()
        ));
        out.push_str(&format!(
            "{NON_EMPTY_LINES_LABEL}{}\n",
            style(totals.non_empty_lines).green()
        ));
        out.push_str(&table.rule('='));
        out.push_str("\n\n");
    }
    out
}

pub fn diff_output(outcome: &DiffOutcome, snapshot_count: usize, config: &Config) -> DiffOutput {
    let mut output = DiffOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        directory: directory(config),
        status: outcome.status().to_string(),
        number: None,
        snapshot_count,
        snapshot_id: None,
        timestamp: None,
        has_predecessor: false,
        totals: Totals::default(),
        net_change: 0,
        rows: Vec::new(),
    };
    match outcome {
        DiffOutcome::NoSnapshots => {}
        DiffOutcome::NoData {
            index,
            snapshot_id,
            timestamp,
            totals,
            ..
        } => {
            output.number = Some(index + 1);
            output.snapshot_id = Some(*snapshot_id);
            output.timestamp = Some(timestamp.clone());
            output.has_predecessor = *index > 0;
            output.totals = *totals;
        }
        DiffOutcome::Compared(diff) => {
            output.number = Some(diff.index + 1);
            output.snapshot_id = Some(diff.snapshot_id);
            output.timestamp = Some(diff.timestamp.clone());
            output.has_predecessor = diff.has_predecessor;
            output.totals = diff.totals;
            output.net_change = diff.net_change();
            output.rows = diff.rows.clone();
        }
    }
    output
}

pub fn output_diff_json(outcome: &DiffOutcome, snapshot_count: usize, config: &Config) -> anyhow::Result<()> {
    let output = diff_output(outcome, snapshot_count, config);
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn output_diff_text(outcome: &DiffOutcome, snapshot_count: usize) -> anyhow::Result<()> {
    match outcome {
        DiffOutcome::NoSnapshots => println!("No snapshots available."),
        DiffOutcome::NoData {
            index,
            timestamp,
            reason,
            totals,
            ..
        } => {
            print_diff_header(*index, snapshot_count, timestamp, totals);
            match reason {
                NoDataReason::NoFiles => println!("No file data."),
                NoDataReason::AllZero => println!("All totals are zero."),
            }
        }
        DiffOutcome::Compared(diff) => print_diff_table(diff, snapshot_count),
    }
    Ok(())
}

fn print_diff_header(index: usize, snapshot_count: usize, timestamp: &str, totals: &Totals) {
    println!(
        "Showing snapshot {} of {} (timestamp {})",
        index + 1,
        snapshot_count,
        timestamp
    );
    println!(
        "{}",
        style(format!("{TOTAL_LINES_LABEL}{}", totals.total_lines)).bold()
    );
    println!(
        "{}",
        style(format!("{NON_EMPTY_LINES_LABEL}{}", totals.non_empty_lines)).bold()
    );
    println!();
}

fn change_summary(diff: &SnapshotDiff) -> String {
    format!(
        "{} grew, {} shrank, {} unchanged",
        diff.count(Direction::Grew),
        diff.count(Direction::Shrank),
        diff.count(Direction::Unchanged)
    )
}

fn print_diff_table(diff: &SnapshotDiff, snapshot_count: usize) {
    print_diff_header(diff.index, snapshot_count, &diff.timestamp, &diff.totals);

    println!(
        "  {} Baseline lines (previous snapshot, or current for the first)",
        style("█").blue()
    );
    println!("  {} New lines in this snapshot", style("█").red());
    println!("  {} Removed lines vs previous", style("█").green());
    println!();

    let name_width = diff
        .rows
        .iter()
        .map(|r| r.filename.chars().count())
        .max()
        .unwrap_or(0);

    for row in &diff.rows {
        let (base, added, removed) = bar_segments(row, diff.max_extent, BAR_WIDTH);
        let change = if diff.has_predecessor && row.delta != 0 {
            format!(" ({:+})", row.delta)
        } else {
            String::new()
        };
        println!(
            "{:>name_width$} │{}{}{} {}{}",
            row.filename,
            style("█".repeat(base)).blue(),
            style("█".repeat(added)).red(),
            style("█".repeat(removed)).green(),
            row.current_total,
            change
        );
    }

    if diff.has_predecessor {
        println!();
        println!("Net change: {:+} lines", diff.net_change());
        println!("{}", change_summary(diff));
    }
}
