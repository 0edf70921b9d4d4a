use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::diff::DiffRow;

pub const SCHEMA_VERSION: u32 = 1;

/// Line counts of one file as seen by a single scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeasurement {
    pub filename: String,
    pub total_lines: u32,
    pub non_empty_lines: u32,
}

impl FileMeasurement {
    pub fn new(filename: impl Into<String>, total_lines: u32, non_empty_lines: u32) -> Self {
        Self {
            filename: filename.into(),
            total_lines,
            non_empty_lines,
        }
    }

    pub fn code_percent(&self) -> f64 {
        percent(self.non_empty_lines as u64, self.total_lines as u64)
    }
}

/// A stored snapshot. `timestamp` is kept exactly as persisted
/// (`YYYY-MM-DDTHH:MM:SS`, local time).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: i64,
    pub timestamp: String,
    pub files: Vec<FileMeasurement>,
}

impl Snapshot {
    /// Calendar date portion of the timestamp, no timezone conversion.
    pub fn date(&self) -> &str {
        self.timestamp
            .split_once('T')
            .map(|(date, _)| date)
            .unwrap_or(&self.timestamp)
    }

    pub fn totals(&self) -> Totals {
        Totals::of(&self.files)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub total_lines: u64,
    pub non_empty_lines: u64,
}

impl Totals {
    pub fn of(files: &[FileMeasurement]) -> Self {
        files.iter().fold(Self::default(), |acc, f| Self {
            total_lines: acc.total_lines + f.total_lines as u64,
            non_empty_lines: acc.non_empty_lines + f.non_empty_lines as u64,
        })
    }

    pub fn code_percent(&self) -> f64 {
        percent(self.non_empty_lines, self.total_lines)
    }
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// A file the counter could not read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub filename: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanResult {
    pub files: Vec<FileMeasurement>,
    pub total_lines: u64,
    pub total_non_empty: u64,
    pub skipped: Vec<SkippedFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub directory: String,
    pub created: bool,
    pub snapshot_id: Option<i64>,
    pub timestamp: Option<String>,
    pub error: Option<String>,
    pub snapshot_count: usize,
    pub total_lines: u64,
    pub total_non_empty: u64,
    pub skipped: Vec<SkippedFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub number: usize,
    pub id: i64,
    pub timestamp: String,
    pub last_of_day: bool,
    pub weekday: String,
    pub total_lines: u64,
    pub non_empty_lines: u64,
    pub files: Vec<FileMeasurement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub directory: String,
    pub snapshots: Vec<SnapshotEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub directory: String,
    /// `compared`, `no_snapshots`, `no_files` or `all_zero`.
    pub status: String,
    pub number: Option<usize>,
    pub snapshot_count: usize,
    pub snapshot_id: Option<i64>,
    pub timestamp: Option<String>,
    pub has_predecessor: bool,
    pub totals: Totals,
    pub net_change: i64,
    pub rows: Vec<DiffRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_is_text_before_separator() {
        let snap = Snapshot {
            id: 1,
            timestamp: "2024-03-05T23:59:59".to_string(),
            files: Vec::new(),
        };
        assert_eq!(snap.date(), "2024-03-05");
    }

    #[test]
    fn date_of_malformed_timestamp_is_whole_string() {
        let snap = Snapshot {
            id: 1,
            timestamp: "yesterday".to_string(),
            files: Vec::new(),
        };
        assert_eq!(snap.date(), "yesterday");
    }

    #[test]
    fn totals_sum_both_counts() {
        let files = vec![
            FileMeasurement::new("a.py", 10, 8),
            FileMeasurement::new("b.c", 5, 5),
        ];
        let totals = Totals::of(&files);
        assert_eq!(totals.total_lines, 15);
        assert_eq!(totals.non_empty_lines, 13);
    }

    #[test]
    fn code_percent_handles_empty_file() {
        assert_eq!(FileMeasurement::new("empty.h", 0, 0).code_percent(), 0.0);
        assert_eq!(FileMeasurement::new("half.h", 4, 2).code_percent(), 50.0);
    }
}
