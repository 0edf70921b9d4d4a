//! Snapshot comparison engine.
//!
//! Compares the viewed snapshot against the one recorded just before it:
//! - Rows cover the union of filenames in both snapshots, sorted by name
//! - Each row is classified as grew, shrank or unchanged
//! - The earliest snapshot is compared against itself (no direction)
//! - Degenerate inputs are reported explicitly instead of as empty rows

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::{Snapshot, Totals};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Grew,
    Shrank,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRow {
    pub filename: String,
    pub baseline_total: u64,
    pub current_total: u64,
    pub delta: i64,
    pub direction: Direction,
}

impl DiffRow {
    pub fn new(filename: String, baseline_total: u64, current_total: u64) -> Self {
        let delta = current_total as i64 - baseline_total as i64;
        let direction = match delta {
            d if d > 0 => Direction::Grew,
            d if d < 0 => Direction::Shrank,
            _ => Direction::Unchanged,
        };
        Self {
            filename,
            baseline_total,
            current_total,
            delta,
            direction,
        }
    }

    /// Lines present in both snapshots: the previous total when the file
    /// grew, the current total otherwise.
    pub fn base_portion(&self) -> u64 {
        self.baseline_total.min(self.current_total)
    }

    pub fn added(&self) -> u64 {
        self.delta.max(0) as u64
    }

    pub fn removed(&self) -> u64 {
        (-self.delta).max(0) as u64
    }

    /// Length of the full bar: the larger of both totals.
    pub fn extent(&self) -> u64 {
        self.baseline_total.max(self.current_total)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotDiff {
    pub index: usize,
    pub snapshot_id: i64,
    pub timestamp: String,
    pub has_predecessor: bool,
    pub rows: Vec<DiffRow>,
    pub totals: Totals,
    pub max_extent: u64,
}

impl SnapshotDiff {
    pub fn net_change(&self) -> i64 {
        self.rows.iter().map(|r| r.delta).sum()
    }

    pub fn count(&self, direction: Direction) -> usize {
        self.rows.iter().filter(|r| r.direction == direction).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoDataReason {
    /// Neither snapshot holds any file.
    NoFiles,
    /// Files exist but every total is zero, so there is no scale.
    AllZero,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DiffOutcome {
    NoSnapshots,
    NoData {
        index: usize,
        snapshot_id: i64,
        timestamp: String,
        reason: NoDataReason,
        totals: Totals,
    },
    Compared(SnapshotDiff),
}

impl DiffOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            DiffOutcome::NoSnapshots => "no_snapshots",
            DiffOutcome::NoData { reason: NoDataReason::NoFiles, .. } => "no_files",
            DiffOutcome::NoData { reason: NoDataReason::AllZero, .. } => "all_zero",
            DiffOutcome::Compared(_) => "compared",
        }
    }
}

fn totals_by_name(snapshot: &Snapshot) -> BTreeMap<&str, u64> {
    snapshot
        .files
        .iter()
        .map(|f| (f.filename.as_str(), f.total_lines as u64))
        .collect()
}

/// Compare the snapshot at `index` (clamped to the history) with its predecessor.
pub fn compare(history: &[Snapshot], index: usize) -> DiffOutcome {
    let Some(last) = history.len().checked_sub(1) else {
        return DiffOutcome::NoSnapshots;
    };
    let index = index.min(last);
    let current = &history[index];
    let has_predecessor = index > 0;
    let baseline = if has_predecessor {
        &history[index - 1]
    } else {
        current
    };

    let base_map = totals_by_name(baseline);
    let curr_map = totals_by_name(current);
    let filenames: BTreeSet<&str> = base_map.keys().chain(curr_map.keys()).copied().collect();

    let rows: Vec<DiffRow> = filenames
        .into_iter()
        .map(|name| {
            DiffRow::new(
                name.to_string(),
                base_map.get(name).copied().unwrap_or(0),
                curr_map.get(name).copied().unwrap_or(0),
            )
        })
        .collect();

    let totals = current.totals();
    let max_extent = rows.iter().map(DiffRow::extent).max().unwrap_or(0);

    let no_data = |reason| DiffOutcome::NoData {
        index,
        snapshot_id: current.id,
        timestamp: current.timestamp.clone(),
        reason,
        totals,
    };

    if rows.is_empty() {
        return no_data(NoDataReason::NoFiles);
    }
    if max_extent == 0 {
        return no_data(NoDataReason::AllZero);
    }

    DiffOutcome::Compared(SnapshotDiff {
        index,
        snapshot_id: current.id,
        timestamp: current.timestamp.clone(),
        has_predecessor,
        rows,
        totals,
        max_extent,
    })
}
