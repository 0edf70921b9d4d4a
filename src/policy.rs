use crate::model::{FileMeasurement, Snapshot};

/// Decide whether a fresh scan warrants a new snapshot.
///
/// Both lists are filename-sorted, so a positional comparison is an exact
/// comparison of the two file sets. Any difference in file count, name or
/// either line count triggers a snapshot.
pub fn needs_snapshot(latest: Option<&Snapshot>, fresh: &[FileMeasurement]) -> bool {
    match latest {
        None => true,
        Some(snapshot) => snapshot.files.as_slice() != fresh,
    }
}
