use crate::config::Config;
use crate::counter::collect_stats;
use crate::error::Result;
use crate::model::{ScanResult, Snapshot};
use crate::policy::needs_snapshot;
use crate::store::Store;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordStatus {
    Created { id: i64, timestamp: String },
    Unchanged,
    /// Recording was turned off for this run.
    NotRecorded,
    /// The append failed and was rolled back; history is as it was.
    AppendFailed(String),
}

#[derive(Debug)]
pub struct Recorded {
    pub scan: Option<ScanResult>,
    pub status: RecordStatus,
    pub history: Vec<Snapshot>,
}

/// Scan the directory, append a snapshot if anything changed, and load the
/// resulting history.
///
/// A failed append is not fatal: the run continues with the history as it
/// was last stored.
pub fn record(config: &Config, store: &mut Store) -> Result<Recorded> {
    if !config.record {
        let history = store.load_all(&config.exclude_name)?;
        return Ok(Recorded {
            scan: None,
            status: RecordStatus::NotRecorded,
            history,
        });
    }

    let scan = collect_stats(&config.dir, &config.exclude_name, &config.extensions)?;
    debug!(
        files = scan.files.len(),
        total = scan.total_lines,
        non_empty = scan.total_non_empty,
        "scan complete"
    );

    let mut history = store.load_all(&config.exclude_name)?;

    let status = if needs_snapshot(history.last(), &scan.files) {
        match store.append(&scan.files) {
            Ok((id, timestamp)) => {
                info!(id, %timestamp, "recorded new snapshot");
                history = store.load_all(&config.exclude_name)?;
                RecordStatus::Created { id, timestamp }
            }
            Err(e) => {
                warn!("failed to save snapshot: {e}");
                RecordStatus::AppendFailed(e.to_string())
            }
        }
    } else {
        debug!("no changes since last snapshot");
        RecordStatus::Unchanged
    };

    Ok(Recorded {
        scan: Some(scan),
        status,
        history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn config(dir: &std::path::Path) -> Config {
        Config {
            dir: dir.to_path_buf(),
            db_path: dir.join("line_history.db"),
            exclude_name: "self.py".to_string(),
            extensions: vec!["py".to_string()],
            record: true,
        }
    }

    #[test]
    fn records_only_when_something_changed() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.py"), "x = 1\n").unwrap();
        fs::write(dir.path().join("self.py"), "never counted\n").unwrap();
        let config = config(dir.path());
        let mut store = Store::open(&config.db_path).unwrap();

        let first = record(&config, &mut store).unwrap();
        assert!(matches!(first.status, RecordStatus::Created { .. }));
        assert_eq!(first.history.len(), 1);
        assert_eq!(first.history[0].files.len(), 1);

        let second = record(&config, &mut store).unwrap();
        assert_eq!(second.status, RecordStatus::Unchanged);
        assert_eq!(second.history.len(), 1);

        fs::write(dir.path().join("a.py"), "x = 1\n\ny = 2\n").unwrap();
        let third = record(&config, &mut store).unwrap();
        assert!(matches!(third.status, RecordStatus::Created { .. }));
        assert_eq!(third.history.len(), 2);
        assert_eq!(third.history[1].files[0].total_lines, 3);
        assert_eq!(third.history[1].files[0].non_empty_lines, 2);
    }

    #[test]
    fn disabled_recording_only_reads() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.py"), "x\n").unwrap();
        let mut config = config(dir.path());
        config.record = false;
        let mut store = Store::open(&config.db_path).unwrap();

        let recorded = record(&config, &mut store).unwrap();
        assert_eq!(recorded.status, RecordStatus::NotRecorded);
        assert!(recorded.scan.is_none());
        assert!(recorded.history.is_empty());
    }

    #[test]
    fn removing_a_file_creates_a_snapshot() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.py"), "a\n").unwrap();
        fs::write(dir.path().join("b.py"), "b\n").unwrap();
        let config = config(dir.path());
        let mut store = Store::open(&config.db_path).unwrap();
        record(&config, &mut store).unwrap();

        fs::remove_file(dir.path().join("b.py")).unwrap();
        let recorded = record(&config, &mut store).unwrap();
        assert!(matches!(recorded.status, RecordStatus::Created { .. }));
        assert_eq!(recorded.history[1].files.len(), 1);
    }

    #[test]
    fn failed_append_keeps_previous_history() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.py"), "a\n").unwrap();
        let config = config(dir.path());
        let mut store = Store::open(&config.db_path).unwrap();
        let first = record(&config, &mut store).unwrap();

        let writer = rusqlite::Connection::open(&config.db_path).unwrap();
        writer
            .execute_batch(
                "CREATE TRIGGER reject_lines BEFORE INSERT ON snapshot_line
                 BEGIN SELECT RAISE(ABORT, 'disk is full'); END;",
            )
            .unwrap();

        fs::write(dir.path().join("a.py"), "a\nb\n").unwrap();
        let recorded = record(&config, &mut store).unwrap();

        match &recorded.status {
            RecordStatus::AppendFailed(reason) => assert!(reason.contains("disk is full")),
            status => panic!("expected a failed append, got {status:?}"),
        }
        assert_eq!(recorded.history, first.history);
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(recorded.scan.unwrap().total_lines, 2);
    }
}
