use crate::error::{LinehistError, Result};
use crate::model::{FileMeasurement, Snapshot, SCHEMA_VERSION};
use chrono::Local;
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::debug;

/// Timestamp layout of stored snapshots: local time, whole seconds.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Append-only snapshot history backed by SQLite.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        debug!(path = %db_path.display(), "opening history store");
        let conn = Connection::open(db_path)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let mut store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&mut self) -> Result<()> {
        self.conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            CREATE TABLE IF NOT EXISTS snapshot (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS snapshot_line (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                snapshot_id INTEGER NOT NULL,
                filename TEXT NOT NULL,
                total_lines INTEGER NOT NULL,
                non_empty_lines INTEGER NOT NULL,
                CHECK (non_empty_lines >= 0 AND non_empty_lines <= total_lines),
                FOREIGN KEY (snapshot_id) REFERENCES snapshot(id)
            );
            CREATE INDEX IF NOT EXISTS idx_snapshot_line_snapshot ON snapshot_line(snapshot_id);
            ",
        )?;
        self.check_schema_version()?;
        Ok(())
    }

    fn check_schema_version(&mut self) -> Result<()> {
        let user_version: i64 = self
            .conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))?;

        if user_version == 0 {
            let set_stmt = format!("PRAGMA user_version = {SCHEMA_VERSION};");
            self.conn.execute_batch(&set_stmt)?;
        } else if user_version != SCHEMA_VERSION as i64 {
            return Err(LinehistError::Store(format!(
                "Schema version mismatch: expected {}, found {}",
                SCHEMA_VERSION, user_version
            )));
        }

        Ok(())
    }

    /// Persist a new snapshot and return its id and timestamp.
    ///
    /// The header and every file row are written in one transaction.
    pub fn append(&mut self, files: &[FileMeasurement]) -> Result<(i64, String)> {
        let mut sorted: Vec<&FileMeasurement> = files.iter().collect();
        sorted.sort_by(|a, b| a.filename.cmp(&b.filename));

        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO snapshot (timestamp) VALUES (?)",
            params![timestamp],
        )?;
        let snapshot_id = tx.last_insert_rowid();

        let mut insert_line_stmt = tx.prepare(
            "INSERT INTO snapshot_line (snapshot_id, filename, total_lines, non_empty_lines)
             VALUES (?, ?, ?, ?)",
        )?;
        for f in sorted {
            insert_line_stmt.execute(params![
                snapshot_id,
                f.filename,
                f.total_lines,
                f.non_empty_lines
            ])?;
        }
        drop(insert_line_stmt);

        tx.commit()?;
        debug!(snapshot_id, %timestamp, files = files.len(), "snapshot appended");
        Ok((snapshot_id, timestamp))
    }

    /// Load every snapshot in id order, files sorted by name.
    ///
    /// Rows named `exclude_name` are dropped; a snapshot left without files
    /// is still returned.
    pub fn load_all(&self, exclude_name: &str) -> Result<Vec<Snapshot>> {
        let mut stmt = self.conn.prepare(
            "SELECT s.id, s.timestamp, l.filename, l.total_lines, l.non_empty_lines
             FROM snapshot s
             LEFT JOIN snapshot_line l ON l.snapshot_id = s.id
             ORDER BY s.id, l.filename",
        )?;
        let rows = stmt.query_map([], |row| {
            let id: i64 = row.get(0)?;
            let timestamp: String = row.get(1)?;
            let filename: Option<String> = row.get(2)?;
            let total: Option<u32> = row.get(3)?;
            let non_empty: Option<u32> = row.get(4)?;
            let file = match (filename, total, non_empty) {
                (Some(filename), Some(total_lines), Some(non_empty_lines)) => Some(FileMeasurement {
                    filename,
                    total_lines,
                    non_empty_lines,
                }),
                _ => None,
            };
            Ok((id, timestamp, file))
        })?;

        let mut snapshots: Vec<Snapshot> = Vec::new();
        for row in rows {
            let (id, timestamp, file) = row?;
            if snapshots.last().map(|s| s.id) != Some(id) {
                snapshots.push(Snapshot {
                    id,
                    timestamp,
                    files: Vec::new(),
                });
            }
            if let (Some(file), Some(current)) = (file, snapshots.last_mut()) {
                if file.filename != exclude_name {
                    current.files.push(file);
                }
            }
        }

        for snapshot in &mut snapshots {
            snapshot.files.sort_by(|a, b| a.filename.cmp(&b.filename));
        }

        Ok(snapshots)
    }

}

#[cfg(test)]
impl Store {
    /// Number of stored snapshot headers, excluded names notwithstanding.
    pub(crate) fn count(&self) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM snapshot", [], |row| row.get(0))?;
        Ok(n.max(0) as usize)
    }
}
