//! SQLite-backed structured store.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OpenFlags};
use tracing::debug;

use super::{RowStore, StoreError, ROW_TABLE};
use crate::status::{StatusCounters, StatusRow};

/// Rollback journal, write-ahead log and its shared-memory index.
const JOURNAL_SUFFIXES: [&str; 3] = ["-journal", "-wal", "-shm"];

/// SQLite-backed status row store.
pub struct SqliteRowStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteRowStore {
    /// Create a fresh store at `path`, replacing any file already there along
    /// with its leftover journal files.
    pub fn create(path: &Path) -> Result<Self, StoreError> {
        for file in Self::store_files(path) {
            if file.exists() {
                debug!(path = %file.display(), "Replacing existing store file");
                std::fs::remove_file(&file).map_err(|source| StoreError::Replace {
                    path: file.clone(),
                    source,
                })?;
            }
        }

        let conn = Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open an existing store read-only.
    ///
    /// Fails with [`StoreError::NotFound`] if the file is missing and with
    /// [`StoreError::MissingTable`] if it holds no row table.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            return Err(StoreError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        let has_table: bool = conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?",
                params![ROW_TABLE],
                |_| Ok(true),
            )
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(false),
                _ => Err(StoreError::Database(e.to_string())),
            })?;

        if !has_table {
            return Err(StoreError::MissingTable {
                path: path.to_path_buf(),
                table: ROW_TABLE.to_string(),
            });
        }

        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// File backing this store, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The database file and the journal files SQLite keeps beside it.
    fn store_files(path: &Path) -> Vec<PathBuf> {
        let mut files = vec![path.to_path_buf()];
        for suffix in JOURNAL_SUFFIXES {
            let mut name = path.as_os_str().to_os_string();
            name.push(suffix);
            files.push(PathBuf::from(name));
        }
        files
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            -- One row per campaign, in extraction order
            CREATE TABLE IF NOT EXISTS status_rows (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                campaign TEXT NOT NULL,
                last_request_days REAL NOT NULL,
                new_count INTEGER NOT NULL,
                assignment_approved INTEGER NOT NULL,
                assigned INTEGER NOT NULL,
                acquired INTEGER NOT NULL,
                running_open INTEGER NOT NULL,
                running_closed INTEGER NOT NULL,
                completed INTEGER NOT NULL,
                closed_out INTEGER NOT NULL,
                announced INTEGER NOT NULL,
                normal_archived INTEGER NOT NULL,
                aborted INTEGER NOT NULL,
                aborted_completed INTEGER NOT NULL,
                aborted_archived INTEGER NOT NULL,
                failed INTEGER NOT NULL,
                rejected INTEGER NOT NULL,
                rejected_archived INTEGER NOT NULL,
                other INTEGER NOT NULL
            );
            "#,
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Database("connection lock poisoned".to_string()))
    }

    /// Convert a row to StatusRow.
    fn row_to_status_row(row: &rusqlite::Row) -> rusqlite::Result<StatusRow> {
        let mut counters = [0i64; 17];
        for (i, slot) in counters.iter_mut().enumerate() {
            *slot = row.get(i + 2)?;
        }

        Ok(StatusRow {
            campaign: row.get(0)?,
            last_request_days: row.get(1)?,
            counters: StatusCounters::from_array(counters),
        })
    }
}

impl RowStore for SqliteRowStore {
    fn append(&self, rows: &[StatusRow]) -> Result<usize, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO status_rows (campaign, last_request_days, new_count,
                        assignment_approved, assigned, acquired, running_open, running_closed,
                        completed, closed_out, announced, normal_archived, aborted,
                        aborted_completed, aborted_archived, failed, rejected,
                        rejected_archived, other)
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                )
                .map_err(|e| StoreError::Database(e.to_string()))?;

            for row in rows {
                let c = &row.counters;
                stmt.execute(params![
                    &row.campaign,
                    row.last_request_days,
                    c.new_count,
                    c.assignment_approved,
                    c.assigned,
                    c.acquired,
                    c.running_open,
                    c.running_closed,
                    c.completed,
                    c.closed_out,
                    c.announced,
                    c.normal_archived,
                    c.aborted,
                    c.aborted_completed,
                    c.aborted_archived,
                    c.failed,
                    c.rejected,
                    c.rejected_archived,
                    c.other,
                ])
                .map_err(|e| StoreError::Database(e.to_string()))?;
            }
        }

        tx.commit()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(rows.len())
    }

    fn rows(&self) -> Result<Vec<StatusRow>, StoreError> {
        let conn = self.lock()?;

        let mut stmt = conn
            .prepare(
                "SELECT campaign, last_request_days, new_count, assignment_approved, assigned,
                        acquired, running_open, running_closed, completed, closed_out, announced,
                        normal_archived, aborted, aborted_completed, aborted_archived, failed,
                        rejected, rejected_archived, other
                 FROM status_rows ORDER BY id",
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], Self::row_to_status_row)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(|e| StoreError::Database(e.to_string()))?);
        }
        Ok(results)
    }

    fn count(&self) -> Result<usize, StoreError> {
        let conn = self.lock()?;

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM status_rows", [], |row| row.get(0))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::STORE_COLUMNS;
    use tempfile::TempDir;

    fn create_test_row(campaign: &str, days: f64, announced: i64) -> StatusRow {
        StatusRow {
            campaign: campaign.to_string(),
            last_request_days: days,
            counters: StatusCounters {
                new_count: 1,
                running_open: 3,
                announced,
                other: 17,
                ..StatusCounters::default()
            },
        }
    }

    #[test]
    fn test_append_and_read_back() {
        let store = SqliteRowStore::in_memory().unwrap();
        let rows = vec![
            create_test_row("Run3Winter24", 0.5, 2),
            create_test_row("RunIISummer20UL18", 123.456, 0),
            create_test_row("CMSSW_14_0_0", 7.0, 40),
        ];

        let written = store.append(&rows).unwrap();
        assert_eq!(written, 3);
        assert_eq!(store.count().unwrap(), 3);
        assert_eq!(store.rows().unwrap(), rows);
    }

    #[test]
    fn test_rows_keep_insertion_order() {
        let store = SqliteRowStore::in_memory().unwrap();
        store.append(&[create_test_row("zeta", 1.0, 0)]).unwrap();
        store.append(&[create_test_row("alpha", 2.0, 0)]).unwrap();

        let campaigns: Vec<String> = store
            .rows()
            .unwrap()
            .into_iter()
            .map(|r| r.campaign)
            .collect();
        assert_eq!(campaigns, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_schema_has_one_column_per_field() {
        let store = SqliteRowStore::in_memory().unwrap();
        let conn = store.lock().unwrap();
        let mut stmt = conn.prepare("PRAGMA table_info(status_rows)").unwrap();
        let names: Vec<String> = stmt
            .query_map([], |row| row.get(1))
            .unwrap()
            .map(|r| r.unwrap())
            .collect();

        let mut expected = vec!["id".to_string(), "campaign".to_string()];
        expected.extend(STORE_COLUMNS.iter().map(|c| c.to_string()));
        assert_eq!(names, expected);
    }

    #[test]
    fn test_empty_store() {
        let store = SqliteRowStore::in_memory().unwrap();
        assert_eq!(store.count().unwrap(), 0);
        assert!(store.rows().unwrap().is_empty());
        assert!(store.path().is_none());
    }

    #[test]
    fn test_create_then_open_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wfStatus");
        let rows = vec![create_test_row("campaign/with=odd#chars", 3.25, 1)];

        {
            let store = SqliteRowStore::create(&path).unwrap();
            store.append(&rows).unwrap();
            assert_eq!(store.path(), Some(path.as_path()));
        }

        let reopened = SqliteRowStore::open(&path).unwrap();
        assert_eq!(reopened.rows().unwrap(), rows);
    }

    #[test]
    fn test_create_replaces_existing_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wfStatus");

        {
            let store = SqliteRowStore::create(&path).unwrap();
            store.append(&[create_test_row("old", 1.0, 0)]).unwrap();
        }
        {
            let store = SqliteRowStore::create(&path).unwrap();
            store.append(&[create_test_row("new", 2.0, 0)]).unwrap();
        }

        let store = SqliteRowStore::open(&path).unwrap();
        let rows = store.rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].campaign, "new");
    }

    #[test]
    fn test_create_replaces_non_database_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wfStatus");
        std::fs::write(&path, "not a database").unwrap();

        let store = SqliteRowStore::create(&path).unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_create_removes_stale_journal_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wfStatus");
        let journal = dir.path().join("wfStatus-journal");
        let wal = dir.path().join("wfStatus-wal");
        std::fs::write(&path, "left over").unwrap();
        std::fs::write(&journal, "stale journal").unwrap();
        std::fs::write(&wal, "stale wal").unwrap();

        let store = SqliteRowStore::create(&path).unwrap();
        assert!(!journal.exists());
        assert!(!wal.exists());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_store_files_include_journals() {
        let files = SqliteRowStore::store_files(Path::new("/out/today"));
        assert_eq!(
            files,
            vec![
                PathBuf::from("/out/today"),
                PathBuf::from("/out/today-journal"),
                PathBuf::from("/out/today-wal"),
                PathBuf::from("/out/today-shm"),
            ]
        );
    }

    #[test]
    fn test_open_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = SqliteRowStore::open(&dir.path().join("absent"));
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn test_open_without_row_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("other.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch("CREATE TABLE unrelated (x INTEGER);")
                .unwrap();
        }

        let result = SqliteRowStore::open(&path);
        assert!(matches!(result, Err(StoreError::MissingTable { .. })));
    }

    #[test]
    fn test_open_is_read_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wfStatus");
        SqliteRowStore::create(&path).unwrap();

        let store = SqliteRowStore::open(&path).unwrap();
        let result = store.append(&[create_test_row("late", 1.0, 0)]);
        assert!(matches!(result, Err(StoreError::Database(_))));
    }
}
