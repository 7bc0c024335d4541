use std::fs;
use std::path::Path;

use rusqlite::Connection;
use tracing::debug;

use crate::error::{Result, TuneError};

/// Open (or create) the SQLite file at `path` and make sure the `tunes`
/// table exists. Missing parent directories are created first.
pub fn open_store(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| TuneError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let conn = Connection::open(path)?;
    ensure_schema(&conn)?;
    debug!(path = %path.display(), "opened tune store");
    Ok(conn)
}

/// Private in-memory store, used by tests and embedders that do not need a
/// file on disk.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Create the `tunes` table if it is missing. Safe to call on every start.
///
/// `AUTOINCREMENT` keeps SQLite from handing out an id twice, even after the
/// table has been cleared for a rebuild.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS tunes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            book INTEGER NOT NULL,
            filename TEXT,
            X TEXT,
            T TEXT,
            M TEXT,
            K TEXT,
            R TEXT,
            body TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_store_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("tunes.sqlite");

        let conn = open_store(&path).unwrap();
        assert!(path.is_file());
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'tunes'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);
    }

    #[test]
    fn open_store_reports_blocked_directory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("taken");
        fs::write(&blocker, b"not a directory").unwrap();

        let err = open_store(&blocker.join("tunes.sqlite")).unwrap_err();
        assert!(matches!(err, TuneError::CreateDir { path, .. } if path == blocker));
    }
}
