//! Database connection management
//!
//! Thin wrapper around a SQLite connection shared by the schema manager and
//! the memo repository.

use anyhow::{anyhow, Result};
use rusqlite::Connection;

/// Core database connection wrapper
///
/// File-backed and in-memory databases get the same pragma configuration.
pub struct DatabaseConn {
    pub conn: Connection,
}

impl DatabaseConn {
    /// Open a database at the specified path
    ///
    /// If the path is `None`, an in-memory database is created.
    pub fn open(path: Option<&str>) -> Result<Self> {
        let conn = match path {
            Some(p) => Connection::open(p)
                .map_err(|e| anyhow!("Failed to open database at '{}': {}", p, e))?,
            None => Connection::open_in_memory()
                .map_err(|e| anyhow!("Failed to create in-memory database: {}", e))?,
        };

        let db = DatabaseConn { conn };
        db.configure()?;
        Ok(db)
    }

    fn configure(&self) -> Result<()> {
        // WAL keeps readers unblocked while a write is in flight
        let _: String = self
            .conn
            .query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))
            .map_err(|e| anyhow!("Failed to set journal mode: {}", e))?;

        self.conn
            .execute("PRAGMA synchronous=NORMAL", [])
            .map_err(|e| anyhow!("Failed to set synchronous mode: {}", e))?;

        self.conn
            .execute("PRAGMA temp_store=MEMORY", [])
            .map_err(|e| anyhow!("Failed to set temp store: {}", e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = DatabaseConn::open(None).unwrap();
        let temp_store: i64 = db
            .conn
            .query_row("PRAGMA temp_store", [], |row| row.get(0))
            .unwrap();
        // 2 = MEMORY
        assert_eq!(temp_store, 2);
    }

    #[test]
    fn test_open_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.db");
        let db = DatabaseConn::open(path.to_str()).unwrap();
        db.conn
            .execute("CREATE TABLE notes (id INTEGER PRIMARY KEY)", [])
            .unwrap();
        assert!(path.exists());

        let mode: String = db
            .conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[test]
    fn test_open_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("file.db");
        assert!(DatabaseConn::open(path.to_str()).is_err());
    }
}
