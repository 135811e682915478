//! Database schema management
//!
//! Schema definitions for the memo store and the manager that creates and
//! checks them.

use anyhow::{anyhow, Result};
use rusqlite::Connection;

/// Current schema version
/// Increment this when making breaking schema changes
pub const SCHEMA_VERSION: u32 = 1;

/// Schema definitions for all tables in the memo database
pub struct SchemaDefinitions;

impl SchemaDefinitions {
    /// SQL for creating the meta table (tracks schema version and global metadata)
    pub const META_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS memodb_meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );
    "#;

    /// SQL for creating the memo table
    pub const MEMO_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS memo (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            content TEXT,
            written_time TEXT,
            create_time INTEGER,
            modi_time INTEGER,
            delete_time INTEGER,
            doodle INTEGER,
            color INTEGER,
            comment TEXT,
            favorite INTEGER,
            font_respect INTEGER,
            font_size INTEGER,
            font_color INTEGER,
            doodle_path TEXT
        );
    "#;

    /// SQL for creating memo indexes
    pub const MEMO_INDEXES: &'static [&'static str] = &[
        "CREATE INDEX IF NOT EXISTS idx_memo_create_time ON memo(create_time)",
        "CREATE INDEX IF NOT EXISTS idx_memo_modi_time ON memo(modi_time)",
        "CREATE INDEX IF NOT EXISTS idx_memo_delete_time ON memo(delete_time)",
    ];
}

/// Schema manager for the memo database
pub struct SchemaManager<'a> {
    conn: &'a Connection,
}

impl<'a> SchemaManager<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Initialize the database schema
    ///
    /// Creates all tables and indexes if they don't exist and records the
    /// schema version. An existing `memo` table is left as it is.
    pub fn initialize(&self) -> Result<()> {
        self.conn
            .execute(SchemaDefinitions::META_TABLE, [])
            .map_err(|e| anyhow!("Failed to create meta table: {}", e))?;

        self.set_meta("schema_version", &SCHEMA_VERSION.to_string())?;

        self.conn
            .execute(SchemaDefinitions::MEMO_TABLE, [])
            .map_err(|e| anyhow!("Failed to create memo table: {}", e))?;

        for index_sql in SchemaDefinitions::MEMO_INDEXES {
            self.conn
                .execute(index_sql, [])
                .map_err(|e| anyhow!("Failed to create memo index: {}", e))?;
        }

        Ok(())
    }

    /// Check the current schema status
    pub fn check_status(&self) -> Result<SchemaStatus> {
        if !self.table_exists("memodb_meta")? {
            return Ok(SchemaStatus::NotInitialized);
        }

        let current_version = self.get_schema_version()?;

        if current_version == SCHEMA_VERSION {
            if self.verify_integrity()? {
                Ok(SchemaStatus::Current)
            } else {
                Ok(SchemaStatus::Corrupted)
            }
        } else if current_version < SCHEMA_VERSION {
            Ok(SchemaStatus::NeedsMigration {
                from: current_version,
                to: SCHEMA_VERSION,
            })
        } else {
            Ok(SchemaStatus::Incompatible {
                database_version: current_version,
                required_version: SCHEMA_VERSION,
            })
        }
    }

    /// Get the current schema version from the database
    fn get_schema_version(&self) -> Result<u32> {
        match self.get_meta("schema_version")? {
            Some(version) => version
                .parse()
                .map_err(|e| anyhow!("Invalid schema version '{}': {}", version, e)),
            None => Ok(0),
        }
    }

    fn verify_integrity(&self) -> Result<bool> {
        for table in ["memodb_meta", "memo"] {
            if !self.table_exists(table)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn table_exists(&self, table: &str) -> Result<bool> {
        let exists: i32 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                [table],
                |row| row.get(0),
            )
            .map_err(|e| anyhow!("Failed to check table existence: {}", e))?;
        Ok(exists > 0)
    }

    /// Set a metadata value
    pub fn set_meta(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO memodb_meta (key, value, updated_at) VALUES (?1, ?2, strftime('%s', 'now'))",
                [key, value],
            )
            .map_err(|e| anyhow!("Failed to set meta value: {}", e))?;
        Ok(())
    }

    /// Get a metadata value
    pub fn get_meta(&self, key: &str) -> Result<Option<String>> {
        let result: Result<String, _> = self.conn.query_row(
            "SELECT value FROM memodb_meta WHERE key = ?1",
            [key],
            |row| row.get(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(anyhow!("Failed to get meta value: {}", e)),
        }
    }
}

/// Status of the database schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaStatus {
    /// Database is not initialized (fresh database)
    NotInitialized,

    /// Schema is current and valid
    Current,

    /// Schema was written by an older version
    NeedsMigration { from: u32, to: u32 },

    /// Database is from a newer version (incompatible)
    Incompatible {
        database_version: u32,
        required_version: u32,
    },

    /// Schema is corrupted (missing tables)
    Corrupted,
}

impl std::fmt::Display for SchemaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaStatus::NotInitialized => write!(f, "not initialized"),
            SchemaStatus::Current => write!(f, "current (v{})", SCHEMA_VERSION),
            SchemaStatus::NeedsMigration { from, to } => {
                write!(f, "needs migration (v{} -> v{})", from, to)
            }
            SchemaStatus::Incompatible {
                database_version,
                required_version,
            } => write!(
                f,
                "incompatible (database v{}, required v{})",
                database_version, required_version
            ),
            SchemaStatus::Corrupted => write!(f, "corrupted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_not_initialized() {
        let conn = Connection::open_in_memory().unwrap();
        let manager = SchemaManager::new(&conn);

        assert_eq!(
            manager.check_status().unwrap(),
            SchemaStatus::NotInitialized
        );
    }

    #[test]
    fn test_schema_initialize_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        let manager = SchemaManager::new(&conn);

        manager.initialize().unwrap();
        manager.initialize().unwrap();

        assert_eq!(manager.check_status().unwrap(), SchemaStatus::Current);
        assert_eq!(manager.get_schema_version().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_adopts_existing_memo_table() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute(SchemaDefinitions::MEMO_TABLE, []).unwrap();
        conn.execute(
            "INSERT INTO memo (content, delete_time) VALUES ('kept', -1)",
            [],
        )
        .unwrap();

        let manager = SchemaManager::new(&conn);
        manager.initialize().unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM memo", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_corrupted_when_memo_missing() {
        let conn = Connection::open_in_memory().unwrap();
        let manager = SchemaManager::new(&conn);
        manager.initialize().unwrap();

        conn.execute("DROP TABLE memo", []).unwrap();
        assert_eq!(manager.check_status().unwrap(), SchemaStatus::Corrupted);
    }

    #[test]
    fn test_version_mismatch() {
        let conn = Connection::open_in_memory().unwrap();
        let manager = SchemaManager::new(&conn);
        manager.initialize().unwrap();

        manager.set_meta("schema_version", "0").unwrap();
        assert_eq!(
            manager.check_status().unwrap(),
            SchemaStatus::NeedsMigration { from: 0, to: 1 }
        );

        manager.set_meta("schema_version", "9").unwrap();
        assert!(matches!(
            manager.check_status().unwrap(),
            SchemaStatus::Incompatible {
                database_version: 9,
                ..
            }
        ));
    }

    #[test]
    fn test_meta_operations() {
        let conn = Connection::open_in_memory().unwrap();
        let manager = SchemaManager::new(&conn);
        manager.initialize().unwrap();

        manager.set_meta("last_sync", "1700000000").unwrap();
        assert_eq!(
            manager.get_meta("last_sync").unwrap(),
            Some("1700000000".to_string())
        );
        assert_eq!(manager.get_meta("nonexistent").unwrap(), None);
    }
}
