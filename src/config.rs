use crate::database::{
    MemoDatabase, MemoQueryBuilder, SchemaManager, SchemaStatus, DEFAULT_DB_NAME,
};
use anyhow::{anyhow, Result};
use config::Config;
use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// Default page size for searches when none is given
pub const DEFAULT_SEARCH_LIMIT: u64 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoConfig {
    /// Directory holding the memo database
    pub data_dir: String,

    /// Explicit database file, overriding `{data_dir}/.memo.db`
    pub database_path: Option<String>,

    /// Default number of search results per page
    pub search_limit: u64,
}

const EMPTY_CONFIG: &str = r#"### memodb configuration file

### directory holding the memo database
# data_dir = "~/.memodb"

### explicit database file (defaults to <data_dir>/.memo.db)
# database_path = "/path/to/.memo.db"

### default number of search results
# search_limit = 50
"#;

impl Default for MemoConfig {
    fn default() -> Self {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| ".".to_string());

        Self {
            data_dir: format!("{}/.memodb", home_dir),
            database_path: None,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl MemoConfig {
    /// Build the configuration from a TOML file and `MEMODB_*` variables
    ///
    /// Without an explicit path, `~/.memodb/memodb.toml` is used. A missing
    /// file is created from a commented template.
    pub fn new(path: &Option<String>) -> Result<MemoConfig> {
        let file = match path {
            Some(p) => p.clone(),
            None => {
                let memodb_dir = Self::default_dir()?;
                std::fs::create_dir_all(memodb_dir.as_str())
                    .map_err(|e| anyhow!("Unable to create memodb directory: {}", e))?;
                format!("{}/memodb.toml", memodb_dir)
            }
        };

        Self::load(&file)
    }

    /// Load from a specific file, writing the template if it does not exist
    pub fn load(file: &str) -> Result<MemoConfig> {
        let mut builder = Config::builder();

        if Path::new(file).exists() {
            builder = builder.add_source(config::File::with_name(file));
        } else {
            std::fs::write(file, EMPTY_CONFIG)
                .map_err(|e| anyhow!("Unable to create config file {}: {}", file, e))?;
        }

        // E.g., `MEMODB_DATA_DIR=/tmp/notes memodb list`
        builder = builder.add_source(config::Environment::with_prefix("MEMODB"));

        let settings = builder
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        let values = settings
            .try_deserialize::<HashMap<String, String>>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        Self::from_values(&values)
    }

    fn from_values(values: &HashMap<String, String>) -> Result<MemoConfig> {
        let defaults = MemoConfig::default();

        let data_dir = match values.get("data_dir") {
            Some(dir) => expand_home(dir)?,
            None => defaults.data_dir,
        };

        let database_path = values
            .get("database_path")
            .map(|p| expand_home(p))
            .transpose()?;

        let search_limit = match values.get("search_limit") {
            Some(s) => s
                .parse()
                .map_err(|e| anyhow!("Invalid search_limit '{}': {}", s, e))?,
            None => defaults.search_limit,
        };

        Ok(MemoConfig {
            data_dir,
            database_path,
            search_limit,
        })
    }

    fn default_dir() -> Result<String> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| anyhow!("Could not find home directory"))?
            .to_str()
            .ok_or_else(|| anyhow!("Could not convert home directory path to string"))?
            .to_owned();
        Ok(format!("{}/.memodb", home_dir))
    }

    /// Get the path to the SQLite database file
    pub fn sqlite_path(&self) -> String {
        match &self.database_path {
            Some(p) => p.clone(),
            None => format!("{}/{}", self.data_dir.trim_end_matches('/'), DEFAULT_DB_NAME),
        }
    }

    /// Open the configured database, creating the data directory if needed
    pub fn open_database(&self) -> Result<MemoDatabase> {
        let path = self.sqlite_path();
        if let Some(parent) = Path::new(&path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    anyhow!("Failed to create directory '{}': {}", parent.display(), e)
                })?;
            }
        }
        MemoDatabase::open(&path)
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        [
            format!("Data Directory:     {}", self.data_dir),
            format!("SQLite Path:        {}", self.sqlite_path()),
            format!("Search Limit:       {}", self.search_limit),
        ]
        .join("\n")
    }

    /// Get the config file path
    pub fn config_file_path() -> String {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| "~".to_string());
        format!("{}/.memodb/memodb.toml", home_dir)
    }
}

fn expand_home(path: &str) -> Result<String> {
    match path.strip_prefix("~/") {
        Some(rest) => {
            let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
            Ok(home.join(rest).to_string_lossy().to_string())
        }
        None => Ok(path.to_string()),
    }
}

/// Information about the memo database file
#[derive(Debug, Serialize, Clone)]
pub struct DatabaseInfo {
    pub path: String,
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    pub schema_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<i64>,
}

/// Inspect the configured database without creating it
pub fn get_database_info(config: &MemoConfig) -> DatabaseInfo {
    let path = config.sqlite_path();
    let exists = Path::new(&path).exists();
    let size_bytes = if exists {
        std::fs::metadata(&path).ok().map(|m| m.len())
    } else {
        None
    };

    let mut info = DatabaseInfo {
        path,
        exists,
        size_bytes,
        schema_status: SchemaStatus::NotInitialized.to_string(),
        live_count: None,
        total_count: None,
        last_modified: None,
    };

    if !exists {
        return info;
    }

    // A plain connection, so inspecting never initializes the schema
    let conn = match Connection::open(&info.path) {
        Ok(conn) => conn,
        Err(e) => {
            info.schema_status = format!("unavailable ({})", e);
            return info;
        }
    };

    let status = match SchemaManager::new(&conn).check_status() {
        Ok(status) => status,
        Err(e) => {
            info.schema_status = format!("unknown ({})", e);
            return info;
        }
    };
    info.schema_status = status.to_string();
    if status != SchemaStatus::Current {
        return info;
    }

    let count = |sql: &str| -> Option<u64> {
        conn.query_row(sql, [], |row| row.get::<_, i64>(0))
            .ok()
            .map(|n| n.max(0) as u64)
    };
    info.live_count = count(&MemoQueryBuilder::new().live_only().build_count());
    info.total_count = count(&MemoQueryBuilder::new().build_count());
    info.last_modified = conn
        .query_row("SELECT MAX(modi_time) FROM memo", [], |row| {
            row.get::<_, Option<i64>>(0)
        })
        .ok()
        .flatten();

    info
}

/// Format bytes as human-readable size
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Memo;

    #[test]
    fn test_default_config() {
        let config = MemoConfig::default();
        assert!(config.data_dir.ends_with(".memodb"));
        assert_eq!(config.database_path, None);
        assert_eq!(config.search_limit, DEFAULT_SEARCH_LIMIT);
    }

    #[test]
    fn test_sqlite_path() {
        let mut config = MemoConfig {
            data_dir: "/test/dir/".to_string(),
            database_path: None,
            search_limit: 10,
        };
        assert_eq!(config.sqlite_path(), "/test/dir/.memo.db");

        config.database_path = Some("/elsewhere/notes.db".to_string());
        assert_eq!(config.sqlite_path(), "/elsewhere/notes.db");
    }

    #[test]
    fn test_load_writes_template() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("memodb.toml");
        let file = file.to_str().unwrap();

        MemoConfig::load(file).unwrap();
        let written = std::fs::read_to_string(file).unwrap();
        assert!(written.contains("# data_dir"));

        // the template is all comments, so loading it again still works
        MemoConfig::load(file).unwrap();
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("memodb.toml");
        std::fs::write(
            &file,
            "data_dir = \"/srv/notes\"\nsearch_limit = 5\n",
        )
        .unwrap();

        let config = MemoConfig::load(file.to_str().unwrap()).unwrap();
        assert_eq!(config.data_dir, "/srv/notes");
        assert_eq!(config.search_limit, 5);
        assert_eq!(config.sqlite_path(), "/srv/notes/.memo.db");
    }

    #[test]
    fn test_invalid_search_limit() {
        let mut values = HashMap::new();
        values.insert("search_limit".to_string(), "many".to_string());
        assert!(MemoConfig::from_values(&values).is_err());
    }

    #[test]
    fn test_database_info() {
        let dir = tempfile::tempdir().unwrap();
        let config = MemoConfig {
            data_dir: dir.path().to_str().unwrap().to_string(),
            database_path: None,
            search_limit: 10,
        };

        let info = get_database_info(&config);
        assert!(!info.exists);
        assert_eq!(info.live_count, None);

        {
            let db = config.open_database().unwrap();
            let mut memo = Memo::with_content("a");
            db.memos().insert(&mut memo).unwrap();
            db.memos().insert(&mut Memo::with_content("b")).unwrap();
            db.memos().delete(memo.id).unwrap();
        }

        let info = get_database_info(&config);
        assert!(info.exists);
        assert_eq!(info.live_count, Some(1));
        assert_eq!(info.total_count, Some(2));
        assert!(info.last_modified.is_some());
        assert!(info.schema_status.starts_with("current"));
    }

    #[test]
    fn test_database_info_leaves_foreign_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let config = MemoConfig {
            data_dir: dir.path().to_str().unwrap().to_string(),
            database_path: None,
            search_limit: 10,
        };
        {
            let conn = Connection::open(config.sqlite_path()).unwrap();
            conn.execute("CREATE TABLE other (id INTEGER PRIMARY KEY)", [])
                .unwrap();
        }

        let info = get_database_info(&config);
        assert!(info.exists);
        assert_eq!(info.schema_status, SchemaStatus::NotInitialized.to_string());
        assert_eq!(info.live_count, None);
        assert_eq!(info.total_count, None);

        let conn = Connection::open(config.sqlite_path()).unwrap();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, rusqlite::Error>>()
            .unwrap();
        assert_eq!(tables, vec!["other".to_string()]);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1048576), "1.00 MB");
        assert_eq!(format_size(1073741824), "1.00 GB");
    }
}
