//! Memo store
//!
//! [`MemoDatabase`] owns the SQLite connection, the change notifier and the
//! clock used to stamp writes. Dropping it closes the connection; share it
//! with `Rc` when several components need the same open store.

mod clock;
mod notify;
mod record;
mod repository;
mod sort;

pub use clock::{Clock, ManualClock, SystemClock};
pub use notify::{ChangeBatch, ChangeCallback, ChangeEvent, ChangeNotifier, SubscriptionId};
pub use record::{
    truncate_content, Memo, MemoOperation, OperationKind, DEFAULT_FONT_COLOR, DEFAULT_FONT_SIZE,
    MAX_CONTENT_LEN,
};
pub use repository::MemoRepository;
pub use sort::{title_contains, MemoSort, TITLE_EXPR};

use crate::database::core::{DatabaseConn, SchemaManager, SchemaStatus};
use anyhow::{anyhow, Result};
use std::path::Path;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use tracing::info;

/// Default database file name inside a data directory
pub const DEFAULT_DB_NAME: &str = ".memo.db";

pub struct MemoDatabase {
    db: DatabaseConn,
    notifier: ChangeNotifier,
    clock: Arc<dyn Clock>,
    path: Option<String>,
}

impl MemoDatabase {
    /// Open the memo database at the specified path
    ///
    /// A new file is created and initialized. A database written by another
    /// schema version is refused rather than reset.
    pub fn open(path: &str) -> Result<Self> {
        Self::open_with_clock(Some(path), Arc::new(SystemClock))
    }

    /// Open `{data_dir}/.memo.db`, creating the directory if needed
    pub fn open_in_dir(data_dir: &str) -> Result<Self> {
        ensure_data_dir(data_dir)?;
        let path = Path::new(data_dir).join(DEFAULT_DB_NAME);
        let path = path
            .to_str()
            .ok_or_else(|| anyhow!("Invalid database path under '{}'", data_dir))?;
        Self::open(path)
    }

    /// Create an in-memory memo database
    pub fn open_in_memory() -> Result<Self> {
        Self::open_with_clock(None, Arc::new(SystemClock))
    }

    /// Open with an explicit time source; `None` opens in memory
    pub fn open_with_clock(path: Option<&str>, clock: Arc<dyn Clock>) -> Result<Self> {
        let db = DatabaseConn::open(path)?;
        Self::prepare_schema(&db)?;
        info!(
            "Opened memo database at {}",
            path.unwrap_or(":memory:")
        );

        Ok(Self {
            db,
            notifier: ChangeNotifier::new(),
            clock,
            path: path.map(|p| p.to_string()),
        })
    }

    fn prepare_schema(db: &DatabaseConn) -> Result<()> {
        let schema = SchemaManager::new(&db.conn);

        match schema.check_status()? {
            SchemaStatus::Current => {
                info!("Memo database schema is current");
            }
            SchemaStatus::NotInitialized => {
                info!("Initializing memo database schema");
                schema.initialize()?;
            }
            SchemaStatus::Corrupted => {
                info!("Memo database schema incomplete, recreating missing tables");
                schema.initialize()?;
            }
            status @ (SchemaStatus::NeedsMigration { .. } | SchemaStatus::Incompatible { .. }) => {
                return Err(anyhow!(
                    "Memo database schema is {}, refusing to open",
                    status
                ));
            }
        }
        Ok(())
    }

    /// Get the memo repository
    pub fn memos(&self) -> MemoRepository<'_> {
        MemoRepository::new(&self.db.conn, &self.notifier, self.clock.as_ref())
    }

    /// Database file path, `None` when in memory
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the underlying database connection (for advanced queries)
    pub fn connection(&self) -> &rusqlite::Connection {
        &self.db.conn
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    /// Open a write bracket; pair with [`end_trans`](Self::end_trans)
    pub fn begin_trans(&self) {
        self.notifier.begin_trans();
    }

    pub fn end_trans(&self) {
        self.notifier.end_trans();
    }

    /// Write bracket closed when the guard drops
    pub fn batch(&self) -> ChangeBatch<'_> {
        ChangeBatch::new(&self.notifier)
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        self.notifier.subscribe(Arc::new(callback))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Receive change events on a channel; dropping the receiver unsubscribes
    pub fn subscribe_channel(&self) -> Receiver<ChangeEvent> {
        self.notifier.subscribe_channel().1
    }

    /// Get metadata value from the database
    pub fn get_meta(&self, key: &str) -> Result<Option<String>> {
        SchemaManager::new(&self.db.conn).get_meta(key)
    }

    /// Set metadata value in the database
    pub fn set_meta(&self, key: &str, value: &str) -> Result<()> {
        SchemaManager::new(&self.db.conn).set_meta(key, value)
    }
}

/// Ensure the data directory exists
pub fn ensure_data_dir(data_dir: &str) -> Result<()> {
    std::fs::create_dir_all(data_dir)
        .map_err(|e| anyhow!("Failed to create data directory '{}': {}", data_dir, e))
}
