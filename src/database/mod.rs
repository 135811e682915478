//! Database module
//!
//! ```text
//! database/
//! ├── core/           # Foundation
//! │   ├── connection  # SQLite DatabaseConn wrapper
//! │   ├── schema      # memo table and meta table definitions
//! │   ├── value       # SQL literal formatting
//! │   ├── statement   # INSERT/UPDATE statement builder
//! │   └── query       # SELECT builder for read paths
//! │
//! └── memo/           # The memo store
//!     ├── record      # Memo, OperationKind
//!     ├── repository  # CRUD, listing, search, operation diff
//!     ├── sort        # sort modes and the title predicate
//!     ├── notify      # write brackets and change notification
//!     └── clock       # time source for write timestamps
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use memodb::database::{Memo, MemoDatabase, MemoSort};
//!
//! let db = MemoDatabase::open_in_dir("/home/me/.memodb")?;
//!
//! let mut memo = Memo::with_content("buy milk");
//! let id = db.memos().insert(&mut memo)?;
//!
//! let ids = db.memos().indexes(20, MemoSort::default())?;
//! let changes = db.memos().operations_since(last_sync)?;
//! ```

pub mod core;
pub mod memo;

pub use core::{
    DatabaseConn, MemoKey, MemoQueryBuilder, SchemaDefinitions, SchemaManager, SchemaStatus,
    SqlValue, StatementBuilder, SCHEMA_VERSION,
};

pub use memo::{
    ensure_data_dir, ChangeBatch, ChangeCallback, ChangeEvent, ChangeNotifier, Clock, ManualClock,
    Memo, MemoDatabase, MemoOperation, MemoRepository, MemoSort, OperationKind, SubscriptionId,
    SystemClock, DEFAULT_DB_NAME, MAX_CONTENT_LEN,
};
