#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! memodb - persistence layer for a note-taking application
//!
//! Notes ("memos") live in a single SQLite table. Deletes are soft: a deleted
//! memo keeps its row with a delete timestamp so synchronisation can still
//! report it. Every write is bracketed so observers hear about each finished
//! batch of changes exactly once.
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | (none) | Store, schema, change notification, configuration | `rusqlite`, `config` |
//! | `lens-core` | Memo and time lenses (argument structs, formatting) | `chrono-humanize`, `dateparser` |
//! | `display` | Table formatting with `tabled` | `tabled` |
//! | `cli` | The `memodb` binary | All above + `clap`, `tracing-subscriber` |
//!
//! ```toml
//! # Store only
//! memodb = { version = "0.3", default-features = false }
//!
//! # Default (CLI binary)
//! memodb = "0.3"
//! ```
//!
//! # Architecture
//!
//! - **[`database`]**: connection, schema, statement building and the memo store
//!   - `core`: SQLite connection management, schema definitions, SQL text helpers
//!   - `memo`: the memo record, repository, sort modes and change notification
//! - **`lens`**: high-level operations and output formatting (requires `lens-core`)
//! - **[`config`]**: configuration file and environment handling
//! - **[`error`]**: the error type every store operation returns
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use memodb::{Memo, MemoDatabase, MemoSort};
//!
//! let db = MemoDatabase::open_in_dir("~/.memodb")?;
//! let _id = db.subscribe(|event| println!("changed ({})", event.sequence));
//!
//! let mut memo = Memo::with_content("buy milk");
//! let id = db.memos().insert(&mut memo)?;
//!
//! for id in db.memos().indexes(10, MemoSort::TitleAsc)? {
//!     println!("{:?}", db.memos().get(id)?.title());
//! }
//! db.memos().delete(id)?;
//! ```
//!
//! Several writes can share one notification:
//!
//! ```rust,ignore
//! let _batch = db.batch();
//! db.memos().insert(&mut a)?;
//! db.memos().insert(&mut b)?;
//! // observers are told once, when `_batch` drops
//! ```

pub mod config;
pub mod database;
pub mod error;

#[cfg(feature = "lens-core")]
pub mod lens;

pub use config::{format_size, get_database_info, DatabaseInfo, MemoConfig};

pub use database::{
    ChangeEvent, Clock, DatabaseConn, ManualClock, Memo, MemoDatabase, MemoOperation,
    MemoRepository, MemoSort, OperationKind, SchemaDefinitions, SchemaManager, SchemaStatus,
    SubscriptionId, SystemClock, SCHEMA_VERSION,
};

pub use error::{MemoError, MemoResult};

#[cfg(feature = "lens-core")]
pub use lens::utils::OutputFormat;
