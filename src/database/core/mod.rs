//! Core database infrastructure
//!
//! Foundational components shared by the memo store:
//! - `DatabaseConn`: SQLite connection wrapper with configuration
//! - `SchemaManager`: schema initialization and status checks
//! - `value`: SQL literal formatting and string-constant escaping
//! - `StatementBuilder`: `INSERT`/`UPDATE` text from ordered key/value pairs
//! - `MemoQueryBuilder`: `SELECT` text for the read paths

mod connection;
mod query;
mod schema;
mod statement;
mod value;

pub use connection::DatabaseConn;
pub use query::MemoQueryBuilder;
pub use schema::{SchemaDefinitions, SchemaManager, SchemaStatus, SCHEMA_VERSION};
pub use statement::{
    build_delete, KeyValue, MemoKey, StatementBuilder, KEY_ID_NAME, MEMO_TABLE, NOT_DELETED,
};
pub use value::{
    escape_like_pattern, format_literal, make_string_constant, substring_pattern, ColumnFormat,
    SqlValue, LIKE_ESCAPE,
};
