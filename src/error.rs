//! Error types for memo store operations
//!
//! Infrastructure (opening connections, schema and configuration management)
//! reports failures through `anyhow`. Every public store operation reports
//! through [`MemoError`] instead, so callers can tell a bad argument from a
//! missing record from an engine failure.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoError {
    /// A required argument is absent or out of range (e.g. an id below 1)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No live record carries this id (never existed, or soft-deleted)
    #[error("memo {0} not found")]
    NotFound(i64),

    /// Statement text could not be produced
    #[error("failed to build statement: {0}")]
    Statement(String),

    /// The underlying engine rejected a statement
    #[error("failed to execute `{sql}`: {source}")]
    Execution {
        sql: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Connection or schema level failure
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl MemoError {
    pub(crate) fn execution(sql: &str, source: rusqlite::Error) -> Self {
        MemoError::Execution {
            sql: sql.to_string(),
            source,
        }
    }

    /// Whether the error means "no such live record"
    pub fn is_not_found(&self) -> bool {
        matches!(self, MemoError::NotFound(_))
    }
}

pub type MemoResult<T> = std::result::Result<T, MemoError>;
