//! Query builder for memo read paths
//!
//! Builds the `SELECT` statements used by lookups, listings and searches.
//! Soft-deleted rows are excluded with [`MemoQueryBuilder::live_only`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use memodb::database::core::MemoQueryBuilder;
//!
//! let query = MemoQueryBuilder::new()
//!     .select("id")
//!     .live_only()
//!     .order_by("create_time DESC")
//!     .limit(10)
//!     .build();
//! ```

use crate::database::core::statement::{KEY_ID_NAME, MEMO_TABLE, NOT_DELETED};

#[derive(Debug, Clone, Default)]
pub struct MemoQueryBuilder {
    /// SELECT columns (defaults to *)
    select_columns: Option<String>,
    /// Identity filter
    id: Option<i64>,
    /// Exclude soft-deleted rows
    live_only: bool,
    /// Only rows with `modi_time` strictly greater than this
    modified_after: Option<i64>,
    /// Additional WHERE conditions
    additional_conditions: Vec<String>,
    /// ORDER BY clause
    order_by: Option<String>,
    /// LIMIT clause
    limit: Option<u64>,
    /// OFFSET clause
    offset: Option<u64>,
}

impl MemoQueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set SELECT columns
    pub fn select(mut self, columns: &str) -> Self {
        self.select_columns = Some(columns.to_string());
        self
    }

    /// Filter by identity
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Exclude soft-deleted rows
    pub fn live_only(mut self) -> Self {
        self.live_only = true;
        self
    }

    /// Only rows modified strictly after the given Unix timestamp
    pub fn modified_after(mut self, ts: i64) -> Self {
        self.modified_after = Some(ts);
        self
    }

    /// Add a custom WHERE condition
    pub fn with_condition(mut self, condition: &str) -> Self {
        self.additional_conditions.push(condition.to_string());
        self
    }

    /// Set ORDER BY clause
    pub fn order_by(mut self, order: &str) -> Self {
        self.order_by = Some(order.to_string());
        self
    }

    /// Set LIMIT
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set OFFSET
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Build the SQL query
    pub fn build(&self) -> String {
        let columns = self.select_columns.as_deref().unwrap_or("*");
        let mut conditions = Vec::new();

        if let Some(id) = self.id {
            conditions.push(format!("{} = {}", KEY_ID_NAME, id));
        }

        if self.live_only {
            conditions.push(format!("delete_time = {}", NOT_DELETED));
        }

        if let Some(ts) = self.modified_after {
            conditions.push(format!("modi_time > {}", ts));
        }

        conditions.extend(self.additional_conditions.clone());

        let mut query = format!("SELECT {} FROM {}", columns, MEMO_TABLE);

        if !conditions.is_empty() {
            query.push_str(&format!(" WHERE {}", conditions.join(" AND ")));
        }

        if let Some(order) = &self.order_by {
            query.push_str(&format!(" ORDER BY {}", order));
        }

        match (self.limit, self.offset) {
            (Some(limit), Some(offset)) => {
                query.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset))
            }
            (Some(limit), None) => query.push_str(&format!(" LIMIT {}", limit)),
            // SQLite only accepts OFFSET after a LIMIT; -1 means unbounded
            (None, Some(offset)) => query.push_str(&format!(" LIMIT -1 OFFSET {}", offset)),
            (None, None) => {}
        }

        query
    }

    /// Build a count query with the same filters
    pub fn build_count(&self) -> String {
        let mut builder = self.clone();
        builder.select_columns = Some(format!("COUNT({})", KEY_ID_NAME));
        builder.order_by = None;
        builder.limit = None;
        builder.offset = None;

        builder.build()
    }
}
