//! Write statement builder for the memo table
//!
//! Assembles `INSERT`/`UPDATE` statement text from an ordered set of
//! column/value pairs. Pairs are rendered in the order they were supplied;
//! the system-managed timestamp columns are appended last.
//!
//! # Usage
//!
//! ```rust,ignore
//! use memodb::database::core::{MemoKey, StatementBuilder};
//!
//! let sql = StatementBuilder::new()
//!     .set(MemoKey::Content, "hello")
//!     .set(MemoKey::Color, 3)
//!     .build_insert(now)?;
//! ```

use crate::database::core::value::{format_literal, ColumnFormat, SqlValue};
use crate::error::{MemoError, MemoResult};

/// Name of the memo table
pub const MEMO_TABLE: &str = "memo";

/// Name of the identity column
pub const KEY_ID_NAME: &str = "id";

/// Value stored in `delete_time` for records that are not deleted
pub const NOT_DELETED: i64 = -1;

/// Field keys of the memo table
///
/// Public keys may be supplied by callers. Private keys are system-managed
/// timestamps that only the builder itself emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoKey {
    /// 0 = text, 1 = doodle
    ItemMode,
    Favorite,
    Color,
    Content,
    FontRespect,
    FontSize,
    FontColor,
    Comment,
    DoodlePath,
    CreateTime,
    ModiTime,
    DeleteTime,
    WrittenTime,
}

impl MemoKey {
    /// Keys callers may supply
    pub const PUBLIC: [MemoKey; 9] = [
        MemoKey::ItemMode,
        MemoKey::Favorite,
        MemoKey::Color,
        MemoKey::Content,
        MemoKey::FontRespect,
        MemoKey::FontSize,
        MemoKey::FontColor,
        MemoKey::Comment,
        MemoKey::DoodlePath,
    ];

    /// System-managed keys
    pub const PRIVATE: [MemoKey; 4] = [
        MemoKey::CreateTime,
        MemoKey::ModiTime,
        MemoKey::DeleteTime,
        MemoKey::WrittenTime,
    ];

    /// Maximum number of pairs a single statement may carry
    pub const TOTAL: usize = Self::PUBLIC.len() + Self::PRIVATE.len();

    pub fn column(self) -> &'static str {
        match self {
            MemoKey::ItemMode => "doodle",
            MemoKey::Favorite => "favorite",
            MemoKey::Color => "color",
            MemoKey::Content => "content",
            MemoKey::FontRespect => "font_respect",
            MemoKey::FontSize => "font_size",
            MemoKey::FontColor => "font_color",
            MemoKey::Comment => "comment",
            MemoKey::DoodlePath => "doodle_path",
            MemoKey::CreateTime => "create_time",
            MemoKey::ModiTime => "modi_time",
            MemoKey::DeleteTime => "delete_time",
            MemoKey::WrittenTime => "written_time",
        }
    }

    pub fn format(self) -> ColumnFormat {
        match self {
            MemoKey::Content | MemoKey::Comment | MemoKey::DoodlePath | MemoKey::WrittenTime => {
                ColumnFormat::Text
            }
            _ => ColumnFormat::Integer,
        }
    }

    pub fn is_private(self) -> bool {
        Self::PRIVATE.contains(&self)
    }
}

impl std::fmt::Display for MemoKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column())
    }
}

/// A column/value pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: MemoKey,
    pub value: SqlValue,
}

impl KeyValue {
    pub fn new(key: MemoKey, value: impl Into<SqlValue>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

/// Builder for memo write statements
///
/// Pairs whose value is [`SqlValue::Null`] are skipped when the statement is
/// rendered, so an absent optional field leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct StatementBuilder {
    pairs: Vec<KeyValue>,
}

impl StatementBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair
    pub fn set(mut self, key: MemoKey, value: impl Into<SqlValue>) -> Self {
        self.pairs.push(KeyValue::new(key, value));
        self
    }

    /// Build `INSERT INTO memo (<cols>) VALUES (<vals>)`
    ///
    /// Appends `create_time = now`, `modi_time = now` and the "not deleted"
    /// `delete_time` after the supplied pairs.
    pub fn build_insert(&self, now: i64) -> MemoResult<String> {
        let rendered = self.render(&[
            KeyValue::new(MemoKey::CreateTime, now),
            KeyValue::new(MemoKey::ModiTime, now),
            KeyValue::new(MemoKey::DeleteTime, NOT_DELETED),
        ])?;

        let columns: Vec<&str> = rendered.iter().map(|(col, _)| *col).collect();
        let values: Vec<&str> = rendered.iter().map(|(_, val)| val.as_str()).collect();

        Ok(format!(
            "INSERT INTO {} ({}) VALUES ({})",
            MEMO_TABLE,
            columns.join(", "),
            values.join(", ")
        ))
    }

    /// Build `UPDATE memo SET col = val, ... WHERE id = <id>`
    ///
    /// Appends `modi_time = now`. The id is not validated here.
    pub fn build_update(&self, id: i64, now: i64) -> MemoResult<String> {
        self.render_update(id, &[KeyValue::new(MemoKey::ModiTime, now)])
    }

    fn render_update(&self, id: i64, system: &[KeyValue]) -> MemoResult<String> {
        let rendered = self.render(system)?;
        let assignments: Vec<String> = rendered
            .iter()
            .map(|(col, val)| format!("{} = {}", col, val))
            .collect();

        Ok(format!(
            "UPDATE {} SET {} WHERE {} = {}",
            MEMO_TABLE,
            assignments.join(", "),
            KEY_ID_NAME,
            id
        ))
    }

    /// Validate and format the caller pairs followed by the system pairs
    fn render(&self, system: &[KeyValue]) -> MemoResult<Vec<(&'static str, String)>> {
        if self.pairs.len() + system.len() > MemoKey::TOTAL {
            return Err(MemoError::Statement(format!(
                "too many fields: {} supplied, at most {} allowed",
                self.pairs.len() + system.len(),
                MemoKey::TOTAL
            )));
        }

        let mut rendered: Vec<(&'static str, String)> = Vec::with_capacity(MemoKey::TOTAL);
        let mut seen: Vec<MemoKey> = Vec::with_capacity(MemoKey::TOTAL);

        for pair in &self.pairs {
            if pair.key.is_private() {
                return Err(MemoError::Statement(format!(
                    "'{}' is system-managed and cannot be supplied",
                    pair.key
                )));
            }
            if seen.contains(&pair.key) {
                return Err(MemoError::Statement(format!(
                    "'{}' supplied more than once",
                    pair.key
                )));
            }
            seen.push(pair.key);

            if let Some(literal) = format_literal(pair.key.format(), &pair.value)? {
                rendered.push((pair.key.column(), literal));
            }
        }

        for pair in system {
            if let Some(literal) = format_literal(pair.key.format(), &pair.value)? {
                rendered.push((pair.key.column(), literal));
            }
        }

        Ok(rendered)
    }
}

/// Build the logical delete of `id`: an update setting `delete_time = now`
pub fn build_delete(id: i64, now: i64) -> MemoResult<String> {
    StatementBuilder::new().render_update(
        id,
        &[
            KeyValue::new(MemoKey::DeleteTime, now),
            KeyValue::new(MemoKey::ModiTime, now),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_order_and_system_pairs() {
        let sql = StatementBuilder::new()
            .set(MemoKey::ItemMode, 0)
            .set(MemoKey::Content, "hello")
            .set(MemoKey::FontSize, 44)
            .build_insert(1000)
            .unwrap();

        assert_eq!(
            sql,
            "INSERT INTO memo (doodle, content, font_size, create_time, modi_time, delete_time) \
             VALUES (0, 'hello', 44, 1000, 1000, -1)"
        );
    }

    #[test]
    fn test_insert_skips_null() {
        let sql = StatementBuilder::new()
            .set(MemoKey::Content, "x")
            .set(MemoKey::Comment, None::<String>)
            .set(MemoKey::Color, 7)
            .build_insert(5)
            .unwrap();

        assert!(!sql.contains("comment"));
        assert!(sql.starts_with("INSERT INTO memo (content, color, create_time"));
    }

    #[test]
    fn test_insert_escapes_text() {
        let sql = StatementBuilder::new()
            .set(MemoKey::Comment, "O'Brien's list")
            .build_insert(1)
            .unwrap();

        assert!(sql.contains("'O''Brien''s list'"));
    }

    #[test]
    fn test_update() {
        let sql = StatementBuilder::new()
            .set(MemoKey::Favorite, true)
            .set(MemoKey::Content, "edited")
            .build_update(42, 2000)
            .unwrap();

        assert_eq!(
            sql,
            "UPDATE memo SET favorite = 1, content = 'edited', modi_time = 2000 WHERE id = 42"
        );
    }

    #[test]
    fn test_update_without_pairs() {
        let sql = StatementBuilder::new().build_update(3, 10).unwrap();
        assert_eq!(sql, "UPDATE memo SET modi_time = 10 WHERE id = 3");
    }

    #[test]
    fn test_delete_is_update() {
        let sql = build_delete(9, 3000).unwrap();
        assert_eq!(
            sql,
            "UPDATE memo SET delete_time = 3000, modi_time = 3000 WHERE id = 9"
        );
    }

    #[test]
    fn test_private_key_rejected() {
        for key in MemoKey::PRIVATE {
            let result = StatementBuilder::new().set(key, 1).build_insert(1);
            assert!(matches!(result, Err(MemoError::Statement(_))));
        }
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let result = StatementBuilder::new()
            .set(MemoKey::Color, 1)
            .set(MemoKey::Color, 2)
            .build_update(1, 1);
        assert!(matches!(result, Err(MemoError::Statement(_))));
    }

    #[test]
    fn test_too_many_fields() {
        let builder = (0..MemoKey::TOTAL).fold(StatementBuilder::new(), |b, _| {
            b.set(MemoKey::Color, None::<i64>)
        });
        let result = builder.build_insert(1);
        assert!(matches!(result, Err(MemoError::Statement(_))));
    }

    #[test]
    fn test_type_mismatch_produces_no_statement() {
        let result = StatementBuilder::new()
            .set(MemoKey::Content, 5)
            .build_insert(1);
        assert!(result.is_err());
    }

    #[test]
    fn test_key_partition() {
        assert_eq!(MemoKey::TOTAL, 13);
        assert!(MemoKey::PUBLIC.iter().all(|k| !k.is_private()));
        assert!(MemoKey::PRIVATE.iter().all(|k| k.is_private()));
        assert_eq!(MemoKey::ItemMode.column(), "doodle");
        assert_eq!(MemoKey::WrittenTime.format(), ColumnFormat::Text);
        assert_eq!(MemoKey::FontColor.format(), ColumnFormat::Integer);
    }
}
