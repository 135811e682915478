//! Memo record types and row mapping

use crate::database::core::NOT_DELETED;
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum stored content length, in characters
pub const MAX_CONTENT_LEN: usize = 1500;

/// Font size stored when a memo carries no font styling
pub const DEFAULT_FONT_SIZE: i64 = 44;

/// Font color (ARGB) stored when a memo carries no font styling
pub const DEFAULT_FONT_COLOR: i64 = 0xff00_0000;

/// Columns read back for a full memo
pub(crate) const MEMO_COLUMNS: &str = "id, content, written_time, create_time, modi_time, \
     delete_time, doodle, color, comment, favorite, font_respect, font_size, font_color, doodle_path";

/// A note
///
/// `id` is 0 until the memo has been inserted. The timestamps are written
/// by the store; values set here are ignored on insert and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memo {
    pub id: i64,
    pub content: Option<String>,
    /// Used as the title when present
    pub comment: Option<String>,
    pub has_doodle: bool,
    pub color: i64,
    pub favorite: bool,
    /// Whether `font_size`/`font_color` are meaningful
    pub font_respect: bool,
    pub font_size: i64,
    pub font_color: i64,
    pub doodle_path: Option<String>,
    pub create_time: i64,
    pub modi_time: i64,
    /// `None` while the memo is live
    pub delete_time: Option<i64>,
    /// Display-formatted time, carried but never written by this crate
    pub written_time: Option<String>,
}

impl Memo {
    pub fn new() -> Self {
        Self::default()
    }

    /// A text memo with the given content
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// `comment` when present, else `content`
    pub fn title(&self) -> Option<&str> {
        self.comment.as_deref().or(self.content.as_deref())
    }

    pub fn is_live(&self) -> bool {
        self.delete_time.is_none()
    }

    /// Font size and color as they are stored
    pub fn effective_font(&self) -> (i64, i64) {
        if self.font_respect {
            (self.font_size, self.font_color)
        } else {
            (DEFAULT_FONT_SIZE, DEFAULT_FONT_COLOR)
        }
    }

    /// Map a row selected with [`MEMO_COLUMNS`]
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let delete_time: Option<i64> = row.get("delete_time")?;

        Ok(Memo {
            id: row.get("id")?,
            content: row.get("content")?,
            comment: row.get("comment")?,
            has_doodle: row.get::<_, Option<i64>>("doodle")?.unwrap_or(0) != 0,
            color: row.get::<_, Option<i64>>("color")?.unwrap_or(0),
            favorite: row.get::<_, Option<i64>>("favorite")?.unwrap_or(0) != 0,
            font_respect: row.get::<_, Option<i64>>("font_respect")?.unwrap_or(0) != 0,
            font_size: row.get::<_, Option<i64>>("font_size")?.unwrap_or(0),
            font_color: row.get::<_, Option<i64>>("font_color")?.unwrap_or(0),
            doodle_path: row.get("doodle_path")?,
            create_time: row.get::<_, Option<i64>>("create_time")?.unwrap_or(0),
            modi_time: row.get::<_, Option<i64>>("modi_time")?.unwrap_or(0),
            delete_time: delete_time.filter(|t| *t != NOT_DELETED),
            written_time: row.get("written_time")?,
        })
    }
}

/// Cut `content` to at most [`MAX_CONTENT_LEN`] characters
pub fn truncate_content(content: &str) -> &str {
    match content.char_indices().nth(MAX_CONTENT_LEN) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}

/// What happened to a memo since a reference time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Add,
    Update,
    Delete,
}

impl OperationKind {
    /// Classify a changed row from its timestamps
    ///
    /// Delete wins over Add, which wins over Update.
    pub fn classify(since: i64, create_time: i64, delete_time: Option<i64>) -> Self {
        if delete_time.is_some() {
            OperationKind::Delete
        } else if since < create_time {
            OperationKind::Add
        } else {
            OperationKind::Update
        }
    }

    pub fn code(self) -> i32 {
        match self {
            OperationKind::Add => 0,
            OperationKind::Update => 1,
            OperationKind::Delete => 2,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Add => write!(f, "add"),
            OperationKind::Update => write!(f, "update"),
            OperationKind::Delete => write!(f, "delete"),
        }
    }
}

/// A memo id paired with the operation inferred for it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoOperation {
    pub id: i64,
    pub kind: OperationKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_content() {
        let short = "hello";
        assert_eq!(truncate_content(short), short);

        let long = "a".repeat(MAX_CONTENT_LEN + 10);
        assert_eq!(truncate_content(&long).len(), MAX_CONTENT_LEN);

        let wide = "메".repeat(MAX_CONTENT_LEN + 1);
        let cut = truncate_content(&wide);
        assert_eq!(cut.chars().count(), MAX_CONTENT_LEN);
    }

    #[test]
    fn test_classify_priority() {
        // deleted rows are Delete even if created after the reference point
        assert_eq!(
            OperationKind::classify(10, 20, Some(30)),
            OperationKind::Delete
        );
        assert_eq!(OperationKind::classify(10, 20, None), OperationKind::Add);
        assert_eq!(OperationKind::classify(10, 10, None), OperationKind::Update);
        assert_eq!(OperationKind::classify(10, 5, None), OperationKind::Update);
    }

    #[test]
    fn test_operation_codes() {
        assert_eq!(OperationKind::Add.code(), 0);
        assert_eq!(OperationKind::Update.code(), 1);
        assert_eq!(OperationKind::Delete.code(), 2);
        assert_eq!(OperationKind::Delete.to_string(), "delete");
    }

    #[test]
    fn test_title_and_font() {
        let mut memo = Memo::with_content("body");
        assert_eq!(memo.title(), Some("body"));
        memo.comment = Some("Title".to_string());
        assert_eq!(memo.title(), Some("Title"));

        memo.font_size = 12;
        memo.font_color = 0x11;
        assert_eq!(memo.effective_font(), (DEFAULT_FONT_SIZE, DEFAULT_FONT_COLOR));
        memo.font_respect = true;
        assert_eq!(memo.effective_font(), (12, 0x11));
    }
}
