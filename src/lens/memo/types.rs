//! Display rows for memo output

use serde::Serialize;

use crate::database::{Memo, MemoOperation};
use crate::lens::time::TimeLens;
use crate::lens::utils::preview;

/// One memo as a table row
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "display", derive(tabled::Tabled))]
pub struct MemoRow {
    pub id: i64,
    pub title: String,
    #[cfg_attr(feature = "display", tabled(rename = "type"))]
    pub kind: &'static str,
    #[cfg_attr(feature = "display", tabled(rename = "fav"))]
    pub favorite: &'static str,
    pub color: i64,
    pub created: String,
    pub modified: String,
}

impl MemoRow {
    /// Build a row, cutting the title to `max_len` characters
    pub fn from_memo(memo: &Memo, max_len: usize, now: i64) -> Self {
        let time = TimeLens::new();

        MemoRow {
            id: memo.id,
            title: preview(memo.title().unwrap_or_default(), max_len),
            kind: if memo.has_doodle { "doodle" } else { "text" },
            favorite: if memo.favorite { "*" } else { "" },
            color: memo.color,
            created: time.rfc3339(memo.create_time),
            modified: time.humanize(memo.modi_time, now),
        }
    }
}

/// One inferred operation as a table row
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "display", derive(tabled::Tabled))]
pub struct OperationRow {
    pub id: i64,
    pub operation: String,
    pub code: i32,
}

impl From<&MemoOperation> for OperationRow {
    fn from(op: &MemoOperation) -> Self {
        OperationRow {
            id: op.id,
            operation: op.kind.to_string(),
            code: op.kind.code(),
        }
    }
}
