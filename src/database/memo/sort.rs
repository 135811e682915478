//! Sort modes and the title search predicate

use crate::database::core::{substring_pattern, LIKE_ESCAPE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Computed title: the comment when present, else the content
pub const TITLE_EXPR: &str = "CASE WHEN comment IS NOT NULL THEN comment ELSE content END";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MemoSort {
    /// Newest first
    #[default]
    CreateTimeDesc,
    CreateTimeAsc,
    TitleDesc,
    TitleAsc,
}

impl MemoSort {
    pub const ALL: [MemoSort; 4] = [
        MemoSort::CreateTimeDesc,
        MemoSort::CreateTimeAsc,
        MemoSort::TitleDesc,
        MemoSort::TitleAsc,
    ];

    pub fn code(self) -> i32 {
        match self {
            MemoSort::CreateTimeDesc => 0,
            MemoSort::CreateTimeAsc => 1,
            MemoSort::TitleDesc => 2,
            MemoSort::TitleAsc => 3,
        }
    }

    /// Map a legacy integer code; unknown codes fall back to the default
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => MemoSort::CreateTimeAsc,
            2 => MemoSort::TitleDesc,
            3 => MemoSort::TitleAsc,
            _ => MemoSort::CreateTimeDesc,
        }
    }

    /// ORDER BY expression, with the id as tie-breaker
    pub fn order_by_expr(self) -> String {
        match self {
            MemoSort::CreateTimeDesc => "create_time DESC, id DESC".to_string(),
            MemoSort::CreateTimeAsc => "create_time ASC, id ASC".to_string(),
            MemoSort::TitleDesc => format!("{} DESC, id DESC", TITLE_EXPR),
            MemoSort::TitleAsc => format!("{} ASC, id ASC", TITLE_EXPR),
        }
    }
}

impl fmt::Display for MemoSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoSort::CreateTimeDesc => write!(f, "created"),
            MemoSort::CreateTimeAsc => write!(f, "created-asc"),
            MemoSort::TitleDesc => write!(f, "title"),
            MemoSort::TitleAsc => write!(f, "title-asc"),
        }
    }
}

impl FromStr for MemoSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "created" | "created-desc" | "newest" => Ok(MemoSort::CreateTimeDesc),
            "created-asc" | "oldest" => Ok(MemoSort::CreateTimeAsc),
            "title" | "title-desc" => Ok(MemoSort::TitleDesc),
            "title-asc" => Ok(MemoSort::TitleAsc),
            _ => Err(format!(
                "Unknown sort mode '{}'. Valid options: created, created-asc, title, title-asc",
                s
            )),
        }
    }
}

/// Predicate matching `term` as a literal substring of the comment, or of
/// the content when there is no comment
pub fn title_contains(term: &str) -> String {
    let pattern = substring_pattern(term);
    format!(
        "CASE WHEN comment IS NOT NULL THEN comment LIKE {p} ESCAPE '{e}' \
         ELSE content LIKE {p} ESCAPE '{e}' END",
        p = pattern,
        e = LIKE_ESCAPE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for sort in MemoSort::ALL {
            assert_eq!(MemoSort::from_code(sort.code()), sort);
        }
    }

    #[test]
    fn test_unknown_code_defaults() {
        assert_eq!(MemoSort::from_code(-1), MemoSort::CreateTimeDesc);
        assert_eq!(MemoSort::from_code(4), MemoSort::CreateTimeDesc);
    }

    #[test]
    fn test_order_by() {
        assert_eq!(
            MemoSort::default().order_by_expr(),
            "create_time DESC, id DESC"
        );
        assert!(MemoSort::TitleAsc
            .order_by_expr()
            .starts_with("CASE WHEN comment IS NOT NULL THEN comment ELSE content END ASC"));
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            MemoSort::from_str("title-asc").unwrap(),
            MemoSort::TitleAsc
        );
        assert_eq!(MemoSort::from_str("Created").unwrap(), MemoSort::CreateTimeDesc);
        assert!(MemoSort::from_str("size").is_err());
        for sort in MemoSort::ALL {
            assert_eq!(MemoSort::from_str(&sort.to_string()).unwrap(), sort);
        }
    }

    #[test]
    fn test_title_contains() {
        let predicate = title_contains("it's 5%");
        assert_eq!(
            predicate,
            "CASE WHEN comment IS NOT NULL THEN comment LIKE '%it''s 5\\%%' ESCAPE '\\' \
             ELSE content LIKE '%it''s 5\\%%' ESCAPE '\\' END"
        );
    }
}
