//! Memo lens arguments
//!
//! With the `cli` feature these double as clap argument groups.

use serde::{Deserialize, Serialize};

use crate::database::{Memo, MemoSort};

/// Arguments for creating a memo
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct MemoAddArgs {
    /// Memo text
    pub content: String,

    /// Title shown instead of the content
    #[cfg_attr(feature = "cli", clap(short, long))]
    pub comment: Option<String>,

    /// Color index
    #[cfg_attr(feature = "cli", clap(long, default_value_t = 0))]
    #[serde(default)]
    pub color: i64,

    /// Mark as favorite
    #[cfg_attr(feature = "cli", clap(short, long))]
    #[serde(default)]
    pub favorite: bool,

    /// Attach a doodle image; the memo becomes a doodle memo
    #[cfg_attr(feature = "cli", clap(long))]
    pub doodle: Option<String>,

    /// Font size (enables explicit font styling)
    #[cfg_attr(feature = "cli", clap(long))]
    pub font_size: Option<i64>,

    /// Font color as ARGB, e.g. 0xff336699 (enables explicit font styling)
    #[cfg_attr(feature = "cli", clap(long, value_parser = parse_color))]
    pub font_color: Option<i64>,
}

impl MemoAddArgs {
    pub fn new(content: &str) -> Self {
        Self {
            content: content.to_string(),
            ..Default::default()
        }
    }

    pub fn to_memo(&self) -> Memo {
        let font_respect = self.font_size.is_some() || self.font_color.is_some();
        let (default_size, default_color) = Memo::new().effective_font();

        Memo {
            content: Some(self.content.clone()),
            comment: self.comment.clone(),
            has_doodle: self.doodle.is_some(),
            doodle_path: self.doodle.clone(),
            color: self.color,
            favorite: self.favorite,
            font_respect,
            font_size: self.font_size.unwrap_or(default_size),
            font_color: self.font_color.unwrap_or(default_color),
            ..Default::default()
        }
    }
}

/// Arguments for editing a memo; only given fields change
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct MemoUpdateArgs {
    /// Memo id
    pub id: i64,

    /// New memo text
    #[cfg_attr(feature = "cli", clap(long))]
    pub content: Option<String>,

    /// New title
    #[cfg_attr(feature = "cli", clap(short, long))]
    pub comment: Option<String>,

    #[cfg_attr(feature = "cli", clap(long))]
    pub color: Option<i64>,

    #[cfg_attr(feature = "cli", clap(short, long))]
    pub favorite: Option<bool>,

    #[cfg_attr(feature = "cli", clap(long))]
    pub font_size: Option<i64>,

    #[cfg_attr(feature = "cli", clap(long, value_parser = parse_color))]
    pub font_color: Option<i64>,
}

impl MemoUpdateArgs {
    /// Apply the given fields onto `memo`
    pub fn apply(&self, memo: &mut Memo) {
        if let Some(content) = &self.content {
            memo.content = Some(content.clone());
        }
        if let Some(comment) = &self.comment {
            memo.comment = Some(comment.clone());
        }
        if let Some(color) = self.color {
            memo.color = color;
        }
        if let Some(favorite) = self.favorite {
            memo.favorite = favorite;
        }
        if self.font_size.is_some() || self.font_color.is_some() {
            if !memo.font_respect {
                (memo.font_size, memo.font_color) = memo.effective_font();
            }
            memo.font_respect = true;
            memo.font_size = self.font_size.unwrap_or(memo.font_size);
            memo.font_color = self.font_color.unwrap_or(memo.font_color);
        }
    }
}

/// Arguments for listing memo ids or memos
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct MemoListArgs {
    /// Sort mode: created, created-asc, title, title-asc
    #[cfg_attr(feature = "cli", clap(short, long, default_value = "created"))]
    #[serde(default)]
    pub sort: MemoSort,

    /// Maximum number of memos
    #[cfg_attr(feature = "cli", clap(short, long))]
    pub limit: Option<usize>,
}

/// Arguments for title search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct MemoSearchArgs {
    /// Text to look for in the title (comment, else content)
    pub term: String,

    /// Maximum number of results (defaults to the configured search limit)
    #[cfg_attr(feature = "cli", clap(short, long))]
    pub limit: Option<u64>,

    /// Number of results to skip
    #[cfg_attr(feature = "cli", clap(short, long, default_value_t = 0))]
    #[serde(default)]
    pub offset: u64,

    /// Sort mode: created, created-asc, title, title-asc
    #[cfg_attr(feature = "cli", clap(short, long, default_value = "created"))]
    #[serde(default)]
    pub sort: MemoSort,
}

impl MemoSearchArgs {
    pub fn new(term: &str) -> Self {
        Self {
            term: term.to_string(),
            ..Default::default()
        }
    }
}

/// Arguments for the change feed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct MemoChangesArgs {
    /// Reference time: Unix timestamp, RFC3339 or a date like "2024-05-01"
    #[cfg_attr(feature = "cli", clap(short, long))]
    pub since: String,
}

/// Parse a decimal or `0x`-prefixed hexadecimal color
pub fn parse_color(s: &str) -> Result<i64, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => s.parse::<i64>(),
    };
    parsed.map_err(|e| format!("invalid color '{}': {}", s, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_args_to_memo() {
        let memo = MemoAddArgs::new("hello").to_memo();
        assert_eq!(memo.content.as_deref(), Some("hello"));
        assert!(!memo.font_respect);
        assert!(!memo.has_doodle);

        let args = MemoAddArgs {
            doodle: Some("/img/d.png".to_string()),
            font_size: Some(20),
            ..MemoAddArgs::new("sketch")
        };
        let memo = args.to_memo();
        assert!(memo.has_doodle);
        assert!(memo.font_respect);
        assert_eq!(memo.font_size, 20);
        assert_eq!(memo.font_color, 0xff00_0000);
    }

    #[test]
    fn test_update_args_apply() {
        let mut memo = Memo::with_content("old");
        memo.comment = Some("keep".to_string());

        let args = MemoUpdateArgs {
            id: 1,
            content: Some("new".to_string()),
            font_color: Some(0x10),
            ..Default::default()
        };
        args.apply(&mut memo);

        assert_eq!(memo.content.as_deref(), Some("new"));
        assert_eq!(memo.comment.as_deref(), Some("keep"));
        assert!(memo.font_respect);
        assert_eq!(memo.font_size, 44);
        assert_eq!(memo.font_color, 0x10);
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("0xff000000"), Ok(0xff00_0000));
        assert_eq!(parse_color("12"), Ok(12));
        assert!(parse_color("red").is_err());
    }
}
