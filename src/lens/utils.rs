//! Output helpers shared by the lenses

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default maximum length of text previews in tables
pub const DEFAULT_PREVIEW_LEN: usize = 40;

/// Output format for every memodb command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Pretty table with borders (default)
    #[default]
    Table,
    /// Markdown table format
    Markdown,
    /// Compact JSON
    Json,
    /// Pretty-printed JSON with indentation
    JsonPretty,
    /// One JSON object per line
    JsonLine,
    /// Pipe-separated values with header
    Psv,
}

impl OutputFormat {
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json | Self::JsonPretty | Self::JsonLine)
    }

    pub fn all_names() -> &'static [&'static str] {
        &[
            "table",
            "markdown",
            "json",
            "json-pretty",
            "json-line",
            "psv",
        ]
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Markdown => write!(f, "markdown"),
            Self::Json => write!(f, "json"),
            Self::JsonPretty => write!(f, "json-pretty"),
            Self::JsonLine => write!(f, "json-line"),
            Self::Psv => write!(f, "psv"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "pretty" => Ok(Self::Table),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "json-pretty" | "jsonpretty" => Ok(Self::JsonPretty),
            "json-line" | "jsonline" | "jsonl" | "ndjson" => Ok(Self::JsonLine),
            "psv" | "pipe" => Ok(Self::Psv),
            _ => Err(format!(
                "Unknown output format '{}'. Valid formats: {}",
                s,
                Self::all_names().join(", ")
            )),
        }
    }
}

/// Single-line preview of `text`, cut to `max_len` characters with "..."
///
/// # Examples
///
/// ```
/// use memodb::lens::utils::preview;
///
/// assert_eq!(preview("Short", 20), "Short");
/// assert_eq!(preview("first line\nsecond line", 14), "first line ...");
/// ```
pub fn preview(text: &str, max_len: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_len {
        flat
    } else {
        let truncated: String = flat.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

/// Escape the separator so a value fits in one PSV cell
pub fn psv_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
