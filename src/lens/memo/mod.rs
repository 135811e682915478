//! Memo lens
//!
//! Ties the memo store to argument structs and output formatting, so the
//! CLI (or any other front end) only has to parse input and print.
//!
//! # Example
//!
//! ```rust,ignore
//! use memodb::database::MemoDatabase;
//! use memodb::lens::memo::{MemoAddArgs, MemoLens};
//!
//! let db = MemoDatabase::open_in_memory()?;
//! let lens = MemoLens::new(&db);
//! let memo = lens.add(&MemoAddArgs::new("call the plumber"))?;
//! println!("{}", lens.format_memos(&[memo], &OutputFormat::Table));
//! ```

mod args;
mod types;

pub use args::{
    parse_color, MemoAddArgs, MemoChangesArgs, MemoListArgs, MemoSearchArgs, MemoUpdateArgs,
};
pub use types::{MemoRow, OperationRow};

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;

use crate::database::{Memo, MemoDatabase, MemoOperation};
use crate::lens::time::TimeLens;
use crate::lens::utils::{psv_cell, OutputFormat, DEFAULT_PREVIEW_LEN};

pub struct MemoLens<'a> {
    db: &'a MemoDatabase,
}

impl<'a> MemoLens<'a> {
    pub fn new(db: &'a MemoDatabase) -> Self {
        Self { db }
    }

    /// Create a memo and return it as stored
    pub fn add(&self, args: &MemoAddArgs) -> Result<Memo> {
        let repo = self.db.memos();
        let mut memo = args.to_memo();
        let id = repo.insert(&mut memo)?;
        Ok(repo.get(id)?)
    }

    /// Change the given fields of a live memo and return it as stored
    pub fn update(&self, args: &MemoUpdateArgs) -> Result<Memo> {
        let repo = self.db.memos();
        let mut memo = repo.get(args.id)?;
        args.apply(&mut memo);
        repo.update(&memo)?;
        Ok(repo.get(args.id)?)
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        Ok(self.db.memos().delete(id)?)
    }

    pub fn get(&self, id: i64) -> Result<Memo> {
        Ok(self.db.memos().get(id)?)
    }

    pub fn count(&self) -> Result<u64> {
        Ok(self.db.memos().count()?)
    }

    /// Live memo ids in the requested order
    pub fn indexes(&self, args: &MemoListArgs) -> Result<Vec<i64>> {
        let repo = self.db.memos();
        let limit = match args.limit {
            Some(limit) => limit,
            None => repo.fill_indexes(None, args.sort)?,
        };

        let mut ids = vec![0i64; limit];
        let filled = repo.fill_indexes(Some(ids.as_mut_slice()), args.sort)?;
        ids.truncate(filled);
        Ok(ids)
    }

    /// Live memos in the requested order
    pub fn list(&self, args: &MemoListArgs) -> Result<Vec<Memo>> {
        let repo = self.db.memos();
        self.indexes(args)?
            .into_iter()
            .map(|id| repo.get(id).map_err(anyhow::Error::from))
            .collect()
    }

    /// Title search; `default_limit` applies when the args carry none
    pub fn search(&self, args: &MemoSearchArgs, default_limit: u64) -> Result<Vec<Memo>> {
        let limit = args.limit.unwrap_or(default_limit);
        Ok(self
            .db
            .memos()
            .search_list(&args.term, Some(limit), args.offset, args.sort)?)
    }

    /// Operations since the given reference time
    pub fn changes(&self, args: &MemoChangesArgs) -> Result<Vec<MemoOperation>> {
        let since = TimeLens::new().parse_timestamp(&args.since)?;
        Ok(self.db.memos().operations_since(since)?)
    }

    pub fn format_memos(&self, memos: &[Memo], format: &OutputFormat) -> String {
        let now = Utc::now().timestamp();

        match format {
            OutputFormat::Json | OutputFormat::JsonPretty | OutputFormat::JsonLine => {
                format_json(memos, format)
            }
            OutputFormat::Psv => {
                let mut output =
                    String::from("id|title|doodle|favorite|color|create_time|modi_time\n");
                for m in memos {
                    output.push_str(&format!(
                        "{}|{}|{}|{}|{}|{}|{}\n",
                        m.id,
                        psv_cell(m.title().unwrap_or_default()),
                        m.has_doodle,
                        m.favorite,
                        m.color,
                        m.create_time,
                        m.modi_time
                    ));
                }
                output
            }
            OutputFormat::Table | OutputFormat::Markdown => {
                let rows: Vec<MemoRow> = memos
                    .iter()
                    .map(|m| MemoRow::from_memo(m, DEFAULT_PREVIEW_LEN, now))
                    .collect();
                format_table(&rows, format)
            }
        }
    }

    /// Full view of a single memo
    pub fn format_memo(&self, memo: &Memo, format: &OutputFormat) -> String {
        if format.is_json() {
            return format_json(std::slice::from_ref(memo), format);
        }

        let time = TimeLens::new();
        let now = Utc::now().timestamp();
        let (font_size, font_color) = memo.effective_font();
        let mut lines = vec![
            format!("id:        {}", memo.id),
            format!("title:     {}", memo.comment.as_deref().unwrap_or("-")),
            format!("type:      {}", if memo.has_doodle { "doodle" } else { "text" }),
            format!("favorite:  {}", memo.favorite),
            format!("color:     {}", memo.color),
            format!("font:      {} / 0x{:08x}", font_size, font_color),
            format!(
                "created:   {} ({})",
                time.rfc3339(memo.create_time),
                time.humanize(memo.create_time, now)
            ),
            format!(
                "modified:  {} ({})",
                time.rfc3339(memo.modi_time),
                time.humanize(memo.modi_time, now)
            ),
        ];
        if let Some(path) = &memo.doodle_path {
            lines.push(format!("doodle:    {}", path));
        }
        lines.push(String::new());
        lines.push(memo.content.clone().unwrap_or_default());
        lines.join("\n")
    }

    pub fn format_operations(&self, ops: &[MemoOperation], format: &OutputFormat) -> String {
        let rows: Vec<OperationRow> = ops.iter().map(OperationRow::from).collect();

        match format {
            OutputFormat::Json | OutputFormat::JsonPretty | OutputFormat::JsonLine => {
                format_json(&rows, format)
            }
            OutputFormat::Psv => {
                let mut output = String::from("id|operation|code\n");
                for r in &rows {
                    output.push_str(&format!("{}|{}|{}\n", r.id, r.operation, r.code));
                }
                output
            }
            OutputFormat::Table | OutputFormat::Markdown => format_table(&rows, format),
        }
    }
}

fn format_json<T: Serialize>(items: &[T], format: &OutputFormat) -> String {
    match format {
        OutputFormat::JsonPretty => serde_json::to_string_pretty(items).unwrap_or_default(),
        OutputFormat::JsonLine => items
            .iter()
            .filter_map(|item| serde_json::to_string(item).ok())
            .collect::<Vec<_>>()
            .join("\n"),
        _ => serde_json::to_string(items).unwrap_or_default(),
    }
}

#[cfg(feature = "display")]
fn format_table<T: tabled::Tabled>(rows: &[T], format: &OutputFormat) -> String {
    use tabled::settings::Style;
    use tabled::Table;

    match format {
        OutputFormat::Markdown => Table::new(rows).with(Style::markdown()).to_string(),
        _ => Table::new(rows).with(Style::rounded()).to_string(),
    }
}

// Tables need the `display` feature; fall back to JSON without it
#[cfg(not(feature = "display"))]
fn format_table<T: Serialize>(rows: &[T], _format: &OutputFormat) -> String {
    serde_json::to_string_pretty(rows).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{ManualClock, OperationKind};
    use std::sync::Arc;

    fn setup() -> (MemoDatabase, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_700_000_000));
        let db = MemoDatabase::open_with_clock(None, clock.clone()).unwrap();
        (db, clock)
    }

    #[test]
    fn test_add_update_delete() {
        let (db, clock) = setup();
        let lens = MemoLens::new(&db);

        let memo = lens.add(&MemoAddArgs::new("first draft")).unwrap();
        assert_eq!(lens.count().unwrap(), 1);

        clock.advance(60);
        let updated = lens
            .update(&MemoUpdateArgs {
                id: memo.id,
                comment: Some("Draft".to_string()),
                favorite: Some(true),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(updated.comment.as_deref(), Some("Draft"));
        assert_eq!(updated.content.as_deref(), Some("first draft"));
        assert!(updated.favorite);
        assert_eq!(updated.modi_time, memo.modi_time + 60);

        lens.delete(memo.id).unwrap();
        assert!(lens.get(memo.id).is_err());
        assert!(lens.delete(memo.id).is_err());
    }

    #[test]
    fn test_list_and_indexes() {
        let (db, clock) = setup();
        let lens = MemoLens::new(&db);
        let a = lens.add(&MemoAddArgs::new("a")).unwrap().id;
        clock.advance(1);
        let b = lens.add(&MemoAddArgs::new("b")).unwrap().id;

        let all = MemoListArgs::default();
        assert_eq!(lens.indexes(&all).unwrap(), vec![b, a]);

        let limited = MemoListArgs {
            limit: Some(1),
            ..Default::default()
        };
        let memos = lens.list(&limited).unwrap();
        assert_eq!(memos.len(), 1);
        assert_eq!(memos[0].id, b);
    }

    #[test]
    fn test_search_default_limit() {
        let (db, _clock) = setup();
        let lens = MemoLens::new(&db);
        for i in 0..5 {
            lens.add(&MemoAddArgs::new(&format!("note {}", i))).unwrap();
        }

        let args = MemoSearchArgs::new("note");
        assert_eq!(lens.search(&args, 3).unwrap().len(), 3);

        let args = MemoSearchArgs {
            limit: Some(10),
            ..MemoSearchArgs::new("note")
        };
        assert_eq!(lens.search(&args, 3).unwrap().len(), 5);
    }

    #[test]
    fn test_changes() {
        let (db, clock) = setup();
        let lens = MemoLens::new(&db);
        let memo = lens.add(&MemoAddArgs::new("x")).unwrap();
        clock.advance(10);
        lens.delete(memo.id).unwrap();

        let ops = lens
            .changes(&MemoChangesArgs {
                since: "1700000005".to_string(),
            })
            .unwrap();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].kind, OperationKind::Delete);

        assert!(lens
            .changes(&MemoChangesArgs {
                since: "yesterday-ish".to_string()
            })
            .is_err());
    }

    #[test]
    fn test_format_psv_and_json() {
        let (db, _clock) = setup();
        let lens = MemoLens::new(&db);
        let memo = lens.add(&MemoAddArgs::new("a|b")).unwrap();

        let psv = lens.format_memos(&[memo.clone()], &OutputFormat::Psv);
        assert!(psv.starts_with("id|title|"));
        assert!(psv.contains("a\\|b"));

        let json = lens.format_memos(&[memo.clone()], &OutputFormat::Json);
        assert!(json.contains("\"content\":\"a|b\""));

        let lines = lens.format_memos(&[memo.clone(), memo], &OutputFormat::JsonLine);
        assert_eq!(lines.lines().count(), 2);
    }

    #[test]
    fn test_format_operations() {
        let (db, _clock) = setup();
        let lens = MemoLens::new(&db);
        let ops = vec![MemoOperation {
            id: 7,
            kind: OperationKind::Update,
        }];

        let psv = lens.format_operations(&ops, &OutputFormat::Psv);
        assert!(psv.contains("7|update|1"));
    }

    #[test]
    fn test_format_memo_detail() {
        let (db, _clock) = setup();
        let lens = MemoLens::new(&db);
        let memo = lens.add(&MemoAddArgs::new("body text")).unwrap();

        let detail = lens.format_memo(&memo, &OutputFormat::Table);
        assert!(detail.contains("font:      44 / 0xff000000"));
        assert!(detail.ends_with("body text"));
    }
}
