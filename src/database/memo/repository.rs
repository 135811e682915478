//! Memo repository
//!
//! Reads and writes memos through generated statement text. Every write is
//! wrapped in a change bracket, so it notifies subscribers unless an outer
//! bracket is open. Reads only ever see live memos, with one exception:
//! [`MemoRepository::operations_since`] scans soft-deleted rows too.

use crate::database::core::{build_delete, MemoKey, MemoQueryBuilder, StatementBuilder};
use crate::database::memo::clock::Clock;
use crate::database::memo::notify::{ChangeBatch, ChangeNotifier};
use crate::database::memo::record::{
    truncate_content, Memo, MemoOperation, OperationKind, MEMO_COLUMNS,
};
use crate::database::memo::sort::{title_contains, MemoSort};
use crate::error::{MemoError, MemoResult};
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, error};

/// Repository for memo operations
pub struct MemoRepository<'a> {
    conn: &'a Connection,
    notifier: &'a ChangeNotifier,
    clock: &'a dyn Clock,
}

impl<'a> MemoRepository<'a> {
    pub fn new(conn: &'a Connection, notifier: &'a ChangeNotifier, clock: &'a dyn Clock) -> Self {
        Self {
            conn,
            notifier,
            clock,
        }
    }

    fn check_id(id: i64) -> MemoResult<()> {
        if id < 1 {
            return Err(MemoError::InvalidArgument(format!(
                "memo id must be positive, got {}",
                id
            )));
        }
        Ok(())
    }

    /// Execute a write statement inside a change bracket
    fn write(&self, sql: &str) -> MemoResult<usize> {
        let _batch = ChangeBatch::new(self.notifier);
        debug!("[query] {}", sql);
        self.conn.execute(sql, []).map_err(|e| {
            error!("failed to execute `{}`: {}", sql, e);
            MemoError::execution(sql, e)
        })
    }

    /// Run a memo query, handing each mapped row to `f`
    fn query_memos<F>(&self, sql: &str, mut f: F) -> MemoResult<usize>
    where
        F: FnMut(&Memo),
    {
        debug!("[query] {}", sql);
        let fail = |e: rusqlite::Error| {
            error!("failed to execute `{}`: {}", sql, e);
            MemoError::execution(sql, e)
        };

        let mut stmt = self.conn.prepare(sql).map_err(fail)?;
        let mut rows = stmt.query([]).map_err(fail)?;
        let mut visited = 0;

        while let Some(row) = rows.next().map_err(fail)? {
            let memo = Memo::from_row(row).map_err(fail)?;
            f(&memo);
            visited += 1;
        }

        Ok(visited)
    }

    fn query_ids(&self, sql: &str) -> MemoResult<Vec<i64>> {
        debug!("[query] {}", sql);
        let fail = |e: rusqlite::Error| {
            error!("failed to execute `{}`: {}", sql, e);
            MemoError::execution(sql, e)
        };

        let mut stmt = self.conn.prepare(sql).map_err(fail)?;
        let ids = stmt
            .query_map([], |row| row.get::<_, i64>(0))
            .map_err(fail)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(fail)?;
        Ok(ids)
    }

    fn query_count(&self, sql: &str) -> MemoResult<u64> {
        debug!("[query] {}", sql);
        self.conn
            .query_row(sql, [], |row| row.get::<_, i64>(0))
            .map(|count| count.max(0) as u64)
            .map_err(|e| {
                error!("failed to execute `{}`: {}", sql, e);
                MemoError::execution(sql, e)
            })
    }

    /// Insert a memo and set its `id` to the one the store assigned
    ///
    /// Content beyond the length limit is dropped, on the caller's memo as
    /// well as in the store. Font settings are replaced by the defaults when
    /// `font_respect` is false.
    pub fn insert(&self, memo: &mut Memo) -> MemoResult<i64> {
        memo.content = memo
            .content
            .as_deref()
            .map(|content| truncate_content(content).to_string());

        let (font_size, font_color) = memo.effective_font();
        let sql = StatementBuilder::new()
            .set(MemoKey::ItemMode, memo.has_doodle)
            .set(MemoKey::Favorite, memo.favorite)
            .set(MemoKey::Color, memo.color)
            .set(MemoKey::Content, memo.content.as_deref())
            .set(MemoKey::FontRespect, memo.font_respect)
            .set(MemoKey::FontSize, font_size)
            .set(MemoKey::FontColor, font_color)
            .set(MemoKey::Comment, memo.comment.as_deref())
            .set(MemoKey::DoodlePath, memo.doodle_path.as_deref())
            .build_insert(self.clock.now())?;

        self.write(&sql)?;
        memo.id = self.conn.last_insert_rowid();
        debug!("memo id: {}", memo.id);
        Ok(memo.id)
    }

    /// Rewrite the caller fields of a live memo
    ///
    /// Absent optional fields leave their columns untouched. The text/doodle
    /// mode is fixed at insert and not rewritten. Deleted memos are reported
    /// as not found.
    pub fn update(&self, memo: &Memo) -> MemoResult<()> {
        Self::check_id(memo.id)?;
        if !self.exists(memo.id)? {
            return Err(MemoError::NotFound(memo.id));
        }

        let (font_size, font_color) = memo.effective_font();
        let sql = StatementBuilder::new()
            .set(MemoKey::Favorite, memo.favorite)
            .set(MemoKey::Color, memo.color)
            .set(MemoKey::Content, memo.content.as_deref().map(truncate_content))
            .set(MemoKey::FontRespect, memo.font_respect)
            .set(MemoKey::FontSize, font_size)
            .set(MemoKey::FontColor, font_color)
            .set(MemoKey::Comment, memo.comment.as_deref())
            .set(MemoKey::DoodlePath, memo.doodle_path.as_deref())
            .build_update(memo.id, self.clock.now())?;

        if self.write(&sql)? == 0 {
            return Err(MemoError::NotFound(memo.id));
        }
        Ok(())
    }

    /// Logically delete a live memo
    pub fn delete(&self, id: i64) -> MemoResult<()> {
        Self::check_id(id)?;
        if !self.exists(id)? {
            return Err(MemoError::NotFound(id));
        }

        let sql = build_delete(id, self.clock.now())?;
        self.write(&sql)?;
        Ok(())
    }

    /// Fetch a live memo by id
    pub fn get(&self, id: i64) -> MemoResult<Memo> {
        Self::check_id(id)?;

        let sql = MemoQueryBuilder::new()
            .select(MEMO_COLUMNS)
            .with_id(id)
            .live_only()
            .build();

        let mut found = None;
        self.query_memos(&sql, |memo| found = Some(memo.clone()))?;
        found.ok_or(MemoError::NotFound(id))
    }

    /// All live memos, oldest first
    pub fn list_all(&self) -> MemoResult<Vec<Memo>> {
        let sql = MemoQueryBuilder::new()
            .select(MEMO_COLUMNS)
            .live_only()
            .order_by(&MemoSort::CreateTimeAsc.order_by_expr())
            .build();

        let mut memos = Vec::new();
        self.query_memos(&sql, |memo| memos.push(memo.clone()))?;
        Ok(memos)
    }

    /// Visit every live memo, newest first
    pub fn for_each_memo<F>(&self, f: F) -> MemoResult<usize>
    where
        F: FnMut(&Memo),
    {
        let sql = MemoQueryBuilder::new()
            .select(MEMO_COLUMNS)
            .live_only()
            .order_by(&MemoSort::CreateTimeDesc.order_by_expr())
            .build();

        self.query_memos(&sql, f)
    }

    /// Number of live memos
    pub fn count(&self) -> MemoResult<u64> {
        self.query_count(&MemoQueryBuilder::new().live_only().build_count())
    }

    /// Fill `buf` with live memo ids in `sort` order
    ///
    /// Returns the number of ids written. Without a buffer, returns the
    /// number of live memos instead; an empty buffer yields 0.
    pub fn fill_indexes(&self, buf: Option<&mut [i64]>, sort: MemoSort) -> MemoResult<usize> {
        let buf = match buf {
            Some(buf) => buf,
            None => return Ok(self.count()? as usize),
        };
        if buf.is_empty() {
            return Ok(0);
        }

        let ids = self.indexes(buf.len(), sort)?;
        buf[..ids.len()].copy_from_slice(&ids);
        Ok(ids.len())
    }

    /// Up to `limit` live memo ids in `sort` order
    pub fn indexes(&self, limit: usize, sort: MemoSort) -> MemoResult<Vec<i64>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let sql = MemoQueryBuilder::new()
            .select("id")
            .live_only()
            .order_by(&sort.order_by_expr())
            .limit(limit as u64)
            .build();

        self.query_ids(&sql)
    }

    /// Whether a live memo carries this id
    pub fn exists(&self, id: i64) -> MemoResult<bool> {
        Self::check_id(id)?;

        let sql = MemoQueryBuilder::new()
            .select("id")
            .with_id(id)
            .live_only()
            .build();

        Ok(!self.query_ids(&sql)?.is_empty())
    }

    /// Last modification time of a live memo, `None` when there is none
    pub fn modified_time(&self, id: i64) -> MemoResult<Option<i64>> {
        Self::check_id(id)?;

        let sql = MemoQueryBuilder::new()
            .select("modi_time")
            .with_id(id)
            .live_only()
            .build();

        debug!("[query] {}", sql);
        self.conn
            .query_row(&sql, [], |row| row.get::<_, i64>(0))
            .optional()
            .map_err(|e| {
                error!("failed to execute `{}`: {}", sql, e);
                MemoError::execution(&sql, e)
            })
    }

    /// Operations on memos modified after `since`
    ///
    /// Soft-deleted memos are included and reported as deletes. The result
    /// is ordered by id; it is empty when nothing changed.
    pub fn operations_since(&self, since: i64) -> MemoResult<Vec<MemoOperation>> {
        let sql = MemoQueryBuilder::new()
            .select("id, create_time, delete_time")
            .modified_after(since)
            .order_by("id ASC")
            .build();

        debug!("[query] {}", sql);
        let fail = |e: rusqlite::Error| {
            error!("failed to execute `{}`: {}", sql, e);
            MemoError::execution(&sql, e)
        };

        let mut stmt = self.conn.prepare(&sql).map_err(fail)?;
        let operations = stmt
            .query_map([], |row| {
                let id: i64 = row.get(0)?;
                let create_time: i64 = row.get::<_, Option<i64>>(1)?.unwrap_or(0);
                let delete_time: Option<i64> = row.get(2)?;
                Ok(MemoOperation {
                    id,
                    kind: OperationKind::classify(
                        since,
                        create_time,
                        delete_time.filter(|t| *t != crate::database::core::NOT_DELETED),
                    ),
                })
            })
            .map_err(fail)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(fail)?;

        Ok(operations)
    }

    /// Search live memos whose title contains `term`
    ///
    /// The title is the comment when present, else the content. The term
    /// matches literally (`%` and `_` are not wildcards) and case follows
    /// SQLite's `LIKE`. `f` is called once per match; the memo it receives
    /// is only valid for the duration of the call. Returns the number of
    /// matches visited.
    pub fn search<F>(
        &self,
        term: &str,
        limit: Option<u64>,
        offset: u64,
        sort: MemoSort,
        f: F,
    ) -> MemoResult<usize>
    where
        F: FnMut(&Memo),
    {
        let mut query = MemoQueryBuilder::new()
            .select(MEMO_COLUMNS)
            .live_only()
            .with_condition(&title_contains(term))
            .order_by(&sort.order_by_expr());

        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        if offset > 0 {
            query = query.offset(offset);
        }

        self.query_memos(&query.build(), f)
    }

    /// [`search`](Self::search), collecting the matches
    pub fn search_list(
        &self,
        term: &str,
        limit: Option<u64>,
        offset: u64,
        sort: MemoSort,
    ) -> MemoResult<Vec<Memo>> {
        let mut memos = Vec::new();
        self.search(term, limit, offset, sort, |memo| memos.push(memo.clone()))?;
        Ok(memos)
    }
}
