//! Row range (pagination) strategies.
//!
//! A [`RangeSpec`] asks for rows `[start, end)`. Each [`RangeKind`] turns it
//! into SQL in its own way, and the select renderer asks the strategy three
//! questions: what clause goes at the profile's range position, what
//! predicate joins the WHERE clause, and whether the finished statement has
//! to be wrapped in a sub-select.
//!
//! | Kind | Bounded | Offset | Inside sub-select |
//! |------|---------|--------|-------------------|
//! | LimitOffset | `LIMIT n` | `OFFSET s` | yes |
//! | MySqlLimit | `LIMIT n` | `LIMIT s, n` | yes |
//! | FetchFirst | `FETCH FIRST e ROWS ONLY` | caller skips | no |
//! | Top | `TOP e` | caller skips | no |
//! | RowNum | `ROWNUM <= e` | nested `RNUM > s` | yes |
//! | None | caller caps | caller skips | no |

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::dialect::helpers::{
    emit_fetch_first, emit_limit_offset_standard, emit_limit_start_count, emit_top,
};
use super::token::TokenStream;

/// Requested rows `[start, end)`; `end: None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RangeSpec {
    pub start: u64,
    pub end: Option<u64>,
}

impl RangeSpec {
    pub fn new(start: u64, end: Option<u64>) -> Self {
        Self { start, end }
    }

    /// First `count` rows.
    pub fn first(count: u64) -> Self {
        Self::new(0, Some(count))
    }

    /// No pagination requested.
    pub fn is_none(&self) -> bool {
        self.start == 0 && self.end.is_none()
    }

    /// End bound, never below `start`.
    pub fn end(&self) -> Option<u64> {
        self.end.map(|end| end.max(self.start))
    }

    /// Number of rows in the range, when bounded.
    pub fn count(&self) -> Option<u64> {
        self.end().map(|end| end - self.start)
    }
}

/// Pagination strategy of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeKind {
    /// Nothing in SQL; the caller skips and caps rows.
    #[default]
    None,
    /// `LIMIT n OFFSET s`
    LimitOffset,
    /// `LIMIT s, n`
    MySqlLimit,
    /// `FETCH FIRST n ROWS ONLY`
    FetchFirst,
    /// `SELECT TOP n`
    Top,
    /// `ROWNUM` pseudo-column emulation.
    RowNum,
}

impl RangeKind {
    pub fn strategy(&self) -> &'static dyn RangeStrategy {
        match self {
            RangeKind::None => &NoRange,
            RangeKind::LimitOffset => &LimitOffset,
            RangeKind::MySqlLimit => &MySqlLimit,
            RangeKind::FetchFirst => &FetchFirst,
            RangeKind::Top => &Top,
            RangeKind::RowNum => &RowNum,
        }
    }
}

/// Shape of the select a range is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RangeContext {
    pub distinct: bool,
    pub ordered: bool,
    /// The select aggregates or groups rows.
    pub grouped: bool,
    /// The select is nested inside another statement.
    pub subselect: bool,
}

/// Turns a range into SQL for one vendor family.
pub trait RangeStrategy: Sync {
    /// Clause emitted at the profile's range position.
    fn clause(&self, _range: RangeSpec, _ctx: &RangeContext) -> TokenStream {
        TokenStream::new()
    }

    /// Predicate to conjoin into the WHERE clause.
    fn where_condition(&self, _range: RangeSpec, _ctx: &RangeContext) -> Option<String> {
        None
    }

    /// Whether the rendered select must be wrapped by [`RangeStrategy::wrap`].
    fn requires_subselect(&self, _range: RangeSpec, _ctx: &RangeContext) -> bool {
        false
    }

    fn wrap(&self, inner: String, _range: RangeSpec, _ctx: &RangeContext) -> String {
        inner
    }

    /// Leading rows the caller discards because SQL could not skip them.
    fn skip_rows(&self, _range: RangeSpec, _ctx: &RangeContext) -> u64 {
        0
    }

    /// Row cap the caller applies because SQL could not.
    fn max_rows(&self, _range: RangeSpec, _ctx: &RangeContext) -> Option<u64> {
        None
    }
}

pub struct NoRange;

impl RangeStrategy for NoRange {
    fn skip_rows(&self, range: RangeSpec, _ctx: &RangeContext) -> u64 {
        range.start
    }

    fn max_rows(&self, range: RangeSpec, _ctx: &RangeContext) -> Option<u64> {
        range.count()
    }
}

pub struct LimitOffset;

impl RangeStrategy for LimitOffset {
    fn clause(&self, range: RangeSpec, _ctx: &RangeContext) -> TokenStream {
        let offset = (range.start > 0).then_some(range.start);
        emit_limit_offset_standard(range.count(), offset)
    }
}

pub struct MySqlLimit;

impl RangeStrategy for MySqlLimit {
    fn clause(&self, range: RangeSpec, _ctx: &RangeContext) -> TokenStream {
        if range.is_none() {
            return TokenStream::new();
        }
        emit_limit_start_count(range.start, range.count().unwrap_or(u64::MAX))
    }
}

pub struct FetchFirst;

impl RangeStrategy for FetchFirst {
    fn clause(&self, range: RangeSpec, ctx: &RangeContext) -> TokenStream {
        match range.end() {
            Some(end) if !ctx.subselect => emit_fetch_first(end),
            _ => TokenStream::new(),
        }
    }

    fn skip_rows(&self, range: RangeSpec, ctx: &RangeContext) -> u64 {
        if ctx.subselect {
            0
        } else {
            range.start
        }
    }
}

pub struct Top;

impl RangeStrategy for Top {
    fn clause(&self, range: RangeSpec, ctx: &RangeContext) -> TokenStream {
        match range.end() {
            Some(end) if !ctx.subselect => emit_top(end),
            _ => TokenStream::new(),
        }
    }

    fn skip_rows(&self, range: RangeSpec, ctx: &RangeContext) -> u64 {
        if ctx.subselect {
            0
        } else {
            range.start
        }
    }
}

/// ROWNUM is assigned before ORDER BY, DISTINCT and grouping take effect, so
/// it is only filtered directly in plain blocks without an offset.
pub struct RowNum;

impl RowNum {
    fn direct(range: RangeSpec, ctx: &RangeContext) -> bool {
        range.start == 0 && !ctx.distinct && !ctx.ordered && !ctx.grouped
    }
}

impl RangeStrategy for RowNum {
    fn where_condition(&self, range: RangeSpec, ctx: &RangeContext) -> Option<String> {
        if !Self::direct(range, ctx) {
            return None;
        }
        range.end().map(|end| format!("ROWNUM <= {}", end))
    }

    fn requires_subselect(&self, range: RangeSpec, ctx: &RangeContext) -> bool {
        !range.is_none() && !Self::direct(range, ctx)
    }

    fn wrap(&self, inner: String, range: RangeSpec, ctx: &RangeContext) -> String {
        if !self.requires_subselect(range, ctx) {
            return inner;
        }

        if range.start == 0 {
            let end = range.end().unwrap_or(0);
            trace!(end, "single rownum nesting");
            return format!("SELECT * FROM ({}) WHERE ROWNUM <= {}", inner, end);
        }

        trace!(start = range.start, end = ?range.end(), "double rownum nesting");
        let limit = match range.end() {
            Some(end) => format!(" WHERE ROWNUM <= {}", end),
            None => String::new(),
        };
        format!(
            "SELECT * FROM (SELECT r.*, ROWNUM RNUM FROM ({}) r{}) WHERE RNUM > {}",
            inner, limit, range.start
        )
    }
}
