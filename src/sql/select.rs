//! SELECT builder.
//!
//! A [`QueryBuilder`] owns one statement: the root select plus every
//! sub-select created under it. Each scope has its own select list, WHERE,
//! grouping, ordering and range; all scopes share the [`JoinGraph`] so aliases
//! stay unique across the statement.
//!
//! # Example
//!
//! ```ignore
//! let mut q = QueryBuilder::new(Vendor::Postgres.profile());
//! let root = q.root();
//! let o = q.from_table(root, &orders)?;
//! let (c, _) = q.join(root, &JoinPath::root(), &Relation::new("customer", &orders, &fk, &customers))?;
//! q.select(root, col(o, "id"))?;
//! q.where_(root, col(c, "name").eq("Ann"))?;
//! q.order_by(root, col(o, "id"), true, false)?;
//! q.set_range(root, 0, Some(10))?;
//! let compiled = q.render(&LockRequest::none())?;
//! ```

use tracing::debug;

use super::dialect::{Capability, DialectProfile, RangePosition};
use super::expr::{count_distinct, count_star, BinaryOperator, Expr, RenderContext, SubselectRenderer};
use super::join::{Alias, JoinEdge, JoinGraph, JoinKind, JoinPath, Relation, ScopeId};
use super::lock::{check_locking, LockRequest, LockTarget};
use super::range::{RangeContext, RangeSpec};
use super::token::{Token, TokenStream};
use crate::error::{CompileError, CompileResult};
use crate::schema::Table;

/// Alias of a derived table in FROM.
const FROM_SELECT_ALIAS: &str = "s";

// =============================================================================
// Select state
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    pub expr: Expr,
    pub label: Option<String>,
    /// Primary key or discriminator column of a selected row.
    pub identifier: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub expr: Expr,
    pub asc: bool,
}

#[derive(Debug, Clone)]
struct SelectState {
    items: Vec<SelectItem>,
    wheres: Vec<Expr>,
    having: Vec<Expr>,
    group_by: Vec<Expr>,
    order_by: Vec<OrderItem>,
    range: RangeSpec,
    distinct: bool,
    not_distinct: bool,
    auto_distinct: bool,
    aggregate: bool,
}

impl Default for SelectState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            wheres: Vec::new(),
            having: Vec::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            range: RangeSpec::default(),
            distinct: false,
            not_distinct: false,
            auto_distinct: true,
            aggregate: false,
        }
    }
}

impl SelectState {
    fn is_aggregate(&self) -> bool {
        self.aggregate || self.items.iter().any(|i| i.expr.contains_aggregate())
    }

    /// Ordering survives unless the select collapses to one aggregate row.
    fn is_ordered(&self) -> bool {
        !self.order_by.is_empty() && !(self.is_aggregate() && self.group_by.is_empty())
    }
}

/// One column of a compiled select.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputColumn {
    /// 1-based position in the select list.
    pub index: usize,
    pub expr: Expr,
    pub label: Option<String>,
    pub identifier: bool,
}

/// A rendered SELECT and what the caller needs to execute it.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSelect {
    pub sql: String,
    pub columns: Vec<OutputColumn>,
    /// Parameter names in placeholder order.
    pub params: Vec<String>,
    /// Leading rows to discard after execution.
    pub skip_rows: u64,
    /// Row cap to apply after execution.
    pub max_rows: Option<u64>,
}

// =============================================================================
// Builder
// =============================================================================

#[derive(Debug, Clone)]
pub struct QueryBuilder<'p> {
    profile: &'p DialectProfile,
    graph: JoinGraph,
    /// Indexed by scope id, parallel to the graph's scopes.
    states: Vec<SelectState>,
}

impl<'p> QueryBuilder<'p> {
    pub fn new(profile: &'p DialectProfile) -> Self {
        Self {
            profile,
            graph: JoinGraph::new(profile.join_syntax()),
            states: vec![SelectState::default()],
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId::ROOT
    }

    pub fn profile(&self) -> &'p DialectProfile {
        self.profile
    }

    pub fn graph(&self) -> &JoinGraph {
        &self.graph
    }

    fn state(&self, scope: ScopeId) -> CompileResult<&SelectState> {
        self.states
            .get(scope.0)
            .ok_or_else(|| CompileError::AliasResolution(format!("unknown scope {}", scope.0)))
    }

    fn state_mut(&mut self, scope: ScopeId) -> CompileResult<&mut SelectState> {
        self.states
            .get_mut(scope.0)
            .ok_or_else(|| CompileError::AliasResolution(format!("unknown scope {}", scope.0)))
    }

    // =========================================================================
    // Scopes and tables
    // =========================================================================

    /// New sub-select nested in `parent`, for EXISTS / IN expressions.
    pub fn subselect(&mut self, parent: ScopeId) -> CompileResult<ScopeId> {
        self.profile.assert_support(Capability::Subselect)?;
        self.state(parent)?;
        let scope = self.graph.subselect(parent)?;
        self.states.push(SelectState::default());
        Ok(scope)
    }

    pub fn declare_variable(&mut self, scope: ScopeId, variable: &str) -> CompileResult<()> {
        self.graph.declare_variable(scope, variable)
    }

    /// Alias of the scope's root table, allocated on first use.
    pub fn from_table(&mut self, scope: ScopeId, table: &Table) -> CompileResult<Alias> {
        self.alias_at(scope, table, &JoinPath::root())
    }

    /// Alias of `table` at `path`, allocated on first use.
    pub fn alias_at(&mut self, scope: ScopeId, table: &Table, path: &JoinPath) -> CompileResult<Alias> {
        self.graph
            .alias_for(scope, table, path, true)?
            .ok_or_else(|| CompileError::AliasResolution(format!("{} at '{}'", table.full_name(), path)))
    }

    /// Inner join along a relation.
    pub fn join(
        &mut self,
        scope: ScopeId,
        path: &JoinPath,
        relation: &Relation<'_>,
    ) -> CompileResult<(Alias, JoinPath)> {
        self.graph.join(scope, path, relation, JoinKind::Inner)
    }

    /// Outer join along a relation; inner under traditional join syntax.
    pub fn outer_join(
        &mut self,
        scope: ScopeId,
        path: &JoinPath,
        relation: &Relation<'_>,
    ) -> CompileResult<(Alias, JoinPath)> {
        self.graph.join(scope, path, relation, JoinKind::Outer)
    }

    /// Cross join to a table bound to an unbound variable.
    pub fn cross_join(
        &mut self,
        scope: ScopeId,
        from: &Table,
        path: &JoinPath,
        to: &Table,
        variable: &str,
    ) -> CompileResult<(Alias, JoinPath)> {
        self.graph.cross_join(scope, from, path, to, variable)
    }

    /// Build an OR of `branches` predicates.
    ///
    /// `build` is called once per branch with the branch number and requests
    /// whatever joins its predicate needs. Joins not shared by every branch
    /// become outer joins. The combined predicate is returned, not added.
    pub fn or_joins<F>(&mut self, scope: ScopeId, branches: usize, mut build: F) -> CompileResult<Expr>
    where
        F: FnMut(&mut Self, usize) -> CompileResult<Expr>,
    {
        self.graph.begin_or(scope)?;
        let mut combined: Option<Expr> = None;
        for branch in 0..branches {
            if branch > 0 {
                self.graph.next_or_branch(scope)?;
            }
            let predicate = build(self, branch)?;
            combined = Some(match combined {
                Some(prev) => Expr::BinaryOp {
                    left: Box::new(prev),
                    op: BinaryOperator::Or,
                    right: Box::new(predicate),
                },
                None => predicate,
            });
        }
        self.graph.end_or(scope)?;
        combined.ok_or_else(|| CompileError::AliasResolution("OR with no branches".into()))
    }

    // =========================================================================
    // Clauses
    // =========================================================================

    /// Add a select item; returns its 1-based position.
    ///
    /// Selecting an expression twice returns the first position.
    pub fn select(&mut self, scope: ScopeId, expr: Expr) -> CompileResult<usize> {
        self.push_item(scope, expr, None, false)
    }

    pub fn select_as(&mut self, scope: ScopeId, expr: Expr, label: &str) -> CompileResult<usize> {
        self.push_item(scope, expr, Some(label.to_string()), false)
    }

    /// Select a primary key or discriminator column.
    pub fn select_identifier(&mut self, scope: ScopeId, expr: Expr) -> CompileResult<usize> {
        self.push_item(scope, expr, None, true)
    }

    fn push_item(
        &mut self,
        scope: ScopeId,
        expr: Expr,
        label: Option<String>,
        identifier: bool,
    ) -> CompileResult<usize> {
        let state = self.state_mut(scope)?;
        if let Some(pos) = state.items.iter().position(|i| i.expr == expr) {
            if identifier {
                state.items[pos].identifier = true;
            }
            return Ok(pos + 1);
        }
        state.items.push(SelectItem {
            expr,
            label,
            identifier,
        });
        Ok(state.items.len())
    }

    pub fn where_(&mut self, scope: ScopeId, predicate: Expr) -> CompileResult<()> {
        self.state_mut(scope)?.wheres.push(predicate);
        Ok(())
    }

    pub fn having(&mut self, scope: ScopeId, predicate: Expr) -> CompileResult<()> {
        self.profile.assert_support(Capability::Having)?;
        self.state_mut(scope)?.having.push(predicate);
        Ok(())
    }

    pub fn group_by(&mut self, scope: ScopeId, expr: Expr) -> CompileResult<()> {
        self.state_mut(scope)?.group_by.push(expr);
        Ok(())
    }

    /// Order by `expr`; `select_also` adds it to the select list too.
    pub fn order_by(&mut self, scope: ScopeId, expr: Expr, asc: bool, select_also: bool) -> CompileResult<()> {
        if select_also {
            self.select(scope, expr.clone())?;
        }
        self.state_mut(scope)?.order_by.push(OrderItem { expr, asc });
        Ok(())
    }

    /// Rows `[start, end)`; `end: None` is unbounded.
    pub fn set_range(&mut self, scope: ScopeId, start: u64, end: Option<u64>) -> CompileResult<()> {
        self.state_mut(scope)?.range = RangeSpec::new(start, end);
        Ok(())
    }

    pub fn set_distinct(&mut self, scope: ScopeId, distinct: bool) -> CompileResult<()> {
        self.state_mut(scope)?.distinct = distinct;
        Ok(())
    }

    /// Forbid implicit DISTINCT. To-many joins still force it.
    pub fn set_not_distinct(&mut self, scope: ScopeId, not_distinct: bool) -> CompileResult<()> {
        self.state_mut(scope)?.not_distinct = not_distinct;
        Ok(())
    }

    pub fn set_auto_distinct(&mut self, scope: ScopeId, auto: bool) -> CompileResult<()> {
        self.state_mut(scope)?.auto_distinct = auto;
        Ok(())
    }

    pub fn set_aggregate(&mut self, scope: ScopeId, aggregate: bool) -> CompileResult<()> {
        self.state_mut(scope)?.aggregate = aggregate;
        Ok(())
    }

    pub fn is_distinct(&self, scope: ScopeId) -> bool {
        let Ok(state) = self.state(scope) else {
            return false;
        };
        self.graph.has_to_many(scope)
            || (!state.not_distinct
                && (state.distinct || (state.auto_distinct && self.graph.is_implicitly_distinct(scope))))
    }

    /// Whether the root select can be locked as requested.
    pub fn supports_locking(&self, lock: &LockRequest) -> bool {
        self.lock_target(ScopeId::ROOT, lock)
            .and_then(|target| check_locking(self.profile, &target))
            .is_ok()
    }

    fn lock_target(&self, scope: ScopeId, lock: &LockRequest) -> CompileResult<LockTarget> {
        let state = self.state(scope)?;
        let edges: &[JoinEdge] = self.graph.edges(scope)?;
        let ctx = self.range_context(scope, state);
        Ok(LockTarget {
            aggregate: state.is_aggregate(),
            distinct: ctx.distinct || lock.has_to_many_eager_join,
            tables: self.graph.aliases(scope)?.len(),
            ordered: ctx.ordered,
            ranged: !state.range.is_none(),
            range_wraps: self
                .profile
                .range
                .strategy()
                .requires_subselect(state.range, &ctx),
            has_inner_join: edges.iter().any(|e| e.kind != JoinKind::Outer),
            has_outer_join: edges.iter().any(|e| e.kind == JoinKind::Outer),
        })
    }

    fn range_context(&self, scope: ScopeId, state: &SelectState) -> RangeContext {
        RangeContext {
            distinct: self.is_distinct(scope),
            ordered: state.is_ordered(),
            grouped: state.is_aggregate() || !state.group_by.is_empty(),
            subselect: scope != ScopeId::ROOT,
        }
    }

    /// Number of tables the scope selects from.
    pub fn table_count(&self, scope: ScopeId) -> CompileResult<usize> {
        Ok(self.graph.aliases(scope)?.len())
    }

    /// Whether the scope has explicit predicates.
    pub fn has_where(&self, scope: ScopeId) -> bool {
        self.state(scope).map_or(false, |s| !s.wheres.is_empty())
    }

    /// Alias of `table` at the scope's root path, if it was ever used.
    pub(crate) fn root_alias(&mut self, scope: ScopeId, table: &Table) -> CompileResult<Alias> {
        self.graph.alias(scope, table, &JoinPath::root())
    }

    /// Drop the select list and ordering, keeping FROM and WHERE.
    pub(crate) fn clear_selects(&mut self, scope: ScopeId) -> CompileResult<()> {
        let state = self.state_mut(scope)?;
        state.items.clear();
        state.order_by.clear();
        Ok(())
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Render the root select.
    pub fn render(&self, lock: &LockRequest) -> CompileResult<CompiledSelect> {
        let mut params = Vec::new();
        let sql = self.render_scope(ScopeId::ROOT, lock, &mut params)?;

        let state = self.state(ScopeId::ROOT)?;
        let ctx = self.range_context(ScopeId::ROOT, state);
        let strategy = self.profile.range.strategy();

        let columns = state
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| OutputColumn {
                index: i + 1,
                expr: item.expr.clone(),
                label: item.label.clone(),
                identifier: item.identifier,
            })
            .collect();

        Ok(CompiledSelect {
            sql,
            columns,
            params,
            skip_rows: strategy.skip_rows(state.range, &ctx),
            max_rows: strategy.max_rows(state.range, &ctx),
        })
    }

    /// Render a query counting the rows the root select returns.
    pub fn render_count(&self) -> CompileResult<CompiledSelect> {
        let profile = self.profile;
        let state = self.state(ScopeId::ROOT)?;
        let mut params = Vec::new();

        let identifiers: Vec<&Expr> = if self.is_distinct(ScopeId::ROOT) {
            state.items.iter().filter(|i| i.identifier).map(|i| &i.expr).collect()
        } else {
            Vec::new()
        };

        let direct = if !state.group_by.is_empty() || !state.range.is_none() {
            None
        } else if profile.quirks.use_wildcard_for_count || identifiers.is_empty() {
            Some(count_star())
        } else if identifiers.len() == 1 {
            Some(count_distinct(identifiers[0].clone()))
        } else if let Some(separator) = &profile.clauses.distinct_count_column_separator {
            let mut cols = Vec::new();
            for expr in &identifiers {
                let mut ctx = RenderContext::new(profile, &mut params).with_subselects(self);
                cols.push(expr.to_sql(&mut ctx)?);
            }
            Some(Expr::Raw(format!(
                "COUNT(DISTINCT {})",
                cols.join(&format!(" {} ", separator))
            )))
        } else {
            None
        };

        let sql = match direct {
            Some(count) => {
                let mut ctx = RenderContext::new(profile, &mut params).with_subselects(self);
                let count = count.to_sql(&mut ctx)?;
                let body = self.render_body(ScopeId::ROOT, &mut params, None, false)?;
                format!("SELECT {} {}", count, body)
            }
            None => {
                profile.assert_support(Capability::Subselect)?;
                let inner = self.render_scope(ScopeId::ROOT, &LockRequest::none(), &mut params)?;
                let alias = if profile.quirks.requires_alias_for_subselect {
                    format!(" {}", FROM_SELECT_ALIAS)
                } else {
                    String::new()
                };
                format!("SELECT COUNT(*) FROM ({}){}", inner, alias)
            }
        };
        debug!(%sql, "count select");

        Ok(CompiledSelect {
            sql,
            columns: vec![OutputColumn {
                index: 1,
                expr: count_star(),
                label: None,
                identifier: false,
            }],
            params,
            skip_rows: 0,
            max_rows: None,
        })
    }

    /// SQL of any scope without locking; `params` collects its placeholders.
    pub(crate) fn render_unlocked(&self, scope: ScopeId, params: &mut Vec<String>) -> CompileResult<String> {
        self.render_scope(scope, &LockRequest::none(), params)
    }

    fn render_scope(&self, scope: ScopeId, lock: &LockRequest, params: &mut Vec<String>) -> CompileResult<String> {
        let profile = self.profile;
        let state = self.state(scope)?;
        if state.items.is_empty() {
            return Err(CompileError::AliasResolution(format!(
                "select list of scope {} is empty",
                scope.0
            )));
        }

        let ctx = self.range_context(scope, state);
        let strategy = profile.range.strategy();
        let range = state.range;
        let wraps = strategy.requires_subselect(range, &ctx);
        let position = profile.range_position();
        let range_clause = strategy.clause(range, &ctx);

        let for_update = lock.for_update && scope == ScopeId::ROOT;
        if for_update {
            check_locking(profile, &self.lock_target(scope, lock)?)?;
        }
        let lock_clause = profile.locking.composer().lock_clause(
            profile,
            lock.effective_isolation(),
            for_update,
            scope != ScopeId::ROOT,
        )?;
        let table_hint = if for_update && !profile.quirks.simulate_locking {
            profile.clauses.table_for_update.as_deref()
        } else {
            None
        };

        let mut ts = TokenStream::new();
        ts.push(Token::Select);
        if position == RangePosition::PreDistinct {
            ts.append(&range_clause);
        }
        if ctx.distinct {
            ts.space().push(Token::Distinct);
        }
        if position == RangePosition::PostDistinct {
            ts.append(&range_clause);
        }
        ts.space();

        let label_columns = wraps && self.graph.aliases(scope)?.len() > 1;
        {
            let mut rc = RenderContext::new(profile, &mut *params).with_subselects(self);
            for (i, item) in state.items.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                ts.append(&item.expr.to_tokens(&mut rc)?);
                match &item.label {
                    Some(label) => {
                        ts.space().push(Token::As).space().push(Token::Ident(label.clone()));
                    }
                    None if label_columns => {
                        ts.space().push(Token::As).space().raw(format!("c{}", i));
                    }
                    None => {}
                }
            }
        }

        let mut sql = ts.serialize(profile);
        sql.push(' ');
        sql.push_str(&self.render_body(scope, params, table_hint, ctx.ordered)?);

        let mut tail = TokenStream::new();
        if position == RangePosition::PostSelect {
            tail.append(&range_clause);
        }
        if let Some(clause) = lock_clause {
            tail.space().raw(clause);
        }
        if position == RangePosition::PostLock {
            tail.append(&range_clause);
        }
        sql.push_str(&tail.serialize(profile));

        if wraps {
            sql = strategy.wrap(sql, range, &ctx);
        }
        Ok(sql)
    }

    /// FROM tables and the WHERE conjunction of a scope, without keywords.
    pub(crate) fn from_and_where(
        &self,
        scope: ScopeId,
        params: &mut Vec<String>,
        table_hint: Option<&str>,
    ) -> CompileResult<(String, Option<String>)> {
        let profile = self.profile;
        let state = self.state(scope)?;
        let from = self.graph.render_from(scope, profile, table_hint)?;
        let mut rc = RenderContext::new(profile, params).with_subselects(self);

        let mut conditions = Vec::new();
        for predicate in &state.wheres {
            conditions.push(predicate.to_sql(&mut rc)?);
        }
        conditions.extend(from.join_predicates);
        let ctx = self.range_context(scope, state);
        if let Some(condition) = profile.range.strategy().where_condition(state.range, &ctx) {
            conditions.push(condition);
        }

        let multiple = conditions.len() > 1;
        let conditions: Vec<String> = conditions
            .into_iter()
            .enumerate()
            .map(|(i, c)| {
                let is_or = state
                    .wheres
                    .get(i)
                    .map_or(false, |w| matches!(w, Expr::BinaryOp { op: BinaryOperator::Or, .. }));
                if multiple && is_or {
                    format!("({})", c)
                } else {
                    c
                }
            })
            .collect();

        let condition = (!conditions.is_empty()).then(|| conditions.join(" AND "));
        Ok((from.sql, condition))
    }

    /// `FROM ... [WHERE ...] [GROUP BY ...] [HAVING ...] [ORDER BY ...]`
    fn render_body(
        &self,
        scope: ScopeId,
        params: &mut Vec<String>,
        table_hint: Option<&str>,
        ordered: bool,
    ) -> CompileResult<String> {
        let profile = self.profile;
        let state = self.state(scope)?;
        let (from, condition) = self.from_and_where(scope, params, table_hint)?;

        let mut ts = TokenStream::new();
        ts.push(Token::From).space().raw(from);
        if let Some(condition) = condition {
            ts.space().push(Token::Where).space().raw(condition);
        }

        let mut rc = RenderContext::new(profile, params).with_subselects(self);
        if !state.group_by.is_empty() {
            ts.space().push(Token::GroupBy).space();
            for (i, expr) in state.group_by.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                ts.append(&expr.to_tokens(&mut rc)?);
            }
        }

        if !state.having.is_empty() {
            ts.space().push(Token::Having).space();
            for (i, expr) in state.having.iter().enumerate() {
                if i > 0 {
                    ts.space().push(Token::And).space();
                }
                ts.append(&expr.to_tokens(&mut rc)?);
            }
        }

        if ordered {
            ts.space().push(Token::OrderBy).space();
            for (i, item) in state.order_by.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                ts.append(&item.expr.to_tokens(&mut rc)?)
                    .space()
                    .push(if item.asc { Token::Asc } else { Token::Desc });
            }
        }

        Ok(ts.serialize(profile))
    }
}

impl SubselectRenderer for QueryBuilder<'_> {
    fn render_subselect(&self, scope: ScopeId, params: &mut Vec<String>) -> CompileResult<String> {
        if scope == ScopeId::ROOT {
            return Err(CompileError::AliasResolution(
                "the root select cannot be nested in itself".into(),
            ));
        }
        self.render_scope(scope, &LockRequest::none(), params)
    }
}
