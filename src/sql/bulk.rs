//! Bulk DELETE / UPDATE from a select's FROM and WHERE.
//!
//! SQL cannot delete from one table of a multi-table select, so anything
//! beyond a single aliased table is rewritten against the target table with
//! the original select as a sub-select on its primary key.

use tracing::debug;

use super::dialect::Capability;
use super::expr::{col, lit_int, Expr, RenderContext};
use super::join::ScopeId;
use super::select::QueryBuilder;
use super::token::{Token, TokenStream};
use crate::error::CompileResult;
use crate::schema::Table;

#[derive(Debug, Clone, PartialEq)]
pub enum BulkKind {
    Delete,
    /// Column assignments, in SET order.
    Update(Vec<(String, Expr)>),
}

/// A rendered bulk statement.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkStatement {
    pub sql: String,
    /// Parameter names in placeholder order.
    pub params: Vec<String>,
}

/// Rewrite the select in `scope` into a bulk statement against `table`.
///
/// Returns `Ok(None)` when the dialect cannot express the statement and the
/// caller has to fall back to row-by-row processing.
pub fn compile(
    kind: &BulkKind,
    builder: &QueryBuilder<'_>,
    scope: ScopeId,
    table: &Table,
) -> CompileResult<Option<BulkStatement>> {
    let profile = builder.profile();
    let mut q = builder.clone();
    let mut params = Vec::new();
    let tables = q.table_count(scope)?;
    let target = TokenStream::new()
        .push(Token::Ident(table.full_name()))
        .serialize(profile);

    if tables == 1 && profile.supports(Capability::Subselect) && profile.quirks.allows_alias_in_bulk_clause {
        let alias = q.root_alias(scope, table)?;
        let mut sql = match kind {
            BulkKind::Delete if profile.quirks.requires_target_for_delete => format!("DELETE {} ", alias),
            BulkKind::Delete => "DELETE ".to_string(),
            BulkKind::Update(_) => "UPDATE ".to_string(),
        };

        if let BulkKind::Update(assignments) = kind {
            let set = render_set(&q, assignments, &mut params, Some(alias.0))?;
            let (from, condition) = q.from_and_where(scope, &mut params, None)?;
            sql.push_str(&from);
            sql.push_str(&set);
            push_where(&mut sql, condition);
        } else {
            let (from, condition) = q.from_and_where(scope, &mut params, None)?;
            sql.push_str("FROM ");
            sql.push_str(&from);
            push_where(&mut sql, condition);
        }
        return Ok(Some(BulkStatement { sql, params }));
    }

    let mut sql = match kind {
        BulkKind::Delete => format!("DELETE FROM {}", target),
        BulkKind::Update(_) => format!("UPDATE {}", target),
    };
    if let BulkKind::Update(assignments) = kind {
        sql.push_str(&render_set(&q, assignments, &mut params, None)?);
    }

    if tables == 1 && !q.has_where(scope) {
        return Ok(Some(BulkStatement { sql, params }));
    }

    if !profile.supports(Capability::Subselect) || !profile.supports(Capability::CorrelatedSubselect) {
        debug!(table = %table.full_name(), "bulk statement needs a sub-select the dialect lacks");
        return Ok(None);
    }

    let pks = table.primary_key_columns();
    if pks.is_empty() {
        debug!(table = %table.full_name(), "bulk statement target has no primary key");
        return Ok(None);
    }

    let alias = q.root_alias(scope, table)?;
    q.clear_selects(scope)?;

    if let [pk] = pks {
        q.set_distinct(scope, true)?;
        q.select(scope, col(alias, pk))?;
        let inner = q.render_unlocked(scope, &mut params)?;
        let column = TokenStream::new()
            .push(Token::Ident(pk.clone()))
            .serialize(profile);
        sql.push_str(&format!(" WHERE {} IN ({})", column, inner));
    } else {
        q.set_distinct(scope, false)?;
        q.set_auto_distinct(scope, false)?;
        q.select(scope, lit_int(1))?;

        let correlation: Vec<String> = pks
            .iter()
            .map(|pk| {
                TokenStream::new()
                    .column(alias.0, pk)
                    .raw(" = ")
                    .push(Token::Ident(table.full_name()))
                    .push(Token::Dot)
                    .push(Token::Ident(pk.clone()))
                    .serialize(profile)
            })
            .collect();
        q.where_(scope, Expr::Raw(format!("({})", correlation.join(" AND "))))?;

        let inner = q.render_unlocked(scope, &mut params)?;
        sql.push_str(&format!(" WHERE EXISTS ({})", inner));
    }

    debug!(%sql, "bulk statement rewritten over a sub-select");
    Ok(Some(BulkStatement { sql, params }))
}

/// ` SET c = v, ...`; columns are qualified with `alias` when given.
fn render_set(
    q: &QueryBuilder<'_>,
    assignments: &[(String, Expr)],
    params: &mut Vec<String>,
    alias: Option<usize>,
) -> CompileResult<String> {
    let profile = q.profile();
    let mut ctx = RenderContext::new(profile, params).with_subselects(q);
    if alias.is_none() {
        ctx = ctx.unqualified();
    }

    let mut ts = TokenStream::new();
    ts.space().push(Token::Set).space();
    for (i, (column, value)) in assignments.iter().enumerate() {
        if i > 0 {
            ts.comma().space();
        }
        match alias {
            Some(alias) => ts.column(alias, column),
            None => ts.push(Token::Ident(column.clone())),
        };
        ts.space().push(Token::Eq).space().append(&value.to_tokens(&mut ctx)?);
    }
    Ok(ts.serialize(profile))
}

fn push_where(sql: &mut String, condition: Option<String>) {
    if let Some(condition) = condition {
        sql.push_str(" WHERE ");
        sql.push_str(&condition);
    }
}
