//! Join graph and alias allocation.
//!
//! Every table occurrence in a statement gets an alias `tN`. Occurrences are
//! keyed by the [`JoinPath`] that reached them plus the table, so the same
//! table reached through two different relations gets two aliases while the
//! same path requested twice collapses to one.
//!
//! A statement and all of its sub-selects live in one arena: scopes are
//! addressed by [`ScopeId`], the parent link is an index, and a single counter
//! hands out aliases for the whole arena so nested selects never collide.
//!
//! # Outer joins
//!
//! The first writer of an edge decides its kind; later requests for the same
//! pair of aliases never change it. OR-branch collection is the exception:
//! joins that only some branches of an OR need are promoted to outer and make
//! the select implicitly distinct.

use std::collections::BTreeSet;
use std::fmt;

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use tracing::{debug, trace, warn};

use super::dialect::{DialectProfile, JoinSyntax};
use super::expr::{Expr, Literal, RenderContext};
use super::token::TokenStream;
use crate::error::{CompileError, CompileResult};
use crate::schema::{ForeignKey, Table};

// =============================================================================
// Identifiers
// =============================================================================

/// Table alias, rendered `tN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Alias(pub usize);

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// A select scope within one statement arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub usize);

impl ScopeId {
    pub const ROOT: ScopeId = ScopeId(0);
}

// =============================================================================
// Join paths
// =============================================================================

/// One traversal step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathStep {
    Relation(String),
    /// A correlation variable, bound in the scope that declared it.
    Variable(String),
}

/// Ordered traversal steps from a query root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JoinPath {
    steps: Vec<PathStep>,
}

impl JoinPath {
    /// The empty path: the scope's own root table.
    pub fn root() -> Self {
        Self::default()
    }

    /// Path starting at a correlation variable.
    pub fn var(variable: &str) -> Self {
        Self {
            steps: vec![PathStep::Variable(variable.into())],
        }
    }

    /// This path extended by a relation.
    pub fn join(&self, relation: &str) -> Self {
        let mut next = self.clone();
        next.steps.push(PathStep::Relation(relation.into()));
        next
    }

    /// This path extended by a relation bound to a variable.
    pub fn join_var(&self, relation: &str, variable: &str) -> Self {
        let mut next = self.join(relation);
        next.steps.push(PathStep::Variable(variable.into()));
        next
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Variable the path is rooted at, if any.
    pub fn root_variable(&self) -> Option<&str> {
        match self.steps.first() {
            Some(PathStep::Variable(v)) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for JoinPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .steps
            .iter()
            .map(|step| match step {
                PathStep::Relation(r) => r.clone(),
                PathStep::Variable(v) => format!(":{}", v),
            })
            .collect();
        write!(f, "{}", parts.join("."))
    }
}

/// A relation traversed by a join request.
#[derive(Debug, Clone)]
pub struct Relation<'t> {
    pub name: String,
    pub from: &'t Table,
    pub to: &'t Table,
    pub foreign_key: &'t ForeignKey,
    /// The foreign key is owned by `to` rather than `from`.
    pub inverse: bool,
    pub to_many: bool,
    pub variable: Option<String>,
}

impl<'t> Relation<'t> {
    pub fn new(name: &str, from: &'t Table, foreign_key: &'t ForeignKey, to: &'t Table) -> Self {
        Self {
            name: name.into(),
            from,
            to,
            foreign_key,
            inverse: false,
            to_many: false,
            variable: None,
        }
    }

    pub fn inverse(mut self) -> Self {
        self.inverse = true;
        self
    }

    pub fn to_many(mut self) -> Self {
        self.to_many = true;
        self
    }

    /// Bind the target of the relation to a variable.
    pub fn as_variable(mut self, variable: &str) -> Self {
        self.variable = Some(variable.into());
        self
    }
}

// =============================================================================
// Join edges
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Outer,
    Cross,
}

/// A join between two aliased tables.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinEdge {
    pub table1: String,
    pub alias1: Alias,
    pub table2: String,
    pub alias2: Alias,
    pub foreign_key: Option<ForeignKey>,
    pub inverse: bool,
    pub kind: JoinKind,
    /// One side belongs to an enclosing select.
    pub correlated: bool,
}

impl JoinEdge {
    /// Edges are identified by their unordered alias pair.
    pub fn same_pair(&self, other: &JoinEdge) -> bool {
        (self.alias1 == other.alias1 && self.alias2 == other.alias2)
            || (self.alias1 == other.alias2 && self.alias2 == other.alias1)
    }

    /// Joined column pairs as (column of alias1, column of alias2).
    pub fn column_pairs(&self) -> Vec<(String, String)> {
        let Some(fk) = &self.foreign_key else {
            return Vec::new();
        };
        fk.columns
            .iter()
            .zip(&fk.primary_key_columns)
            .map(|(local, pk)| {
                if self.inverse {
                    (pk.clone(), local.clone())
                } else {
                    (local.clone(), pk.clone())
                }
            })
            .collect()
    }

    /// Constant comparisons as (alias, column, value).
    fn constants(&self) -> Vec<(Alias, String, Literal)> {
        let Some(fk) = &self.foreign_key else {
            return Vec::new();
        };
        let (owner, referenced) = if self.inverse {
            (self.alias2, self.alias1)
        } else {
            (self.alias1, self.alias2)
        };
        fk.constant_columns
            .iter()
            .map(|(c, v)| (owner, c.clone(), v.clone()))
            .chain(
                fk.constant_primary_key_columns
                    .iter()
                    .map(|(c, v)| (referenced, c.clone(), v.clone())),
            )
            .collect()
    }

    fn can_outer_join_natively(&self) -> bool {
        self.foreign_key
            .as_ref()
            .map_or(true, |fk| !fk.has_constants())
    }

    /// `t0.cust_id = t1.id AND ...`; `marker` is appended to alias2's side.
    fn predicate(&self, profile: &DialectProfile, marker: &str) -> CompileResult<String> {
        let mut parts = Vec::new();
        for (c1, c2) in self.column_pairs() {
            let mut ts = TokenStream::new();
            ts.column(self.alias1.0, &c1)
                .raw(" = ")
                .column(self.alias2.0, &c2)
                .raw(marker);
            parts.push(ts.serialize(profile));
        }

        let mut params = Vec::new();
        for (alias, column, value) in self.constants() {
            let mut ctx = RenderContext::new(profile, &mut params);
            let value = Expr::Literal(value).to_sql(&mut ctx)?;
            let mut ts = TokenStream::new();
            ts.column(alias.0, &column).raw(" = ").raw(value);
            parts.push(ts.serialize(profile));
        }
        Ok(parts.join(" AND "))
    }

    /// Predicate in the vendor's native outer join notation.
    fn native_predicate(&self, profile: &DialectProfile) -> CompileResult<String> {
        if self.kind != JoinKind::Outer {
            return self.predicate(profile, "");
        }
        if !self.can_outer_join_natively() {
            return Err(CompileError::NativeJoinConstant {
                table: self.table2.clone(),
            });
        }
        let marker = profile.clauses.native_outer_join_marker.as_deref().unwrap_or("");
        self.predicate(profile, marker)
    }
}

// =============================================================================
// Scopes and the arena
// =============================================================================

#[derive(Debug, Clone)]
struct AliasEntry {
    path: JoinPath,
    table: String,
    alias: Alias,
}

#[derive(Debug, Clone)]
struct Scope {
    parent: Option<ScopeId>,
    syntax: JoinSyntax,
    aliases: Vec<AliasEntry>,
    edges: Vec<JoinEdge>,
    variables: BTreeSet<String>,
    /// Open OR branches; join requests land in the last one.
    branches: Option<Vec<Vec<JoinEdge>>>,
    implicit_distinct: bool,
    to_many: bool,
}

impl Scope {
    fn new(parent: Option<ScopeId>, syntax: JoinSyntax) -> Self {
        Self {
            parent,
            syntax,
            aliases: Vec::new(),
            edges: Vec::new(),
            variables: BTreeSet::new(),
            branches: None,
            implicit_distinct: false,
            to_many: false,
        }
    }

    fn lookup(&self, path: &JoinPath, table: &str) -> Option<Alias> {
        self.aliases
            .iter()
            .find(|e| &e.path == path && e.table == table)
            .map(|e| e.alias)
    }

    fn any_occurrence(&self, table: &str) -> Option<Alias> {
        self.aliases.iter().find(|e| e.table == table).map(|e| e.alias)
    }

    fn owns(&self, alias: Alias) -> bool {
        self.aliases.iter().any(|e| e.alias == alias)
    }
}

/// Rendered FROM clause plus the join predicates that belong in WHERE.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FromClause {
    pub sql: String,
    pub join_predicates: Vec<String>,
}

/// Alias table and join edges for one statement and its sub-selects.
#[derive(Debug, Clone)]
pub struct JoinGraph {
    scopes: Vec<Scope>,
    /// Table name per allocated alias, indexed by alias number.
    tables: Vec<String>,
}

impl JoinGraph {
    pub fn new(syntax: JoinSyntax) -> Self {
        Self {
            scopes: vec![Scope::new(None, syntax)],
            tables: Vec::new(),
        }
    }

    fn scope(&self, id: ScopeId) -> CompileResult<&Scope> {
        self.scopes
            .get(id.0)
            .ok_or_else(|| CompileError::AliasResolution(format!("unknown scope {}", id.0)))
    }

    fn scope_mut(&mut self, id: ScopeId) -> CompileResult<&mut Scope> {
        self.scopes
            .get_mut(id.0)
            .ok_or_else(|| CompileError::AliasResolution(format!("unknown scope {}", id.0)))
    }

    /// New sub-select scope under `parent`.
    ///
    /// A parent using SQL92 joins gets a traditional-syntax child; other
    /// syntaxes are inherited.
    pub fn subselect(&mut self, parent: ScopeId) -> CompileResult<ScopeId> {
        let syntax = match self.scope(parent)?.syntax {
            JoinSyntax::Sql92 => JoinSyntax::Traditional,
            other => other,
        };
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(Some(parent), syntax));
        trace!(scope = id.0, parent = parent.0, ?syntax, "subselect scope");
        Ok(id)
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes.get(scope.0).and_then(|s| s.parent)
    }

    pub fn syntax(&self, scope: ScopeId) -> CompileResult<JoinSyntax> {
        Ok(self.scope(scope)?.syntax)
    }

    pub fn declare_variable(&mut self, scope: ScopeId, variable: &str) -> CompileResult<()> {
        self.scope_mut(scope)?.variables.insert(variable.into());
        Ok(())
    }

    /// Number of aliases allocated so far, across all scopes.
    pub fn alias_count(&self) -> usize {
        self.tables.len()
    }

    /// Table name of an alias.
    pub fn table_of(&self, alias: Alias) -> Option<&str> {
        self.tables.get(alias.0).map(String::as_str)
    }

    /// Aliases owned by a scope, in allocation order.
    pub fn aliases(&self, scope: ScopeId) -> CompileResult<Vec<Alias>> {
        Ok(self.scope(scope)?.aliases.iter().map(|e| e.alias).collect())
    }

    pub fn edges(&self, scope: ScopeId) -> CompileResult<&[JoinEdge]> {
        Ok(&self.scope(scope)?.edges)
    }

    pub fn is_implicitly_distinct(&self, scope: ScopeId) -> bool {
        self.scopes.get(scope.0).map_or(false, |s| s.implicit_distinct)
    }

    pub fn has_to_many(&self, scope: ScopeId) -> bool {
        self.scopes.get(scope.0).map_or(false, |s| s.to_many)
    }

    fn ancestors(&self, scope: ScopeId) -> Vec<ScopeId> {
        let mut out = Vec::new();
        let mut current = self.parent(scope);
        while let Some(id) = current {
            out.push(id);
            current = self.parent(id);
        }
        out
    }

    /// Scope that declared `variable`, searching `scope` then its ancestors.
    fn declaring_scope(&self, scope: ScopeId, variable: &str) -> Option<ScopeId> {
        std::iter::once(scope)
            .chain(self.ancestors(scope))
            .find(|id| self.scopes[id.0].variables.contains(variable))
    }

    // =========================================================================
    // Alias allocation
    // =========================================================================

    /// Alias for `table` reached by `path` in `scope`.
    ///
    /// Lookup order: the exact `(path, table)` key in the scope; for an empty
    /// path any occurrence of the table in the scope; for a non-empty path the
    /// scope that declared its root variable and then the ancestors nearest
    /// first. When nothing matches and `create` is set, a fresh alias is
    /// allocated in the declaring scope, or in `scope` itself.
    pub fn alias_for(
        &mut self,
        scope: ScopeId,
        table: &Table,
        path: &JoinPath,
        create: bool,
    ) -> CompileResult<Option<Alias>> {
        let name = table.full_name();
        let local = self.scope(scope)?;

        if let Some(alias) = local.lookup(path, &name) {
            return Ok(Some(alias));
        }
        if path.is_empty() {
            if let Some(alias) = local.any_occurrence(&name) {
                return Ok(Some(alias));
            }
        }

        let home = path
            .root_variable()
            .and_then(|v| self.declaring_scope(scope, v));
        if !path.is_empty() {
            let candidates: Vec<ScopeId> = home.into_iter().chain(self.ancestors(scope)).collect();
            for candidate in candidates {
                if let Some(alias) = self.scopes[candidate.0].lookup(path, &name) {
                    trace!(%alias, %path, table = %name, scope = candidate.0, "alias from enclosing scope");
                    return Ok(Some(alias));
                }
            }
        }

        if !create {
            return Ok(None);
        }
        let owner = home.unwrap_or(scope);
        Ok(Some(self.allocate(owner, path, name)))
    }

    /// Like [`JoinGraph::alias_for`] without creating; a missing alias is an
    /// internal error.
    pub fn alias(&mut self, scope: ScopeId, table: &Table, path: &JoinPath) -> CompileResult<Alias> {
        self.alias_for(scope, table, path, false)?.ok_or_else(|| {
            CompileError::AliasResolution(format!(
                "table {} was never joined at path '{}'",
                table.full_name(),
                path
            ))
        })
    }

    fn allocate(&mut self, owner: ScopeId, path: &JoinPath, table: String) -> Alias {
        let alias = Alias(self.tables.len());
        self.tables.push(table.clone());
        trace!(%alias, %path, %table, scope = owner.0, "allocated alias");
        self.scopes[owner.0].aliases.push(AliasEntry {
            path: path.clone(),
            table,
            alias,
        });
        alias
    }

    // =========================================================================
    // Join requests
    // =========================================================================

    /// Join along a relation from the table at `path`.
    ///
    /// Returns the target alias and the path that reaches it. Outer requests
    /// are recorded as inner under traditional syntax.
    pub fn join(
        &mut self,
        scope: ScopeId,
        path: &JoinPath,
        relation: &Relation<'_>,
        kind: JoinKind,
    ) -> CompileResult<(Alias, JoinPath)> {
        let syntax = self.syntax(scope)?;
        let kind = match (kind, syntax) {
            (JoinKind::Outer, JoinSyntax::Traditional) => JoinKind::Inner,
            (kind, _) => kind,
        };

        let alias1 = self.require(scope, relation.from, path)?;
        let next = match &relation.variable {
            Some(var) => path.join_var(&relation.name, var),
            None => path.join(&relation.name),
        };
        let alias2 = self.require(scope, relation.to, &next)?;

        if relation.to_many {
            let s = self.scope_mut(scope)?;
            s.to_many = true;
            s.implicit_distinct = true;
        }

        let edge = JoinEdge {
            table1: relation.from.full_name(),
            alias1,
            table2: relation.to.full_name(),
            alias2,
            foreign_key: Some(relation.foreign_key.clone()),
            inverse: relation.inverse,
            kind,
            correlated: self.is_correlated(scope, alias1, alias2),
        };
        self.record(scope, edge)?;
        Ok((alias2, next))
    }

    /// Cross join to an unbound variable; always makes the select distinct.
    pub fn cross_join(
        &mut self,
        scope: ScopeId,
        from: &Table,
        path: &JoinPath,
        to: &Table,
        variable: &str,
    ) -> CompileResult<(Alias, JoinPath)> {
        self.scope_mut(scope)?.implicit_distinct = true;

        let alias1 = self.require(scope, from, path)?;
        let next = JoinPath::var(variable);
        let alias2 = self.require(scope, to, &next)?;

        let edge = JoinEdge {
            table1: from.full_name(),
            alias1,
            table2: to.full_name(),
            alias2,
            foreign_key: None,
            inverse: false,
            kind: JoinKind::Cross,
            correlated: self.is_correlated(scope, alias1, alias2),
        };
        self.record(scope, edge)?;
        Ok((alias2, next))
    }

    fn require(&mut self, scope: ScopeId, table: &Table, path: &JoinPath) -> CompileResult<Alias> {
        self.alias_for(scope, table, path, true)?.ok_or_else(|| {
            CompileError::AliasResolution(format!("no alias for {}", table.full_name()))
        })
    }

    fn is_correlated(&self, scope: ScopeId, alias1: Alias, alias2: Alias) -> bool {
        let s = &self.scopes[scope.0];
        s.parent.is_some() && !(s.owns(alias1) && s.owns(alias2))
    }

    fn record(&mut self, scope: ScopeId, edge: JoinEdge) -> CompileResult<()> {
        let s = self.scope_mut(scope)?;
        let target = match s.branches.as_mut().and_then(|b| b.last_mut()) {
            Some(branch) => branch,
            None => &mut s.edges,
        };

        if let Some(existing) = target.iter().find(|e| e.same_pair(&edge)) {
            if existing.kind != edge.kind {
                debug!(
                    alias1 = %edge.alias1,
                    alias2 = %edge.alias2,
                    kept = ?existing.kind,
                    requested = ?edge.kind,
                    "join already recorded, first writer wins"
                );
            }
            return Ok(());
        }
        trace!(alias1 = %edge.alias1, alias2 = %edge.alias2, kind = ?edge.kind, "recorded join");
        target.push(edge);
        Ok(())
    }

    /// Forget a scope's join edges. Aliases stay allocated.
    pub fn clear_joins(&mut self, scope: ScopeId) -> CompileResult<()> {
        self.scope_mut(scope)?.edges.clear();
        Ok(())
    }

    // =========================================================================
    // OR branches
    // =========================================================================

    /// Start collecting joins for the first branch of an OR.
    pub fn begin_or(&mut self, scope: ScopeId) -> CompileResult<()> {
        self.scope_mut(scope)?.branches = Some(vec![Vec::new()]);
        Ok(())
    }

    /// Start the next branch of the open OR.
    pub fn next_or_branch(&mut self, scope: ScopeId) -> CompileResult<()> {
        let s = self.scope_mut(scope)?;
        match s.branches.as_mut() {
            Some(branches) => {
                branches.push(Vec::new());
                Ok(())
            }
            None => Err(CompileError::AliasResolution(format!(
                "no OR open in scope {}",
                scope.0
            ))),
        }
    }

    /// Close the open OR and merge its joins into the scope.
    ///
    /// Joins every branch shares are kept as requested. The rest become outer
    /// joins (unless the syntax cannot express them) and mark the scope
    /// implicitly distinct.
    pub fn end_or(&mut self, scope: ScopeId) -> CompileResult<()> {
        let s = self.scope_mut(scope)?;
        let Some(branches) = s.branches.take() else {
            return Err(CompileError::AliasResolution(format!(
                "no OR open in scope {}",
                scope.0
            )));
        };
        let syntax = s.syntax;

        let mut merged: Vec<JoinEdge> = Vec::new();
        let mut divergent = false;
        for (i, branch) in branches.iter().enumerate() {
            for edge in branch {
                if merged.iter().any(|e| e.same_pair(edge)) {
                    continue;
                }
                let common = branches
                    .iter()
                    .enumerate()
                    .all(|(j, other)| j == i || other.iter().any(|e| e.same_pair(edge)));
                let mut edge = edge.clone();
                if !common {
                    divergent = true;
                    edge.kind = promote(&edge, syntax);
                }
                merged.push(edge);
            }
        }

        if divergent {
            s.implicit_distinct = true;
        }
        for edge in merged {
            self.record(scope, edge)?;
        }
        Ok(())
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// FROM clause of a scope.
    ///
    /// `table_hint` is appended after every table (lock hints).
    pub fn render_from(
        &self,
        scope: ScopeId,
        profile: &DialectProfile,
        table_hint: Option<&str>,
    ) -> CompileResult<FromClause> {
        let s = self.scope(scope)?;
        let aliases: Vec<Alias> = s.aliases.iter().map(|e| e.alias).collect();
        if aliases.is_empty() {
            return Err(CompileError::AliasResolution(format!(
                "scope {} selects from no tables",
                scope.0
            )));
        }

        let mut from = FromClause::default();
        let (local, correlated): (Vec<&JoinEdge>, Vec<&JoinEdge>) =
            s.edges.iter().partition(|e| !e.correlated && s.owns(e.alias1) && s.owns(e.alias2));

        for edge in correlated {
            if edge.kind != JoinKind::Cross {
                from.join_predicates.push(edge.predicate(profile, "")?);
            }
        }

        match s.syntax {
            JoinSyntax::Sql92 => {
                from.sql = self.sql92_from(&aliases, &local, profile, table_hint, &mut from.join_predicates)?;
            }
            JoinSyntax::Traditional | JoinSyntax::Native => {
                let tables: Vec<String> = aliases
                    .iter()
                    .map(|a| self.table_ref(*a, profile, table_hint))
                    .collect();
                from.sql = tables.join(", ");
                for edge in local {
                    if edge.kind == JoinKind::Cross {
                        continue;
                    }
                    let predicate = if s.syntax == JoinSyntax::Native {
                        edge.native_predicate(profile)?
                    } else {
                        edge.predicate(profile, "")?
                    };
                    from.join_predicates.push(predicate);
                }
            }
        }
        Ok(from)
    }

    fn table_ref(&self, alias: Alias, profile: &DialectProfile, hint: Option<&str>) -> String {
        let table = self.table_of(alias).unwrap_or_default();
        let mut ts = TokenStream::new();
        ts.push(super::token::Token::Ident(table.to_string()))
            .space()
            .push(super::token::Token::Alias(alias.0));
        if let Some(hint) = hint {
            ts.space().raw(hint);
        }
        ts.serialize(profile)
    }

    /// `A t0 INNER JOIN B t1 ON ...` chains in connected traversal order.
    fn sql92_from(
        &self,
        aliases: &[Alias],
        edges: &[&JoinEdge],
        profile: &DialectProfile,
        hint: Option<&str>,
        leftover: &mut Vec<String>,
    ) -> CompileResult<String> {
        let mut graph: UnGraph<Alias, usize> = UnGraph::new_undirected();
        let nodes: Vec<NodeIndex> = aliases.iter().map(|a| graph.add_node(*a)).collect();
        let node_of = |alias: Alias| aliases.iter().position(|a| *a == alias).map(|i| nodes[i]);

        for (i, edge) in edges.iter().enumerate() {
            if let (Some(a), Some(b)) = (node_of(edge.alias1), node_of(edge.alias2)) {
                graph.add_edge(a, b, i);
            }
        }

        let mut visited = vec![false; nodes.len()];
        let mut used = vec![false; edges.len()];
        // position of each joined table's clause within its chain
        let mut segment_of: Vec<Option<usize>> = vec![None; nodes.len()];
        let mut chains = Vec::new();

        for start in &nodes {
            if visited[start.index()] {
                continue;
            }
            visited[start.index()] = true;
            let mut segments = vec![self.table_ref(graph[*start], profile, hint)];
            segment_of[start.index()] = Some(0);

            let mut stack = vec![*start];
            while let Some(node) = stack.pop() {
                let mut adjacent: Vec<(usize, NodeIndex)> = graph
                    .edges(node)
                    .map(|e| (*e.weight(), if e.source() == node { e.target() } else { e.source() }))
                    .collect();
                adjacent.sort();

                for (idx, next) in adjacent {
                    if used[idx] {
                        continue;
                    }
                    used[idx] = true;
                    let edge = edges[idx];

                    if visited[next.index()] {
                        // cycle: the table is already in the chain
                        if edge.kind == JoinKind::Cross {
                            continue;
                        }
                        let predicate = edge.predicate(profile, "")?;
                        if edge.kind == JoinKind::Outer {
                            let optional = node_of(edge.alias2).and_then(|n| segment_of[n.index()]);
                            let other = node_of(edge.alias1).and_then(|n| segment_of[n.index()]);
                            match (optional, other) {
                                (Some(o), Some(p)) if o > p => {
                                    segments[o].push_str(" AND ");
                                    segments[o].push_str(&predicate);
                                    continue;
                                }
                                _ => warn!(
                                    table = %edge.table2,
                                    "outer join closes a join cycle, filtering it in WHERE"
                                ),
                            }
                        }
                        leftover.push(predicate);
                        continue;
                    }
                    visited[next.index()] = true;
                    segments.push(self.join_clause(edge, graph[next], profile, hint)?);
                    segment_of[next.index()] = Some(segments.len() - 1);
                    stack.push(next);
                }
            }
            chains.push(segments.join(" "));
        }

        Ok(chains.join(", "))
    }

    fn join_clause(
        &self,
        edge: &JoinEdge,
        joined: Alias,
        profile: &DialectProfile,
        hint: Option<&str>,
    ) -> CompileResult<String> {
        let table = self.table_ref(joined, profile, hint);
        let clauses = &profile.clauses;
        Ok(match edge.kind {
            JoinKind::Cross => {
                if profile.quirks.requires_condition_for_cross_join {
                    format!("{} {} ON (1 = 1)", clauses.cross_join, table)
                } else {
                    format!("{} {}", clauses.cross_join, table)
                }
            }
            JoinKind::Inner => format!("{} {} ON {}", clauses.inner_join, table, edge.predicate(profile, "")?),
            JoinKind::Outer => format!("{} {} ON {}", clauses.outer_join, table, edge.predicate(profile, "")?),
        })
    }
}

/// Kind of a join collected from only some OR branches.
fn promote(edge: &JoinEdge, syntax: JoinSyntax) -> JoinKind {
    match (edge.kind, syntax) {
        (JoinKind::Inner, JoinSyntax::Traditional) => JoinKind::Inner,
        (JoinKind::Inner, JoinSyntax::Native) if !edge.can_outer_join_natively() => {
            warn!(table = %edge.table2, "cannot outer join over constant columns, keeping inner join");
            JoinKind::Inner
        }
        (JoinKind::Inner, _) => JoinKind::Outer,
        (kind, _) => kind,
    }
}
