//! Expression tree for predicates, select items and ordering.
//!
//! Expressions are vendor-neutral. Column references carry the table alias
//! they were resolved to; function calls name an abstract function whose
//! text comes from the profile's templates at render time.

use super::dialect::helpers::format_template;
use super::dialect::{Capability, DialectProfile};
use super::join::{Alias, ScopeId};
use super::token::{Token, TokenStream};
use crate::error::{CompileError, CompileResult};

// =============================================================================
// Expression AST
// =============================================================================

/// A SQL expression.
///
/// Every variant must be handled in `to_tokens()` - the compiler enforces this.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column of an aliased table: `tN.column`
    Column { alias: Alias, name: String },

    /// Literal values
    Literal(Literal),

    /// Positional parameter, rendered `?` and recorded by name.
    Param(String),

    /// Binary operation: left op right
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },

    /// Unary operation: op expr
    UnaryOp { op: UnaryOperator, expr: Box<Expr> },

    /// IS [NOT] NULL
    IsNull { expr: Box<Expr>, negated: bool },

    /// [NOT] LIKE with optional ESCAPE
    Like {
        expr: Box<Expr>,
        pattern: Box<Expr>,
        escape: Option<char>,
        negated: bool,
    },

    /// IN: expr IN (values...)
    In {
        expr: Box<Expr>,
        values: Vec<Expr>,
        negated: bool,
    },

    /// [NOT] EXISTS over a sub-select scope of the same statement.
    Exists { scope: ScopeId, negated: bool },

    /// expr [NOT] IN over a sub-select scope of the same statement.
    InSubselect {
        expr: Box<Expr>,
        scope: ScopeId,
        negated: bool,
    },

    /// Dialect function rendered from a profile template.
    Function(Function),

    /// Aggregate; `arg: None` is `COUNT(*)`.
    Aggregate {
        func: AggregateFunction,
        arg: Option<Box<Expr>>,
        distinct: bool,
    },

    /// Raw SQL passed through unchanged.
    ///
    /// Used for already-rendered fragments such as correlation predicates.
    Raw(String),
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Null,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Comparison
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    // Logical
    And,
    Or,
    // Arithmetic
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
}

impl BinaryOperator {
    fn precedence(&self) -> u8 {
        match self {
            BinaryOperator::Or => 1,
            BinaryOperator::And => 2,
            BinaryOperator::Eq
            | BinaryOperator::Ne
            | BinaryOperator::Lt
            | BinaryOperator::Gt
            | BinaryOperator::Lte
            | BinaryOperator::Gte => 3,
            BinaryOperator::Plus | BinaryOperator::Minus => 4,
            BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Mod => 5,
        }
    }

    fn is_associative(&self) -> bool {
        matches!(
            self,
            BinaryOperator::And | BinaryOperator::Or | BinaryOperator::Plus | BinaryOperator::Mul
        )
    }

    fn token(&self) -> Token {
        match self {
            BinaryOperator::Eq => Token::Eq,
            BinaryOperator::Ne => Token::Ne,
            BinaryOperator::Lt => Token::Lt,
            BinaryOperator::Gt => Token::Gt,
            BinaryOperator::Lte => Token::Lte,
            BinaryOperator::Gte => Token::Gte,
            BinaryOperator::And => Token::And,
            BinaryOperator::Or => Token::Or,
            BinaryOperator::Plus => Token::Plus,
            BinaryOperator::Minus => Token::Minus,
            BinaryOperator::Mul => Token::Mul,
            BinaryOperator::Div => Token::Div,
            BinaryOperator::Mod => Token::Mod,
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunction {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateFunction {
    fn name(&self) -> &'static str {
        match self {
            AggregateFunction::Count => "COUNT",
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Avg => "AVG",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Max => "MAX",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimSpec {
    Leading,
    Trailing,
    Both,
}

/// Functions whose syntax differs between vendors.
#[derive(Debug, Clone, PartialEq)]
pub enum Function {
    Cast { expr: Box<Expr>, type_name: String },
    Lower(Box<Expr>),
    Upper(Box<Expr>),
    Length(Box<Expr>),
    Trim {
        expr: Box<Expr>,
        chars: Box<Expr>,
        spec: TrimSpec,
    },
    Concat(Box<Expr>, Box<Expr>),
    /// 1-based start, optional length.
    Substring {
        expr: Box<Expr>,
        start: Box<Expr>,
        length: Option<Box<Expr>>,
    },
    /// 1-based position of `needle` in `haystack`, optionally searching from `from`.
    IndexOf {
        haystack: Box<Expr>,
        needle: Box<Expr>,
        from: Option<Box<Expr>>,
    },
    CurrentDate,
    CurrentTime,
    CurrentTimestamp,
}

// =============================================================================
// Rendering
// =============================================================================

/// Renders the sub-select scopes that EXISTS / IN expressions refer to.
pub trait SubselectRenderer {
    /// SQL of the sub-select, appending its parameters to `params`.
    fn render_subselect(&self, scope: ScopeId, params: &mut Vec<String>) -> CompileResult<String>;
}

/// State threaded through expression rendering.
pub struct RenderContext<'a> {
    pub profile: &'a DialectProfile,
    /// Parameter names in placeholder order.
    pub params: &'a mut Vec<String>,
    /// Prefix columns with their table alias.
    pub qualify: bool,
    pub subselects: Option<&'a dyn SubselectRenderer>,
}

impl<'a> RenderContext<'a> {
    pub fn new(profile: &'a DialectProfile, params: &'a mut Vec<String>) -> Self {
        Self {
            profile,
            params,
            qualify: true,
            subselects: None,
        }
    }

    pub fn with_subselects(mut self, subselects: &'a dyn SubselectRenderer) -> Self {
        self.subselects = Some(subselects);
        self
    }

    pub fn unqualified(mut self) -> Self {
        self.qualify = false;
        self
    }

    fn subselect(&mut self, scope: ScopeId) -> CompileResult<String> {
        match self.subselects {
            Some(renderer) => renderer.render_subselect(scope, self.params),
            None => Err(CompileError::AliasResolution(format!(
                "no sub-select renderer for scope {}",
                scope.0
            ))),
        }
    }
}

impl Expr {
    /// Render to a token stream for the context's profile.
    pub fn to_tokens(&self, ctx: &mut RenderContext<'_>) -> CompileResult<TokenStream> {
        let mut ts = TokenStream::new();

        match self {
            Expr::Column { alias, name } => {
                if ctx.qualify {
                    ts.column(alias.0, name);
                } else {
                    ts.push(Token::Ident(name.clone()));
                }
            }

            Expr::Literal(Literal::Float(f)) if !f.is_finite() => {
                return Err(CompileError::NonFiniteLiteral {
                    value: f.to_string(),
                });
            }

            Expr::Literal(lit) => {
                ts.push(match lit {
                    Literal::Int(n) => Token::LitInt(*n),
                    Literal::Float(f) => Token::LitFloat(*f),
                    Literal::String(s) => Token::LitString(s.clone()),
                    Literal::Bool(b) => Token::LitBool(*b),
                    Literal::Null => Token::Null,
                });
            }

            Expr::Param(name) => {
                ctx.params.push(name.clone());
                ts.push(Token::Param);
            }

            Expr::BinaryOp { left, op, right } => {
                if *op == BinaryOperator::Mod && !ctx.profile.supports(Capability::ModOperator) {
                    let l = left.to_sql(ctx)?;
                    let r = right.to_sql(ctx)?;
                    ts.raw(format_template(&ctx.profile.functions.modulo, &[&l, &r]));
                } else {
                    let prec = op.precedence();
                    let left_ts = left.to_tokens(ctx)?;
                    wrap_if(&mut ts, &left_ts, left.precedence() < prec);
                    ts.space().push(op.token()).space();
                    let right_ts = right.to_tokens(ctx)?;
                    let right_prec = right.precedence();
                    wrap_if(
                        &mut ts,
                        &right_ts,
                        right_prec < prec || (right_prec == prec && !op.is_associative()),
                    );
                }
            }

            Expr::UnaryOp { op, expr } => {
                let inner = expr.to_tokens(ctx)?;
                match op {
                    UnaryOperator::Not => {
                        ts.push(Token::Not).space();
                        wrap_if(&mut ts, &inner, expr.precedence() < 6);
                    }
                    UnaryOperator::Minus => {
                        ts.push(Token::Minus);
                        wrap_if(&mut ts, &inner, expr.precedence() < 6);
                    }
                }
            }

            Expr::IsNull { expr, negated } => {
                let inner = expr.to_tokens(ctx)?;
                wrap_if(&mut ts, &inner, expr.precedence() <= 3);
                ts.space()
                    .push(if *negated { Token::IsNotNull } else { Token::IsNull });
            }

            Expr::Like {
                expr,
                pattern,
                escape,
                negated,
            } => {
                ts.append(&expr.to_tokens(ctx)?).space();
                if *negated {
                    ts.push(Token::Not).space();
                }
                ts.push(Token::Like).space().append(&pattern.to_tokens(ctx)?);
                if let Some(c) = escape {
                    ts.space()
                        .push(Token::Escape)
                        .space()
                        .push(Token::LitString(c.to_string()));
                }
            }

            Expr::In {
                expr,
                values,
                negated,
            } => {
                ts.append(&expr.to_tokens(ctx)?).space();
                if *negated {
                    ts.push(Token::Not).space();
                }
                ts.push(Token::In).space().lparen();
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        ts.comma().space();
                    }
                    ts.append(&value.to_tokens(ctx)?);
                }
                ts.rparen();
            }

            Expr::Exists { scope, negated } => {
                let sql = ctx.subselect(*scope)?;
                if *negated {
                    ts.push(Token::Not).space();
                }
                ts.push(Token::Exists).space().lparen().raw(sql).rparen();
            }

            Expr::InSubselect {
                expr,
                scope,
                negated,
            } => {
                ts.append(&expr.to_tokens(ctx)?).space();
                if *negated {
                    ts.push(Token::Not).space();
                }
                let sql = ctx.subselect(*scope)?;
                ts.push(Token::In).space().lparen().raw(sql).rparen();
            }

            Expr::Function(func) => {
                ts.raw(func.to_sql(ctx)?);
            }

            Expr::Aggregate {
                func,
                arg,
                distinct,
            } => {
                ts.raw(func.name()).lparen();
                match arg {
                    Some(arg) => {
                        if *distinct {
                            ts.push(Token::Distinct).space();
                        }
                        ts.append(&arg.to_tokens(ctx)?);
                    }
                    None => {
                        ts.push(Token::Star);
                    }
                }
                ts.rparen();
            }

            Expr::Raw(sql) => {
                ts.raw(sql.clone());
            }
        }

        Ok(ts)
    }

    /// Render straight to SQL text.
    pub fn to_sql(&self, ctx: &mut RenderContext<'_>) -> CompileResult<String> {
        let profile = ctx.profile;
        Ok(self.to_tokens(ctx)?.serialize(profile))
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::BinaryOp { op, .. } => op.precedence(),
            Expr::IsNull { .. } | Expr::Like { .. } | Expr::In { .. } | Expr::InSubselect { .. } => 3,
            Expr::UnaryOp {
                op: UnaryOperator::Not,
                ..
            }
            | Expr::Exists { negated: true, .. } => 2,
            Expr::Raw(_) => 0,
            _ => 6,
        }
    }

    /// True when an aggregate appears anywhere in the expression.
    pub fn contains_aggregate(&self) -> bool {
        match self {
            Expr::Aggregate { .. } => true,
            Expr::BinaryOp { left, right, .. } => left.contains_aggregate() || right.contains_aggregate(),
            Expr::UnaryOp { expr, .. } | Expr::IsNull { expr, .. } => expr.contains_aggregate(),
            Expr::Like { expr, pattern, .. } => expr.contains_aggregate() || pattern.contains_aggregate(),
            Expr::In { expr, values, .. } => {
                expr.contains_aggregate() || values.iter().any(Expr::contains_aggregate)
            }
            Expr::InSubselect { expr, .. } => expr.contains_aggregate(),
            Expr::Function(func) => func.args().iter().any(|e| e.contains_aggregate()),
            _ => false,
        }
    }

    /// Aliases of every column the expression references, in order of appearance.
    pub fn aliases(&self) -> Vec<Alias> {
        let mut out = Vec::new();
        self.collect_aliases(&mut out);
        out
    }

    fn collect_aliases(&self, out: &mut Vec<Alias>) {
        match self {
            Expr::Column { alias, .. } => {
                if !out.contains(alias) {
                    out.push(*alias);
                }
            }
            Expr::BinaryOp { left, right, .. } => {
                left.collect_aliases(out);
                right.collect_aliases(out);
            }
            Expr::UnaryOp { expr, .. } | Expr::IsNull { expr, .. } | Expr::InSubselect { expr, .. } => {
                expr.collect_aliases(out)
            }
            Expr::Like { expr, pattern, .. } => {
                expr.collect_aliases(out);
                pattern.collect_aliases(out);
            }
            Expr::In { expr, values, .. } => {
                expr.collect_aliases(out);
                values.iter().for_each(|v| v.collect_aliases(out));
            }
            Expr::Function(func) => func.args().iter().for_each(|e| e.collect_aliases(out)),
            Expr::Aggregate { arg: Some(arg), .. } => arg.collect_aliases(out),
            _ => {}
        }
    }
}

fn wrap_if(ts: &mut TokenStream, inner: &TokenStream, parens: bool) {
    if parens {
        ts.lparen().append(inner).rparen();
    } else {
        ts.append(inner);
    }
}

impl Function {
    fn args(&self) -> Vec<&Expr> {
        match self {
            Function::Cast { expr, .. }
            | Function::Lower(expr)
            | Function::Upper(expr)
            | Function::Length(expr) => vec![expr],
            Function::Trim { expr, chars, .. } => vec![expr, chars],
            Function::Concat(a, b) => vec![a, b],
            Function::Substring { expr, start, length } => {
                let mut args: Vec<&Expr> = vec![expr, start];
                if let Some(len) = length {
                    args.push(len);
                }
                args
            }
            Function::IndexOf {
                haystack,
                needle,
                from,
            } => {
                let mut args: Vec<&Expr> = vec![haystack, needle];
                if let Some(from) = from {
                    args.push(from);
                }
                args
            }
            Function::CurrentDate | Function::CurrentTime | Function::CurrentTimestamp => vec![],
        }
    }

    fn to_sql(&self, ctx: &mut RenderContext<'_>) -> CompileResult<String> {
        let f = &ctx.profile.functions;
        let sql = match self {
            Function::Cast { expr, type_name } => {
                let template = f.cast.clone();
                format_template(&template, &[&expr.to_sql(ctx)?, type_name])
            }
            Function::Lower(expr) => {
                let template = f.to_lower.clone();
                format_template(&template, &[&expr.to_sql(ctx)?])
            }
            Function::Upper(expr) => {
                let template = f.to_upper.clone();
                format_template(&template, &[&expr.to_sql(ctx)?])
            }
            Function::Length(expr) => {
                let template = f.string_length.clone();
                format_template(&template, &[&expr.to_sql(ctx)?])
            }
            Function::Trim { expr, chars, spec } => {
                let template = match spec {
                    TrimSpec::Leading => f.trim_leading.clone(),
                    TrimSpec::Trailing => f.trim_trailing.clone(),
                    TrimSpec::Both => f.trim_both.clone(),
                };
                let e = expr.to_sql(ctx)?;
                let c = chars.to_sql(ctx)?;
                format_template(&template, &[&e, &c])
            }
            Function::Concat(a, b) => {
                let template = f.concatenate.clone();
                let a = a.to_sql(ctx)?;
                let b = b.to_sql(ctx)?;
                format_template(&template, &[&a, &b])
            }
            Function::Substring { expr, start, length } => {
                let name = f.substring.clone();
                let mut args = vec![expr.to_sql(ctx)?, start.to_sql(ctx)?];
                if let Some(len) = length {
                    args.push(len.to_sql(ctx)?);
                }
                format!("{}({})", name, args.join(", "))
            }
            Function::IndexOf {
                haystack,
                needle,
                from,
            } => {
                let template = if from.is_some() {
                    f.index_of_from.clone()
                } else {
                    f.index_of.clone()
                };
                let h = haystack.to_sql(ctx)?;
                let n = needle.to_sql(ctx)?;
                match from {
                    Some(from) => {
                        let s = from.to_sql(ctx)?;
                        format_template(&template, &[&h, &n, &s])
                    }
                    None => format_template(&template, &[&h, &n]),
                }
            }
            Function::CurrentDate => f.current_date.clone(),
            Function::CurrentTime => f.current_time.clone(),
            Function::CurrentTimestamp => f.current_timestamp.clone(),
        };
        Ok(sql)
    }
}

// =============================================================================
// Expression Builders
// =============================================================================

/// `tN.name`
pub fn col(alias: Alias, name: &str) -> Expr {
    Expr::Column {
        alias,
        name: name.into(),
    }
}

pub fn lit_int(n: i64) -> Expr {
    Expr::Literal(Literal::Int(n))
}

pub fn lit_float(f: f64) -> Expr {
    Expr::Literal(Literal::Float(f))
}

pub fn lit_str(s: &str) -> Expr {
    Expr::Literal(Literal::String(s.into()))
}

pub fn lit_bool(b: bool) -> Expr {
    Expr::Literal(Literal::Bool(b))
}

pub fn lit_null() -> Expr {
    Expr::Literal(Literal::Null)
}

pub fn param(name: &str) -> Expr {
    Expr::Param(name.into())
}

pub fn raw_sql(sql: &str) -> Expr {
    Expr::Raw(sql.into())
}

pub fn exists(scope: ScopeId) -> Expr {
    Expr::Exists {
        scope,
        negated: false,
    }
}

pub fn not_exists(scope: ScopeId) -> Expr {
    Expr::Exists {
        scope,
        negated: true,
    }
}

/// COUNT(*)
pub fn count_star() -> Expr {
    Expr::Aggregate {
        func: AggregateFunction::Count,
        arg: None,
        distinct: false,
    }
}

pub fn count(expr: Expr) -> Expr {
    aggregate(AggregateFunction::Count, expr, false)
}

pub fn count_distinct(expr: Expr) -> Expr {
    aggregate(AggregateFunction::Count, expr, true)
}

pub fn sum(expr: Expr) -> Expr {
    aggregate(AggregateFunction::Sum, expr, false)
}

pub fn avg(expr: Expr) -> Expr {
    aggregate(AggregateFunction::Avg, expr, false)
}

pub fn min(expr: Expr) -> Expr {
    aggregate(AggregateFunction::Min, expr, false)
}

pub fn max(expr: Expr) -> Expr {
    aggregate(AggregateFunction::Max, expr, false)
}

fn aggregate(func: AggregateFunction, expr: Expr, distinct: bool) -> Expr {
    Expr::Aggregate {
        func,
        arg: Some(Box::new(expr)),
        distinct,
    }
}

pub fn cast(expr: Expr, type_name: &str) -> Expr {
    Expr::Function(Function::Cast {
        expr: Box::new(expr),
        type_name: type_name.into(),
    })
}

pub fn lower(expr: Expr) -> Expr {
    Expr::Function(Function::Lower(Box::new(expr)))
}

pub fn upper(expr: Expr) -> Expr {
    Expr::Function(Function::Upper(Box::new(expr)))
}

pub fn length(expr: Expr) -> Expr {
    Expr::Function(Function::Length(Box::new(expr)))
}

pub fn trim(expr: Expr, chars: Expr, spec: TrimSpec) -> Expr {
    Expr::Function(Function::Trim {
        expr: Box::new(expr),
        chars: Box::new(chars),
        spec,
    })
}

pub fn substring(expr: Expr, start: Expr, length: Option<Expr>) -> Expr {
    Expr::Function(Function::Substring {
        expr: Box::new(expr),
        start: Box::new(start),
        length: length.map(Box::new),
    })
}

pub fn index_of(haystack: Expr, needle: Expr, from: Option<Expr>) -> Expr {
    Expr::Function(Function::IndexOf {
        haystack: Box::new(haystack),
        needle: Box::new(needle),
        from: from.map(Box::new),
    })
}

pub fn current_date() -> Expr {
    Expr::Function(Function::CurrentDate)
}

pub fn current_time() -> Expr {
    Expr::Function(Function::CurrentTime)
}

pub fn current_timestamp() -> Expr {
    Expr::Function(Function::CurrentTimestamp)
}

// =============================================================================
// Expression Builder Trait
// =============================================================================

/// Extension trait for building expressions fluently.
pub trait ExprExt: Sized {
    fn into_expr(self) -> Expr;

    fn binary(self, op: BinaryOperator, other: impl Into<Expr>) -> Expr {
        Expr::BinaryOp {
            left: Box::new(self.into_expr()),
            op,
            right: Box::new(other.into()),
        }
    }

    // Comparison operators
    fn eq(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Eq, other)
    }

    fn ne(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Ne, other)
    }

    fn gt(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Gt, other)
    }

    fn gte(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Gte, other)
    }

    fn lt(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Lt, other)
    }

    fn lte(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Lte, other)
    }

    // Logical operators
    fn and(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::And, other)
    }

    fn or(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Or, other)
    }

    fn not(self) -> Expr {
        Expr::UnaryOp {
            op: UnaryOperator::Not,
            expr: Box::new(self.into_expr()),
        }
    }

    // Arithmetic operators
    fn add(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Plus, other)
    }

    fn sub(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Minus, other)
    }

    fn mul(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Mul, other)
    }

    fn div(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Div, other)
    }

    fn modulo(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Mod, other)
    }

    // String operators
    fn like(self, pattern: impl Into<Expr>) -> Expr {
        Expr::Like {
            expr: Box::new(self.into_expr()),
            pattern: Box::new(pattern.into()),
            escape: None,
            negated: false,
        }
    }

    /// LIKE with ESCAPE clause for matching literal `%` and `_` characters.
    fn like_escape(self, pattern: impl Into<Expr>, escape: char) -> Expr {
        Expr::Like {
            expr: Box::new(self.into_expr()),
            pattern: Box::new(pattern.into()),
            escape: Some(escape),
            negated: false,
        }
    }

    fn concat(self, other: impl Into<Expr>) -> Expr {
        Expr::Function(Function::Concat(
            Box::new(self.into_expr()),
            Box::new(other.into()),
        ))
    }

    // NULL checks
    #[allow(clippy::wrong_self_convention)]
    fn is_null(self) -> Expr {
        Expr::IsNull {
            expr: Box::new(self.into_expr()),
            negated: false,
        }
    }

    #[allow(clippy::wrong_self_convention)]
    fn is_not_null(self) -> Expr {
        Expr::IsNull {
            expr: Box::new(self.into_expr()),
            negated: true,
        }
    }

    // IN operator
    fn in_list(self, values: Vec<Expr>) -> Expr {
        Expr::In {
            expr: Box::new(self.into_expr()),
            values,
            negated: false,
        }
    }

    fn not_in_list(self, values: Vec<Expr>) -> Expr {
        Expr::In {
            expr: Box::new(self.into_expr()),
            values,
            negated: true,
        }
    }

    fn in_subselect(self, scope: ScopeId) -> Expr {
        Expr::InSubselect {
            expr: Box::new(self.into_expr()),
            scope,
            negated: false,
        }
    }
}

impl ExprExt for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        lit_int(n)
    }
}

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        lit_int(n as i64)
    }
}

impl From<f64> for Expr {
    fn from(f: f64) -> Self {
        lit_float(f)
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        lit_str(s)
    }
}

impl From<bool> for Expr {
    fn from(b: bool) -> Self {
        lit_bool(b)
    }
}

impl From<Literal> for Expr {
    fn from(lit: Literal) -> Self {
        Expr::Literal(lit)
    }
}
