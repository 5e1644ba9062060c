//! SQL Tokens - the atomic units of SQL output.
//!
//! Tokens are dialect-agnostic representations that serialize
//! to dialect-specific strings through a [`DialectProfile`].

use super::dialect::DialectProfile;

/// SQL Token - every element the compiler emits.
///
/// Adding a new variant here will cause compile errors everywhere
/// it needs to be handled (exhaustive matching).
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // === Keywords ===
    Select,
    From,
    Where,
    And,
    Or,
    Not,
    As,
    On,
    GroupBy,
    Having,
    OrderBy,
    Asc,
    Desc,
    Limit,
    Offset,
    Fetch,
    First,
    Rows,
    Only,
    Top,
    In,
    Like,
    Escape,
    IsNull,
    IsNotNull,
    Distinct,
    Exists,
    Null,

    // === DDL Keywords ===
    Create,
    Alter,
    Drop,
    Table,
    Column,
    Index,
    Sequence,
    Constraint,
    PrimaryKey,
    ForeignKey,
    References,
    Unique,
    Default,
    NotNull,
    Add,
    Deferrable,
    InitiallyDeferred,
    StartWith,
    IncrementBy,

    // === DML Keywords ===
    Update,
    Set,
    Delete,

    // === Punctuation ===
    Comma,
    Dot,
    Star,
    LParen,
    RParen,

    // === Operators ===
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    Plus,
    Minus,
    Mul,
    Div,
    Mod,

    // === Whitespace ===
    Space,

    // === Dynamic Content ===
    /// Identifier (table or column name); delimited when the profile says so.
    Ident(String),
    /// Table alias `tN`.
    Alias(usize),
    /// Integer literal
    LitInt(i64),
    /// Row count or offset, always unsigned.
    Count(u64),
    /// Float literal, finite by construction; `Expr` rejects NaN and infinities.
    LitFloat(f64),
    /// String literal
    LitString(String),
    /// Boolean literal
    LitBool(bool),
    /// Positional parameter placeholder.
    Param,

    // === Escape Hatch ===
    /// SQL passed directly to output without escaping.
    ///
    /// Only for trusted fragments: dialect templates, lock clauses and
    /// already-rendered sub-statements. Never for user values.
    Raw(String),
}

impl Token {
    /// Serialize this token to a string for the given profile.
    pub fn serialize(&self, profile: &DialectProfile) -> String {
        match self {
            // Keywords
            Token::Select => "SELECT".into(),
            Token::From => "FROM".into(),
            Token::Where => "WHERE".into(),
            Token::And => "AND".into(),
            Token::Or => "OR".into(),
            Token::Not => "NOT".into(),
            Token::As => "AS".into(),
            Token::On => "ON".into(),
            Token::GroupBy => "GROUP BY".into(),
            Token::Having => "HAVING".into(),
            Token::OrderBy => "ORDER BY".into(),
            Token::Asc => "ASC".into(),
            Token::Desc => "DESC".into(),
            Token::Limit => "LIMIT".into(),
            Token::Offset => "OFFSET".into(),
            Token::Fetch => "FETCH".into(),
            Token::First => "FIRST".into(),
            Token::Rows => "ROWS".into(),
            Token::Only => "ONLY".into(),
            Token::Top => "TOP".into(),
            Token::In => "IN".into(),
            Token::Like => "LIKE".into(),
            Token::Escape => "ESCAPE".into(),
            Token::IsNull => "IS NULL".into(),
            Token::IsNotNull => "IS NOT NULL".into(),
            Token::Distinct => "DISTINCT".into(),
            Token::Exists => "EXISTS".into(),
            Token::Null => "NULL".into(),

            // DDL keywords
            Token::Create => "CREATE".into(),
            Token::Alter => "ALTER".into(),
            Token::Drop => "DROP".into(),
            Token::Table => "TABLE".into(),
            Token::Column => "COLUMN".into(),
            Token::Index => "INDEX".into(),
            Token::Sequence => "SEQUENCE".into(),
            Token::Constraint => "CONSTRAINT".into(),
            Token::PrimaryKey => "PRIMARY KEY".into(),
            Token::ForeignKey => "FOREIGN KEY".into(),
            Token::References => "REFERENCES".into(),
            Token::Unique => "UNIQUE".into(),
            Token::Default => "DEFAULT".into(),
            Token::NotNull => "NOT NULL".into(),
            Token::Add => "ADD".into(),
            Token::Deferrable => "DEFERRABLE".into(),
            Token::InitiallyDeferred => "INITIALLY DEFERRED".into(),
            Token::StartWith => "START WITH".into(),
            Token::IncrementBy => "INCREMENT BY".into(),

            // DML keywords
            Token::Update => "UPDATE".into(),
            Token::Set => "SET".into(),
            Token::Delete => "DELETE".into(),

            // Punctuation
            Token::Comma => ",".into(),
            Token::Dot => ".".into(),
            Token::Star => "*".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),

            // Operators
            Token::Eq => "=".into(),
            Token::Ne => "<>".into(),
            Token::Lt => "<".into(),
            Token::Gt => ">".into(),
            Token::Lte => "<=".into(),
            Token::Gte => ">=".into(),
            Token::Plus => "+".into(),
            Token::Minus => "-".into(),
            Token::Mul => "*".into(),
            Token::Div => "/".into(),
            Token::Mod => "%".into(),

            Token::Space => " ".into(),

            // Dynamic - profile-specific formatting
            Token::Ident(name) => profile.quote_identifier(name),
            Token::Alias(n) => format!("t{}", n),
            Token::LitInt(n) => n.to_string(),
            Token::Count(n) => n.to_string(),
            Token::LitFloat(f) => {
                if f.is_nan() {
                    panic!("Cannot serialize NaN to SQL")
                }
                if f.is_infinite() {
                    panic!("Cannot serialize Infinity to SQL")
                }
                // Use ryu for fast, accurate float formatting
                let mut buffer = ryu::Buffer::new();
                buffer.format(*f).to_string()
            }
            Token::LitString(s) => profile.quote_string(s),
            Token::LitBool(b) => profile.format_bool(*b).into(),
            Token::Param => "?".into(),

            // Escape hatch
            Token::Raw(s) => s.clone(),
        }
    }
}

/// A stream of tokens that can be serialized to SQL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Create an empty token stream.
    pub fn new() -> Self {
        Self { tokens: vec![] }
    }

    /// Push a single token.
    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    /// Extend with multiple tokens.
    pub fn extend(&mut self, tokens: impl IntoIterator<Item = Token>) -> &mut Self {
        self.tokens.extend(tokens);
        self
    }

    /// Append another token stream.
    pub fn append(&mut self, other: &TokenStream) -> &mut Self {
        self.tokens.extend(other.tokens.iter().cloned());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Serialize all tokens to a SQL string.
    pub fn serialize(&self, profile: &DialectProfile) -> String {
        self.tokens.iter().map(|t| t.serialize(profile)).collect()
    }

    // Convenience methods for common tokens
    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }
    pub fn comma(&mut self) -> &mut Self {
        self.push(Token::Comma)
    }
    pub fn lparen(&mut self) -> &mut Self {
        self.push(Token::LParen)
    }
    pub fn rparen(&mut self) -> &mut Self {
        self.push(Token::RParen)
    }
    pub fn raw(&mut self, sql: impl Into<String>) -> &mut Self {
        self.push(Token::Raw(sql.into()))
    }
    /// `tN.column`
    pub fn column(&mut self, alias: usize, name: &str) -> &mut Self {
        self.push(Token::Alias(alias))
            .push(Token::Dot)
            .push(Token::Ident(name.to_string()))
    }
}
