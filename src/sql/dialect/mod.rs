//! Dialect profiles.
//!
//! A [`DialectProfile`] is an immutable description of one vendor's grammar
//! and capabilities: join syntax, pagination strategy and position, lock
//! clauses, function templates, type names, reserved words and identifier
//! limits. Every rendering decision in the compiler reads from a profile.
//!
//! Default profiles are built once per vendor and shared process-wide:
//!
//! ```ignore
//! use quarry::sql::dialect::{Capability, Vendor};
//!
//! let oracle = Vendor::Oracle.profile();
//! assert!(!oracle.supports(Capability::LockingWithDistinct));
//! ```
//!
//! Overrides never mutate a shared profile; they produce a new value
//! (see [`crate::config::ProfileOverrides`] and the `with_*` methods).
//!
//! | Feature | Generic | PostgreSQL | Oracle | DB2 | MySQL | SQL Server |
//! |---------|---------|------------|--------|-----|-------|------------|
//! | Join syntax | SQL92 | SQL92 | native `(+)` | SQL92 | SQL92 | SQL92 |
//! | Range | none | LIMIT/OFFSET | ROWNUM | FETCH FIRST | LIMIT s, n | TOP |
//! | Lock with DISTINCT | ✓ | ❌ | ❌ | ✓ | ✓ | ❌ |
//! | Lock with outer join | ✓ | ❌ | ✓ | 9.2+ | ✓ | ❌ |

pub(crate) mod db2;
mod generic;
pub mod helpers;
mod mysql;
mod oracle;
mod postgres;
mod probe;
mod sqlserver;

pub use db2::Db2Platform;
pub use probe::{jdbc_protocol, VendorProbe};

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{CompileError, CompileResult};
use crate::sql::lock::{IsolationLevel, LockKind};
use crate::sql::range::RangeKind;
use crate::sql::types::{TypeCatalog, TypeCode};

// =============================================================================
// Vendor tag and registry
// =============================================================================

/// Database vendor family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    #[default]
    Generic,
    Postgres,
    Oracle,
    Db2,
    MySql,
    SqlServer,
}

static GENERIC: Lazy<DialectProfile> = Lazy::new(generic::profile);
static POSTGRES: Lazy<DialectProfile> = Lazy::new(postgres::profile);
static ORACLE: Lazy<DialectProfile> = Lazy::new(oracle::profile);
static DB2: Lazy<DialectProfile> = Lazy::new(|| db2::profile(Db2Platform::default()));
static MYSQL: Lazy<DialectProfile> = Lazy::new(mysql::profile);
static SQLSERVER: Lazy<DialectProfile> = Lazy::new(sqlserver::profile);

impl Vendor {
    pub const ALL: [Vendor; 6] = [
        Vendor::Generic,
        Vendor::Postgres,
        Vendor::Oracle,
        Vendor::Db2,
        Vendor::MySql,
        Vendor::SqlServer,
    ];

    /// Platform name used in messages.
    pub fn name(&self) -> &'static str {
        match self {
            Vendor::Generic => "Generic",
            Vendor::Postgres => "PostgreSQL",
            Vendor::Oracle => "Oracle",
            Vendor::Db2 => "DB2",
            Vendor::MySql => "MySQL",
            Vendor::SqlServer => "SQLServer",
        }
    }

    /// The shared default profile for this vendor.
    ///
    /// Built on first use; concurrent first callers converge on one value.
    pub fn profile(&self) -> &'static DialectProfile {
        match self {
            Vendor::Generic => &GENERIC,
            Vendor::Postgres => &POSTGRES,
            Vendor::Oracle => &ORACLE,
            Vendor::Db2 => &DB2,
            Vendor::MySql => &MYSQL,
            Vendor::SqlServer => &SQLSERVER,
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Vendor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "generic" | "ansi" | "sql92" => Ok(Vendor::Generic),
            "postgres" | "postgresql" | "pg" => Ok(Vendor::Postgres),
            "oracle" => Ok(Vendor::Oracle),
            "db2" | "as400" => Ok(Vendor::Db2),
            "mysql" | "mariadb" => Ok(Vendor::MySql),
            "sqlserver" | "mssql" | "tsql" => Ok(Vendor::SqlServer),
            other => Err(format!("unknown vendor: {}", other)),
        }
    }
}

// =============================================================================
// Grammar variants
// =============================================================================

/// How joins are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinSyntax {
    /// `A t0 INNER JOIN B t1 ON ...`
    Sql92,
    /// `A t0, B t1 WHERE ...`
    Traditional,
    /// Comma-separated tables with vendor join predicates (Oracle `(+)`).
    Native,
}

/// Where the range clause is placed within a SELECT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePosition {
    /// Directly after `SELECT`.
    PreDistinct,
    /// After `SELECT DISTINCT`.
    PostDistinct,
    /// After `ORDER BY`.
    PostSelect,
    /// After the lock clause.
    PostLock,
}

/// Placement of a constraint name relative to its keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintNameMode {
    /// `CONSTRAINT name PRIMARY KEY (...)`
    Before,
    /// `PRIMARY KEY name (...)`
    Mid,
    /// `PRIMARY KEY (...) CONSTRAINT name`
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStyle {
    Double,
    Backtick,
    Bracket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BooleanStyle {
    /// `true` / `false`
    Literal,
    /// `1` / `0`
    Numeric,
}

/// Kind of schema object an identifier names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameKind {
    Table,
    Column,
    Constraint,
    Index,
    Sequence,
    /// Sequences and triggers generated for auto-assigned columns.
    AutoAssign,
}

// =============================================================================
// Capabilities
// =============================================================================

/// A feature a dialect may or may not be able to express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Subselect,
    CorrelatedSubselect,
    Having,
    SelectForUpdate,
    LockingWithDistinct,
    LockingWithMultipleTables,
    LockingWithOrderBy,
    LockingWithOuterJoin,
    LockingWithInnerJoin,
    LockingWithSelectRange,
    SelectStartIndex,
    SelectEndIndex,
    ModOperator,
    NativeOuterJoin,
    ForeignKeys,
    UniqueConstraints,
    DeferredConstraints,
    RestrictDeleteAction,
    CascadeDeleteAction,
    NullDeleteAction,
    DefaultDeleteAction,
    RestrictUpdateAction,
    CascadeUpdateAction,
    NullUpdateAction,
    DefaultUpdateAction,
    AlterTableAddColumn,
    AlterTableDropColumn,
    AutoAssign,
    NullUniqueColumn,
}

impl Capability {
    pub fn description(&self) -> &'static str {
        match self {
            Capability::Subselect => "subselects",
            Capability::CorrelatedSubselect => "correlated subselects",
            Capability::Having => "HAVING clauses",
            Capability::SelectForUpdate => "SELECT ... FOR UPDATE",
            Capability::LockingWithDistinct => "locking with DISTINCT",
            Capability::LockingWithMultipleTables => "locking across multiple tables",
            Capability::LockingWithOrderBy => "locking with ORDER BY",
            Capability::LockingWithOuterJoin => "locking with outer joins",
            Capability::LockingWithInnerJoin => "locking with inner joins",
            Capability::LockingWithSelectRange => "locking with a row range",
            Capability::SelectStartIndex => "row offsets",
            Capability::SelectEndIndex => "row limits",
            Capability::ModOperator => "the % operator",
            Capability::NativeOuterJoin => "native outer joins",
            Capability::ForeignKeys => "foreign keys",
            Capability::UniqueConstraints => "unique constraints",
            Capability::DeferredConstraints => "deferred constraints",
            Capability::RestrictDeleteAction => "ON DELETE RESTRICT",
            Capability::CascadeDeleteAction => "ON DELETE CASCADE",
            Capability::NullDeleteAction => "ON DELETE SET NULL",
            Capability::DefaultDeleteAction => "ON DELETE SET DEFAULT",
            Capability::RestrictUpdateAction => "ON UPDATE RESTRICT",
            Capability::CascadeUpdateAction => "ON UPDATE CASCADE",
            Capability::NullUpdateAction => "ON UPDATE SET NULL",
            Capability::DefaultUpdateAction => "ON UPDATE SET DEFAULT",
            Capability::AlterTableAddColumn => "ALTER TABLE ... ADD",
            Capability::AlterTableDropColumn => "ALTER TABLE ... DROP COLUMN",
            Capability::AutoAssign => "auto-assigned columns",
            Capability::NullUniqueColumn => "nullable unique columns",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

// =============================================================================
// Profile sections
// =============================================================================

/// Behaviour switches that are requirements rather than capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quirks {
    /// A derived table in FROM needs an alias.
    pub requires_alias_for_subselect: bool,
    /// `DELETE t0 FROM ...` instead of `DELETE FROM ...`.
    pub requires_target_for_delete: bool,
    pub allows_alias_in_bulk_clause: bool,
    /// Cross joins need `ON (1 = 1)`.
    pub requires_condition_for_cross_join: bool,
    pub use_wildcard_for_count: bool,
    pub create_primary_keys: bool,
    /// Omit lock clauses instead of emitting them.
    pub simulate_locking: bool,
    /// Emulate auto-assign with a sequence and a BEFORE INSERT trigger.
    pub use_triggers_for_auto_assign: bool,
}

/// Clause text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clauses {
    pub inner_join: String,
    pub outer_join: String,
    pub cross_join: String,
    pub for_update: Option<String>,
    /// Table hint emitted after each FROM table when locking.
    pub table_for_update: Option<String>,
    pub distinct_count_column_separator: Option<String>,
    pub auto_assign: Option<String>,
    /// Marker appended to the optional side of a native outer join.
    pub native_outer_join_marker: Option<String>,
    pub drop_table: String,
}

/// Function templates; `{0}`, `{1}`, ... are argument placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Functions {
    pub cast: String,
    pub to_lower: String,
    pub to_upper: String,
    pub string_length: String,
    pub trim_leading: String,
    pub trim_trailing: String,
    pub trim_both: String,
    pub concatenate: String,
    pub substring: String,
    /// `{0}` haystack, `{1}` needle.
    pub index_of: String,
    /// As `index_of`, with `{2}` the 1-based start position.
    pub index_of_from: String,
    pub modulo: String,
    pub current_date: String,
    pub current_time: String,
    pub current_timestamp: String,
    pub boolean_style: BooleanStyle,
}

/// Type names per type code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeNames {
    pub names: BTreeMap<TypeCode, String>,
    /// Type used for auto-assigned columns, e.g. `BIGSERIAL`.
    pub auto_assign: Option<String>,
    /// Names that never take a size clause (upper case).
    pub fixed_size: BTreeSet<String>,
    /// Trailing tokens before which a size clause is inserted (upper case).
    pub modifiers: BTreeSet<String>,
}

/// Identifier rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Naming {
    pub max_table_name_length: usize,
    pub max_column_name_length: usize,
    pub max_constraint_name_length: usize,
    pub max_index_name_length: usize,
    pub max_sequence_name_length: usize,
    pub max_auto_assign_name_length: usize,
    /// Upper-cased reserved words.
    pub reserved_words: BTreeSet<String>,
    pub constraint_name_mode: ConstraintNameMode,
    pub delimit_identifiers: bool,
    pub quote_style: QuoteStyle,
}

// =============================================================================
// DialectProfile
// =============================================================================

/// Immutable capability and template record for one connection family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialectProfile {
    pub vendor: Vendor,
    pub platform: String,
    pub join_syntax: JoinSyntax,
    pub range_position: RangePosition,
    pub range: RangeKind,
    pub locking: LockKind,
    pub capabilities: BTreeSet<Capability>,
    pub quirks: Quirks,
    pub clauses: Clauses,
    pub functions: Functions,
    pub types: TypeNames,
    pub naming: Naming,
}

impl DialectProfile {
    /// Base profile every vendor starts from.
    pub(crate) fn base(vendor: Vendor) -> Self {
        generic::base(vendor)
    }

    pub fn name(&self) -> &str {
        &self.platform
    }

    pub fn join_syntax(&self) -> JoinSyntax {
        self.join_syntax
    }

    pub fn range_position(&self) -> RangePosition {
        self.range_position
    }

    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Fail with `CapabilityUnsupported` unless the capability is present.
    pub fn assert_support(&self, capability: Capability) -> CompileResult<()> {
        if self.supports(capability) {
            Ok(())
        } else {
            Err(CompileError::unsupported(capability, self.platform.clone()))
        }
    }

    /// Type name for a code and size hint.
    pub fn type_name(&self, code: TypeCode, size: u32, decimals: u32) -> String {
        TypeCatalog::new(self).type_name_for(code, size, decimals)
    }

    /// Lock clause text for a plain top-level select.
    pub fn lock_clause(
        &self,
        isolation: Option<IsolationLevel>,
        for_update: bool,
    ) -> CompileResult<Option<String>> {
        self.locking.composer().lock_clause(self, isolation, for_update, false)
    }

    pub fn max_name_length(&self, kind: NameKind) -> usize {
        match kind {
            NameKind::Table => self.naming.max_table_name_length,
            NameKind::Column => self.naming.max_column_name_length,
            NameKind::Constraint => self.naming.max_constraint_name_length,
            NameKind::Index => self.naming.max_index_name_length,
            NameKind::Sequence => self.naming.max_sequence_name_length,
            NameKind::AutoAssign => self.naming.max_auto_assign_name_length,
        }
    }

    pub fn is_reserved(&self, word: &str) -> bool {
        self.naming
            .reserved_words
            .contains(&word.to_ascii_uppercase())
    }

    pub fn quote_identifier(&self, ident: &str) -> String {
        if !self.naming.delimit_identifiers {
            return ident.to_string();
        }
        match self.naming.quote_style {
            QuoteStyle::Double => helpers::quote_double(ident),
            QuoteStyle::Backtick => helpers::quote_backtick(ident),
            QuoteStyle::Bracket => helpers::quote_bracket(ident),
        }
    }

    /// Opening and closing delimiter characters.
    pub fn delimiters(&self) -> (char, char) {
        match self.naming.quote_style {
            QuoteStyle::Double => ('"', '"'),
            QuoteStyle::Backtick => ('`', '`'),
            QuoteStyle::Bracket => ('[', ']'),
        }
    }

    pub fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_single(s)
    }

    pub fn format_bool(&self, b: bool) -> &'static str {
        match self.functions.boolean_style {
            BooleanStyle::Literal => helpers::format_bool_literal(b),
            BooleanStyle::Numeric => helpers::format_bool_numeric(b),
        }
    }

    // =========================================================================
    // Derived values
    // =========================================================================

    #[must_use]
    pub fn with_capability(mut self, capability: Capability, enabled: bool) -> Self {
        if enabled {
            self.capabilities.insert(capability);
        } else {
            self.capabilities.remove(&capability);
        }
        self
    }

    #[must_use]
    pub fn with_join_syntax(mut self, syntax: JoinSyntax) -> Self {
        self.join_syntax = syntax;
        self
    }

    #[must_use]
    pub fn with_delimited_identifiers(mut self, delimit: bool) -> Self {
        self.naming.delimit_identifiers = delimit;
        self
    }

    /// Emulate auto-assigned columns with a sequence and a BEFORE INSERT trigger.
    #[must_use]
    pub fn with_trigger_auto_assign(mut self, enabled: bool) -> Self {
        self.quirks.use_triggers_for_auto_assign = enabled;
        if enabled {
            self.capabilities.insert(Capability::AutoAssign);
        }
        self
    }

    #[must_use]
    pub fn with_quirks(mut self, quirks: Quirks) -> Self {
        self.quirks = quirks;
        self
    }

    #[must_use]
    pub fn with_type_name(mut self, code: TypeCode, name: impl Into<String>) -> Self {
        self.types.names.insert(code, name.into());
        self
    }

    #[must_use]
    pub fn with_type_modifiers<I, S>(mut self, modifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.types.modifiers = modifiers
            .into_iter()
            .map(|m| m.as_ref().to_ascii_uppercase())
            .collect();
        self
    }
}

impl fmt::Display for DialectProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.platform)
    }
}
