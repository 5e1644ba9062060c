//! Generic SQL-92 profile.
//!
//! Every vendor profile starts from [`base`] and states only its
//! differences. The generic profile itself:
//! - SQL92 join syntax
//! - no SQL-level pagination (the caller skips and limits rows)
//! - `FOR UPDATE` locking with no restrictions
//! - 128-character identifiers

use std::collections::{BTreeMap, BTreeSet};

use super::helpers::word_set;
use super::{
    BooleanStyle, Capability, Clauses, ConstraintNameMode, DialectProfile, Functions, JoinSyntax,
    Naming, QuoteStyle, Quirks, RangePosition, TypeNames, Vendor,
};
use crate::sql::lock::LockKind;
use crate::sql::range::RangeKind;

/// SQL-92 reserved keywords.
const SQL92_KEYWORDS: &[&str] = &[
    "ABSOLUTE", "ACTION", "ADD", "ALL", "ALLOCATE", "ALTER", "AND", "ANY", "ARE", "AS", "ASC",
    "ASSERTION", "AT", "AUTHORIZATION", "AVG", "BEGIN", "BETWEEN", "BIT", "BIT_LENGTH", "BOTH",
    "BY", "CASCADE", "CASCADED", "CASE", "CAST", "CATALOG", "CHAR", "CHARACTER", "CHAR_LENGTH",
    "CHARACTER_LENGTH", "CHECK", "CLOSE", "COALESCE", "COLLATE", "COLLATION", "COLUMN",
    "COMMIT", "CONNECT", "CONNECTION", "CONSTRAINT", "CONSTRAINTS", "CONTINUE", "CONVERT",
    "CORRESPONDING", "COUNT", "CREATE", "CROSS", "CURRENT", "CURRENT_DATE", "CURRENT_TIME",
    "CURRENT_TIMESTAMP", "CURRENT_USER", "CURSOR", "DATE", "DAY", "DEALLOCATE", "DEC",
    "DECIMAL", "DECLARE", "DEFAULT", "DEFERRABLE", "DEFERRED", "DELETE", "DESC", "DESCRIBE",
    "DESCRIPTOR", "DIAGNOSTICS", "DISCONNECT", "DISTINCT", "DOMAIN", "DOUBLE", "DROP", "ELSE",
    "END", "END-EXEC", "ESCAPE", "EXCEPT", "EXCEPTION", "EXEC", "EXECUTE", "EXISTS",
    "EXTERNAL", "EXTRACT", "FALSE", "FETCH", "FIRST", "FLOAT", "FOR", "FOREIGN", "FOUND",
    "FROM", "FULL", "GET", "GLOBAL", "GO", "GOTO", "GRANT", "GROUP", "HAVING", "HOUR",
    "IDENTITY", "IMMEDIATE", "IN", "INDICATOR", "INITIALLY", "INNER", "INPUT", "INSENSITIVE",
    "INSERT", "INT", "INTEGER", "INTERSECT", "INTERVAL", "INTO", "IS", "ISOLATION", "JOIN",
    "KEY", "LANGUAGE", "LAST", "LEADING", "LEFT", "LEVEL", "LIKE", "LOCAL", "LOWER", "MATCH",
    "MAX", "MIN", "MINUTE", "MODULE", "MONTH", "NAMES", "NATIONAL", "NATURAL", "NCHAR", "NEXT",
    "NO", "NOT", "NULL", "NULLIF", "NUMERIC", "OCTET_LENGTH", "OF", "ON", "ONLY", "OPEN",
    "OPTION", "OR", "ORDER", "OUTER", "OUTPUT", "OVERLAPS", "PAD", "PARTIAL", "POSITION",
    "PRECISION", "PREPARE", "PRESERVE", "PRIMARY", "PRIOR", "PRIVILEGES", "PROCEDURE",
    "PUBLIC", "READ", "REAL", "REFERENCES", "RELATIVE", "RESTRICT", "REVOKE", "RIGHT",
    "ROLLBACK", "ROWS", "SCHEMA", "SCROLL", "SECOND", "SECTION", "SELECT", "SESSION",
    "SESSION_USER", "SET", "SIZE", "SMALLINT", "SOME", "SPACE", "SQL", "SQLCODE", "SQLERROR",
    "SQLSTATE", "SUBSTRING", "SUM", "SYSTEM_USER", "TABLE", "TEMPORARY", "THEN", "TIME",
    "TIMESTAMP", "TIMEZONE_HOUR", "TIMEZONE_MINUTE", "TO", "TRAILING", "TRANSACTION",
    "TRANSLATE", "TRANSLATION", "TRIM", "TRUE", "UNION", "UNIQUE", "UNKNOWN", "UPDATE", "UPPER",
    "USAGE", "USER", "USING", "VALUE", "VALUES", "VARCHAR", "VARYING", "VIEW", "WHEN",
    "WHENEVER", "WHERE", "WITH", "WORK", "WRITE", "YEAR", "ZONE",
];

/// Capabilities every dialect has unless it opts out.
const BASE_CAPABILITIES: &[Capability] = &[
    Capability::Subselect,
    Capability::CorrelatedSubselect,
    Capability::Having,
    Capability::SelectForUpdate,
    Capability::LockingWithDistinct,
    Capability::LockingWithMultipleTables,
    Capability::LockingWithOrderBy,
    Capability::LockingWithOuterJoin,
    Capability::LockingWithInnerJoin,
    Capability::LockingWithSelectRange,
    Capability::ForeignKeys,
    Capability::UniqueConstraints,
    Capability::DeferredConstraints,
    Capability::RestrictDeleteAction,
    Capability::CascadeDeleteAction,
    Capability::NullDeleteAction,
    Capability::DefaultDeleteAction,
    Capability::RestrictUpdateAction,
    Capability::CascadeUpdateAction,
    Capability::NullUpdateAction,
    Capability::DefaultUpdateAction,
    Capability::AlterTableAddColumn,
    Capability::AlterTableDropColumn,
    Capability::NullUniqueColumn,
];

pub(super) fn base(vendor: Vendor) -> DialectProfile {
    DialectProfile {
        vendor,
        platform: vendor.name().to_string(),
        join_syntax: JoinSyntax::Sql92,
        range_position: RangePosition::PostSelect,
        range: RangeKind::None,
        locking: LockKind::Standard,
        capabilities: BASE_CAPABILITIES.iter().copied().collect(),
        quirks: Quirks {
            requires_alias_for_subselect: false,
            requires_target_for_delete: false,
            allows_alias_in_bulk_clause: true,
            requires_condition_for_cross_join: false,
            use_wildcard_for_count: false,
            create_primary_keys: true,
            simulate_locking: false,
            use_triggers_for_auto_assign: false,
        },
        clauses: Clauses {
            inner_join: "INNER JOIN".into(),
            outer_join: "LEFT OUTER JOIN".into(),
            cross_join: "CROSS JOIN".into(),
            for_update: Some("FOR UPDATE".into()),
            table_for_update: None,
            distinct_count_column_separator: None,
            auto_assign: None,
            native_outer_join_marker: None,
            drop_table: "DROP TABLE {0}".into(),
        },
        functions: Functions {
            cast: "CAST({0} AS {1})".into(),
            to_lower: "LOWER({0})".into(),
            to_upper: "UPPER({0})".into(),
            string_length: "CHAR_LENGTH({0})".into(),
            trim_leading: "TRIM(LEADING {1} FROM {0})".into(),
            trim_trailing: "TRIM(TRAILING {1} FROM {0})".into(),
            trim_both: "TRIM(BOTH {1} FROM {0})".into(),
            concatenate: "({0}||{1})".into(),
            substring: "SUBSTRING".into(),
            index_of: "POSITION({1} IN {0})".into(),
            index_of_from: "(POSITION({1} IN SUBSTRING({0} FROM {2})) - 1 + {2})".into(),
            modulo: "MOD({0}, {1})".into(),
            current_date: "CURRENT_DATE".into(),
            current_time: "CURRENT_TIME".into(),
            current_timestamp: "CURRENT_TIMESTAMP".into(),
            boolean_style: BooleanStyle::Literal,
        },
        types: TypeNames {
            names: BTreeMap::new(),
            auto_assign: None,
            fixed_size: BTreeSet::new(),
            modifiers: BTreeSet::new(),
        },
        naming: Naming {
            max_table_name_length: 128,
            max_column_name_length: 128,
            max_constraint_name_length: 128,
            max_index_name_length: 128,
            max_sequence_name_length: 128,
            max_auto_assign_name_length: 31,
            reserved_words: word_set(SQL92_KEYWORDS),
            constraint_name_mode: ConstraintNameMode::Before,
            delimit_identifiers: false,
            quote_style: QuoteStyle::Double,
        },
    }
}

pub(super) fn profile() -> DialectProfile {
    base(Vendor::Generic)
}
