//! PostgreSQL profile.
//!
//! PostgreSQL differences from the generic profile:
//! - `LIMIT n OFFSET m` placed after the lock clause
//! - native boolean literals
//! - `%` modulo, `BIGSERIAL` auto-assign
//! - no locking with DISTINCT or outer joins
//! - aliases required on derived tables, none allowed in bulk DML
//! - 63-character identifiers

use super::helpers::word_set;
use super::{Capability, DialectProfile, RangePosition, Vendor};
use crate::sql::range::RangeKind;
use crate::sql::types::TypeCode;

const RESERVED_WORDS: &[&str] = &[
    "ABORT", "ACL", "AGGREGATE", "APPEND", "ARCHIVE", "ARCH_STORE", "BACKWARD", "BINARY",
    "CHANGE", "CLUSTER", "COPY", "DATABASE", "DELIMITER", "DELIMITERS", "DO", "EXPLAIN",
    "EXTEND", "FORWARD", "HEAVY", "INDEX", "INHERITS", "ISNULL", "LIGHT", "LISTEN", "LIMIT",
    "LOAD", "MERGE", "NOTHING", "NOTIFY", "NOTNULL", "OFFSET", "OID", "OIDS", "PURGE", "RECIPE",
    "RENAME", "REPLACE", "RETRIEVE", "RETURNS", "RULE", "SETOF", "STDIN", "STDOUT", "STORE",
    "VACUUM", "VERBOSE", "VERSION",
];

const FIXED_SIZE_TYPES: &[&str] = &[
    "BOOL", "BYTEA", "NAME", "INT8", "INT2", "INT2VECTOR", "INT4", "REGPROC", "TEXT", "OID",
    "TID", "XID", "CID", "OIDVECTOR", "SET", "FLOAT4", "FLOAT8", "ABSTIME", "RELTIME",
    "TINTERVAL", "MONEY",
];

pub(super) fn profile() -> DialectProfile {
    let mut p = DialectProfile::base(Vendor::Postgres);

    p.range = RangeKind::LimitOffset;
    p.range_position = RangePosition::PostLock;

    for cap in [
        Capability::SelectStartIndex,
        Capability::SelectEndIndex,
        Capability::AutoAssign,
        Capability::ModOperator,
    ] {
        p.capabilities.insert(cap);
    }
    for cap in [
        Capability::AlterTableDropColumn,
        Capability::LockingWithDistinct,
        Capability::LockingWithOuterJoin,
    ] {
        p.capabilities.remove(&cap);
    }

    p.quirks.requires_alias_for_subselect = true;
    p.quirks.allows_alias_in_bulk_clause = false;

    p.types.auto_assign = Some("BIGSERIAL".into());
    p.types.names.extend(
        [
            (TypeCode::Bit, "BOOL"),
            (TypeCode::Boolean, "BOOL"),
            (TypeCode::SmallInt, "SMALLINT"),
            (TypeCode::TinyInt, "SMALLINT"),
            (TypeCode::Real, "FLOAT4"),
            (TypeCode::Double, "DOUBLE PRECISION"),
            (TypeCode::Binary, "BYTEA"),
            (TypeCode::Blob, "BYTEA"),
            (TypeCode::LongVarBinary, "BYTEA"),
            (TypeCode::VarBinary, "BYTEA"),
            (TypeCode::Clob, "TEXT"),
            (TypeCode::LongVarChar, "TEXT"),
            (TypeCode::Timestamp, "TIMESTAMP"),
        ]
        .map(|(code, name)| (code, name.to_string())),
    );
    p.types.fixed_size = word_set(FIXED_SIZE_TYPES);

    p.naming.max_table_name_length = 63;
    p.naming.max_column_name_length = 63;
    p.naming.max_constraint_name_length = 63;
    p.naming.max_index_name_length = 63;
    p.naming.max_sequence_name_length = 63;
    p.naming.max_auto_assign_name_length = 63;
    p.naming.reserved_words.extend(word_set(RESERVED_WORDS));

    p
}
