//! SQL Server profile.
//!
//! SQL Server differences from the generic profile:
//! - `TOP n` placed after `DISTINCT`; no offsets
//! - square bracket identifier quoting
//! - `WITH (UPDLOCK)` table hints instead of a trailing `FOR UPDATE`
//! - `+` string concatenation, `LEN`, `CHARINDEX`
//! - `IDENTITY` auto-assign, `BIT` booleans, `IMAGE` / `TEXT` large objects

use super::helpers::word_set;
use super::{BooleanStyle, Capability, DialectProfile, QuoteStyle, RangePosition, Vendor};
use crate::sql::range::RangeKind;
use crate::sql::types::TypeCode;

const RESERVED_WORDS: &[&str] = &[
    "BACKUP", "BREAK", "BROWSE", "BULK", "CHECKPOINT", "CLUSTERED", "COMPUTE", "CONTAINS",
    "CONTAINSTABLE", "DATABASE", "DBCC", "DENY", "DISK", "DISTRIBUTED", "DUMMY", "DUMP",
    "ERRLVL", "EXIT", "FILE", "FILLFACTOR", "FREETEXT", "FREETEXTTABLE", "FUNCTION",
    "HOLDLOCK", "IDENTITY_INSERT", "IDENTITYCOL", "IF", "INDEX", "KILL", "LINENO", "LOAD",
    "NOCHECK", "NONCLUSTERED", "OFF", "OFFSETS", "OPENDATASOURCE", "OPENQUERY", "OPENROWSET",
    "OPENXML", "OVER", "PERCENT", "PLAN", "PRINT", "PROC", "RAISERROR", "READTEXT",
    "RECONFIGURE", "REPLICATION", "RESTORE", "RETURN", "ROWCOUNT", "ROWGUIDCOL", "RULE",
    "SAVE", "SETUSER", "SHUTDOWN", "STATISTICS", "TEXTSIZE", "TOP", "TRAN", "TRIGGER",
    "TRUNCATE", "TSEQUAL", "UPDATETEXT", "WAITFOR", "WHILE", "WRITETEXT",
];

const FIXED_SIZE_TYPES: &[&str] = &["IMAGE", "TEXT", "NTEXT", "DATETIME", "BIT", "INT"];

pub(super) fn profile() -> DialectProfile {
    let mut p = DialectProfile::base(Vendor::SqlServer);

    p.range = RangeKind::Top;
    p.range_position = RangePosition::PostDistinct;

    p.capabilities.insert(Capability::SelectEndIndex);
    p.capabilities.insert(Capability::AutoAssign);
    p.capabilities.insert(Capability::ModOperator);
    p.capabilities.remove(&Capability::LockingWithDistinct);
    p.capabilities.remove(&Capability::LockingWithOuterJoin);
    p.capabilities.remove(&Capability::DeferredConstraints);

    p.quirks.allows_alias_in_bulk_clause = false;
    p.quirks.requires_alias_for_subselect = true;

    p.clauses.for_update = None;
    p.clauses.table_for_update = Some("WITH (UPDLOCK)".into());
    p.clauses.auto_assign = Some("IDENTITY".into());

    p.functions.concatenate = "({0}+{1})".into();
    p.functions.string_length = "LEN({0})".into();
    p.functions.index_of = "CHARINDEX({1}, {0})".into();
    p.functions.index_of_from = "CHARINDEX({1}, {0}, {2})".into();
    p.functions.current_date = "CAST(GETDATE() AS DATE)".into();
    p.functions.current_time = "CAST(GETDATE() AS TIME)".into();
    p.functions.current_timestamp = "GETDATE()".into();
    p.functions.boolean_style = BooleanStyle::Numeric;

    p.types.names.extend(
        [
            (TypeCode::Blob, "IMAGE"),
            (TypeCode::LongVarBinary, "IMAGE"),
            (TypeCode::Clob, "TEXT"),
            (TypeCode::LongVarChar, "TEXT"),
            (TypeCode::Boolean, "BIT"),
            (TypeCode::Double, "FLOAT(32)"),
            (TypeCode::Integer, "INT"),
            (TypeCode::Timestamp, "DATETIME"),
            (TypeCode::Date, "DATETIME"),
            (TypeCode::Time, "DATETIME"),
        ]
        .map(|(code, name)| (code, name.to_string())),
    );
    p.types.fixed_size = word_set(FIXED_SIZE_TYPES);

    p.naming.quote_style = QuoteStyle::Bracket;
    p.naming.reserved_words.extend(word_set(RESERVED_WORDS));

    p
}
