//! Oracle profile.
//!
//! Oracle differences from the generic profile:
//! - native join syntax with `(+)` outer-join markers
//! - ROWNUM-based pagination, nested when ordering, deduplicating or offsetting
//! - `NUMBER` / `VARCHAR2` type family, `LENGTH`, `SUBSTR` and `INSTR`
//! - numeric booleans
//! - 30-character identifiers
//! - optional auto-assign emulation through sequences and triggers

use super::helpers::word_set;
use super::{BooleanStyle, Capability, DialectProfile, JoinSyntax, Vendor};
use crate::sql::range::RangeKind;
use crate::sql::types::TypeCode;

const RESERVED_WORDS: &[&str] = &[
    "ACCESS", "AUDIT", "CLUSTER", "COMMENT", "COMPRESS", "EXCLUSIVE", "FILE", "IDENTIFIED",
    "INCREMENT", "INDEX", "INITIAL", "LOCK", "LONG", "MAXEXTENTS", "MINUS", "MODE", "NOAUDIT",
    "NOCOMPRESS", "NOWAIT", "OFFLINE", "ONLINE", "PCTFREE", "ROW", "ROWNUM",
];

const FIXED_SIZE_TYPES: &[&str] = &["LONG RAW", "RAW", "LONG", "REF"];

pub(super) fn profile() -> DialectProfile {
    let mut p = DialectProfile::base(Vendor::Oracle);

    p.join_syntax = JoinSyntax::Native;
    p.range = RangeKind::RowNum;

    p.capabilities.insert(Capability::SelectStartIndex);
    p.capabilities.insert(Capability::SelectEndIndex);
    p.capabilities.insert(Capability::NativeOuterJoin);
    p.capabilities.remove(&Capability::LockingWithDistinct);

    p.clauses.native_outer_join_marker = Some("(+)".into());

    p.functions.string_length = "LENGTH({0})".into();
    p.functions.substring = "SUBSTR".into();
    p.functions.index_of = "INSTR({0}, {1})".into();
    p.functions.index_of_from = "INSTR({0}, {1}, {2})".into();
    p.functions.boolean_style = BooleanStyle::Numeric;

    let number = [
        TypeCode::BigInt,
        TypeCode::Bit,
        TypeCode::Decimal,
        TypeCode::Double,
        TypeCode::Integer,
        TypeCode::Numeric,
        TypeCode::SmallInt,
        TypeCode::TinyInt,
    ];
    for code in number {
        p.types.names.insert(code, "NUMBER{0}".into());
    }
    p.types.names.extend(
        [
            (TypeCode::LongVarChar, "LONG"),
            (TypeCode::Binary, "BLOB"),
            (TypeCode::VarBinary, "BLOB"),
            (TypeCode::LongVarBinary, "BLOB"),
            (TypeCode::Time, "DATE"),
            (TypeCode::VarChar, "VARCHAR2{0}"),
        ]
        .map(|(code, name)| (code, name.to_string())),
    );
    p.types.fixed_size = word_set(FIXED_SIZE_TYPES);

    p.naming.max_table_name_length = 30;
    p.naming.max_column_name_length = 30;
    p.naming.max_constraint_name_length = 30;
    p.naming.max_index_name_length = 30;
    p.naming.max_sequence_name_length = 30;
    p.naming.max_auto_assign_name_length = 30;
    p.naming.reserved_words.extend(word_set(RESERVED_WORDS));

    p
}

/// Adjustments for Oracle 8 and earlier.
pub(super) fn legacy(mut p: DialectProfile) -> DialectProfile {
    p.join_syntax = JoinSyntax::Native;
    p.types.names.insert(TypeCode::Date, "DATE".into());
    p.types.names.insert(TypeCode::Timestamp, "DATE".into());
    p
}
