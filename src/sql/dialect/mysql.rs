//! MySQL / MariaDB profile.
//!
//! MySQL differences from the generic profile:
//! - `LIMIT n` / `LIMIT start, n` pagination
//! - backtick identifier quoting
//! - `AUTO_INCREMENT` columns and `UNSIGNED` / `ZEROFILL` type modifiers
//! - `DELETE t0 FROM ...` multi-table deletes
//! - constraint names between keyword and column list

use super::helpers::word_set;
use super::{BooleanStyle, Capability, ConstraintNameMode, DialectProfile, QuoteStyle, Vendor};
use crate::sql::range::RangeKind;
use crate::sql::types::TypeCode;

const RESERVED_WORDS: &[&str] = &[
    "AUTO_INCREMENT", "BINARY", "BLOB", "CHANGE", "DATABASE", "DATABASES", "DELAYED",
    "ENCLOSED", "EXPLAIN", "FIELDS", "FULLTEXT", "HIGH_PRIORITY", "IGNORE", "INDEX", "INFILE",
    "KEYS", "KILL", "LIMIT", "LINES", "LOAD", "LOCK", "LONG", "LOW_PRIORITY", "MEDIUMINT",
    "OPTIMIZE", "OPTIONALLY", "OUTFILE", "REGEXP", "RENAME", "REPLACE", "RLIKE", "SHOW",
    "STRAIGHT_JOIN", "TERMINATED", "TEXT", "TINYINT", "UNLOCK", "UNSIGNED", "USE", "ZEROFILL",
];

const FIXED_SIZE_TYPES: &[&str] = &[
    "BOOLEAN", "DATETIME", "DATE", "TIMESTAMP", "TIME", "TEXT", "TINYTEXT", "MEDIUMTEXT",
    "LONGTEXT", "BLOB", "TINYBLOB", "MEDIUMBLOB", "LONGBLOB",
];

pub(super) fn profile() -> DialectProfile {
    let mut p = DialectProfile::base(Vendor::MySql);

    p.range = RangeKind::MySqlLimit;

    for cap in [
        Capability::SelectStartIndex,
        Capability::SelectEndIndex,
        Capability::AutoAssign,
        Capability::ModOperator,
    ] {
        p.capabilities.insert(cap);
    }
    p.capabilities.remove(&Capability::DeferredConstraints);

    p.quirks.requires_target_for_delete = true;
    p.quirks.requires_alias_for_subselect = true;

    p.clauses.auto_assign = Some("AUTO_INCREMENT".into());
    p.clauses.distinct_count_column_separator = Some(",".into());

    p.functions.concatenate = "CONCAT({0},{1})".into();
    p.functions.index_of = "LOCATE({1}, {0})".into();
    p.functions.index_of_from = "LOCATE({1}, {0}, {2})".into();
    p.functions.boolean_style = BooleanStyle::Numeric;

    p.types.names.extend(
        [
            (TypeCode::Bit, "BIT"),
            (TypeCode::Boolean, "BIT"),
            (TypeCode::Clob, "TEXT"),
            (TypeCode::LongVarChar, "TEXT"),
            (TypeCode::LongVarBinary, "LONGBLOB"),
            (TypeCode::Timestamp, "DATETIME"),
            (TypeCode::Double, "DOUBLE"),
        ]
        .map(|(code, name)| (code, name.to_string())),
    );
    p.types.fixed_size = word_set(FIXED_SIZE_TYPES);
    p.types.modifiers = word_set(&["UNSIGNED", "ZEROFILL"]);

    p.naming.max_table_name_length = 64;
    p.naming.max_column_name_length = 64;
    p.naming.max_constraint_name_length = 64;
    p.naming.max_index_name_length = 64;
    p.naming.max_sequence_name_length = 64;
    p.naming.max_auto_assign_name_length = 64;
    p.naming.constraint_name_mode = ConstraintNameMode::Mid;
    p.naming.quote_style = QuoteStyle::Backtick;
    p.naming.reserved_words.extend(word_set(RESERVED_WORDS));

    p
}
