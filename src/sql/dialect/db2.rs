//! IBM DB2 profile.
//!
//! DB2 differences from the generic profile:
//! - literal `FETCH FIRST n ROWS ONLY`, never inside sub-selects
//! - isolation-aware lock clauses (`WITH RR|RS|UR`, `USE AND KEEP ... LOCKS`)
//!   that depend on the server platform
//! - `BLOB(1M)` / `CLOB(1M)` large objects
//! - 18-character constraint names, 30-character column names
//! - no deferred constraints, `ON DELETE SET DEFAULT`, DROP COLUMN or nullable
//!   unique columns
//! - locking across joined tables only from 9.2 onwards

use serde::{Deserialize, Serialize};

use super::helpers::word_set;
use super::{Capability, DialectProfile, Vendor};
use crate::sql::lock::LockKind;
use crate::sql::range::RangeKind;
use crate::sql::types::TypeCode;

pub(crate) const FOR_UPDATE: &str = "FOR UPDATE";
pub(crate) const WITH_UR: &str = "WITH UR";
pub(crate) const WITH_RS: &str = "WITH RS";
pub(crate) const WITH_RR: &str = "WITH RR";
pub(crate) const USE_KEEP_UPDATE_LOCKS: &str = "USE AND KEEP UPDATE LOCKS";
pub(crate) const USE_KEEP_EXCLUSIVE_LOCKS: &str = "USE AND KEEP EXCLUSIVE LOCKS";
pub(crate) const FOR_READ_ONLY: &str = "FOR READ ONLY";

/// Lock clause used by DB2 9.2 and later.
pub(crate) const MODERN_FOR_UPDATE: &str = "WITH RR USE AND KEEP UPDATE LOCKS";

const RESERVED_WORDS: &[&str] = &[
    "AFTER", "ALIAS", "ALLOW", "APPLICATION", "ASSOCIATE", "ASUTIME", "AUDIT", "AUX",
    "AUXILIARY", "BEFORE", "BINARY", "BUFFERPOOL", "CACHE", "CALL", "CALLED", "CAPTURE",
    "CARDINALITY", "CCSID", "CLUSTER", "COLLECTION", "COLLID", "COMMENT", "CONCAT",
    "CONDITION", "CONTAINS", "COUNT_BIG", "CURRENT_LC_CTYPE", "CURRENT_PATH",
    "CURRENT_SERVER", "CURRENT_TIMEZONE", "CYCLE", "DATABASE", "DAYS", "DB2GENERAL",
    "DB2GENRL", "DB2SQL", "DBINFO", "DEFAULTS", "DEFINITION", "DETERMINISTIC", "DISALLOW",
    "DO", "DSNHATTR", "DSSIZE", "DYNAMIC", "EACH", "EDITPROC", "ELSEIF", "ENCODING",
    "END-EXEC1", "ERASE", "EXCLUDING", "EXIT", "FENCED", "FIELDPROC", "FILE", "FINAL", "FREE",
    "FUNCTION", "GENERAL", "GENERATED", "GRAPHIC", "HANDLER", "HOLD", "HOURS", "IF",
    "INCLUDING", "INCREMENT", "INDEX", "INHERIT", "INOUT", "INTEGRITY", "ISOBID", "ITERATE",
    "JAR", "JAVA", "LABEL", "LC_CTYPE", "LEAVE", "LINKTYPE", "LOCALE", "LOCATOR", "LOCATORS",
    "LOCK", "LOCKMAX", "LOCKSIZE", "LONG", "LOOP", "MAXVALUE", "MICROSECOND", "MICROSECONDS",
    "MINUTES", "MINVALUE", "MODE", "MODIFIES", "MONTHS", "NEW", "NEW_TABLE", "NOCACHE",
    "NOCYCLE", "NODENAME", "NODENUMBER", "NOMAXVALUE", "NOMINVALUE", "NOORDER", "NULLS",
    "NUMPARTS", "OBID", "OLD", "OLD_TABLE", "OPTIMIZATION", "OPTIMIZE", "OUT", "OVERRIDING",
    "PACKAGE", "PARAMETER", "PART", "PARTITION", "PATH", "PIECESIZE", "PLAN", "PRIQTY",
    "PROGRAM", "PSID", "QUERYNO", "READS", "RECOVERY", "REFERENCING", "RELEASE", "RENAME",
    "REPEAT", "RESET", "RESIGNAL", "RESTART", "RESULT", "RESULT_SET_LOCATOR", "RETURN",
    "RETURNS", "ROUTINE", "ROW", "RRN", "RUN", "SAVEPOINT", "SCRATCHPAD", "SECONDS", "SECQTY",
    "SECURITY", "SENSITIVE", "SIGNAL", "SIMPLE", "SOURCE", "SPECIFIC", "SQLID", "STANDARD",
    "START", "STATIC", "STAY", "STOGROUP", "STORES", "STYLE", "SUBPAGES", "SYNONYM", "SYSFUN",
    "SYSIBM", "SYSPROC", "SYSTEM", "TABLESPACE", "TRIGGER", "UNDO", "UNTIL", "VALIDPROC",
    "VARIABLE", "VARIANT", "VCAT", "VOLUMES", "WHILE", "WLM", "YEARS",
];

const FIXED_SIZE_TYPES: &[&str] = &["LONG VARCHAR FOR BIT DATA", "LONG VARCHAR", "LONG VARGRAPHIC"];

/// DB2 server family; decides which lock clauses are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Db2Platform {
    /// DB2 UDB 8.1 and earlier.
    UdbLegacy,
    /// DB2 UDB 8.2 and later (LUW).
    #[default]
    Udb,
    /// DB2 for z/OS 8 and later.
    ZOs,
    /// DB2 for iSeries V5R3 and earlier.
    ISeriesLegacy,
    /// DB2 for iSeries V5R4 and later.
    ISeries,
}

impl Db2Platform {
    /// Classify a server from its product name and parsed version.
    ///
    /// iSeries reports itself as `DB2 UDB for AS/400`; LUW servers report a
    /// `DB2/` product name or an `SQL` version string; anything else is z/OS.
    pub fn classify(product_name: &str, product_version: &str, major: u32, minor: u32) -> Self {
        let version = (major, minor);
        if product_name.contains("AS") {
            if version <= (5, 3) {
                Db2Platform::ISeriesLegacy
            } else {
                Db2Platform::ISeries
            }
        } else if product_version.contains("SQL") || product_name.contains("DB2/") {
            if version <= (8, 1) {
                Db2Platform::UdbLegacy
            } else {
                Db2Platform::Udb
            }
        } else {
            Db2Platform::ZOs
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Db2Platform::UdbLegacy | Db2Platform::ISeriesLegacy)
    }
}

pub(super) fn profile(platform: Db2Platform) -> DialectProfile {
    let mut p = DialectProfile::base(Vendor::Db2);

    p.range = RangeKind::FetchFirst;
    p.locking = LockKind::Db2(platform);

    p.capabilities.insert(Capability::SelectEndIndex);
    for cap in [
        Capability::DeferredConstraints,
        Capability::DefaultDeleteAction,
        Capability::AlterTableDropColumn,
        Capability::NullUniqueColumn,
        Capability::LockingWithMultipleTables,
        Capability::LockingWithInnerJoin,
        Capability::LockingWithOuterJoin,
    ] {
        p.capabilities.remove(&cap);
    }

    p.functions.index_of = "LOCATE({1}, {0})".into();
    p.functions.index_of_from = "LOCATE({1}, {0}, {2})".into();
    p.functions.boolean_style = super::BooleanStyle::Numeric;

    p.types.names.extend(
        [
            (TypeCode::Binary, "BLOB(1M)"),
            (TypeCode::LongVarBinary, "BLOB(1M)"),
            (TypeCode::VarBinary, "BLOB(1M)"),
            (TypeCode::Clob, "CLOB(1M)"),
            (TypeCode::LongVarChar, "LONG VARCHAR"),
        ]
        .map(|(code, name)| (code, name.to_string())),
    );
    p.types.fixed_size = word_set(FIXED_SIZE_TYPES);

    p.naming.max_constraint_name_length = 18;
    p.naming.max_index_name_length = 128;
    p.naming.max_column_name_length = 30;
    p.naming.reserved_words.extend(word_set(RESERVED_WORDS));

    p
}

/// Adjustments for a detected server version.
pub(super) fn versioned(mut p: DialectProfile, platform: Db2Platform, major: u32, minor: u32) -> DialectProfile {
    p.locking = LockKind::Db2(platform);

    if (major, minor) >= (9, 2) {
        p.capabilities.insert(Capability::LockingWithMultipleTables);
        p.capabilities.insert(Capability::LockingWithInnerJoin);
        p.capabilities.insert(Capability::LockingWithOuterJoin);
        p.clauses.for_update = Some(MODERN_FOR_UPDATE.into());
    }

    if platform == Db2Platform::ZOs && major == 8 {
        p.types.names.insert(TypeCode::BigInt, "DECIMAL(31,0)".into());
    }

    p
}
