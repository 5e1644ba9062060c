//! Column type codes and dialect type names.
//!
//! [`TypeCode`] is the vendor-neutral type of a column (the JDBC type set).
//! [`TypeCatalog`] turns a code plus size hints into the type name a
//! particular dialect accepts in DDL and casts:
//!
//! ```ignore
//! use quarry::sql::dialect::Vendor;
//! use quarry::sql::types::{TypeCatalog, TypeCode};
//!
//! let oracle = TypeCatalog::new(Vendor::Oracle.profile());
//! assert_eq!(oracle.type_name_for(TypeCode::VarChar, 255, 0), "VARCHAR2(255)");
//! assert_eq!(oracle.type_name_for(TypeCode::Integer, 0, 0), "NUMBER");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::schema::Column;
use crate::sql::dialect::DialectProfile;

/// Abstract column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeCode {
    Array,
    BigInt,
    Binary,
    Bit,
    Blob,
    Boolean,
    Char,
    Clob,
    Date,
    Decimal,
    Distinct,
    Double,
    Float,
    Integer,
    JavaObject,
    LongVarBinary,
    LongVarChar,
    Null,
    Numeric,
    Other,
    Real,
    Ref,
    SmallInt,
    Struct,
    Time,
    Timestamp,
    TinyInt,
    VarBinary,
    VarChar,
}

impl TypeCode {
    pub const ALL: [TypeCode; 29] = [
        TypeCode::Array,
        TypeCode::BigInt,
        TypeCode::Binary,
        TypeCode::Bit,
        TypeCode::Blob,
        TypeCode::Boolean,
        TypeCode::Char,
        TypeCode::Clob,
        TypeCode::Date,
        TypeCode::Decimal,
        TypeCode::Distinct,
        TypeCode::Double,
        TypeCode::Float,
        TypeCode::Integer,
        TypeCode::JavaObject,
        TypeCode::LongVarBinary,
        TypeCode::LongVarChar,
        TypeCode::Null,
        TypeCode::Numeric,
        TypeCode::Other,
        TypeCode::Real,
        TypeCode::Ref,
        TypeCode::SmallInt,
        TypeCode::Struct,
        TypeCode::Time,
        TypeCode::Timestamp,
        TypeCode::TinyInt,
        TypeCode::VarBinary,
        TypeCode::VarChar,
    ];

    /// Generic type name used when a dialect does not override it.
    pub fn default_name(&self) -> &'static str {
        match self {
            TypeCode::Array => "ARRAY",
            TypeCode::BigInt => "BIGINT",
            TypeCode::Binary => "BINARY",
            TypeCode::Bit => "BIT",
            TypeCode::Blob => "BLOB",
            TypeCode::Boolean => "BOOLEAN",
            TypeCode::Char => "CHAR",
            TypeCode::Clob => "CLOB",
            TypeCode::Date => "DATE",
            TypeCode::Decimal => "DECIMAL",
            TypeCode::Distinct => "DISTINCT",
            TypeCode::Double => "DOUBLE",
            TypeCode::Float => "FLOAT",
            TypeCode::Integer => "INTEGER",
            TypeCode::JavaObject => "JAVA_OBJECT",
            TypeCode::LongVarBinary => "LONGVARBINARY",
            TypeCode::LongVarChar => "LONGVARCHAR",
            TypeCode::Null => "NULL",
            TypeCode::Numeric => "NUMERIC",
            TypeCode::Other => "OTHER",
            TypeCode::Real => "REAL",
            TypeCode::Ref => "REF",
            TypeCode::SmallInt => "SMALLINT",
            TypeCode::Struct => "STRUCT",
            TypeCode::Time => "TIME",
            TypeCode::Timestamp => "TIMESTAMP",
            TypeCode::TinyInt => "TINYINT",
            TypeCode::VarBinary => "VARBINARY",
            TypeCode::VarChar => "VARCHAR",
        }
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.default_name())
    }
}

impl FromStr for TypeCode {
    type Err = String;

    /// Parse a type code by its generic name, ignoring case and underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('_', "").to_ascii_uppercase();
        TypeCode::ALL
            .iter()
            .copied()
            .find(|code| code.default_name().replace('_', "") == wanted)
            .ok_or_else(|| format!("unknown type code: {}", s))
    }
}

/// Type-name lookup bound to one profile.
#[derive(Debug, Clone, Copy)]
pub struct TypeCatalog<'p> {
    profile: &'p DialectProfile,
}

impl<'p> TypeCatalog<'p> {
    pub fn new(profile: &'p DialectProfile) -> Self {
        Self { profile }
    }

    /// Dialect base name for a code, without any size clause.
    pub fn base_name(&self, code: TypeCode) -> &'p str {
        self.profile
            .types
            .names
            .get(&code)
            .map(String::as_str)
            .unwrap_or_else(|| code.default_name())
    }

    /// Column type: explicit override, then auto-assign type, then the code default.
    pub fn type_name(&self, column: &Column) -> String {
        let base = match (&column.type_name, &self.profile.types.auto_assign) {
            (Some(explicit), _) => explicit.as_str(),
            (None, Some(auto)) if column.auto_assigned => auto.as_str(),
            _ => self.base_name(column.type_code),
        };
        self.append_size(base, column.size, column.decimals)
    }

    pub fn type_name_for(&self, code: TypeCode, size: u32, decimals: u32) -> String {
        self.append_size(self.base_name(code), size, decimals)
    }

    /// Add a size clause to `type_name` unless it is fixed-size or already sized.
    pub fn append_size(&self, type_name: &str, size: u32, decimals: u32) -> String {
        if self
            .profile
            .types
            .fixed_size
            .contains(&type_name.to_ascii_uppercase())
            || type_name.contains('(')
        {
            return type_name.to_string();
        }

        let clause = match (size, decimals) {
            (0, _) => String::new(),
            (s, 0) => format!("({})", s),
            (s, d) => format!("({}, {})", s, d),
        };
        self.insert_size(type_name, &clause)
    }

    fn insert_size(&self, type_name: &str, clause: &str) -> String {
        if let Some(idx) = type_name.find("{0}") {
            if clause.is_empty() {
                return type_name[..idx].to_string();
            }
            return format!("{}{}{}", &type_name[..idx], clause, &type_name[idx + 3..]);
        }
        if clause.is_empty() {
            return type_name.to_string();
        }

        let upper = type_name.to_ascii_uppercase();
        let first_modifier = self
            .profile
            .types
            .modifiers
            .iter()
            .filter_map(|m| upper.find(m.as_str()))
            .min();

        match first_modifier {
            Some(idx) => format!(
                "{}{} {}",
                type_name[..idx].trim_end(),
                clause,
                &type_name[idx..]
            ),
            None => format!("{}{}", type_name, clause),
        }
    }
}
