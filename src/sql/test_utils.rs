//! Test utilities for SQL emission validation.
//!
//! Generated SQL is parsed with sqlparser-rs to catch malformed output.
//! sqlparser has no Oracle or DB2 dialect; those fall back to its generic
//! grammar, which accepts the constructs the compiler emits for them except
//! vendor-only syntax such as `(+)` markers and `ROWNUM` nesting.

use sqlparser::dialect::{Dialect, GenericDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect};
use sqlparser::parser::Parser;

use super::dialect::Vendor;

/// Parse `sql` with the grammar closest to `vendor`.
///
/// ```ignore
/// use crate::sql::dialect::Vendor;
/// use crate::sql::test_utils::validate_sql;
///
/// validate_sql("SELECT t0.id FROM ORDERS t0", Vendor::Postgres).unwrap();
/// ```
pub fn validate_sql(sql: &str, vendor: Vendor) -> Result<(), String> {
    let parser_dialect: Box<dyn Dialect> = match vendor {
        Vendor::Postgres => Box::new(PostgreSqlDialect {}),
        Vendor::MySql => Box::new(MySqlDialect {}),
        Vendor::SqlServer => Box::new(MsSqlDialect {}),
        Vendor::Generic | Vendor::Oracle | Vendor::Db2 => Box::new(GenericDialect {}),
    };

    Parser::parse_sql(&*parser_dialect, sql)
        .map(|_| ())
        .map_err(|e| format!("Invalid SQL for {}: {}\nSQL: {}", vendor.name(), e, sql))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_valid_sql() {
        validate_sql("SELECT t0.id FROM ORDERS t0", Vendor::Postgres).unwrap();
        validate_sql("SELECT t0.id FROM ORDERS t0 LIMIT 10", Vendor::MySql).unwrap();
        validate_sql("SELECT TOP 10 t0.id FROM ORDERS t0", Vendor::SqlServer).unwrap();
    }

    #[test]
    fn test_validate_invalid_sql() {
        assert!(validate_sql("SELEC * FORM ORDERS", Vendor::Generic).is_err());
    }
}
