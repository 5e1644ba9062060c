use quarry::prelude::*;
use quarry::sql::identifier::shorten;
use quarry::sql::{IdentifierValidator, NameKind, NameSet};

#[test]
fn test_shorten_to_oracle_limit() {
    assert_eq!(
        shorten("CUSTOMER_ACCOUNTS_ACCOUNT_NUMBER_SEQ", 30),
        "CUSTMR_CCOUNTS_CCOUNT_NUMBR_SQ"
    );
}

#[test]
fn test_postgres_name_limit() {
    let validator = IdentifierValidator::new(Vendor::Postgres.profile());
    let names = NameSet::new();

    let fits = "C".repeat(63);
    assert_eq!(validator.validate(&fits, NameKind::Table, &names, false).unwrap(), fits);

    let long = "C".repeat(64);
    let name = validator.validate(&long, NameKind::Table, &names, false).unwrap();
    assert_eq!(name.len(), 63);
}

#[test]
fn test_reserved_words_per_vendor() {
    let names = NameSet::new();
    let cases = [
        (Vendor::Generic, "LIMIT", "LIMIT"),
        (Vendor::Postgres, "LIMIT", "LIMIT0"),
        (Vendor::MySql, "rlike", "rlike0"),
        (Vendor::Oracle, "ROWNUM", "ROWNUM0"),
        (Vendor::SqlServer, "TOP", "TOP0"),
    ];

    for (vendor, raw, expected) in cases {
        let validator = IdentifierValidator::new(vendor.profile());
        assert_eq!(
            validator.validate(raw, NameKind::Column, &names, false).unwrap(),
            expected,
            "{}",
            vendor
        );
    }
}

#[test]
fn test_claim_keeps_names_unique() {
    let validator = IdentifierValidator::new(Vendor::Generic.profile());
    let mut names = NameSet::new();

    assert_eq!(validator.claim("STATUS", NameKind::Column, &mut names).unwrap(), "STATUS");
    assert_eq!(validator.claim("STATUS", NameKind::Column, &mut names).unwrap(), "STATU0");
    assert_eq!(validator.claim("status", NameKind::Column, &mut names).unwrap(), "statu1");
    assert!(names.contains("statu0"));
    assert_eq!(names.len(), 3);
}

#[test]
fn test_unchecked_validate_ignores_taken_names() {
    let validator = IdentifierValidator::new(Vendor::Generic.profile());
    let names: NameSet = ["STATUS"].into_iter().collect();
    assert_eq!(
        validator.validate("STATUS", NameKind::Column, &names, false).unwrap(),
        "STATUS"
    );
}

#[test]
fn test_user_constraint_name_too_long() {
    let validator = IdentifierValidator::new(Vendor::Db2.profile());
    assert!(validator.check_name_length("ORDERS_PK", NameKind::Constraint).is_ok());
    assert!(validator.check_name_length("ORDERS_CUSTOMERS_FK", NameKind::Table).is_ok());
    assert!(matches!(
        validator.check_name_length("ORDERS_CUSTOMERS_FK", NameKind::Constraint),
        Err(CompileError::NameTooLong { max: 18, .. })
    ));
}

fn orders_select(profile: &DialectProfile) -> String {
    let o = Table::new("ORDERS").with_column(Column::new("id", TypeCode::BigInt));
    let mut q = QueryBuilder::new(profile);
    let t0 = q.from_table(ScopeId::ROOT, &o).unwrap();
    q.select(ScopeId::ROOT, col(t0, "id")).unwrap();
    q.render(&LockRequest::none()).unwrap().sql
}

#[test]
fn test_delimited_identifiers() {
    assert_eq!(orders_select(Vendor::Postgres.profile()), "SELECT t0.id FROM ORDERS t0");

    let cases = [
        (Vendor::Postgres, "SELECT t0.\"id\" FROM \"ORDERS\" t0"),
        (Vendor::MySql, "SELECT t0.`id` FROM `ORDERS` t0"),
        (Vendor::SqlServer, "SELECT t0.[id] FROM [ORDERS] t0"),
    ];
    for (vendor, expected) in cases {
        let profile = vendor.profile().clone().with_delimited_identifiers(true);
        assert_eq!(orders_select(&profile), expected, "{}", vendor);
    }
}

#[test]
fn test_delimited_name_keeps_delimiters() {
    let validator = IdentifierValidator::new(Vendor::MySql.profile());
    let names: NameSet = ["`order`"].into_iter().collect();
    let name = validator.validate("`order`", NameKind::Table, &names, true).unwrap();
    assert_eq!(name, "`orde0`");
}
