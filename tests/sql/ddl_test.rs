use quarry::prelude::*;
use sqlparser::dialect::{GenericDialect, PostgreSqlDialect};
use sqlparser::parser::Parser;

fn accounts() -> Table {
    Table::new("ACCOUNTS")
        .with_column(Column::new("id", TypeCode::BigInt).not_null())
        .with_column(Column::new("balance", TypeCode::Decimal).size(12).decimals(2))
        .with_column(Column::new("holder", TypeCode::VarChar).size(40))
        .with_column(Column::new("opened", TypeCode::Timestamp))
        .with_primary_key(PrimaryKey::new(["id"]).named("ACCOUNTS_PK"))
}

fn orders() -> Table {
    Table::new("ORDERS")
        .with_column(Column::new("id", TypeCode::BigInt).not_null())
        .with_column(Column::new("cust_id", TypeCode::BigInt))
        .with_primary_key(PrimaryKey::new(["id"]))
}

#[test]
fn test_create_table_per_vendor() {
    let table = accounts();
    let expected = [
        (
            Vendor::Generic,
            "CREATE TABLE ACCOUNTS (id BIGINT NOT NULL, balance DECIMAL(12, 2), holder VARCHAR(40), \
             opened TIMESTAMP, CONSTRAINT ACCOUNTS_PK PRIMARY KEY (id))",
        ),
        (
            Vendor::Oracle,
            "CREATE TABLE ACCOUNTS (id NUMBER NOT NULL, balance NUMBER(12, 2), holder VARCHAR2(40), \
             opened TIMESTAMP, CONSTRAINT ACCOUNTS_PK PRIMARY KEY (id))",
        ),
        (
            Vendor::MySql,
            "CREATE TABLE ACCOUNTS (id BIGINT NOT NULL, balance DECIMAL(12, 2), holder VARCHAR(40), \
             opened DATETIME, PRIMARY KEY ACCOUNTS_PK (id))",
        ),
        (
            Vendor::SqlServer,
            "CREATE TABLE ACCOUNTS (id BIGINT NOT NULL, balance DECIMAL(12, 2), holder VARCHAR(40), \
             opened DATETIME, CONSTRAINT ACCOUNTS_PK PRIMARY KEY (id))",
        ),
    ];

    for (vendor, sql) in expected {
        let ddl = DdlCompiler::new(vendor.profile());
        assert_eq!(ddl.create_table(&table).unwrap(), vec![sql.to_string()], "{}", vendor);
    }
}

#[test]
fn test_created_tables_parse() {
    let table = accounts();
    let sql = DdlCompiler::new(Vendor::Postgres.profile())
        .create_table(&table)
        .unwrap()
        .remove(0);
    Parser::parse_sql(&PostgreSqlDialect {}, &sql).unwrap();

    let sql = DdlCompiler::new(Vendor::Generic.profile())
        .create_table(&table)
        .unwrap()
        .remove(0);
    Parser::parse_sql(&GenericDialect {}, &sql).unwrap();
}

#[test]
fn test_auto_assign_clauses() {
    let table = Table::new("ITEMS")
        .with_column(Column::new("id", TypeCode::BigInt).not_null().auto_assigned())
        .with_primary_key(PrimaryKey::new(["id"]));

    let sqlserver = DdlCompiler::new(Vendor::SqlServer.profile());
    assert_eq!(
        sqlserver.create_table(&table).unwrap(),
        vec!["CREATE TABLE ITEMS (id BIGINT NOT NULL IDENTITY, PRIMARY KEY (id))"]
    );

    // no auto-assign support: the column is declared plainly
    let generic = DdlCompiler::new(Vendor::Generic.profile());
    assert_eq!(
        generic.create_table(&table).unwrap(),
        vec!["CREATE TABLE ITEMS (id BIGINT NOT NULL, PRIMARY KEY (id))"]
    );
}

#[test]
fn test_mysql_type_modifiers() {
    let table = Table::new("STOCK").with_column(
        Column::new("qty", TypeCode::Integer)
            .type_name("INT UNSIGNED")
            .size(10)
            .not_null(),
    );
    let ddl = DdlCompiler::new(Vendor::MySql.profile());
    assert_eq!(
        ddl.create_table(&table).unwrap(),
        vec!["CREATE TABLE STOCK (qty INT(10) UNSIGNED NOT NULL)"]
    );
}

#[test]
fn test_db2_foreign_key_limits() {
    let ddl = DdlCompiler::new(Vendor::Db2.profile());

    let fk = ForeignKey::new(["cust_id"], "CUSTOMERS", ["id"])
        .named("ORD_CUST_FK")
        .on_delete(ReferentialAction::Cascade);
    assert_eq!(
        ddl.add_foreign_key(&orders(), &fk).unwrap(),
        vec!["ALTER TABLE ORDERS ADD CONSTRAINT ORD_CUST_FK FOREIGN KEY (cust_id) REFERENCES CUSTOMERS (id) ON DELETE CASCADE"]
    );

    let long = fk.clone().named("ORDERS_CUSTOMERS_FK");
    assert_eq!(
        ddl.add_foreign_key(&orders(), &long).unwrap_err(),
        CompileError::NameTooLong {
            name: "ORDERS_CUSTOMERS_FK".into(),
            length: 19,
            max: 18,
        }
    );

    let set_default = fk.on_delete(ReferentialAction::SetDefault);
    assert_eq!(
        ddl.add_foreign_key(&orders(), &set_default).unwrap_err(),
        CompileError::CapabilityUnsupported {
            capability: Capability::DefaultDeleteAction,
            dialect: "DB2".into(),
        }
    );
}

#[test]
fn test_restrict_is_the_default_action() {
    let fk = ForeignKey::new(["cust_id"], "CUSTOMERS", ["id"]);
    let ddl = DdlCompiler::new(Vendor::SqlServer.profile());
    assert_eq!(
        ddl.add_foreign_key(&orders(), &fk).unwrap(),
        vec!["ALTER TABLE ORDERS ADD FOREIGN KEY (cust_id) REFERENCES CUSTOMERS (id)"]
    );
}

#[test]
fn test_deferred_unique() {
    let unique = Unique::new(["cust_id"]).named("ORDERS_CUST_U").deferred();
    let table = orders().with_unique(unique.clone());

    let mysql = DdlCompiler::new(Vendor::MySql.profile());
    assert_eq!(
        mysql.create_table(&table).unwrap(),
        vec!["CREATE TABLE ORDERS (id BIGINT NOT NULL, cust_id BIGINT, PRIMARY KEY (id))"]
    );
    assert!(mysql.add_unique(&table, &unique).unwrap_err().is_unsupported());

    let postgres = DdlCompiler::new(Vendor::Postgres.profile());
    assert_eq!(
        postgres.add_unique(&table, &unique).unwrap(),
        vec!["ALTER TABLE ORDERS ADD CONSTRAINT ORDERS_CUST_U UNIQUE (cust_id) INITIALLY DEFERRED DEFERRABLE"]
    );
}

#[test]
fn test_primary_keys_can_be_left_out() {
    let mut quirks = Vendor::Generic.profile().quirks.clone();
    quirks.create_primary_keys = false;
    let profile = Vendor::Generic.profile().clone().with_quirks(quirks);
    let ddl = DdlCompiler::new(&profile);

    assert_eq!(
        ddl.create_table(&orders()).unwrap(),
        vec!["CREATE TABLE ORDERS (id BIGINT NOT NULL, cust_id BIGINT)"]
    );
    assert!(ddl.add_primary_key(&orders()).unwrap().is_empty());
}

#[test]
fn test_oracle_auto_assign_names_fit_limit() {
    let table = Table::new("CUSTOMER_ACCOUNTS");
    let column = Column::new("ACCOUNT_NUMBER", TypeCode::BigInt).auto_assigned();
    let ddl = DdlCompiler::new(Vendor::Oracle.profile());

    let (sequence, trigger) = ddl.auto_assign_names(&table, &column).unwrap();
    assert!(sequence.len() <= 30, "{}", sequence);
    assert!(trigger.ends_with("TRG"));
    assert_eq!(sequence.len(), trigger.len());
    assert_eq!(sequence[..sequence.len() - 3], trigger[..trigger.len() - 3]);
}

#[test]
fn test_schema_qualified_names() {
    let table = orders().with_schema("SALES");
    let ddl = DdlCompiler::new(Vendor::Postgres.profile());
    assert_eq!(ddl.drop_table(&table), vec!["DROP TABLE SALES.ORDERS"]);

    let mut sequence = Sequence::new("ORDER_SEQ");
    sequence.schema = Some("SALES".into());
    assert_eq!(
        ddl.create_sequence(&sequence).unwrap(),
        vec!["CREATE SEQUENCE SALES.ORDER_SEQ INCREMENT BY 1"]
    );
}
