//! Full compilation of the same select against every vendor profile.

use quarry::prelude::*;

fn orders() -> Table {
    Table::new("ORDERS")
        .with_column(Column::new("id", TypeCode::BigInt).not_null())
        .with_column(Column::new("cust_id", TypeCode::BigInt))
        .with_column(Column::new("total", TypeCode::Decimal).size(10).decimals(2))
        .with_primary_key(PrimaryKey::new(["id"]))
}

fn customers() -> Table {
    Table::new("CUSTOMERS")
        .with_column(Column::new("id", TypeCode::BigInt).not_null())
        .with_column(Column::new("name", TypeCode::VarChar).size(40))
        .with_primary_key(PrimaryKey::new(["id"]))
}

fn customer_fk() -> ForeignKey {
    ForeignKey::new(["cust_id"], "CUSTOMERS", ["id"])
}

/// Orders of customer 'Ann', by id, first ten rows.
fn compile(profile: &DialectProfile) -> CompiledSelect {
    let (o, c, fk) = (orders(), customers(), customer_fk());
    let mut q = QueryBuilder::new(profile);
    let root = q.root();

    let t0 = q.from_table(root, &o).unwrap();
    let (t1, _) = q
        .join(root, &JoinPath::root(), &Relation::new("customer", &o, &fk, &c))
        .unwrap();
    q.select_identifier(root, col(t0, "id")).unwrap();
    q.where_(root, col(t1, "name").eq("Ann")).unwrap();
    q.order_by(root, col(t0, "id"), true, false).unwrap();
    q.set_range(root, 0, Some(10)).unwrap();

    q.render(&LockRequest::none()).unwrap()
}

const SQL92_BODY: &str = "FROM ORDERS t0 INNER JOIN CUSTOMERS t1 ON t0.cust_id = t1.id \
                          WHERE t1.name = 'Ann' ORDER BY t0.id ASC";

#[test]
fn test_generic_leaves_range_to_caller() {
    let compiled = compile(Vendor::Generic.profile());
    assert_eq!(compiled.sql, format!("SELECT t0.id {}", SQL92_BODY));
    assert_eq!(compiled.skip_rows, 0);
    assert_eq!(compiled.max_rows, Some(10));
}

#[test]
fn test_postgres_limit() {
    let compiled = compile(Vendor::Postgres.profile());
    assert_eq!(compiled.sql, format!("SELECT t0.id {} LIMIT 10", SQL92_BODY));
    assert_eq!(compiled.max_rows, None);
}

#[test]
fn test_mysql_limit() {
    let compiled = compile(Vendor::MySql.profile());
    assert_eq!(compiled.sql, format!("SELECT t0.id {} LIMIT 10", SQL92_BODY));
}

#[test]
fn test_sqlserver_top() {
    let compiled = compile(Vendor::SqlServer.profile());
    assert_eq!(compiled.sql, format!("SELECT TOP 10 t0.id {}", SQL92_BODY));
}

#[test]
fn test_db2_fetch_first() {
    let compiled = compile(Vendor::Db2.profile());
    assert_eq!(
        compiled.sql,
        format!("SELECT t0.id {} FETCH FIRST 10 ROWS ONLY", SQL92_BODY)
    );
}

#[test]
fn test_oracle_native_joins_and_rownum() {
    let compiled = compile(Vendor::Oracle.profile());
    assert_eq!(
        compiled.sql,
        "SELECT * FROM (SELECT t0.id AS c0 FROM ORDERS t0, CUSTOMERS t1 \
         WHERE t1.name = 'Ann' AND t0.cust_id = t1.id ORDER BY t0.id ASC) WHERE ROWNUM <= 10"
    );
}

#[test]
fn test_output_columns() {
    let compiled = compile(Vendor::Postgres.profile());
    assert_eq!(compiled.columns.len(), 1);
    let column = &compiled.columns[0];
    assert_eq!(column.index, 1);
    assert!(column.identifier);
    assert_eq!(column.label, None);
}

#[test]
fn test_detected_profile_compiles_like_vendor_default() {
    let probe = VendorProbe::new("PostgreSQL").with_version("15.4");
    let detected = DialectProfile::detect(&probe);
    assert_eq!(compile(&detected), compile(Vendor::Postgres.profile()));
}

#[test]
fn test_parameters_in_placeholder_order() {
    let (o, c, fk) = (orders(), customers(), customer_fk());
    let mut q = QueryBuilder::new(Vendor::Generic.profile());
    let root = q.root();
    let t0 = q.from_table(root, &o).unwrap();
    let (t1, _) = q
        .join(root, &JoinPath::root(), &Relation::new("customer", &o, &fk, &c))
        .unwrap();
    q.select(root, col(t0, "id")).unwrap();
    q.where_(root, col(t1, "name").eq(param("name"))).unwrap();
    q.where_(root, col(t0, "total").gt(param("min_total"))).unwrap();

    let compiled = q.render(&LockRequest::none()).unwrap();
    assert_eq!(
        compiled.sql,
        "SELECT t0.id FROM ORDERS t0 INNER JOIN CUSTOMERS t1 ON t0.cust_id = t1.id \
         WHERE t1.name = ? AND t0.total > ?"
    );
    assert_eq!(compiled.params, vec!["name".to_string(), "min_total".to_string()]);
}

#[test]
fn test_grouped_count_with_having() {
    let o = orders();
    let mut q = QueryBuilder::new(Vendor::Postgres.profile());
    let root = q.root();
    let t0 = q.from_table(root, &o).unwrap();
    q.select(root, col(t0, "cust_id")).unwrap();
    q.select(root, count(col(t0, "id"))).unwrap();
    q.group_by(root, col(t0, "cust_id")).unwrap();
    q.having(root, count(col(t0, "id")).gt(5)).unwrap();

    let sql = q.render(&LockRequest::none()).unwrap().sql;
    assert_eq!(
        sql,
        "SELECT t0.cust_id, COUNT(t0.id) FROM ORDERS t0 GROUP BY t0.cust_id HAVING COUNT(t0.id) > 5"
    );
}

#[test]
fn test_non_finite_float_is_an_error() {
    let o = orders();
    let mut q = QueryBuilder::new(Vendor::Generic.profile());
    let t0 = q.from_table(ScopeId::ROOT, &o).unwrap();
    q.select(ScopeId::ROOT, col(t0, "id")).unwrap();
    q.where_(ScopeId::ROOT, col(t0, "id").gt(lit_float(f64::NAN))).unwrap();

    assert!(matches!(
        q.render(&LockRequest::none()),
        Err(CompileError::NonFiniteLiteral { .. })
    ));
}
