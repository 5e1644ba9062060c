use quarry::prelude::*;

fn orders() -> Table {
    Table::new("ORDERS")
        .with_column(Column::new("id", TypeCode::BigInt))
        .with_column(Column::new("cust_id", TypeCode::BigInt))
        .with_column(Column::new("total", TypeCode::Decimal))
        .with_primary_key(PrimaryKey::new(["id"]))
}

fn ranged(profile: &DialectProfile, start: u64, end: Option<u64>) -> CompiledSelect {
    let o = orders();
    let mut q = QueryBuilder::new(profile);
    let t0 = q.from_table(ScopeId::ROOT, &o).unwrap();
    q.select(ScopeId::ROOT, col(t0, "id")).unwrap();
    q.set_range(ScopeId::ROOT, start, end).unwrap();
    q.render(&LockRequest::none()).unwrap()
}

#[test]
fn test_postgres_limit_offset() {
    assert_eq!(
        ranged(Vendor::Postgres.profile(), 20, Some(30)).sql,
        "SELECT t0.id FROM ORDERS t0 LIMIT 10 OFFSET 20"
    );
    assert_eq!(
        ranged(Vendor::Postgres.profile(), 20, None).sql,
        "SELECT t0.id FROM ORDERS t0 OFFSET 20"
    );
}

#[test]
fn test_mysql_start_and_count() {
    assert_eq!(
        ranged(Vendor::MySql.profile(), 5, Some(15)).sql,
        "SELECT t0.id FROM ORDERS t0 LIMIT 5, 10"
    );
    assert_eq!(
        ranged(Vendor::MySql.profile(), 5, None).sql,
        "SELECT t0.id FROM ORDERS t0 LIMIT 5, 18446744073709551615"
    );
}

#[test]
fn test_top_cannot_skip() {
    let compiled = ranged(Vendor::SqlServer.profile(), 5, Some(15));
    assert_eq!(compiled.sql, "SELECT TOP 15 t0.id FROM ORDERS t0");
    assert_eq!(compiled.skip_rows, 5);
    assert_eq!(compiled.max_rows, None);
}

#[test]
fn test_fetch_first_cannot_skip() {
    let compiled = ranged(Vendor::Db2.profile(), 5, Some(15));
    assert_eq!(compiled.sql, "SELECT t0.id FROM ORDERS t0 FETCH FIRST 15 ROWS ONLY");
    assert_eq!(compiled.skip_rows, 5);
}

#[test]
fn test_generic_range_is_post_processing() {
    let compiled = ranged(Vendor::Generic.profile(), 2, Some(7));
    assert_eq!(compiled.sql, "SELECT t0.id FROM ORDERS t0");
    assert_eq!(compiled.skip_rows, 2);
    assert_eq!(compiled.max_rows, Some(5));
}

#[test]
fn test_end_before_start_is_empty() {
    assert_eq!(
        ranged(Vendor::Postgres.profile(), 8, Some(3)).sql,
        "SELECT t0.id FROM ORDERS t0 LIMIT 0 OFFSET 8"
    );
}

#[test]
fn test_oracle_rownum_in_where() {
    let o = orders();
    let mut q = QueryBuilder::new(Vendor::Oracle.profile());
    let t0 = q.from_table(ScopeId::ROOT, &o).unwrap();
    q.select(ScopeId::ROOT, col(t0, "id")).unwrap();
    q.where_(ScopeId::ROOT, col(t0, "total").gt(0)).unwrap();
    q.set_range(ScopeId::ROOT, 0, Some(10)).unwrap();

    assert_eq!(
        q.render(&LockRequest::none()).unwrap().sql,
        "SELECT t0.id FROM ORDERS t0 WHERE t0.total > 0 AND ROWNUM <= 10"
    );
}

#[test]
fn test_oracle_double_nesting_for_distinct_ordered_offset() {
    let o = orders();
    let mut q = QueryBuilder::new(Vendor::Oracle.profile());
    let t0 = q.from_table(ScopeId::ROOT, &o).unwrap();
    q.select(ScopeId::ROOT, col(t0, "id")).unwrap();
    q.set_distinct(ScopeId::ROOT, true).unwrap();
    q.order_by(ScopeId::ROOT, col(t0, "id"), true, false).unwrap();
    q.set_range(ScopeId::ROOT, 2, Some(5)).unwrap();

    let compiled = q.render(&LockRequest::none()).unwrap();
    assert_eq!(
        compiled.sql,
        "SELECT * FROM (SELECT r.*, ROWNUM RNUM FROM \
         (SELECT DISTINCT t0.id FROM ORDERS t0 ORDER BY t0.id ASC) r WHERE ROWNUM <= 5) \
         WHERE RNUM > 2"
    );
    assert_eq!(compiled.skip_rows, 0);
    assert_eq!(compiled.max_rows, None);
}

#[test]
fn test_oracle_open_ended_offset() {
    assert_eq!(
        ranged(Vendor::Oracle.profile(), 4, None).sql,
        "SELECT * FROM (SELECT r.*, ROWNUM RNUM FROM (SELECT t0.id FROM ORDERS t0) r) WHERE RNUM > 4"
    );
}

#[test]
fn test_fetch_first_dropped_inside_subselect() {
    let o = orders();
    let c = Table::new("CUSTOMERS")
        .with_column(Column::new("id", TypeCode::BigInt))
        .with_primary_key(PrimaryKey::new(["id"]));

    let mut q = QueryBuilder::new(Vendor::Db2.profile());
    let root = q.root();
    let t0 = q.from_table(root, &c).unwrap();
    q.select(root, col(t0, "id")).unwrap();

    let sub = q.subselect(root).unwrap();
    let t1 = q.from_table(sub, &o).unwrap();
    q.select(sub, lit_int(1)).unwrap();
    q.where_(sub, col(t1, "cust_id").eq(col(t0, "id"))).unwrap();
    q.set_range(sub, 0, Some(1)).unwrap();
    q.where_(root, exists(sub)).unwrap();

    assert_eq!(
        q.render(&LockRequest::none()).unwrap().sql,
        "SELECT t0.id FROM CUSTOMERS t0 WHERE EXISTS (SELECT 1 FROM ORDERS t1 WHERE t1.cust_id = t0.id)"
    );
}

#[test]
fn test_count_of_ranged_select_wraps() {
    let o = orders();
    let mut q = QueryBuilder::new(Vendor::Postgres.profile());
    let t0 = q.from_table(ScopeId::ROOT, &o).unwrap();
    q.select(ScopeId::ROOT, col(t0, "id")).unwrap();
    q.set_range(ScopeId::ROOT, 20, Some(30)).unwrap();

    assert_eq!(
        q.render_count().unwrap().sql,
        "SELECT COUNT(*) FROM (SELECT t0.id FROM ORDERS t0 LIMIT 10 OFFSET 20) s"
    );
}

#[test]
fn test_oracle_rownum_nests_aggregate() {
    let o = orders();
    let mut q = QueryBuilder::new(Vendor::Oracle.profile());
    let t0 = q.from_table(ScopeId::ROOT, &o).unwrap();
    q.select(ScopeId::ROOT, count(col(t0, "id"))).unwrap();
    q.set_range(ScopeId::ROOT, 0, Some(1)).unwrap();

    assert_eq!(
        q.render(&LockRequest::none()).unwrap().sql,
        "SELECT * FROM (SELECT COUNT(t0.id) FROM ORDERS t0) WHERE ROWNUM <= 1"
    );
}

#[test]
fn test_oracle_rownum_nests_grouped() {
    let o = orders();
    let mut q = QueryBuilder::new(Vendor::Oracle.profile());
    let t0 = q.from_table(ScopeId::ROOT, &o).unwrap();
    q.select(ScopeId::ROOT, col(t0, "cust_id")).unwrap();
    q.group_by(ScopeId::ROOT, col(t0, "cust_id")).unwrap();
    q.set_range(ScopeId::ROOT, 0, Some(3)).unwrap();

    assert_eq!(
        q.render(&LockRequest::none()).unwrap().sql,
        "SELECT * FROM (SELECT t0.cust_id FROM ORDERS t0 GROUP BY t0.cust_id) WHERE ROWNUM <= 3"
    );
}
