use quarry::prelude::*;

fn orders() -> Table {
    Table::new("ORDERS")
        .with_column(Column::new("id", TypeCode::BigInt))
        .with_column(Column::new("cust_id", TypeCode::BigInt))
        .with_column(Column::new("status", TypeCode::VarChar))
        .with_primary_key(PrimaryKey::new(["id"]))
}

fn customers() -> Table {
    Table::new("CUSTOMERS")
        .with_column(Column::new("id", TypeCode::BigInt))
        .with_column(Column::new("name", TypeCode::VarChar))
        .with_primary_key(PrimaryKey::new(["id"]))
}

fn order_lines() -> Table {
    Table::new("ORDER_LINES")
        .with_column(Column::new("order_id", TypeCode::BigInt))
        .with_column(Column::new("line_no", TypeCode::Integer))
        .with_column(Column::new("qty", TypeCode::Integer))
        .with_primary_key(PrimaryKey::new(["order_id", "line_no"]))
}

#[test]
fn test_multi_table_delete_uses_pk_subselect() {
    let (o, c) = (orders(), customers());
    let fk = ForeignKey::new(["cust_id"], "CUSTOMERS", ["id"]);
    let mut q = QueryBuilder::new(Vendor::Generic.profile());
    q.from_table(ScopeId::ROOT, &o).unwrap();
    let (t1, _) = q
        .join(ScopeId::ROOT, &JoinPath::root(), &Relation::new("customer", &o, &fk, &c))
        .unwrap();
    q.where_(ScopeId::ROOT, col(t1, "name").eq("Ann")).unwrap();

    let stmt = bulk::compile(&BulkKind::Delete, &q, ScopeId::ROOT, &o)
        .unwrap()
        .unwrap();
    assert_eq!(
        stmt.sql,
        "DELETE FROM ORDERS WHERE id IN (SELECT DISTINCT t0.id FROM ORDERS t0 \
         INNER JOIN CUSTOMERS t1 ON t0.cust_id = t1.id WHERE t1.name = 'Ann')"
    );
    assert!(stmt.params.is_empty());
}

#[test]
fn test_composite_key_update_uses_exists() {
    let (lines, o) = (order_lines(), orders());
    let fk = ForeignKey::new(["order_id"], "ORDERS", ["id"]);
    let mut q = QueryBuilder::new(Vendor::Generic.profile());
    q.from_table(ScopeId::ROOT, &lines).unwrap();
    let (t1, _) = q
        .join(ScopeId::ROOT, &JoinPath::root(), &Relation::new("order", &lines, &fk, &o))
        .unwrap();
    q.where_(ScopeId::ROOT, col(t1, "status").eq("OPEN")).unwrap();

    let kind = BulkKind::Update(vec![("qty".into(), lit_int(0))]);
    let stmt = bulk::compile(&kind, &q, ScopeId::ROOT, &lines).unwrap().unwrap();
    assert_eq!(
        stmt.sql,
        "UPDATE ORDER_LINES SET qty = 0 WHERE EXISTS (SELECT 1 FROM ORDER_LINES t0 \
         INNER JOIN ORDERS t1 ON t0.order_id = t1.id WHERE t1.status = 'OPEN' \
         AND (t0.order_id = ORDER_LINES.order_id AND t0.line_no = ORDER_LINES.line_no))"
    );
}

#[test]
fn test_update_params_precede_subselect_params() {
    let o = orders();
    let mut q = QueryBuilder::new(Vendor::Postgres.profile());
    let t0 = q.from_table(ScopeId::ROOT, &o).unwrap();
    q.where_(ScopeId::ROOT, col(t0, "cust_id").eq(param("cust"))).unwrap();

    let kind = BulkKind::Update(vec![("status".into(), param("status"))]);
    let stmt = bulk::compile(&kind, &q, ScopeId::ROOT, &o).unwrap().unwrap();
    assert_eq!(
        stmt.sql,
        "UPDATE ORDERS SET status = ? WHERE id IN (SELECT DISTINCT t0.id FROM ORDERS t0 WHERE t0.cust_id = ?)"
    );
    assert_eq!(stmt.params, vec!["status".to_string(), "cust".to_string()]);
}

#[test]
fn test_target_without_primary_key_falls_back() {
    let c = customers();
    let audit = Table::new("AUDIT_LOG")
        .with_column(Column::new("cust_id", TypeCode::BigInt))
        .with_column(Column::new("note", TypeCode::VarChar));
    let fk = ForeignKey::new(["cust_id"], "CUSTOMERS", ["id"]);

    let mut q = QueryBuilder::new(Vendor::Generic.profile());
    q.from_table(ScopeId::ROOT, &audit).unwrap();
    let (t1, _) = q
        .join(ScopeId::ROOT, &JoinPath::root(), &Relation::new("customer", &audit, &fk, &c))
        .unwrap();
    q.where_(ScopeId::ROOT, col(t1, "name").eq("Ann")).unwrap();

    assert_eq!(
        bulk::compile(&BulkKind::Delete, &q, ScopeId::ROOT, &audit).unwrap(),
        None
    );
}

#[test]
fn test_missing_correlated_subselects_falls_back() {
    let (o, c) = (orders(), customers());
    let fk = ForeignKey::new(["cust_id"], "CUSTOMERS", ["id"]);
    let profile = Vendor::Generic
        .profile()
        .clone()
        .with_capability(Capability::CorrelatedSubselect, false);

    let mut q = QueryBuilder::new(&profile);
    q.from_table(ScopeId::ROOT, &o).unwrap();
    let (t1, _) = q
        .join(ScopeId::ROOT, &JoinPath::root(), &Relation::new("customer", &o, &fk, &c))
        .unwrap();
    q.where_(ScopeId::ROOT, col(t1, "name").eq("Ann")).unwrap();

    assert_eq!(bulk::compile(&BulkKind::Delete, &q, ScopeId::ROOT, &o).unwrap(), None);
}

#[test]
fn test_builder_is_left_untouched() {
    let (o, c) = (orders(), customers());
    let fk = ForeignKey::new(["cust_id"], "CUSTOMERS", ["id"]);
    let mut q = QueryBuilder::new(Vendor::Generic.profile());
    let t0 = q.from_table(ScopeId::ROOT, &o).unwrap();
    let (t1, _) = q
        .join(ScopeId::ROOT, &JoinPath::root(), &Relation::new("customer", &o, &fk, &c))
        .unwrap();
    q.select(ScopeId::ROOT, col(t0, "status")).unwrap();
    q.where_(ScopeId::ROOT, col(t1, "name").eq("Ann")).unwrap();

    let before = q.render(&LockRequest::none()).unwrap();
    bulk::compile(&BulkKind::Delete, &q, ScopeId::ROOT, &o).unwrap();
    assert_eq!(q.render(&LockRequest::none()).unwrap(), before);
}

#[test]
fn test_nested_scope_is_the_rewritten_select() {
    let (o, c) = (orders(), customers());
    let mut q = QueryBuilder::new(Vendor::Postgres.profile());
    let root = q.root();
    let t0 = q.from_table(root, &c).unwrap();
    q.select(root, col(t0, "id")).unwrap();

    let sub = q.subselect(root).unwrap();
    let t1 = q.from_table(sub, &o).unwrap();
    q.where_(sub, col(t1, "cust_id").eq(param("cust"))).unwrap();

    let stmt = bulk::compile(&BulkKind::Delete, &q, sub, &o).unwrap().unwrap();
    assert_eq!(
        stmt.sql,
        "DELETE FROM ORDERS WHERE id IN (SELECT DISTINCT t1.id FROM ORDERS t1 WHERE t1.cust_id = ?)"
    );
    assert_eq!(stmt.params, vec!["cust".to_string()]);
}
