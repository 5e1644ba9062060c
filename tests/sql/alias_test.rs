use quarry::prelude::*;

fn orders() -> Table {
    Table::new("ORDERS")
        .with_column(Column::new("id", TypeCode::BigInt))
        .with_column(Column::new("cust_id", TypeCode::BigInt))
        .with_column(Column::new("bill_id", TypeCode::BigInt))
        .with_primary_key(PrimaryKey::new(["id"]))
}

fn customers() -> Table {
    Table::new("CUSTOMERS")
        .with_column(Column::new("id", TypeCode::BigInt))
        .with_column(Column::new("name", TypeCode::VarChar))
        .with_primary_key(PrimaryKey::new(["id"]))
}

#[test]
fn test_repeated_path_joins_once() {
    let (o, c) = (orders(), customers());
    let fk = ForeignKey::new(["cust_id"], "CUSTOMERS", ["id"]);
    let mut q = QueryBuilder::new(Vendor::Generic.profile());
    let root = q.root();
    let t0 = q.from_table(root, &o).unwrap();

    let relation = Relation::new("customer", &o, &fk, &c);
    let (first, path) = q.join(root, &JoinPath::root(), &relation).unwrap();
    let (second, _) = q.join(root, &JoinPath::root(), &relation).unwrap();
    assert_eq!(first, second);
    assert_eq!(path.to_string(), "customer");
    assert_eq!(q.alias_at(root, &c, &path).unwrap(), first);

    q.select(root, col(t0, "id")).unwrap();
    q.where_(root, col(first, "name").eq("Ann")).unwrap();
    assert_eq!(
        q.render(&LockRequest::none()).unwrap().sql,
        "SELECT t0.id FROM ORDERS t0 INNER JOIN CUSTOMERS t1 ON t0.cust_id = t1.id WHERE t1.name = 'Ann'"
    );
}

#[test]
fn test_distinct_paths_get_distinct_aliases() {
    let (o, c) = (orders(), customers());
    let cust_fk = ForeignKey::new(["cust_id"], "CUSTOMERS", ["id"]);
    let bill_fk = ForeignKey::new(["bill_id"], "CUSTOMERS", ["id"]);
    let mut q = QueryBuilder::new(Vendor::Generic.profile());
    let root = q.root();
    let t0 = q.from_table(root, &o).unwrap();

    let (customer, _) = q
        .join(root, &JoinPath::root(), &Relation::new("customer", &o, &cust_fk, &c))
        .unwrap();
    let (billed_to, _) = q
        .join(root, &JoinPath::root(), &Relation::new("billedTo", &o, &bill_fk, &c))
        .unwrap();
    assert_eq!(customer, Alias(1));
    assert_eq!(billed_to, Alias(2));

    q.select(root, col(t0, "id")).unwrap();
    assert_eq!(
        q.render(&LockRequest::none()).unwrap().sql,
        "SELECT t0.id FROM ORDERS t0 INNER JOIN CUSTOMERS t1 ON t0.cust_id = t1.id \
         INNER JOIN CUSTOMERS t2 ON t0.bill_id = t2.id"
    );
}

#[test]
fn test_empty_path_finds_joined_table() {
    let (o, c) = (orders(), customers());
    let fk = ForeignKey::new(["cust_id"], "CUSTOMERS", ["id"]);
    let mut q = QueryBuilder::new(Vendor::Generic.profile());
    let root = q.root();
    q.from_table(root, &o).unwrap();
    let (t1, _) = q
        .join(root, &JoinPath::root(), &Relation::new("customer", &o, &fk, &c))
        .unwrap();
    assert_eq!(q.from_table(root, &c).unwrap(), t1);
    assert_eq!(q.table_count(root).unwrap(), 2);
}

#[test]
fn test_subselect_aliases_continue_numbering() {
    let o = orders();
    let mut q = QueryBuilder::new(Vendor::Generic.profile());
    let root = q.root();
    let t0 = q.from_table(root, &o).unwrap();
    q.select(root, col(t0, "id")).unwrap();

    let sub = q.subselect(root).unwrap();
    let t1 = q.from_table(sub, &o).unwrap();
    assert_eq!(t1, Alias(1));
    q.select(sub, lit_int(1)).unwrap();
    q.where_(sub, col(t1, "cust_id").eq(col(t0, "cust_id"))).unwrap();
    q.where_(sub, col(t1, "id").gt(col(t0, "id"))).unwrap();
    q.where_(root, not_exists(sub)).unwrap();

    assert_eq!(
        q.render(&LockRequest::none()).unwrap().sql,
        "SELECT t0.id FROM ORDERS t0 WHERE NOT EXISTS \
         (SELECT 1 FROM ORDERS t1 WHERE t1.cust_id = t0.cust_id AND t1.id > t0.id)"
    );
}

#[test]
fn test_subselect_joins_use_traditional_syntax() {
    let (o, c) = (orders(), customers());
    let fk = ForeignKey::new(["cust_id"], "CUSTOMERS", ["id"]);
    let mut q = QueryBuilder::new(Vendor::Postgres.profile());
    let root = q.root();
    let t0 = q.from_table(root, &c).unwrap();
    q.select(root, col(t0, "id")).unwrap();

    let sub = q.subselect(root).unwrap();
    q.from_table(sub, &o).unwrap();
    let (t2, _) = q
        .join(sub, &JoinPath::root(), &Relation::new("customer", &o, &fk, &c))
        .unwrap();
    q.select(sub, lit_int(1)).unwrap();
    q.where_(sub, col(t2, "name").eq("Ann")).unwrap();
    q.where_(root, exists(sub)).unwrap();

    assert_eq!(
        q.render(&LockRequest::none()).unwrap().sql,
        "SELECT t0.id FROM CUSTOMERS t0 WHERE EXISTS \
         (SELECT 1 FROM ORDERS t1, CUSTOMERS t2 WHERE t2.name = 'Ann' AND t1.cust_id = t2.id)"
    );
}

#[test]
fn test_oracle_native_outer_join() {
    let (o, c) = (orders(), customers());
    let fk = ForeignKey::new(["cust_id"], "CUSTOMERS", ["id"]);
    let mut q = QueryBuilder::new(Vendor::Oracle.profile());
    let root = q.root();
    let t0 = q.from_table(root, &o).unwrap();
    q.outer_join(root, &JoinPath::root(), &Relation::new("customer", &o, &fk, &c))
        .unwrap();
    q.select(root, col(t0, "id")).unwrap();

    assert_eq!(
        q.render(&LockRequest::none()).unwrap().sql,
        "SELECT t0.id FROM ORDERS t0, CUSTOMERS t1 WHERE t0.cust_id = t1.id(+)"
    );
}

#[test]
fn test_inverse_relation_predicate() {
    let (o, c) = (orders(), customers());
    let fk = ForeignKey::new(["cust_id"], "CUSTOMERS", ["id"]);
    let mut q = QueryBuilder::new(Vendor::Generic.profile());
    let root = q.root();
    let t0 = q.from_table(root, &c).unwrap();
    q.outer_join(root, &JoinPath::root(), &Relation::new("orders", &c, &fk, &o).inverse())
        .unwrap();
    q.select(root, col(t0, "name")).unwrap();

    assert_eq!(
        q.render(&LockRequest::none()).unwrap().sql,
        "SELECT t0.name FROM CUSTOMERS t0 LEFT OUTER JOIN ORDERS t1 ON t0.id = t1.cust_id"
    );
}

#[test]
fn test_cross_join_to_variable_is_distinct() {
    let (o, c) = (orders(), customers());
    let mut q = QueryBuilder::new(Vendor::Generic.profile());
    let root = q.root();
    let t0 = q.from_table(root, &o).unwrap();
    let (other, path) = q.cross_join(root, &o, &JoinPath::root(), &c, "c").unwrap();
    assert_eq!(path.to_string(), ":c");

    q.select(root, col(t0, "id")).unwrap();
    q.where_(root, col(other, "id").eq(col(t0, "cust_id"))).unwrap();
    assert!(q.is_distinct(root));
    assert_eq!(
        q.render(&LockRequest::none()).unwrap().sql,
        "SELECT DISTINCT t0.id FROM ORDERS t0 CROSS JOIN CUSTOMERS t1 WHERE t1.id = t0.cust_id"
    );
}

fn addresses() -> Table {
    Table::new("ADDRESSES")
        .with_column(Column::new("id", TypeCode::BigInt))
        .with_column(Column::new("cust_id", TypeCode::BigInt))
        .with_primary_key(PrimaryKey::new(["id"]))
}

#[test]
fn test_outer_join_closing_cycle_extends_on_clause() {
    let (o, c, a) = (orders(), customers(), addresses());
    let cust_fk = ForeignKey::new(["cust_id"], "CUSTOMERS", ["id"]);
    let addr_fk = ForeignKey::new(["bill_id"], "ADDRESSES", ["id"]);
    let home_fk = ForeignKey::new(["cust_id"], "CUSTOMERS", ["id"]);
    let mut q = QueryBuilder::new(Vendor::Generic.profile());
    let root = q.root();
    let t0 = q.from_table(root, &o).unwrap();
    q.join(root, &JoinPath::root(), &Relation::new("customer", &o, &cust_fk, &c))
        .unwrap();
    q.outer_join(root, &JoinPath::root(), &Relation::new("address", &o, &addr_fk, &a))
        .unwrap();
    // CUSTOMERS resolves to t1 and "address" to t2, closing the cycle
    q.outer_join(root, &JoinPath::root(), &Relation::new("address", &c, &home_fk, &a).inverse())
        .unwrap();
    q.select(root, col(t0, "id")).unwrap();

    assert_eq!(
        q.render(&LockRequest::none()).unwrap().sql,
        "SELECT t0.id FROM ORDERS t0 INNER JOIN CUSTOMERS t1 ON t0.cust_id = t1.id \
         LEFT OUTER JOIN ADDRESSES t2 ON t0.bill_id = t2.id AND t1.id = t2.cust_id"
    );
}

#[test]
fn test_outer_cycle_onto_earlier_table_filters_in_where() {
    let (o, c, a) = (orders(), customers(), addresses());
    let cust_fk = ForeignKey::new(["cust_id"], "CUSTOMERS", ["id"]);
    let addr_fk = ForeignKey::new(["bill_id"], "ADDRESSES", ["id"]);
    let owner_fk = ForeignKey::new(["cust_id"], "CUSTOMERS", ["id"]);
    let mut q = QueryBuilder::new(Vendor::Generic.profile());
    let root = q.root();
    let t0 = q.from_table(root, &o).unwrap();
    q.join(root, &JoinPath::root(), &Relation::new("customer", &o, &cust_fk, &c))
        .unwrap();
    q.outer_join(root, &JoinPath::root(), &Relation::new("address", &o, &addr_fk, &a))
        .unwrap();
    // the optional side CUSTOMERS t1 is already joined ahead of ADDRESSES t2
    q.outer_join(root, &JoinPath::root(), &Relation::new("customer", &a, &owner_fk, &c))
        .unwrap();
    q.select(root, col(t0, "id")).unwrap();

    assert_eq!(
        q.render(&LockRequest::none()).unwrap().sql,
        "SELECT t0.id FROM ORDERS t0 INNER JOIN CUSTOMERS t1 ON t0.cust_id = t1.id \
         LEFT OUTER JOIN ADDRESSES t2 ON t0.bill_id = t2.id WHERE t2.cust_id = t1.id"
    );
}
