use quarry::prelude::*;

fn orders() -> Table {
    Table::new("ORDERS")
        .with_column(Column::new("id", TypeCode::BigInt))
        .with_column(Column::new("cust_id", TypeCode::BigInt))
        .with_primary_key(PrimaryKey::new(["id"]))
}

fn customers() -> Table {
    Table::new("CUSTOMERS")
        .with_column(Column::new("id", TypeCode::BigInt))
        .with_primary_key(PrimaryKey::new(["id"]))
}

fn render(profile: &DialectProfile, lock: &LockRequest) -> CompileResult<String> {
    let o = orders();
    let mut q = QueryBuilder::new(profile);
    let t0 = q.from_table(ScopeId::ROOT, &o)?;
    q.select(ScopeId::ROOT, col(t0, "id"))?;
    Ok(q.render(lock)?.sql)
}

#[test]
fn test_standard_for_update() {
    assert_eq!(
        render(Vendor::Generic.profile(), &LockRequest::for_update()).unwrap(),
        "SELECT t0.id FROM ORDERS t0 FOR UPDATE"
    );
    assert_eq!(
        render(Vendor::Generic.profile(), &LockRequest::none()).unwrap(),
        "SELECT t0.id FROM ORDERS t0"
    );
}

#[test]
fn test_standard_ignores_isolation() {
    let lock = LockRequest::for_update().with_isolation(IsolationLevel::Serializable);
    assert_eq!(
        render(Vendor::Oracle.profile(), &lock).unwrap(),
        "SELECT t0.id FROM ORDERS t0 FOR UPDATE"
    );
}

#[test]
fn test_sqlserver_table_hint() {
    assert_eq!(
        render(Vendor::SqlServer.profile(), &LockRequest::for_update()).unwrap(),
        "SELECT t0.id FROM ORDERS t0 WITH (UPDLOCK)"
    );
}

#[test]
fn test_postgres_limit_after_lock() {
    let o = orders();
    let mut q = QueryBuilder::new(Vendor::Postgres.profile());
    let t0 = q.from_table(ScopeId::ROOT, &o).unwrap();
    q.select(ScopeId::ROOT, col(t0, "id")).unwrap();
    q.set_range(ScopeId::ROOT, 0, Some(10)).unwrap();

    assert_eq!(
        q.render(&LockRequest::for_update()).unwrap().sql,
        "SELECT t0.id FROM ORDERS t0 FOR UPDATE LIMIT 10"
    );
}

#[test]
fn test_db2_isolation_clauses() {
    let db2 = Vendor::Db2.profile();
    assert_eq!(
        render(db2, &LockRequest::for_update()).unwrap(),
        "SELECT t0.id FROM ORDERS t0 FOR READ ONLY WITH RS USE AND KEEP UPDATE LOCKS"
    );
    assert_eq!(
        render(db2, &LockRequest::for_update().pessimistic_write()).unwrap(),
        "SELECT t0.id FROM ORDERS t0 FOR READ ONLY WITH RR USE AND KEEP UPDATE LOCKS"
    );
    assert_eq!(
        render(db2, &LockRequest::none().with_isolation(IsolationLevel::ReadUncommitted)).unwrap(),
        "SELECT t0.id FROM ORDERS t0 FOR READ ONLY WITH UR"
    );
    assert_eq!(
        render(db2, &LockRequest::none().with_isolation(IsolationLevel::ReadCommitted)).unwrap(),
        "SELECT t0.id FROM ORDERS t0"
    );
}

#[test]
fn test_db2_iseries_exclusive_locks() {
    let probe = VendorProbe::new("DB2 UDB for AS/400").with_version("V5R4M0");
    let profile = DialectProfile::detect(&probe);
    assert_eq!(
        render(&profile, &LockRequest::for_update()).unwrap(),
        "SELECT t0.id FROM ORDERS t0 FOR READ ONLY WITH RS USE AND KEEP EXCLUSIVE LOCKS"
    );
}

#[test]
fn test_simulated_locking_emits_nothing() {
    let mut quirks = Vendor::Generic.profile().quirks.clone();
    quirks.simulate_locking = true;
    let profile = Vendor::Generic.profile().clone().with_quirks(quirks);
    assert_eq!(
        render(&profile, &LockRequest::for_update()).unwrap(),
        "SELECT t0.id FROM ORDERS t0"
    );
}

#[test]
fn test_locking_aggregate_is_unsupported() {
    let o = orders();
    let mut q = QueryBuilder::new(Vendor::Postgres.profile());
    let t0 = q.from_table(ScopeId::ROOT, &o).unwrap();
    q.select(ScopeId::ROOT, count_star()).unwrap();
    q.where_(ScopeId::ROOT, col(t0, "cust_id").eq(3)).unwrap();

    assert!(!q.supports_locking(&LockRequest::for_update()));
    let err = q.render(&LockRequest::for_update()).unwrap_err();
    assert!(matches!(
        err,
        CompileError::CapabilityUnsupported {
            capability: Capability::SelectForUpdate,
            ..
        }
    ));
}

#[test]
fn test_postgres_cannot_lock_distinct() {
    let o = orders();
    let mut q = QueryBuilder::new(Vendor::Postgres.profile());
    let t0 = q.from_table(ScopeId::ROOT, &o).unwrap();
    q.select(ScopeId::ROOT, col(t0, "cust_id")).unwrap();
    q.set_distinct(ScopeId::ROOT, true).unwrap();

    let err = q.render(&LockRequest::for_update()).unwrap_err();
    assert_eq!(
        err,
        CompileError::CapabilityUnsupported {
            capability: Capability::LockingWithDistinct,
            dialect: "PostgreSQL".into(),
        }
    );
}

#[test]
fn test_eager_to_many_join_counts_as_distinct() {
    let o = orders();
    let mut q = QueryBuilder::new(Vendor::SqlServer.profile());
    let t0 = q.from_table(ScopeId::ROOT, &o).unwrap();
    q.select(ScopeId::ROOT, col(t0, "id")).unwrap();

    assert!(q.supports_locking(&LockRequest::for_update()));
    assert!(!q.supports_locking(&LockRequest::for_update().with_to_many_eager_join()));
}

#[test]
fn test_db2_multi_table_locking_depends_on_version() {
    let (o, c) = (orders(), customers());
    let fk = ForeignKey::new(["cust_id"], "CUSTOMERS", ["id"]);

    let build = |profile: &DialectProfile| -> bool {
        let mut q = QueryBuilder::new(profile);
        let t0 = q.from_table(ScopeId::ROOT, &o).unwrap();
        q.join(ScopeId::ROOT, &JoinPath::root(), &Relation::new("customer", &o, &fk, &c))
            .unwrap();
        q.select(ScopeId::ROOT, col(t0, "id")).unwrap();
        q.supports_locking(&LockRequest::for_update())
    };

    assert!(!build(Vendor::Db2.profile()));
    let modern = DialectProfile::detect(&VendorProbe::new("DB2/LINUXX8664").with_version("SQL09070"));
    assert!(build(&modern));
}

#[test]
fn test_oracle_wrapped_range_cannot_lock() {
    let o = orders();
    let mut q = QueryBuilder::new(Vendor::Oracle.profile());
    let t0 = q.from_table(ScopeId::ROOT, &o).unwrap();
    q.select(ScopeId::ROOT, col(t0, "id")).unwrap();
    q.set_range(ScopeId::ROOT, 0, Some(10)).unwrap();
    assert_eq!(
        q.render(&LockRequest::for_update()).unwrap().sql,
        "SELECT t0.id FROM ORDERS t0 WHERE ROWNUM <= 10 FOR UPDATE"
    );

    q.order_by(ScopeId::ROOT, col(t0, "id"), false, false).unwrap();
    assert!(q.render(&LockRequest::for_update()).unwrap_err().is_unsupported());
}
