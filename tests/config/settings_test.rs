use std::fs;
use std::path::PathBuf;

use quarry::config::{probe_from_vars, ConnectionError, Settings, SettingsError};
use quarry::prelude::*;
use quarry::sql::NameKind;

fn write_config(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("quarry-{}-{}.toml", name, std::process::id()));
    fs::write(&path, content).unwrap();
    path
}

fn locked_select(profile: &DialectProfile) -> String {
    let o = Table::new("ORDERS").with_column(Column::new("id", TypeCode::BigInt));
    let mut q = QueryBuilder::new(profile);
    let t0 = q.from_table(ScopeId::ROOT, &o).unwrap();
    q.select(ScopeId::ROOT, col(t0, "id")).unwrap();
    q.render(&LockRequest::for_update()).unwrap().sql
}

#[test]
fn test_load_overrides_from_file() {
    let path = write_config(
        "overrides",
        r#"
[dialect]
vendor = "oracle"

[dialect.overrides]
for_update_clause = "FOR UPDATE NOWAIT"
max_table_name_length = 128
reserved_words = ["size"]
"#,
    );

    let settings = Settings::from_file(&path).unwrap();
    fs::remove_file(&path).unwrap();

    let profile = settings.resolve_profile().unwrap();
    assert_eq!(profile.vendor, Vendor::Oracle);
    assert_eq!(profile.max_name_length(NameKind::Table), 128);
    assert_eq!(profile.max_name_length(NameKind::Column), 30);
    assert!(profile.is_reserved("SIZE"));
    assert_eq!(locked_select(&profile), "SELECT t0.id FROM ORDERS t0 FOR UPDATE NOWAIT");

    // the shared profile keeps its defaults
    assert_eq!(
        locked_select(Vendor::Oracle.profile()),
        "SELECT t0.id FROM ORDERS t0 FOR UPDATE"
    );
}

#[test]
fn test_missing_file() {
    let path = std::env::temp_dir().join("quarry-does-not-exist.toml");
    assert!(matches!(
        Settings::from_file(&path),
        Err(SettingsError::FileNotFound(p)) if p == path
    ));
}

#[test]
fn test_malformed_file() {
    let path = write_config("malformed", "[dialect\nvendor = ");
    let result = Settings::from_file(&path);
    fs::remove_file(&path).unwrap();
    assert!(matches!(result, Err(SettingsError::ParseError(_))));
}

#[test]
fn test_unknown_vendor_rejected() {
    let path = write_config("vendor", "[dialect]\nvendor = \"informix\"\n");
    let result = Settings::from_file(&path);
    fs::remove_file(&path).unwrap();
    assert!(matches!(result, Err(SettingsError::ParseError(_))));
}

#[test]
fn test_detected_product_with_overrides() {
    let settings: Settings = toml::from_str(
        r#"
[dialect]
product = "Microsoft SQL Server"

[dialect.overrides]
delimit_identifiers = true
"#,
    )
    .unwrap();

    let profile = settings.resolve_profile().unwrap();
    assert_eq!(profile.vendor, Vendor::SqlServer);
    assert_eq!(
        locked_select(&profile),
        "SELECT t0.[id] FROM [ORDERS] t0 WITH (UPDLOCK)"
    );
}

#[test]
fn test_probe_from_vars_detects_profile() {
    let probe = probe_from_vars(|name| match name {
        "QUARRY_DB_PRODUCT" => Some("DB2 UDB for AS/400".to_string()),
        "QUARRY_DB_VERSION" => Some("V5R4M0".to_string()),
        _ => None,
    })
    .unwrap();

    let profile = DialectProfile::detect(&probe);
    assert_eq!(profile.vendor, Vendor::Db2);
    assert_eq!(
        locked_select(&profile),
        "SELECT t0.id FROM ORDERS t0 FOR READ ONLY WITH RS USE AND KEEP EXCLUSIVE LOCKS"
    );
}

#[test]
fn test_probe_from_vars_needs_product_or_url() {
    assert!(matches!(
        probe_from_vars(|_| None),
        Err(ConnectionError::MissingEnvVar(_))
    ));
}
