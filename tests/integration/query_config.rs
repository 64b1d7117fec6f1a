use std::fs;
use std::sync::Arc;

use quiver::query::{PropertyType, Schemata, SelectorName, TypeSystem};
use quiver::{NullOrdering, QueryConfig, QuiverError, Result};
use tempfile::tempdir;

#[test]
fn loads_options_from_file() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("query.toml");
    fs::write(&path, "nulls = \"last\"\ndefault_column_type = \"DOUBLE\"\n")?;

    let config = QueryConfig::load(&path)?;
    assert_eq!(config.nulls, NullOrdering::Last);
    assert_eq!(config.default_column_type, PropertyType::Double);
    Ok(())
}

#[test]
fn missing_file_is_an_io_error() -> Result<()> {
    let dir = tempdir()?;
    let err = QueryConfig::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, QuiverError::Io(_)));
    Ok(())
}

#[test]
fn malformed_file_is_rejected() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("query.toml");
    fs::write(&path, "nulls = \"sometimes\"\n")?;
    let err = QueryConfig::load(&path).unwrap_err();
    assert_eq!(err.code(), "MalformedOptions");
    Ok(())
}

#[test]
fn default_column_type_drives_schemata_fallback() -> Result<()> {
    let config = QueryConfig::default().default_column_type(PropertyType::Long);
    let types: Arc<dyn TypeSystem> = Arc::new(config.type_system());
    let schemata = Schemata::builder(types)
        .add_column("a", "declared", "DATE")
        .add_column("a", "untyped", "")
        .add_column("a", "mistyped", "NOT_A_TYPE")
        .build()?;
    let a = SelectorName::from("a");
    assert_eq!(schemata.lookup(&a, "declared")?, PropertyType::Date);
    assert_eq!(schemata.lookup(&a, "untyped")?, PropertyType::Long);
    assert_eq!(schemata.lookup(&a, "mistyped")?, PropertyType::Long);
    Ok(())
}
