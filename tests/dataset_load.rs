//! Bulk load and schema lifecycle against a SQLite file

mod common;

use std::fs;
use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use northwind::executor::{QueryExecutor, SharedStore, SqliteStore, Store};
use northwind::loader::{initialize_schema, BulkLoader, LoadErrorCode};
use northwind::observability::MetricsRegistry;
use northwind::planner::{QueryRequest, QueryResolver};
use northwind::schema::SchemaRegistry;

use common::{write_sources, Fixture};

#[test]
fn missing_sources_fail_only_their_tables() {
    let fx = Fixture::new();
    let loaded: Vec<_> = fx.report.loaded().map(|t| t.table).collect();
    for table in ["Products", "Customers", "Orders", "OrderDetails", "Categories"] {
        assert!(loaded.contains(&table), "{}", table);
    }
    assert_eq!(fx.report.failed().count(), 6);
    assert_eq!(fx.report.rows_loaded(), 16);
    assert_eq!(fx.metrics.snapshot().tables_failed, 6);
    assert!(!fx
        .report
        .tables
        .iter()
        .any(|t| t.table == "ResponseLogs"));
}

#[test]
fn reload_replaces_rows() {
    let fx = Fixture::new();
    let registry = SchemaRegistry::northwind();
    let loader = BulkLoader::new(
        fx.store.clone(),
        registry.clone(),
        fx.data_dir(),
        Arc::new(MetricsRegistry::new()),
    );

    let products = registry.describe("Products").unwrap();
    assert_eq!(loader.load_table(products).unwrap(), 5);

    let executor = QueryExecutor::new(fx.store.clone());
    assert_eq!(executor.execute_scalar_count("Products").unwrap(), 5);
}

#[test]
fn unreadable_source_keeps_existing_rows() {
    let fx = Fixture::new();
    fs::remove_file(fx.data_dir().join("Categories.csv")).unwrap();

    let registry = SchemaRegistry::northwind();
    let loader = BulkLoader::new(
        fx.store.clone(),
        registry.clone(),
        fx.data_dir(),
        Arc::new(MetricsRegistry::new()),
    );
    let err = loader
        .load_table(registry.describe("Categories").unwrap())
        .unwrap_err();
    assert_eq!(err.code(), LoadErrorCode::NwSourceUnreadable);

    let executor = QueryExecutor::new(fx.store.clone());
    assert_eq!(executor.execute_scalar_count("Categories").unwrap(), 2);
}

#[test]
fn unknown_header_is_rejected() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("rawData");
    write_sources(&data_dir);
    fs::write(data_dir.join("Shippers.csv"), "ShipperID;Nickname\n1;Fast\n").unwrap();

    let store: SharedStore = Arc::new(SqliteStore::open_in_memory().unwrap());
    let registry = SchemaRegistry::northwind();
    initialize_schema(store.as_ref(), &registry, false).unwrap();

    let loader = BulkLoader::new(store, registry.clone(), &data_dir, Arc::new(MetricsRegistry::new()));
    let err = loader
        .load_table(registry.describe("Shippers").unwrap())
        .unwrap_err();
    assert_eq!(err.code(), LoadErrorCode::NwUnknownColumn);
}

#[test]
fn empty_fields_load_as_null_and_numbers_are_typed() {
    let fx = Fixture::new();
    let rows = fx
        .store
        .query("SELECT * FROM \"Customers\" WHERE \"CustomerID\" = 'ALFKI'", &[])
        .unwrap();
    assert_eq!(rows[0]["Region"], json!(null));

    let rows = fx
        .store
        .query("SELECT * FROM \"Products\" WHERE \"ProductID\" = 5", &[])
        .unwrap();
    assert_eq!(rows[0]["UnitPrice"], json!(21.35));
    assert_eq!(rows[0]["Discontinued"], json!(1));
}

#[test]
fn reset_drops_audit_log_and_data() {
    let fx = Fixture::new();
    let service = fx.service();
    service
        .serve(
            &QueryRequest::get_by_id("Products", "1"),
            &northwind::api::CallerContext::new(Some("s"), "127.0.0.1"),
        )
        .unwrap();
    assert_eq!(service.response_logs("s").unwrap().history.len(), 2);

    let registry = SchemaRegistry::northwind();
    initialize_schema(fx.store.as_ref(), &registry, true).unwrap();

    assert!(service.response_logs("s").unwrap().history.is_empty());
    let executor = QueryExecutor::new(fx.store.clone());
    assert_eq!(executor.execute_scalar_count("Products").unwrap(), 0);
}

#[test]
fn get_by_id_never_returns_more_than_one_row() {
    let fx = Fixture::new();
    let resolver = QueryResolver::new(SchemaRegistry::northwind());
    let executor = QueryExecutor::new(fx.store.clone());

    for (table, id) in [
        ("Products", "1"),
        ("Customers", "AROUT"),
        ("Orders", "10249"),
        ("Categories", "2"),
        ("Orders", "1"),
    ] {
        let query = resolver
            .resolve(&QueryRequest::get_by_id(table, id))
            .unwrap();
        assert!(executor.execute(&query).unwrap().row_count <= 1, "{} {}", table, id);
    }
}
