//! Storage interface and the SQLite backend
//!
//! The store handle is created once at process start and shared by
//! reference. SQLite forbids concurrent writers on one connection, so the
//! backend funnels every statement through a single mutex-guarded
//! connection; each statement is one atomic unit.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rusqlite::types::{ToSqlOutput, Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection, ToSql};
use serde_json::{Map, Number, Value};

use crate::planner::SqlParam;
use crate::schema::ddl::quote_ident;

use super::errors::{ExecutorError, ExecutorResult};

/// A result row, column name to JSON value, in projection order
pub type Row = Map<String, Value>;

/// A value bound into a statement
#[derive(Debug, Clone, PartialEq)]
pub enum StoreValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl From<&SqlParam> for StoreValue {
    fn from(param: &SqlParam) -> Self {
        match param {
            SqlParam::Integer(n) => StoreValue::Integer(*n),
            SqlParam::Text(s) => StoreValue::Text(s.clone()),
        }
    }
}

impl ToSql for StoreValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            StoreValue::Null => ToSqlOutput::Owned(SqlValue::Null),
            StoreValue::Integer(n) => ToSqlOutput::Owned(SqlValue::Integer(*n)),
            StoreValue::Real(f) => ToSqlOutput::Owned(SqlValue::Real(*f)),
            StoreValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            StoreValue::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
        })
    }
}

/// Injected storage interface
pub trait Store: Send + Sync {
    /// Runs a read statement, returning every row
    fn query(&self, sql: &str, params: &[StoreValue]) -> ExecutorResult<Vec<Row>> {
        self.query_from(sql, params, 0)
    }

    /// Runs a read statement, stepping past the first `skip` rows unread
    fn query_from(&self, sql: &str, params: &[StoreValue], skip: u64) -> ExecutorResult<Vec<Row>>;

    /// Runs a statement that returns no rows, returning rows affected
    fn execute(&self, sql: &str, params: &[StoreValue]) -> ExecutorResult<usize>;

    /// Inserts `rows` into `table` as one multi-row statement
    fn insert(&self, table: &str, columns: &[&str], rows: &[Vec<StoreValue>]) -> ExecutorResult<usize>;
}

/// SQLite-backed store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (creating if needed) the database file at `path`
    pub fn open(path: impl AsRef<Path>) -> ExecutorResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                ExecutorError::storage_unavailable(format!(
                    "Cannot create {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL").ok();
        Self::from_connection(conn)
    }

    /// Opens a private in-memory database
    pub fn open_in_memory() -> ExecutorResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> ExecutorResult<Self> {
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> ExecutorResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| ExecutorError::storage_unavailable("Connection lock poisoned"))
    }
}

impl Store for SqliteStore {
    fn query_from(&self, sql: &str, params: &[StoreValue], skip: u64) -> ExecutorResult<Vec<Row>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.query(params_from_iter(params.iter()))?;
        for _ in 0..skip {
            if rows.next()?.is_none() {
                return Ok(Vec::new());
            }
        }

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut obj = Row::with_capacity(names.len());
            for (i, name) in names.iter().enumerate() {
                obj.insert(name.clone(), value_to_json(row.get_ref(i)?));
            }
            out.push(obj);
        }
        Ok(out)
    }

    fn execute(&self, sql: &str, params: &[StoreValue]) -> ExecutorResult<usize> {
        let conn = self.lock()?;
        Ok(conn.execute(sql, params_from_iter(params.iter()))?)
    }

    fn insert(&self, table: &str, columns: &[&str], rows: &[Vec<StoreValue>]) -> ExecutorResult<usize> {
        if rows.is_empty() {
            return Ok(0);
        }
        let sql = insert_statement(table, columns, rows.len());
        let conn = self.lock()?;
        Ok(conn.execute(&sql, params_from_iter(rows.iter().flatten()))?)
    }
}

/// `INSERT INTO "T" ("a", "b") VALUES (?, ?), (?, ?)`
pub(crate) fn insert_statement(table: &str, columns: &[&str], row_count: usize) -> String {
    let cols = columns
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ");
    let tuple = format!("({})", vec!["?"; columns.len()].join(", "));
    let values = vec![tuple.as_str(); row_count].join(", ");
    format!("INSERT INTO {} ({}) VALUES {}", quote_ident(table), cols, values)
}

/// Blobs are exposed as standard base64 text
fn value_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(n) => Value::Number(n.into()),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::String(STANDARD.encode(bytes)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .execute(
                "CREATE TABLE \"T\" (\"Id\" INTEGER PRIMARY KEY, \"Name\" VARCHAR(1000) NULL, \"Price\" REAL NULL, \"Pic\" BLOB NULL)",
                &[],
            )
            .unwrap();
        store
    }

    #[test]
    fn test_insert_statement_shape() {
        assert_eq!(
            insert_statement("T", &["a", "b"], 2),
            "INSERT INTO \"T\" (\"a\", \"b\") VALUES (?, ?), (?, ?)"
        );
    }

    #[test]
    fn test_insert_and_query_types() {
        let store = store();
        let inserted = store
            .insert(
                "T",
                &["Id", "Name", "Price", "Pic"],
                &[
                    vec![
                        StoreValue::Integer(1),
                        StoreValue::Text("Chai".into()),
                        StoreValue::Real(18.0),
                        StoreValue::Blob(vec![1, 2, 3]),
                    ],
                    vec![
                        StoreValue::Integer(2),
                        StoreValue::Null,
                        StoreValue::Null,
                        StoreValue::Null,
                    ],
                ],
            )
            .unwrap();
        assert_eq!(inserted, 2);

        let rows = store
            .query("SELECT * FROM \"T\" ORDER BY \"Id\"", &[])
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Id"], json!(1));
        assert_eq!(rows[0]["Name"], json!("Chai"));
        assert_eq!(rows[0]["Price"], json!(18.0));
        assert_eq!(rows[0]["Pic"], json!("AQID"));
        assert_eq!(rows[1]["Name"], Value::Null);

        let keys: Vec<&String> = rows[0].keys().collect();
        assert_eq!(keys, ["Id", "Name", "Price", "Pic"]);
    }

    #[test]
    fn test_query_binds_parameters() {
        let store = store();
        store
            .insert(
                "T",
                &["Id", "Name"],
                &[
                    vec![StoreValue::Integer(1), StoreValue::Text("O'Hara".into())],
                    vec![StoreValue::Integer(2), StoreValue::Text("Other".into())],
                ],
            )
            .unwrap();

        let rows = store
            .query(
                "SELECT * FROM \"T\" WHERE \"Name\" LIKE ?",
                &[StoreValue::Text("%'Ha%".into())],
            )
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Id"], json!(1));
    }

    #[test]
    fn test_query_from_steps_past_skipped_rows() {
        let store = store();
        let rows: Vec<Vec<StoreValue>> = (1..=4).map(|i| vec![StoreValue::Integer(i)]).collect();
        store.insert("T", &["Id"], &rows).unwrap();

        let sql = "SELECT \"Id\" FROM \"T\" ORDER BY \"Id\"";
        let tail = store.query_from(sql, &[], 3).unwrap();
        assert_eq!(tail, vec![Row::from_iter([("Id".to_string(), json!(4))])]);
        assert!(store.query_from(sql, &[], 10).unwrap().is_empty());
        assert_eq!(store.query(sql, &[]).unwrap().len(), 4);
    }

    #[test]
    fn test_missing_table_is_rejected() {
        let store = store();
        let err = store.query("SELECT * FROM \"Widgets\"", &[]).unwrap_err();
        assert!(!err.is_unavailable());
    }

    #[test]
    fn test_open_file_creates_parent() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("db.db");
        let store = SqliteStore::open(&path).unwrap();
        store.execute("CREATE TABLE x (a INTEGER)", &[]).unwrap();
        assert!(path.exists());
    }
}
