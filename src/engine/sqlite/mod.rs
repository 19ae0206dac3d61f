//! `SQLite` Query Executor
//!
//! This module implements the `QueryExecutor` trait for `SQLite` databases.
//!
//! # Features
//! - File-based connections (`/path/to/roster.db`)
//! - In-memory connections (`:memory:`)
//! - Foreign key enforcement switched on for every connection
//!
//! # Implementation Notes
//! - Uses `rusqlite` (synchronous driver, no async needed)
//! - `$n` placeholders are rewritten to `?n` before preparing
//! - One connection per executor, guarded by a `Mutex`

use rusqlite::types::{Value, ValueRef};
use rusqlite::{params_from_iter, Connection, OpenFlags, Row};
use std::sync::{Mutex, MutexGuard};

use crate::engine::{
    ConnectionConfig, ConnectionInfo, DatabaseType, QueryExecutor, QueryResult, SqlValue,
};
use crate::error::{Result, RosterError};

/// `SQLite` query executor
pub struct SqliteExecutor {
    conn: Mutex<Connection>,
    name: String,
}

impl SqliteExecutor {
    /// Open the database named by a `SQLite` connection config
    pub fn open(config: &ConnectionConfig) -> Result<Self> {
        // Validate config is for SQLite
        if config.engine != DatabaseType::SQLite {
            return Err(RosterError::config_error(format!(
                "Expected SQLite engine, got {}",
                config.engine
            )));
        }

        let file_path = config
            .file
            .as_ref()
            .ok_or_else(|| RosterError::config_error("SQLite requires 'file' parameter"))?;

        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE;
        let conn = Connection::open_with_flags(file_path, flags).map_err(|e| {
            RosterError::connection_failed(format!("Failed to open SQLite database: {e}"))
        })?;

        let name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or_else(|| file_path.display().to_string(), str::to_string);

        Self::from_connection(conn, name)
    }

    /// Open a private in-memory database
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            RosterError::connection_failed(format!("Failed to open in-memory database: {e}"))
        })?;
        Self::from_connection(conn, ":memory:".to_string())
    }

    fn from_connection(conn: Connection, name: String) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;").map_err(|e| {
            RosterError::connection_failed(format!("Failed to enable foreign keys: {e}"))
        })?;
        Ok(Self { conn: Mutex::new(conn), name })
    }

    /// Run a multi-statement SQL script, e.g. `db/schema.sqlite.sql`
    ///
    /// Used to provision fixtures; the application itself never runs DDL.
    pub fn execute_script(&self, script: &str) -> Result<()> {
        self.lock()?
            .execute_batch(script)
            .map_err(|e| RosterError::database(format!("Failed to run script: {e}")))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| RosterError::database("SQLite connection lock poisoned"))
    }
}

impl QueryExecutor for SqliteExecutor {
    fn engine(&self) -> DatabaseType {
        DatabaseType::SQLite
    }

    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<QueryResult> {
        let sql = numbered_to_question_placeholders(sql);
        tracing::debug!(engine = "sqlite", %sql, params = params.len(), "executing statement");

        let conn = self.lock()?;
        execute_query(&conn, &sql, params)
    }

    async fn connection_info(&self) -> Result<ConnectionInfo> {
        let conn = self.lock()?;
        let version: String =
            conn.query_row("SELECT sqlite_version()", [], |row| row.get(0)).map_err(|e| {
                RosterError::connection_failed(format!("Failed to query SQLite version: {e}"))
            })?;

        Ok(ConnectionInfo { database_version: version, connected_database: self.name.clone() })
    }
}

/// Rewrite `$n` placeholders to `?n`, leaving string literals untouched
pub(crate) fn numbered_to_question_placeholders(sql: &str) -> String {
    let mut result = String::with_capacity(sql.len());
    let mut chars = sql.chars().peekable();
    let mut in_literal = false;

    while let Some(ch) = chars.next() {
        match ch {
            '\'' => {
                // '' inside a literal toggles twice and stays inside
                in_literal = !in_literal;
                result.push(ch);
            }
            '$' if !in_literal && chars.peek().is_some_and(char::is_ascii_digit) => {
                result.push('?');
            }
            _ => result.push(ch),
        }
    }

    result
}

/// Execute statement and return `QueryResult`
fn execute_query(conn: &Connection, sql: &str, params: &[SqlValue]) -> Result<QueryResult> {
    let mut stmt = conn.prepare(sql).map_err(map_sqlite_error)?;

    let column_names: Vec<String> = stmt.column_names().iter().map(|s| (*s).to_string()).collect();
    let bound = params.iter().map(to_sqlite_value);

    if column_names.is_empty() {
        // Statement without a result set (INSERT/UPDATE/DELETE without RETURNING)
        let changed = stmt.execute(params_from_iter(bound)).map_err(map_sqlite_error)?;
        return Ok(QueryResult {
            columns: Vec::new(),
            rows: Vec::new(),
            rows_affected: Some(changed as u64),
        });
    }

    let mut rows = stmt.query(params_from_iter(bound)).map_err(map_sqlite_error)?;
    let mut rows_data = Vec::new();
    while let Some(row) = rows.next().map_err(map_sqlite_error)? {
        rows_data.push(row_to_json(column_names.len(), row).map_err(map_sqlite_error)?);
    }

    Ok(QueryResult { columns: column_names, rows: rows_data, rows_affected: None })
}

fn to_sqlite_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(i) => Value::Integer(*i),
        SqlValue::Real(f) => Value::Real(*f),
        SqlValue::Text(s) => Value::Text(s.clone()),
    }
}

/// Classify driver errors; foreign key rejections get their own variant
fn map_sqlite_error(e: rusqlite::Error) -> RosterError {
    if let rusqlite::Error::SqliteFailure(failure, _) = &e {
        if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY {
            return RosterError::foreign_key_violation(e.to_string());
        }
    }
    RosterError::database(e.to_string())
}

/// Convert a `SQLite` row to a JSON-safe `Vec`
fn row_to_json(
    column_count: usize,
    row: &Row,
) -> std::result::Result<Vec<serde_json::Value>, rusqlite::Error> {
    let mut values = Vec::with_capacity(column_count);

    for idx in 0..column_count {
        values.push(sqlite_value_to_json(row, idx)?);
    }

    Ok(values)
}

/// Convert `SQLite` value to JSON value
fn sqlite_value_to_json(
    row: &Row,
    idx: usize,
) -> std::result::Result<serde_json::Value, rusqlite::Error> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Integer(i) => serde_json::Value::Number(i.into()),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map_or(serde_json::Value::Null, serde_json::Value::Number), // Handle NaN/Infinity as null
        ValueRef::Text(s) => {
            let text = std::str::from_utf8(s).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    idx,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?;
            serde_json::Value::String(text.to_string())
        }
        ValueRef::Blob(_) => {
            return Err(rusqlite::Error::InvalidColumnType(
                idx,
                "blob".to_string(),
                rusqlite::types::Type::Blob,
            ))
        }
    })
}
