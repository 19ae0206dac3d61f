//! Query Executor Trait and Core Types
//!
//! This module defines the seam between the repository and the database
//! drivers. Each engine (`SQLite`, `PostgreSQL`) implements [`QueryExecutor`].
//!
//! # Statement Templates
//! Statements are written once with numbered placeholders (`$1`, `$2`, ...)
//! and positional [`SqlValue`] parameters. Engines that spell placeholders
//! differently rewrite them before preparing.
//!
//! # Engine Isolation
//! Each engine implementation is completely independent.
//! No shared driver helpers or cross-engine abstractions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, RosterError};

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "postgres")]
pub mod postgres;

/// Supported database engine types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    /// `PostgreSQL` database
    Postgres,
    /// `SQLite` database
    SQLite,
}

impl DatabaseType {
    /// Get the engine name as a string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::SQLite => "sqlite",
        }
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Connection configuration for database engines
///
/// Fields are engine-specific (e.g., `file` only applies to `SQLite`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Database engine type
    pub engine: DatabaseType,

    /// Hostname (for postgres)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Port number (for postgres)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Username (for postgres)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Password (for postgres)
    /// WARNING: Sensitive data, do not log or include in error messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Database name (for postgres)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// Database file path (for sqlite)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl ConnectionConfig {
    /// Create a new `PostgreSQL` connection config
    #[must_use]
    pub const fn postgres(
        host: String,
        port: u16,
        user: String,
        password: String,
        database: String,
    ) -> Self {
        Self {
            engine: DatabaseType::Postgres,
            host: Some(host),
            port: Some(port),
            user: Some(user),
            password: Some(password),
            database: Some(database),
            file: None,
        }
    }

    /// Create a new `SQLite` connection config
    #[must_use]
    pub const fn sqlite(file: PathBuf) -> Self {
        Self {
            engine: DatabaseType::SQLite,
            host: None,
            port: None,
            user: None,
            password: None,
            database: None,
            file: Some(file),
        }
    }
}

/// Connection information reported once the executor is connected
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionInfo {
    /// Database server version string
    pub database_version: String,

    /// Name of the connected database (file name for `SQLite`)
    pub connected_database: String,
}

/// A positional statement parameter
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Query execution result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResult {
    /// Column names in result set
    pub columns: Vec<String>,

    /// Result rows, one JSON value per column
    pub rows: Vec<Vec<serde_json::Value>>,

    /// Number of rows affected (for INSERT/UPDATE/DELETE without RETURNING)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_affected: Option<u64>,
}

impl QueryResult {
    /// Iterate rows with by-name column access
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(|values| Record { columns: &self.columns, values })
    }

    /// First row, if any
    #[must_use]
    pub fn first(&self) -> Option<Record<'_>> {
        self.records().next()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One row of a [`QueryResult`]
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    columns: &'a [String],
    values: &'a [serde_json::Value],
}

impl<'a> Record<'a> {
    fn value(&self, column: &str) -> Result<&'a serde_json::Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|idx| self.values.get(idx))
            .ok_or_else(|| RosterError::database(format!("Result has no column '{column}'")))
    }

    /// Read a non-null integer column
    pub fn i64(&self, column: &str) -> Result<i64> {
        self.opt_i64(column)?
            .ok_or_else(|| RosterError::database(format!("Column '{column}' is unexpectedly NULL")))
    }

    /// Read a nullable integer column
    pub fn opt_i64(&self, column: &str) -> Result<Option<i64>> {
        match self.value(column)? {
            serde_json::Value::Null => Ok(None),
            value => value.as_i64().map(Some).ok_or_else(|| {
                RosterError::database(format!("Column '{column}' is not an integer: {value}"))
            }),
        }
    }

    /// Read a non-null numeric column (integers widen to `f64`)
    pub fn f64(&self, column: &str) -> Result<f64> {
        self.opt_f64(column)?
            .ok_or_else(|| RosterError::database(format!("Column '{column}' is unexpectedly NULL")))
    }

    /// Read a nullable numeric column
    pub fn opt_f64(&self, column: &str) -> Result<Option<f64>> {
        match self.value(column)? {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::String(s) => s.parse::<f64>().map(Some).map_err(|e| {
                RosterError::database(format!("Column '{column}' is not numeric: {e}"))
            }),
            value => value.as_f64().map(Some).ok_or_else(|| {
                RosterError::database(format!("Column '{column}' is not numeric: {value}"))
            }),
        }
    }

    /// Read a non-null text column
    pub fn string(&self, column: &str) -> Result<String> {
        self.opt_string(column)?
            .ok_or_else(|| RosterError::database(format!("Column '{column}' is unexpectedly NULL")))
    }

    /// Read a nullable text column
    pub fn opt_string(&self, column: &str) -> Result<Option<String>> {
        match self.value(column)? {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::String(s) => Ok(Some(s.clone())),
            value => Err(RosterError::database(format!("Column '{column}' is not text: {value}"))),
        }
    }
}

/// Query executor trait
///
/// All database engines implement this trait. An executor owns its
/// connection for the lifetime of the process and runs one statement at a
/// time; statements that return rows (including `RETURNING` clauses) fill
/// `rows`, others report `rows_affected`.
///
/// Foreign key rejections MUST be reported as
/// [`RosterError::ForeignKeyViolation`] so the repository can surface them as
/// constraint violations.
pub trait QueryExecutor {
    /// Engine behind this executor
    fn engine(&self) -> DatabaseType;

    /// Execute one parameterized statement
    fn query(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> impl std::future::Future<Output = Result<QueryResult>> + Send;

    /// Report server version and database name
    fn connection_info(&self) -> impl std::future::Future<Output = Result<ConnectionInfo>> + Send;
}
