//! `PostgreSQL` Query Executor
//!
//! This module implements the `QueryExecutor` trait for `PostgreSQL` databases.
//!
//! # Implementation Notes
//! - Uses `tokio-postgres` (async driver, requires tokio runtime)
//! - One client per executor; its connection task is spawned once
//! - Parameters are converted to the exact type the server inferred for each
//!   placeholder (`INT4` ids, `NUMERIC` salaries, ...)
//! - `NUMERIC` values travel through `rust_decimal`

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use tokio_postgres::error::SqlState;
use tokio_postgres::types::{ToSql, Type};
use tokio_postgres::{Client, Config, NoTls, Row};

use crate::engine::{
    ConnectionConfig, ConnectionInfo, DatabaseType, QueryExecutor, QueryResult, SqlValue,
};
use crate::error::{Result, RosterError};

type BoxedParam = Box<dyn ToSql + Sync + Send>;

/// `PostgreSQL` query executor
pub struct PostgresExecutor {
    client: Client,
}

impl PostgresExecutor {
    /// Connect using a `PostgreSQL` connection config
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        // Validate config is for PostgreSQL
        if config.engine != DatabaseType::Postgres {
            return Err(RosterError::config_error(format!(
                "Expected PostgreSQL engine, got {}",
                config.engine
            )));
        }

        let pg_config = build_pg_config(config)?;

        let (client, connection) = pg_config.connect(NoTls).await.map_err(|e| {
            RosterError::connection_failed(format!("Failed to connect to PostgreSQL: {e}"))
        })?;

        // Spawn connection handler
        // Note: Connection errors are not logged with details to prevent credential leakage
        tokio::spawn(async move {
            if connection.await.is_err() {
                tracing::warn!("PostgreSQL connection closed with an error");
            }
        });

        Ok(Self { client })
    }
}

impl QueryExecutor for PostgresExecutor {
    fn engine(&self) -> DatabaseType {
        DatabaseType::Postgres
    }

    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<QueryResult> {
        tracing::debug!(engine = "postgres", %sql, params = params.len(), "executing statement");

        let stmt = self.client.prepare(sql).await.map_err(map_pg_error)?;

        if params.len() != stmt.params().len() {
            return Err(RosterError::database(format!(
                "Statement expects {} parameters, got {}",
                stmt.params().len(),
                params.len()
            )));
        }

        let bound = params
            .iter()
            .zip(stmt.params())
            .map(|(value, ty)| bind_param(value, ty))
            .collect::<Result<Vec<BoxedParam>>>()?;
        let refs: Vec<&(dyn ToSql + Sync)> =
            bound.iter().map(|p| p.as_ref() as &(dyn ToSql + Sync)).collect();

        if stmt.columns().is_empty() {
            let rows_affected = self.client.execute(&stmt, &refs).await.map_err(map_pg_error)?;
            return Ok(QueryResult {
                columns: Vec::new(),
                rows: Vec::new(),
                rows_affected: Some(rows_affected),
            });
        }

        let rows = self.client.query(&stmt, &refs).await.map_err(map_pg_error)?;
        let column_names: Vec<String> =
            stmt.columns().iter().map(|c| c.name().to_string()).collect();

        let mut rows_data = Vec::with_capacity(rows.len());
        for row in &rows {
            rows_data.push(row_to_json(column_names.len(), row)?);
        }

        Ok(QueryResult { columns: column_names, rows: rows_data, rows_affected: None })
    }

    async fn connection_info(&self) -> Result<ConnectionInfo> {
        let row = self
            .client
            .query_one("SELECT version(), current_database()", &[])
            .await
            .map_err(|e| {
                RosterError::connection_failed(format!("Failed to query PostgreSQL version: {e}"))
            })?;

        let version_string: String = row.get(0);
        let connected_database: String = row.get(1);

        // Extract version number (e.g., "PostgreSQL 15.3 on x86_64..." -> "15.3")
        let database_version =
            version_string.split_whitespace().nth(1).unwrap_or("unknown").to_string();

        Ok(ConnectionInfo { database_version, connected_database })
    }
}

/// Build `PostgreSQL` connection config from `ConnectionConfig`
fn build_pg_config(config: &ConnectionConfig) -> Result<Config> {
    let host = config
        .host
        .as_ref()
        .ok_or_else(|| RosterError::config_error("PostgreSQL requires 'host' parameter"))?;

    let port = config.port.unwrap_or(5432);

    let user = config
        .user
        .as_ref()
        .ok_or_else(|| RosterError::config_error("PostgreSQL requires 'user' parameter"))?;

    let database = config
        .database
        .as_ref()
        .ok_or_else(|| RosterError::config_error("PostgreSQL requires 'database' parameter"))?;

    let mut pg_config = Config::new();
    pg_config.host(host).port(port).user(user).dbname(database);
    if let Some(password) = &config.password {
        pg_config.password(password);
    }

    Ok(pg_config)
}

/// Classify driver errors; foreign key rejections get their own variant
fn map_pg_error(e: tokio_postgres::Error) -> RosterError {
    if e.code() == Some(&SqlState::FOREIGN_KEY_VIOLATION) {
        return RosterError::foreign_key_violation(e.to_string());
    }
    match e.as_db_error() {
        Some(db) => RosterError::database(db.message().to_string()),
        None => RosterError::database(e.to_string()),
    }
}

/// Convert a parameter to the type the server inferred for its placeholder
fn bind_param(value: &SqlValue, ty: &Type) -> Result<BoxedParam> {
    let mismatch = || RosterError::database(format!("Cannot bind {value:?} as {}", ty.name()));

    let param: BoxedParam = match (value, ty) {
        (SqlValue::Null, &Type::INT2) => Box::new(None::<i16>),
        (SqlValue::Null, &Type::INT4) => Box::new(None::<i32>),
        (SqlValue::Null, &Type::INT8) => Box::new(None::<i64>),
        (SqlValue::Null, &Type::FLOAT4) => Box::new(None::<f32>),
        (SqlValue::Null, &Type::FLOAT8) => Box::new(None::<f64>),
        (SqlValue::Null, &Type::NUMERIC) => Box::new(None::<Decimal>),
        (SqlValue::Null, _) => Box::new(None::<String>),

        (SqlValue::Integer(i), &Type::INT2) => Box::new(i16::try_from(*i).map_err(|_| mismatch())?),
        (SqlValue::Integer(i), &Type::INT4) => Box::new(i32::try_from(*i).map_err(|_| mismatch())?),
        (SqlValue::Integer(i), &Type::INT8) => Box::new(*i),
        (SqlValue::Integer(i), &Type::NUMERIC) => Box::new(Decimal::from(*i)),
        #[allow(clippy::cast_precision_loss)]
        (SqlValue::Integer(i), &Type::FLOAT8) => Box::new(*i as f64),
        (SqlValue::Integer(i), &Type::TEXT | &Type::VARCHAR) => Box::new(i.to_string()),

        (SqlValue::Real(f), &Type::NUMERIC) => Box::new(Decimal::from_f64(*f).ok_or_else(mismatch)?),
        (SqlValue::Real(f), &Type::FLOAT8) => Box::new(*f),
        #[allow(clippy::cast_possible_truncation)]
        (SqlValue::Real(f), &Type::FLOAT4) => Box::new(*f as f32),

        (SqlValue::Text(s), &Type::TEXT | &Type::VARCHAR | &Type::BPCHAR | &Type::NAME) => {
            Box::new(s.clone())
        }

        _ => return Err(mismatch()),
    };

    Ok(param)
}

/// Convert a `PostgreSQL` row to a JSON-safe `Vec`
fn row_to_json(column_count: usize, row: &Row) -> Result<Vec<serde_json::Value>> {
    let mut values = Vec::with_capacity(column_count);

    for idx in 0..column_count {
        values.push(postgres_value_to_json(row, idx)?);
    }

    Ok(values)
}

/// Convert `PostgreSQL` value to JSON value
fn postgres_value_to_json(row: &Row, idx: usize) -> Result<serde_json::Value> {
    let col_type = row.columns()[idx].type_();
    let fetch_error = |e: tokio_postgres::Error| {
        RosterError::database(format!("Failed to read {} column: {e}", col_type.name()))
    };

    let value = match *col_type {
        Type::INT2 => row
            .try_get::<_, Option<i16>>(idx)
            .map_err(fetch_error)?
            .map(|v| serde_json::Value::Number(v.into())),
        Type::INT4 => row
            .try_get::<_, Option<i32>>(idx)
            .map_err(fetch_error)?
            .map(|v| serde_json::Value::Number(v.into())),
        Type::INT8 => row
            .try_get::<_, Option<i64>>(idx)
            .map_err(fetch_error)?
            .map(|v| serde_json::Value::Number(v.into())),
        Type::FLOAT4 => row
            .try_get::<_, Option<f32>>(idx)
            .map_err(fetch_error)?
            .and_then(|v| serde_json::Number::from_f64(f64::from(v)))
            .map(serde_json::Value::Number),
        Type::FLOAT8 => row
            .try_get::<_, Option<f64>>(idx)
            .map_err(fetch_error)?
            .and_then(serde_json::Number::from_f64)
            .map(serde_json::Value::Number),
        Type::NUMERIC => row
            .try_get::<_, Option<Decimal>>(idx)
            .map_err(fetch_error)?
            .and_then(|v| v.to_f64())
            .and_then(serde_json::Number::from_f64)
            .map(serde_json::Value::Number),
        Type::BOOL => row.try_get::<_, Option<bool>>(idx).map_err(fetch_error)?.map(serde_json::Value::Bool),
        _ => row
            .try_get::<_, Option<String>>(idx)
            .map_err(fetch_error)?
            .map(serde_json::Value::String),
    };

    Ok(value.unwrap_or(serde_json::Value::Null))
}
