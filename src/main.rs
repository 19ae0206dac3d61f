//! Roster CLI Entry Point
//!
//! Resolves a connection profile, opens the database, and hands the terminal
//! to the menu loop. Tables go to stdout; logs and errors go to stderr.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use roster::{
    resolve_connection, ConnectionConfig, DatabaseType, DialoguerForm, QueryExecutor, Repository,
    Session, TerminalRenderer,
};

/// Roster - manage departments, roles and employees from the terminal
#[derive(Parser)]
#[command(name = "roster")]
#[command(version)]
struct Cli {
    /// Named connection profile (defaults to the configured default, then `roster.db`)
    #[arg(long, short = 'c')]
    connection: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(start(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

async fn start(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_connection(cli.connection.as_deref())
        .context("Could not resolve a database connection")?;
    tracing::debug!(engine = %config.engine, "connection resolved");

    match config.engine {
        DatabaseType::SQLite => open_sqlite(&config).await,
        DatabaseType::Postgres => open_postgres(&config).await,
    }
}

#[cfg(feature = "sqlite")]
async fn open_sqlite(config: &ConnectionConfig) -> anyhow::Result<()> {
    let executor = roster::engine::sqlite::SqliteExecutor::open(config)
        .context("Could not open the SQLite database")?;
    serve(executor).await
}

#[cfg(not(feature = "sqlite"))]
async fn open_sqlite(_config: &ConnectionConfig) -> anyhow::Result<()> {
    anyhow::bail!("This build of roster has no SQLite support (enable the `sqlite` feature)")
}

#[cfg(feature = "postgres")]
async fn open_postgres(config: &ConnectionConfig) -> anyhow::Result<()> {
    let executor = roster::engine::postgres::PostgresExecutor::connect(config)
        .await
        .context("Could not connect to PostgreSQL")?;
    serve(executor).await
}

#[cfg(not(feature = "postgres"))]
async fn open_postgres(_config: &ConnectionConfig) -> anyhow::Result<()> {
    anyhow::bail!("This build of roster has no PostgreSQL support (enable the `postgres` feature)")
}

async fn serve<E: QueryExecutor>(executor: E) -> anyhow::Result<()> {
    let info = executor.connection_info().await.context("Could not query the database")?;
    tracing::info!(
        engine = %executor.engine(),
        version = %info.database_version,
        database = %info.connected_database,
        "connected"
    );

    let mut session = Session::new(Repository::new(executor), DialoguerForm::new(), TerminalRenderer);
    roster::run(&mut session).await?;
    Ok(())
}
