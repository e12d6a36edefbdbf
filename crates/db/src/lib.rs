//! Persistent history store for Lookbook generation jobs.
//!
//! Embedded SQLite via sqlx: WAL journaling so readers never block the
//! writer, foreign-key enforcement for media cascade deletes, and embedded
//! migrations applied on connect. The pool returned by [`connect`] is the
//! single process-wide handle; callers pass it into every repository call.

pub mod bootstrap;
pub mod models;
pub mod repositories;
pub mod secrets;

use std::path::Path;
use std::time::Duration;

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
pub use sqlx::SqlitePool;

pub use bootstrap::{bootstrap_secrets, BootstrapError, SecretSources};

/// Embedded migrations from `crates/db/migrations`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Errors raised while bringing up the database. All of them are fatal at
/// startup: the process must not serve traffic against an unknown schema.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("failed to create database directory '{path}'")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Open (creating if missing) the database file and bring it to the
/// expected schema. Existing data is never destroyed; migrations and
/// settings seeds are idempotent.
pub async fn connect(path: impl AsRef<Path>) -> Result<SqlitePool, DbError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| DbError::CreateDir {
            path: parent.display().to_string(),
            source,
        })?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        // Writers are serialized by the engine; waiting beats failing when
        // a user request and a worker callback land together.
        .busy_timeout(Duration::from_secs(5))
        .statement_cache_capacity(256);

    let pool = SqlitePoolOptions::new()
        // One writable handle. SQLite permits a single writer anyway, and
        // one connection avoids "database is locked" churn under load.
        .max_connections(1)
        .connect_with(options)
        .await?;

    MIGRATOR.run(&pool).await?;
    Ok(pool)
}

/// Trivial connectivity probe.
pub async fn health_check(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
