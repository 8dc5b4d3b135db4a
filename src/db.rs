//! Database connection helpers.
//!
//! This module provides a small wrapper around the Diesel connection pool,
//! the per-connection setup applied to every SQLite handle (pragmas and the
//! `fold_case` SQL function used by case-insensitive queries), and the
//! embedded schema migrations.

use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PoolError, PooledConnection};
use diesel::sql_types::Text;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use log::{error, info};

use crate::models::config::DatabaseConfig;
use crate::repository::errors::{RepositoryError, RepositoryResult};

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

diesel::define_sql_function! {
    /// Locale-independent Unicode lowercase folding, registered on every
    /// pooled connection.
    fn fold_case(value: Text) -> Text;
}

/// Folds text the same way the `fold_case` SQL function does.
pub fn fold_case_str(value: &str) -> String {
    value.to_lowercase()
}

/// Registers `fold_case` on a raw connection.
pub fn register_sql_functions(conn: &mut SqliteConnection) -> diesel::QueryResult<()> {
    fold_case_utils::register_impl(conn, |value: String| fold_case_str(&value))
}

#[derive(Debug)]
/// Options that are applied each time a connection is acquired from the pool.
pub struct ConnectionOptions {
    /// Enable Write Ahead Logging mode for SQLite.
    pub enable_wal: bool,
    /// Timeout to wait for a locked database.
    pub busy_timeout: Option<Duration>,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            enable_wal: true,
            busy_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        (|| {
            if self.enable_wal {
                conn.batch_execute("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")?;
            }
            if let Some(d) = self.busy_timeout {
                conn.batch_execute(&format!("PRAGMA busy_timeout = {};", d.as_millis()))?;
            }
            register_sql_functions(conn)
        })()
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Create a Diesel connection pool for the given database URL.
pub fn establish_connection_pool(database_url: &str) -> Result<DbPool, PoolError> {
    establish_connection_pool_with(&DatabaseConfig::new(database_url))
}

/// Create a Diesel connection pool using the provided settings.
pub fn establish_connection_pool_with(config: &DatabaseConfig) -> Result<DbPool, PoolError> {
    let manager = ConnectionManager::<SqliteConnection>::new(&config.database_url);
    Pool::builder()
        .max_size(config.max_pool_size.max(1))
        .connection_customizer(Box::new(ConnectionOptions {
            busy_timeout: Some(Duration::from_secs(config.busy_timeout_secs)),
            ..ConnectionOptions::default()
        }))
        .build(manager)
}

/// Retrieve a connection from the pool
pub fn get_connection(pool: &DbPool) -> Result<DbConnection, PoolError> {
    match pool.get() {
        Ok(conn) => Ok(conn),
        Err(e) => {
            error!("Failed to get connection from pool: {e}");
            Err(e)
        }
    }
}

/// Apply every pending embedded migration, returning how many ran.
pub fn run_migrations(conn: &mut SqliteConnection) -> RepositoryResult<usize> {
    let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
        error!("Failed to run migrations: {e}");
        RepositoryError::DatabaseError(format!("Migration error: {e}"))
    })?;

    for version in &applied {
        info!("Applied migration {version}");
    }

    Ok(applied.len())
}
