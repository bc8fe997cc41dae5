//! SQLite connection pool wrapper for the storage crate.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

/// Manages a single SQLite pool; creates the DB file if missing.
#[derive(Clone)]
pub struct SqlitePoolManager {
    pool: SqlitePool,
}

impl SqlitePoolManager {
    /// Creates a pool for `database_url`: a plain file path, or a `sqlite:` URL such as
    /// `sqlite::memory:`. In-memory databases get a single connection so every query sees the
    /// same database.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        info!(database_url = %database_url, "Initializing SQLite pool");

        let (options, max_connections) = if database_url.starts_with("sqlite:") {
            let in_memory = database_url.contains(":memory:");
            let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
            (options, if in_memory { 1 } else { 5 })
        } else {
            let options = SqliteConnectOptions::new()
                .create_if_missing(true)
                .filename(database_url);
            (options, 5)
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Returns the underlying pool for running queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
