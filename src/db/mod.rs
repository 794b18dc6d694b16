//! Database pool setup.
//!
//! Connects at startup, creating the database file and the todos table if
//! they do not exist. Any failure here is fatal.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::config::DatabaseConfig;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS todos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    is_complete INTEGER NOT NULL DEFAULT 0
)";

/// Open the pool and make sure the todos table exists.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;

    sqlx::query(SCHEMA).execute(&pool).await?;

    tracing::info!(url = %config.url, "database ready");
    Ok(pool)
}
