//! SQLite connection pool and schema setup.

use crate::RegistryResult;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS tbl_staff (
        id BLOB PRIMARY KEY NOT NULL,
        username TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        hospital TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE (username, hospital)
    )",
    "CREATE TABLE IF NOT EXISTS tbl_patients (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id BLOB NOT NULL UNIQUE,
        first_name_th TEXT NOT NULL DEFAULT '',
        middle_name_th TEXT NOT NULL DEFAULT '',
        last_name_th TEXT NOT NULL DEFAULT '',
        first_name_en TEXT NOT NULL DEFAULT '',
        middle_name_en TEXT NOT NULL DEFAULT '',
        last_name_en TEXT NOT NULL DEFAULT '',
        date_of_birth TEXT NOT NULL,
        patient_hn TEXT NOT NULL DEFAULT '',
        national_id TEXT UNIQUE,
        passport_id TEXT UNIQUE,
        phone_number TEXT NOT NULL DEFAULT '',
        email TEXT NOT NULL DEFAULT '',
        gender TEXT NOT NULL DEFAULT ''
    )",
];

/// Opens a pool for `database_url`, creating the database file if needed, and applies the schema.
pub async fn connect(database_url: &str, max_connections: u32) -> RegistryResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    migrate(&pool).await?;
    tracing::info!("database ready at {}", database_url);
    Ok(pool)
}

/// Opens a private in-memory database.
///
/// Each SQLite `:memory:` connection is its own database, so the pool is pinned to a single
/// connection that is never recycled.
pub async fn connect_in_memory() -> RegistryResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    migrate(&pool).await?;
    Ok(pool)
}

/// Creates the tables if they do not exist yet. Safe to run on every startup.
pub async fn migrate(pool: &SqlitePool) -> RegistryResult<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_connect_creates_database_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("agnos.db");
        let url = format!("sqlite://{}", db_path.display());

        let pool = connect(&url, 2).await.expect("connect should succeed");
        assert!(db_path.is_file(), "database file should be created");

        // Running the schema a second time is a no-op.
        migrate(&pool).await.expect("migrate should be idempotent");
    }

    #[tokio::test]
    async fn test_in_memory_pool_has_tables() {
        let pool = connect_in_memory().await.expect("connect should succeed");
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('tbl_staff', 'tbl_patients')",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(count, 2);
    }
}
