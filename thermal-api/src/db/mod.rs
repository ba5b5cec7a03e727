//! Database access for thermal-api
//!
//! The API never writes to the record store; all connections are read-only.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::path::Path;

/// Connect to the record store in read-only mode
pub async fn connect_readonly(db_path: &Path) -> Result<SqlitePool> {
    if !db_path.exists() {
        anyhow::bail!(
            "Record store not found: {}\nRun the ingestion process first to create it.",
            db_path.display()
        );
    }

    // mode=ro: SQLite rejects every write on this connection
    let db_url = format!("sqlite://{}?mode=ro", db_path.display());

    let pool = SqlitePool::connect(&db_url)
        .await
        .context("Failed to connect to record store in read-only mode")?;

    // Verify read-only by attempting a write (should fail)
    #[cfg(debug_assertions)]
    {
        let write_test = sqlx::query("CREATE TABLE _test_write (id INTEGER)")
            .execute(&pool)
            .await;
        if write_test.is_ok() {
            anyhow::bail!("Record store connection is not read-only: {}", db_path.display());
        }
    }

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_readonly_connection() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("thermal.db");
        let seed = thermal_common::db::init_database(&db_path).await.unwrap();
        seed.close().await;

        let pool = connect_readonly(&db_path)
            .await
            .expect("Should connect in read-only mode");

        let result = sqlx::query("CREATE TABLE _test (id INTEGER)")
            .execute(&pool)
            .await;
        assert!(result.is_err(), "Write operation should fail in read-only mode");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM captures")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_missing_database_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(connect_readonly(&dir.path().join("absent.db")).await.is_err());
    }
}
