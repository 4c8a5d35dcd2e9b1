//! Integration tests for the infrastructure components
//!
//! These tests verify that the connection factory opens a working SQLite
//! database and that every clone of the handle shares it.

use common::database::{Database, DatabaseConfig, health_check};
use sqlx::Row;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS probes (id INTEGER PRIMARY KEY AUTOINCREMENT, label TEXT NOT NULL)",
];

/// Test that verifies the database is reachable and that state written
/// through one handle is visible through its clones
#[tokio::test]
async fn test_infrastructure_integration() -> Result<(), Box<dyn std::error::Error>> {
    let database = Database::new(DatabaseConfig::in_memory(), SCHEMA);
    let pool = database.connect().await?;

    // Verify connectivity
    assert!(health_check(pool).await?, "Database health check failed");

    // Perform a simple query
    let row = sqlx::query("SELECT 1 as result").fetch_one(pool).await?;
    let result: i32 = row.get("result");
    assert_eq!(result, 1, "SQLite simple query test failed");

    // Write through the first handle
    sqlx::query("INSERT INTO probes (label) VALUES ($1)")
        .bind("startup")
        .execute(pool)
        .await?;

    // A second connect on a clone must not recreate the database
    let clone = database.clone();
    let same_pool = clone.connect().await?;
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM probes")
        .fetch_one(same_pool)
        .await?;
    assert_eq!(count, 1, "Connection factory opened a second database");

    Ok(())
}
