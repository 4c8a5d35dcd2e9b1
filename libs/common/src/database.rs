//! Database module for handling SQLite connections
//!
//! This module provides the connection factory shared by the services: a
//! [`Database`] handle owned by the application root that opens the pool
//! and creates the service tables exactly once.

use crate::error::{DatabaseError, DatabaseResult};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::{env, sync::Arc};
use tokio::sync::OnceCell;
use tracing::{error, info};

/// Database configuration struct
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Create a new DatabaseConfig from environment variables
    ///
    /// # Environment Variables
    /// - `DATABASE_URL`: SQLite connection URL (default: `default_url`)
    /// - `DATABASE_MAX_CONNECTIONS`: Maximum number of connections (default: 5)
    ///
    /// In-memory URLs are pinned to a single connection whatever the
    /// configured maximum, see [`DatabaseConfig::in_memory`].
    pub fn from_env(default_url: &str) -> DatabaseResult<Self> {
        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| default_url.to_string());

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        if max_connections == 0 {
            return Err(DatabaseError::Configuration(
                "DATABASE_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }

        let max_connections = if is_in_memory(&database_url) {
            1
        } else {
            max_connections
        };

        Ok(Self {
            database_url,
            max_connections,
        })
    }

    /// Configuration for a private in-memory database.
    ///
    /// Every SQLite connection to `:memory:` sees its own database, so the
    /// pool is pinned to a single connection.
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
        }
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Process-wide handle to the persistence backend.
///
/// Cloning is cheap and every clone shares the same lazily opened pool.
#[derive(Debug, Clone)]
pub struct Database {
    config: DatabaseConfig,
    schema: &'static [&'static str],
    pool: Arc<OnceCell<SqlitePool>>,
}

impl Database {
    /// Create a handle; no connection is opened until [`Database::connect`].
    pub fn new(config: DatabaseConfig, schema: &'static [&'static str]) -> Self {
        Self {
            config,
            schema,
            pool: Arc::new(OnceCell::new()),
        }
    }

    /// Open the pool and create the tables on first call, then keep
    /// returning the same pool.
    pub async fn connect(&self) -> DatabaseResult<&SqlitePool> {
        self.pool
            .get_or_try_init(|| init_pool(&self.config, self.schema))
            .await
    }

    /// Whether [`Database::connect`] has completed successfully.
    pub fn is_connected(&self) -> bool {
        self.pool.initialized()
    }
}

/// Initialize a SQLite connection pool and apply the table definitions
///
/// # Arguments
///
/// * `config` - Database configuration
/// * `schema` - `CREATE TABLE IF NOT EXISTS` statements for the service
async fn init_pool(config: &DatabaseConfig, schema: &[&str]) -> DatabaseResult<SqlitePool> {
    info!("Initializing database connection pool");

    let options = config
        .database_url
        .parse::<SqliteConnectOptions>()
        .map_err(|e| DatabaseError::Configuration(format!("Invalid database URL: {}", e)))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .map_err(DatabaseError::Connection)?;

    for statement in schema {
        sqlx::query(statement)
            .execute(&pool)
            .await
            .map_err(DatabaseError::Schema)?;
    }

    info!("Database connection pool initialized successfully");
    Ok(pool)
}

/// Check database connectivity
///
/// # Returns
///
/// * `DatabaseResult<bool>` - True if the database answered, false otherwise
pub async fn health_check(pool: &SqlitePool) -> DatabaseResult<bool> {
    match sqlx::query("SELECT 1").execute(pool).await {
        Ok(_) => Ok(true),
        Err(e) => {
            error!("Database health check failed: {}", e);
            Ok(false)
        }
    }
}
