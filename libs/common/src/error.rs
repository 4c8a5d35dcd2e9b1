//! Custom error types for the common library
//!
//! This module defines the persistence and configuration error types shared
//! by the planner and todos services.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// A unique constraint rejected the write
    #[error("Duplicate value: {0}")]
    UniqueViolation(String),

    /// Error occurred while creating the service tables
    #[error("Database schema error: {0}")]
    Schema(#[source] SqlxError),

    /// A stored column could not be decoded back into its record
    #[error("Stored data is corrupt: {0}")]
    Corrupt(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl DatabaseError {
    /// Classify a query failure, separating unique constraint violations
    /// from every other driver error.
    pub fn from_query(err: SqlxError) -> Self {
        match err.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => {
                DatabaseError::UniqueViolation(db_err.message().to_string())
            }
            _ => DatabaseError::Query(err),
        }
    }
}

impl From<serde_json::Error> for DatabaseError {
    fn from(err: serde_json::Error) -> Self {
        DatabaseError::Corrupt(err.to_string())
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Error raised while loading service configuration
#[derive(Error, Debug)]
#[error("Configuration error: {0}")]
pub struct ConfigError(#[from] pub config::ConfigError);
