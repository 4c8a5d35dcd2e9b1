//! Common library for the planner and todos services
//!
//! This crate provides shared functionality used by both services:
//! payload validation, request extractors, the database connection factory,
//! server configuration and error handling.
//!
//! ```rust,no_run
//! use common::database::{Database, DatabaseConfig, health_check};
//!
//! const SCHEMA: &[&str] = &["CREATE TABLE IF NOT EXISTS todos (id INTEGER PRIMARY KEY)"];
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env("sqlite://todos.db")?;
//!     let database = Database::new(config, SCHEMA);
//!     let pool = database.connect().await?;
//!     let is_healthy = health_check(pool).await?;
//!     println!("Database health check: {}", is_healthy);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod extract;
pub mod validation;
