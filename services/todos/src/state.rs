//! Application state shared across handlers

use common::{database::Database, error::DatabaseResult};

use crate::repositories::TodoRepository;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    pub todo_repository: TodoRepository,
}

impl AppState {
    /// Connect the database handle and build the repository over it
    pub async fn connect(database: Database) -> DatabaseResult<Self> {
        let pool = database.connect().await?.clone();

        Ok(Self {
            todo_repository: TodoRepository::new(pool),
            database,
        })
    }
}
