//! Application state shared across handlers

use common::{database::Database, error::DatabaseResult};

use crate::repositories::{EventRepository, UserRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    pub event_repository: EventRepository,
    pub user_repository: UserRepository,
}

impl AppState {
    /// Connect the database handle and build the repositories over it
    pub async fn connect(database: Database) -> DatabaseResult<Self> {
        let pool = database.connect().await?.clone();

        Ok(Self {
            event_repository: EventRepository::new(pool.clone()),
            user_repository: UserRepository::new(pool),
            database,
        })
    }
}
