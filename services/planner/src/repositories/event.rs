//! Event repository for database operations

use common::error::{DatabaseError, DatabaseResult};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use tracing::info;

use crate::models::{Event, EventDetails};

/// Event repository
#[derive(Clone)]
pub struct EventRepository {
    pool: SqlitePool,
}

fn event_from_row(row: &SqliteRow) -> DatabaseResult<Event> {
    let tags: String = row.get("tags");

    Ok(Event {
        id: row.get("id"),
        details: EventDetails {
            title: row.get("title"),
            image: row.get("image"),
            description: row.get("description"),
            tags: serde_json::from_str(&tags)?,
            location: row.get("location"),
        },
    })
}

impl EventRepository {
    /// Create a new event repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Store a new event; the id is assigned by the database
    pub async fn create(&self, details: &EventDetails) -> DatabaseResult<Event> {
        info!("Creating new event: {}", details.title);

        let tags = serde_json::to_string(&details.tags)?;
        let row = sqlx::query(
            r#"
            INSERT INTO events (title, image, description, tags, location)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, image, description, tags, location
            "#,
        )
        .bind(&details.title)
        .bind(&details.image)
        .bind(&details.description)
        .bind(&tags)
        .bind(&details.location)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        event_from_row(&row)
    }

    /// Get all events
    pub async fn get_all(&self) -> DatabaseResult<Vec<Event>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, image, description, tags, location
            FROM events
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        rows.iter().map(event_from_row).collect()
    }

    /// Find an event by ID
    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<Event>> {
        info!("Finding event by ID: {}", id);

        let row = sqlx::query(
            r#"
            SELECT id, title, image, description, tags, location
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        row.as_ref().map(event_from_row).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::SCHEMA;
    use common::database::{Database, DatabaseConfig};

    async fn repository() -> EventRepository {
        let database = Database::new(DatabaseConfig::in_memory(), SCHEMA);
        EventRepository::new(database.connect().await.unwrap().clone())
    }

    fn details(title: &str, tags: &[&str]) -> EventDetails {
        EventDetails {
            title: title.to_string(),
            image: "https://linktomyimage.com/image.png".to_string(),
            description: "d".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            location: "Google Meet".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_ids_and_keeps_tag_order() {
        let repo = repository().await;

        let first = repo.create(&details("Launch", &["b", "a"])).await.unwrap();
        let second = repo.create(&details("Retro", &[])).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(first.details.tags, vec!["b", "a"]);
        assert_eq!(repo.find_by_id(first.id).await.unwrap(), Some(first.clone()));
        assert_eq!(repo.get_all().await.unwrap(), vec![first, second]);
    }

    #[tokio::test]
    async fn test_find_missing_event() {
        let repo = repository().await;
        assert_eq!(repo.find_by_id(42).await.unwrap(), None);
    }
}
