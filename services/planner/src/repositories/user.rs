//! User repository for database operations

use common::{
    error::{DatabaseError, DatabaseResult},
    validation::{Email, Schema},
};
use serde_json::Value;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use tracing::info;

use crate::models::{Event, StoredUser, User};

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

/// Decode the embedded event snapshot column
fn stored_events(text: &str) -> DatabaseResult<Vec<Event>> {
    let value: Value = serde_json::from_str(text)?;
    let items = value
        .as_array()
        .ok_or_else(|| DatabaseError::Corrupt("events column is not an array".to_string()))?;

    items
        .iter()
        .map(|item| Event::from_json(item).map_err(|e| DatabaseError::Corrupt(e.to_string())))
        .collect()
}

fn user_from_row(row: &SqliteRow) -> DatabaseResult<StoredUser> {
    let email: String = row.get("email");
    let events: String = row.get("events");

    Ok(StoredUser {
        id: row.get("id"),
        user: User {
            email: Email::parse(&email).map_err(DatabaseError::Corrupt)?,
            username: row.get("username"),
            events: stored_events(&events)?,
        },
    })
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user
    ///
    /// Fails with [`DatabaseError::UniqueViolation`] when the email is
    /// already registered.
    pub async fn create(&self, user: &User, password_hash: &str) -> DatabaseResult<StoredUser> {
        info!("Creating new user: {}", user.username);

        let events = serde_json::to_string(&user.events)?;
        let row = sqlx::query(
            r#"
            INSERT INTO users (email, username, password_hash, events)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, username, events
            "#,
        )
        .bind(user.email.as_str())
        .bind(&user.username)
        .bind(password_hash)
        .bind(&events)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        user_from_row(&row)
    }

    /// Get all users
    pub async fn get_all(&self) -> DatabaseResult<Vec<StoredUser>> {
        let rows = sqlx::query(
            r#"
            SELECT id, email, username, events
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        rows.iter().map(user_from_row).collect()
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<StoredUser>> {
        info!("Finding user by ID: {}", id);

        let row = sqlx::query(
            r#"
            SELECT id, email, username, events
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        row.as_ref().map(user_from_row).transpose()
    }

    /// Find the stored password hash for an email
    pub async fn find_password_hash(&self, email: &Email) -> DatabaseResult<Option<String>> {
        info!("Finding credentials for: {}", email);

        let row = sqlx::query(
            r#"
            SELECT password_hash
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(row.map(|row| row.get("password_hash")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::EventDetails, repositories::SCHEMA};
    use common::database::{Database, DatabaseConfig};

    async fn repository() -> UserRepository {
        let database = Database::new(DatabaseConfig::in_memory(), SCHEMA);
        UserRepository::new(database.connect().await.unwrap().clone())
    }

    fn user(email: &str) -> User {
        User {
            email: Email::parse(email).unwrap(),
            username: "fastapipackt001".to_string(),
            events: vec![Event {
                id: 1,
                details: EventDetails {
                    title: "Launch".to_string(),
                    image: "https://x/y.png".to_string(),
                    description: "d".to_string(),
                    tags: vec!["a".to_string(), "b".to_string()],
                    location: "Online".to_string(),
                },
            }],
        }
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let repo = repository().await;
        let stored = repo.create(&user("fastapi@packt.com"), "hash").await.unwrap();

        assert_eq!(stored.user, user("fastapi@packt.com"));
        assert_eq!(repo.find_by_id(stored.id).await.unwrap(), Some(stored.clone()));
        assert_eq!(repo.get_all().await.unwrap(), vec![stored]);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_unique_violation() {
        let repo = repository().await;
        repo.create(&user("fastapi@packt.com"), "hash").await.unwrap();

        let result = repo.create(&user("fastapi@packt.com"), "hash").await;
        assert!(matches!(result, Err(DatabaseError::UniqueViolation(_))));
    }

    #[tokio::test]
    async fn test_find_password_hash() {
        let repo = repository().await;
        let email = Email::parse("fastapi@packt.com").unwrap();
        assert_eq!(repo.find_password_hash(&email).await.unwrap(), None);

        repo.create(&user("fastapi@packt.com"), "stored-hash").await.unwrap();
        assert_eq!(
            repo.find_password_hash(&email).await.unwrap(),
            Some("stored-hash".to_string())
        );
    }

    #[test]
    fn test_corrupt_events_column() {
        assert!(matches!(stored_events("{}"), Err(DatabaseError::Corrupt(_))));
        assert!(matches!(stored_events("[{\"id\": 1}]"), Err(DatabaseError::Corrupt(_))));
        assert_eq!(stored_events("[]").unwrap(), Vec::new());
    }
}
