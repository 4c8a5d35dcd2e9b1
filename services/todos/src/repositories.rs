//! Repositories for database operations

use common::error::{DatabaseError, DatabaseResult};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use tracing::info;

use crate::models::{Todo, TodoItem};

/// Tables owned by the todos service
pub const SCHEMA: &[&str] = &[r#"
    CREATE TABLE IF NOT EXISTS todos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        item TEXT NOT NULL
    )
    "#,
];

/// Todo repository for database operations
#[derive(Clone)]
pub struct TodoRepository {
    pool: SqlitePool,
}

fn todo_from_row(row: SqliteRow) -> Todo {
    Todo {
        id: Some(row.get("id")),
        item: row.get("item"),
    }
}

impl TodoRepository {
    /// Create a new todo repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Store a todo; the id is assigned by the database
    pub async fn create(&self, todo: &TodoItem) -> DatabaseResult<Todo> {
        info!("Creating new todo");

        let row = sqlx::query(
            r#"
            INSERT INTO todos (item)
            VALUES ($1)
            RETURNING id, item
            "#,
        )
        .bind(&todo.item)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(todo_from_row(row))
    }

    /// Get all todos in creation order
    pub async fn get_all(&self) -> DatabaseResult<Vec<Todo>> {
        let rows = sqlx::query(
            r#"
            SELECT id, item
            FROM todos
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(rows.into_iter().map(todo_from_row).collect())
    }

    /// Find a todo by ID
    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<Todo>> {
        info!("Finding todo by ID: {}", id);

        let row = sqlx::query(
            r#"
            SELECT id, item
            FROM todos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(row.map(todo_from_row))
    }
}
