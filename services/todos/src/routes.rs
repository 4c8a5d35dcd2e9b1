//! Todos service routes

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use common::{database::health_check, extract::Validated};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use utoipa::OpenApi;

use crate::{
    AppState,
    docs::ApiDoc,
    error::ApiError,
    models::{Todo, TodoItem, TodoItems},
};

/// Create the router for the todos service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/openapi.json", get(openapi))
        .route("/todo", get(get_todos).post(create_todo))
        .route("/todo/", get(get_todos).post(create_todo))
        .route("/todo/:id", get(get_todo))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let pool = state.database.connect().await?;
    let database = if health_check(pool).await? { "ok" } else { "unavailable" };

    Ok(Json(json!({
        "status": "ok",
        "service": "todos-service",
        "database": database
    })))
}

/// OpenAPI document with the schema examples
pub async fn openapi() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Add a todo from a JSON body or a form submission
///
/// Any id sent by the client is ignored; the store assigns it.
pub async fn create_todo(
    State(state): State<AppState>,
    Validated(todo): Validated<Todo>,
) -> Result<impl IntoResponse, ApiError> {
    let todo = state
        .todo_repository
        .create(&TodoItem::from(todo))
        .await
        .map_err(|e| {
            error!("Failed to create todo: {}", e);
            ApiError::from(e)
        })?;

    info!("Todo {:?} added", todo.id);
    Ok((StatusCode::CREATED, Json(todo)))
}

/// List every todo
pub async fn get_todos(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let todos = state.todo_repository.get_all().await.map_err(|e| {
        error!("Failed to get todos: {}", e);
        ApiError::from(e)
    })?;

    Ok(Json(TodoItems { todos }))
}

/// Get a todo by ID
pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let todo = state
        .todo_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get todo: {}", e);
            ApiError::from(e)
        })?
        .ok_or_else(|| ApiError::NotFound("Todo with supplied ID doesn't exist".to_string()))?;

    Ok(Json(todo))
}
