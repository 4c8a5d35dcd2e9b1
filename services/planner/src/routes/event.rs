//! Event routes

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use common::extract::ValidatedJson;
use tracing::info;

use super::database_failure;
use crate::{error::ApiError, models::EventDetails, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/event", get(get_events).post(create_event))
        .route("/event/", get(get_events).post(create_event))
        .route("/event/:id", get(get_event))
}

/// Get all events
pub async fn get_events(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let events = state
        .event_repository
        .get_all()
        .await
        .map_err(database_failure("get events"))?;

    Ok(Json(events))
}

/// Get an event by ID
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state
        .event_repository
        .find_by_id(id)
        .await
        .map_err(database_failure("get event"))?
        .ok_or_else(|| ApiError::NotFound("Event with supplied ID does not exist".to_string()))?;

    Ok(Json(event))
}

/// Create a new event
pub async fn create_event(
    State(state): State<AppState>,
    ValidatedJson(details): ValidatedJson<EventDetails>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state
        .event_repository
        .create(&details)
        .await
        .map_err(database_failure("create event"))?;

    info!("Event {} created", event.id);
    Ok((StatusCode::CREATED, Json(event)))
}
