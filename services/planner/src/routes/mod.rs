//! Planner service routes

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Redirect},
    routing::get,
};
use common::database::health_check;
use serde_json::json;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::error;
use utoipa::OpenApi;

use crate::{docs::ApiDoc, error::ApiError, state::AppState};

pub mod event;
pub mod user;

/// Create the router for the planner service
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/openapi.json", get(openapi))
        .merge(event::routes())
        .merge(user::routes())
        .nest_service("/images", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Send visitors to the event listing
pub async fn home() -> Redirect {
    Redirect::temporary("/event/")
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let pool = state.database.connect().await?;
    let database = if health_check(pool).await? { "ok" } else { "unavailable" };

    Ok(Json(json!({
        "status": "ok",
        "service": "planner-service",
        "database": database
    })))
}

/// OpenAPI document with the schema examples
pub async fn openapi() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Log a persistence failure and turn it into an API error
pub(crate) fn database_failure(
    action: &'static str,
) -> impl Fn(common::error::DatabaseError) -> ApiError {
    move |e| {
        error!("Failed to {}: {}", action, e);
        ApiError::Database(e)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
    };
    use common::database::{Database, DatabaseConfig};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::{repositories::SCHEMA, state::AppState};

    pub async fn app() -> Router {
        let database = Database::new(DatabaseConfig::in_memory(), SCHEMA);
        let state = AppState::connect(database).await.unwrap();
        super::create_router(state, "images")
    }

    pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    pub fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    const BOUNDARY: &str = "planner-boundary";

    pub fn post_multipart(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(fields)))
            .unwrap()
    }

    /// Encode text fields as a `multipart/form-data` body
    pub fn multipart_body(fields: &[(&str, &str)]) -> String {
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            ));
        }
        body.push_str(&format!("--{}--\r\n", BOUNDARY));
        body
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{app, get, send};
    use axum::http::{StatusCode, header};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_root_redirects_to_events() {
        let app = app().await;
        let response = app.oneshot(get("/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/event/");
    }

    #[tokio::test]
    async fn test_health_reports_database() {
        let app = app().await;
        let (status, body) = send(&app, get("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "planner-service");
        assert_eq!(body["database"], "ok");
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let app = app().await;
        let (status, body) = send(&app, get("/openapi.json")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["components"]["schemas"]["Event"].is_object());
    }

    #[tokio::test]
    async fn test_missing_image_is_not_found() {
        let app = app().await;
        let (status, _) = send(&app, get("/images/does-not-exist.png")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
