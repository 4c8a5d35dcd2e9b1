//! User routes

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use common::{error::DatabaseError, extract::Validated};
use serde_json::json;
use tracing::{error, info};

use super::database_failure;
use crate::{
    error::ApiError,
    models::{NewUser, UserSignIn, UserSignUp},
    password,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/user", get(get_users).post(create_user))
        .route("/user/", get(get_users).post(create_user))
        .route("/user/signup", post(sign_up))
        .route("/user/signin", post(sign_in))
        .route("/user/:id", get(get_user))
}

/// Get all users
pub async fn get_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let users = state
        .user_repository
        .get_all()
        .await
        .map_err(database_failure("get users"))?;

    Ok(Json(users))
}

/// Get a user by ID
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .user_repository
        .find_by_id(id)
        .await
        .map_err(database_failure("get user"))?
        .ok_or_else(|| ApiError::NotFound("User with supplied ID does not exist".to_string()))?;

    Ok(Json(user))
}

/// Create a new user from a JSON body or a form submission
pub async fn create_user(
    State(state): State<AppState>,
    Validated(new_user): Validated<NewUser>,
) -> Result<impl IntoResponse, ApiError> {
    register(&state, new_user).await
}

/// Flat signup form
pub async fn sign_up(
    State(state): State<AppState>,
    Validated(signup): Validated<UserSignUp>,
) -> Result<impl IntoResponse, ApiError> {
    register(&state, NewUser::from(signup)).await
}

async fn register(
    state: &AppState,
    new_user: NewUser,
) -> Result<(StatusCode, Json<crate::models::StoredUser>), ApiError> {
    let password_hash = password::hash(&new_user.password).map_err(|e| {
        error!("Failed to hash password: {}", e);
        ApiError::InternalServerError
    })?;

    let stored = state
        .user_repository
        .create(&new_user.user, &password_hash)
        .await
        .map_err(|e| match e {
            DatabaseError::UniqueViolation(_) => {
                ApiError::Conflict("User with supplied email exists".to_string())
            }
            other => database_failure("create user")(other),
        })?;

    info!("User {} registered", stored.id);
    Ok((StatusCode::CREATED, Json(stored)))
}

/// Check a user's credentials
pub async fn sign_in(
    State(state): State<AppState>,
    Validated(credentials): Validated<UserSignIn>,
) -> Result<impl IntoResponse, ApiError> {
    let password_hash = state
        .user_repository
        .find_password_hash(&credentials.email)
        .await
        .map_err(database_failure("find user credentials"))?
        .ok_or_else(|| ApiError::NotFound("User with supplied email does not exist".to_string()))?;

    let verified = password::verify(&credentials.password, &password_hash).map_err(|e| {
        error!("Failed to verify password: {}", e);
        ApiError::InternalServerError
    })?;

    if !verified {
        return Err(ApiError::Unauthorized);
    }

    info!("User {} signed in", credentials.email);
    Ok(Json(json!({"message": "User signed in successfully."})))
}
