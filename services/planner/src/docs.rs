//! OpenAPI document for the planner service

use utoipa::OpenApi;

use crate::models::{Event, EventDetails, NewUser, StoredUser, User, UserSignIn, UserSignUp};

#[derive(OpenApi)]
#[openapi(
    components(schemas(Event, EventDetails, User, StoredUser, NewUser, UserSignUp, UserSignIn)),
    tags((name = "planner", description = "Users and the events they attend"))
)]
pub struct ApiDoc;
