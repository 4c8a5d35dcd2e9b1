//! OpenAPI document for the todos service

use utoipa::OpenApi;

use crate::models::{Todo, TodoItem, TodoItems};

#[derive(OpenApi)]
#[openapi(
    components(schemas(Todo, TodoItem, TodoItems)),
    tags((name = "todos", description = "A single shared todo list"))
)]
pub struct ApiDoc;
