//! Request body extractors that run entity validation
//!
//! Handlers receive an already validated entity; malformed or invalid
//! payloads are answered before handler code runs.

use axum::{
    Form, Json, async_trait,
    extract::{FromRequest, Multipart, Request},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;

use crate::validation::{FormFields, FormSchema, Schema, ValidationErrors};

/// Entity validated from a JSON body
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

/// Entity validated from a JSON body, a urlencoded form or a multipart
/// form, depending on the request `Content-Type`
#[derive(Debug)]
pub struct Validated<T>(pub T);

/// Why a request body was refused
#[derive(Error, Debug)]
pub enum PayloadRejection {
    /// The body could not be parsed at all
    #[error("Malformed request body: {message}")]
    Malformed { status: StatusCode, message: String },

    /// The body parsed but did not satisfy the entity schema
    #[error("Validation failed: {0}")]
    Invalid(ValidationErrors),
}

impl IntoResponse for PayloadRejection {
    fn into_response(self) -> Response {
        match self {
            PayloadRejection::Malformed { status, message } => (
                status,
                Json(json!({
                    "error": message,
                })),
            )
                .into_response(),
            PayloadRejection::Invalid(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "error": "Validation failed",
                    "detail": errors,
                })),
            )
                .into_response(),
        }
    }
}

impl PayloadRejection {
    fn malformed(status: StatusCode, message: String) -> Self {
        PayloadRejection::Malformed { status, message }
    }

    fn invalid(source: &str, errors: ValidationErrors) -> Self {
        debug!("Rejected {} payload: {}", source, errors);
        PayloadRejection::Invalid(errors)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    UrlEncoded,
    Multipart,
}

/// Media types are case-insensitive; anything unrecognised is treated as JSON
fn body_kind(req: &Request) -> BodyKind {
    let media_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|value| value.trim().to_ascii_lowercase());

    match media_type.as_deref() {
        Some("application/x-www-form-urlencoded") => BodyKind::UrlEncoded,
        Some("multipart/form-data") => BodyKind::Multipart,
        _ => BodyKind::Json,
    }
}

async fn json_entity<T, S>(req: Request, state: &S) -> Result<T, PayloadRejection>
where
    T: Schema,
    S: Send + Sync,
{
    let Json(value) = Json::<Value>::from_request(req, state)
        .await
        .map_err(|e| PayloadRejection::malformed(e.status(), e.body_text()))?;

    T::from_json(&value).map_err(|errors| PayloadRejection::invalid("JSON", errors))
}

async fn urlencoded_fields<S>(mut req: Request, state: &S) -> Result<FormFields, PayloadRejection>
where
    S: Send + Sync,
{
    // axum compares the form media type case-sensitively
    req.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/x-www-form-urlencoded"),
    );

    let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
        .await
        .map_err(|e| PayloadRejection::malformed(e.status(), e.body_text()))?;

    Ok(pairs.into_iter().collect())
}

/// Collect the text parts of a multipart body; file parts are skipped.
async fn multipart_fields<S>(req: Request, state: &S) -> Result<FormFields, PayloadRejection>
where
    S: Send + Sync,
{
    let mut multipart = Multipart::from_request(req, state)
        .await
        .map_err(|e| PayloadRejection::malformed(e.status(), e.body_text()))?;

    let mut pairs = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| PayloadRejection::malformed(e.status(), e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if field.file_name().is_some() {
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| PayloadRejection::malformed(e.status(), e.body_text()))?;
        pairs.push((name, value));
    }

    Ok(pairs.into_iter().collect())
}

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: Schema + Send,
    S: Send + Sync,
{
    type Rejection = PayloadRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        json_entity(req, state).await.map(ValidatedJson)
    }
}

#[async_trait]
impl<S, T> FromRequest<S> for Validated<T>
where
    T: Schema + FormSchema + Send,
    S: Send + Sync,
{
    type Rejection = PayloadRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let form = match body_kind(&req) {
            BodyKind::Json => return json_entity(req, state).await.map(Validated),
            BodyKind::UrlEncoded => urlencoded_fields(req, state).await?,
            BodyKind::Multipart => multipart_fields(req, state).await?,
        };

        T::from_form(&form)
            .map(Validated)
            .map_err(|errors| PayloadRejection::invalid("form", errors))
    }
}
