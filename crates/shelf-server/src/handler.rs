use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::Extension;
use serde_json::{json, Value};
use shelf_catalog::{ServiceError, ServiceResult};
use shelf_types::{Book, ReviewText, Reviews};

use crate::auth::Identity;
use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

const REVIEW_REQUIRED: &str = "review text required";

/// Liveness check.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "name": "shelf",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn list_books(State(state): State<AppState>) -> ServerResult<Json<Vec<Book>>> {
    Ok(Json(blocking(move || state.catalog.all()).await?))
}

pub async fn book_by_isbn(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> ServerResult<Json<Book>> {
    Ok(Json(blocking(move || state.catalog.by_key(&isbn)).await?))
}

pub async fn books_by_author(
    State(state): State<AppState>,
    Path(author): Path<String>,
) -> ServerResult<Json<Vec<Book>>> {
    Ok(Json(blocking(move || state.catalog.by_author(&author)).await?))
}

pub async fn books_by_title(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> ServerResult<Json<Vec<Book>>> {
    Ok(Json(blocking(move || state.catalog.by_title(&title)).await?))
}

pub async fn book_reviews(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> ServerResult<Json<Reviews>> {
    Ok(Json(blocking(move || state.catalog.reviews_of(&isbn)).await?))
}

/// `POST /register` with `{"username", "password"}`.
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<Value>)> {
    let body = json_or_empty(body);
    let username = string_field(&body, "username");
    let password = string_field(&body, "password");

    blocking(move || state.credentials.register(&username, &password)).await?;
    Ok((StatusCode::CREATED, Json(json!({ "message": "User registered" }))))
}

/// `POST /login`; answers `{"token"}` on success.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ServerResult<Json<Value>> {
    let body = json_or_empty(body);
    let username = string_field(&body, "username");
    let password = string_field(&body, "password");

    let verifier = state.clone();
    let account = blocking(move || verifier.credentials.verify(&username, &password)).await?;
    let token = state
        .tokens
        .issue(&account.identifier)
        .map_err(|e| ServerError::Internal(format!("issuing token: {e}")))?;
    Ok(Json(json!({ "token": token })))
}

/// `POST /auth/review/:isbn` with `{"review"}`.
pub async fn upsert_review(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(isbn): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ServerResult<Json<Value>> {
    let body = json_or_empty(body);
    let text = ReviewText::from_json(body.get("review"))
        .map_err(|_| ServiceError::invalid_input(REVIEW_REQUIRED))?;

    let reviews =
        blocking(move || state.reviews.upsert_review(&identity.name, &isbn, text)).await?;
    Ok(Json(json!({ "message": "Review added/updated", "reviews": reviews })))
}

/// `DELETE /auth/review/:isbn`.
pub async fn delete_review(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(isbn): Path<String>,
) -> ServerResult<Json<Value>> {
    let reviews = blocking(move || state.reviews.delete_review(&identity.name, &isbn)).await?;
    Ok(Json(json!({ "message": "Review deleted", "reviews": reviews })))
}

/// A missing or unparseable body reads as `{}`, so field checks report it.
fn json_or_empty(body: Result<Json<Value>, JsonRejection>) -> Value {
    match body {
        Ok(Json(value)) => value,
        Err(rejection) => {
            tracing::debug!("request body ignored: {rejection}");
            Value::Object(Default::default())
        }
    }
}

fn string_field(body: &Value, field: &str) -> String {
    body.get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

/// Run a store operation off the async workers. Every catalog and account
/// call reads the whole document from disk, and hashing is CPU-bound.
async fn blocking<T, F>(f: F) -> ServerResult<T>
where
    F: FnOnce() -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ServerError::Internal(format!("blocking task failed: {e}")))?
        .map_err(ServerError::from)
}
