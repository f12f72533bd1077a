use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;

use crate::auth::require_bearer;
use crate::handler;
use crate::state::AppState;

/// Build the router with every Shelf endpoint.
///
/// Catalog reads, registration, and login are public. Review mutations sit
/// behind [`require_bearer`], which runs before the body is read.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/auth/review/:isbn",
            post(handler::upsert_review).delete(handler::delete_review),
        )
        .route_layer(from_fn_with_state(state.clone(), require_bearer));

    Router::new()
        .route("/health", get(handler::health))
        .route("/books", get(handler::list_books))
        .route("/books/isbn/:isbn", get(handler::book_by_isbn))
        .route("/books/author/:author", get(handler::books_by_author))
        .route("/books/title/:title", get(handler::books_by_title))
        .route("/books/:isbn/review", get(handler::book_reviews))
        .route("/register", post(handler::register))
        .route("/login", post(handler::login))
        .merge(protected)
        .with_state(state)
}
