//! HTTP server for Shelf.
//!
//! Serves the public catalog (listing, ISBN lookup, author and title search,
//! reviews of a book), account registration and login, and the
//! bearer-protected review routes. Every failure is reported as
//! `{"error": "<message>"}` with a status derived from its kind.

pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use auth::{AuthError, AuthGate, Credentials, Identity};
pub use config::{ServerConfig, BOOKS_FILE, USERS_FILE};
pub use error::{ServerError, ServerResult};
pub use router::build_router;
pub use server::ShelfServer;
pub use state::AppState;
