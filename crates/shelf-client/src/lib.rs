//! HTTP client for Shelf.
//!
//! Wraps the public catalog routes: listing every book, ISBN lookup, author
//! and title search, and the reviews of one book. Search terms are sent as
//! percent-encoded path segments.

pub mod client;
pub mod error;

pub use client::{ShelfClient, DEFAULT_BASE_URL};
pub use error::{ClientError, ClientResult};

pub use shelf_types::{Book, Reviews};
