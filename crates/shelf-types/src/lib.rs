//! Foundation types for Shelf.
//!
//! This crate provides the records shared by every other Shelf crate: the
//! accounts that may sign in, the books in the catalog, and the per-account
//! reviews attached to a book.
//!
//! # Key Types
//!
//! - [`Identifier`] -- Case-sensitive account name, unique across the credential store
//! - [`Account`] -- Identifier plus salted password hash
//! - [`Book`] -- Catalog record keyed by ISBN, with optional [`Reviews`]
//! - [`ReviewText`] -- Validated free-text review body

pub mod account;
pub mod book;
pub mod error;
pub mod review;

pub use account::{Account, Identifier};
pub use book::Book;
pub use error::TypeError;
pub use review::{ReviewText, Reviews};
