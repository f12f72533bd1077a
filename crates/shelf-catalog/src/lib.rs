//! Core logic for Shelf.
//!
//! This crate is the heart of Shelf. It provides:
//! - [`CredentialStore`]: account registration and password verification
//! - [`CatalogStore`]: book lookup, substring search, and whole-catalog writes
//! - [`ReviewMutator`]: the add/update/delete review protocol, one review per
//!   account per book, applied as a serialized read-modify-write of the catalog
//! - [`ServiceError`]: the closed set of failures every operation reports

pub mod catalog;
pub mod credentials;
pub mod error;
pub mod reviews;

pub use catalog::CatalogStore;
pub use credentials::CredentialStore;
pub use error::{ServiceError, ServiceResult};
pub use reviews::ReviewMutator;
