//! Whole-document storage for Shelf.
//!
//! Each logical collection (accounts, books) is one JSON document that is
//! read in full at the start of an operation and rewritten in full at the
//! end of a mutating one. There is no incremental persistence.
//!
//! # Storage Backends
//!
//! All backends implement the [`DocumentStore`] trait:
//!
//! - [`InMemoryDocumentStore`] -- holds the serialized document in memory, for tests and embedding
//! - [`JsonFileStore`] -- one pretty-printed JSON file, replaced by atomic rename
//!
//! # Design Rules
//!
//! 1. Every stored document has a [`DocumentVersion`] derived from its bytes.
//! 2. A conditional replace fails with [`StoreError::VersionConflict`] if the
//!    document changed since it was loaded; nothing is written.
//! 3. [`Collection`] serializes writers so load → modify → replace cycles in
//!    one process never interleave.
//! 4. A missing document loads as the empty (default) collection.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod collection;
pub mod error;
pub mod file;
pub mod memory;
pub mod traits;
pub mod version;

// Re-export primary types at crate root for ergonomic imports.
pub use collection::Collection;
pub use error::{StoreError, StoreResult};
pub use file::JsonFileStore;
pub use memory::InMemoryDocumentStore;
pub use traits::{DocumentStore, Versioned};
pub use version::DocumentVersion;
