use crate::version::DocumentVersion;

/// Errors from document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The document changed between load and replace.
    #[error("document {document} changed concurrently: expected {expected}, found {found}")]
    VersionConflict {
        document: String,
        expected: DocumentVersion,
        found: DocumentVersion,
    },

    /// Serialization or deserialization failure.
    #[error("serialization error in {document}: {reason}")]
    Serialization { document: String, reason: String },

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn serialization(document: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Serialization {
            document: document.into(),
            reason: err.to_string(),
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
