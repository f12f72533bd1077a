use shelf_crypto::PasswordError;
use shelf_store::StoreError;

/// Failures reported by Shelf operations.
///
/// The first four variants are part of the service contract and carry the
/// message shown to the caller. `Storage` and `Internal` are faults that end
/// the operation; their details are for logs only.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A required field is missing or has the wrong type.
    #[error("{0}")]
    InvalidInput(String),

    /// The identifier is taken, or the document changed underneath a write.
    #[error("{0}")]
    Conflict(String),

    /// Bad credentials, or a missing, malformed, expired, or forged token.
    #[error("{0}")]
    Unauthenticated(String),

    /// Unknown book, or no review by this account on the book.
    #[error("{0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self::Unauthenticated(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Short name of the failure kind, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Conflict(_) => "conflict",
            Self::Unauthenticated(_) => "unauthenticated",
            Self::NotFound(_) => "not_found",
            Self::Storage(_) => "storage",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::VersionConflict { .. } => {
                Self::Conflict("Data was modified concurrently, please retry".into())
            }
            other => Self::Storage(other),
        }
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        Self::Internal(err.to_string())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_store::DocumentVersion;

    #[test]
    fn display_is_caller_message() {
        assert_eq!(ServiceError::not_found("Book not found").to_string(), "Book not found");
    }

    #[test]
    fn version_conflict_maps_to_conflict() {
        let err: ServiceError = StoreError::VersionConflict {
            document: "books.json".into(),
            expected: DocumentVersion::ABSENT,
            found: DocumentVersion::of(b"[]"),
        }
        .into();
        assert_eq!(err.kind(), "conflict");
    }

    #[test]
    fn io_maps_to_storage() {
        let err: ServiceError = StoreError::Io(std::io::Error::other("disk gone")).into();
        assert_eq!(err.kind(), "storage");
    }
}
