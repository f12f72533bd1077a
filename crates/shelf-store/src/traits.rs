use crate::error::StoreResult;
use crate::version::DocumentVersion;

/// A loaded document together with the version it was read at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Versioned<T> {
    pub version: DocumentVersion,
    pub document: T,
}

/// Storage for a single whole document.
///
/// All implementations must satisfy these invariants:
/// - `load` never observes a partially written document.
/// - A missing document loads as `T::default()` at [`DocumentVersion::ABSENT`].
/// - `replace(Some(v), ..)` writes only if the stored version is still `v`,
///   otherwise it fails with `StoreError::VersionConflict` and writes nothing.
/// - `replace(None, ..)` overwrites unconditionally.
/// - All I/O errors are propagated, never silently ignored.
pub trait DocumentStore<T>: Send + Sync {
    /// Read the whole document.
    fn load(&self) -> StoreResult<Versioned<T>>;

    /// Replace the whole document and return its new version.
    fn replace(&self, expected: Option<DocumentVersion>, document: &T)
        -> StoreResult<DocumentVersion>;

    /// Name used in logs and errors.
    fn name(&self) -> &str;
}

/// Serialize a document the way every backend stores it: pretty JSON with
/// two-space indentation.
pub(crate) fn encode<T: serde::Serialize>(name: &str, document: &T) -> StoreResult<Vec<u8>> {
    serde_json::to_vec_pretty(document).map_err(|e| crate::StoreError::serialization(name, e))
}

pub(crate) fn decode<T: serde::de::DeserializeOwned>(name: &str, bytes: &[u8]) -> StoreResult<T> {
    serde_json::from_slice(bytes).map_err(|e| crate::StoreError::serialization(name, e))
}
