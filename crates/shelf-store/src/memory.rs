use std::marker::PhantomData;
use std::sync::RwLock;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{StoreError, StoreResult};
use crate::traits::{decode, encode, DocumentStore, Versioned};
use crate::version::DocumentVersion;

/// In-memory document store.
///
/// Intended for tests and embedding. The document is kept in its serialized
/// form behind a `RwLock`, so versions behave exactly as they do on disk and
/// every load hands out an independent copy.
pub struct InMemoryDocumentStore<T> {
    name: String,
    bytes: RwLock<Option<Vec<u8>>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> InMemoryDocumentStore<T> {
    /// Create a store holding no document.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bytes: RwLock::new(None),
            _marker: PhantomData,
        }
    }

    /// Returns `true` if nothing has been written yet.
    pub fn is_absent(&self) -> bool {
        self.bytes.read().expect("lock poisoned").is_none()
    }
}

impl<T: Serialize> InMemoryDocumentStore<T> {
    /// Create a store pre-loaded with `document`.
    pub fn with_document(name: impl Into<String>, document: &T) -> StoreResult<Self> {
        let store = Self::new(name);
        let bytes = encode(&store.name, document)?;
        *store.bytes.write().expect("lock poisoned") = Some(bytes);
        Ok(store)
    }
}

impl<T> DocumentStore<T> for InMemoryDocumentStore<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    fn load(&self) -> StoreResult<Versioned<T>> {
        let bytes = self.bytes.read().expect("lock poisoned");
        match bytes.as_deref() {
            Some(bytes) => Ok(Versioned {
                version: DocumentVersion::of(bytes),
                document: decode(&self.name, bytes)?,
            }),
            None => Ok(Versioned {
                version: DocumentVersion::ABSENT,
                document: T::default(),
            }),
        }
    }

    fn replace(
        &self,
        expected: Option<DocumentVersion>,
        document: &T,
    ) -> StoreResult<DocumentVersion> {
        let encoded = encode(&self.name, document)?;
        let mut bytes = self.bytes.write().expect("lock poisoned");
        if let Some(expected) = expected {
            let found = bytes
                .as_deref()
                .map_or(DocumentVersion::ABSENT, DocumentVersion::of);
            if found != expected {
                return Err(StoreError::VersionConflict {
                    document: self.name.clone(),
                    expected,
                    found,
                });
            }
        }
        let version = DocumentVersion::of(&encoded);
        *bytes = Some(encoded);
        Ok(version)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<T> std::fmt::Debug for InMemoryDocumentStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDocumentStore")
            .field("name", &self.name)
            .field("absent", &self.is_absent())
            .finish()
    }
}
