use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::traits::{DocumentStore, Versioned};
use crate::version::DocumentVersion;

/// Shared handle to one stored document with serialized writers.
///
/// Readers go straight to the store. Writers take the collection's mutex for
/// the whole load → modify → replace cycle and replace conditionally on the
/// version they loaded, so two writers can never overwrite each other's
/// changes. A writer outside this process that slips in between load and
/// replace surfaces as [`StoreError::VersionConflict`].
pub struct Collection<T> {
    store: Arc<dyn DocumentStore<T>>,
    writer: Mutex<()>,
}

impl<T> Collection<T> {
    pub fn new(store: Arc<dyn DocumentStore<T>>) -> Self {
        Self {
            store,
            writer: Mutex::new(()),
        }
    }

    pub fn name(&self) -> &str {
        self.store.name()
    }

    /// Current document.
    pub fn snapshot(&self) -> StoreResult<T> {
        Ok(self.store.load()?.document)
    }

    /// Current document and the version it was read at.
    pub fn load(&self) -> StoreResult<Versioned<T>> {
        self.store.load()
    }

    /// Run `f` against the freshly loaded document and persist the result.
    ///
    /// If `f` fails nothing is written and its error is returned unchanged.
    pub fn modify<R, E>(&self, f: impl FnOnce(&mut T) -> Result<R, E>) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        let _guard = self.lock_writer();
        let Versioned {
            version,
            mut document,
        } = self.store.load()?;

        let out = f(&mut document)?;

        match self.store.replace(Some(version), &document) {
            Ok(new_version) => {
                debug!(document = %self.name(), from = %version, to = %new_version, "document updated");
                Ok(out)
            }
            Err(e) => {
                warn!(document = %self.name(), "document update failed: {e}");
                Err(e.into())
            }
        }
    }

    /// The lock guards no data, so a writer that panicked leaves nothing
    /// inconsistent and poisoning is ignored.
    fn lock_writer(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Overwrite the whole document regardless of its current version.
    pub fn replace_all(&self, document: &T) -> StoreResult<DocumentVersion> {
        let _guard = self.lock_writer();
        self.store.replace(None, document)
    }
}

impl<T> std::fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.name())
            .finish()
    }
}
