use std::fs;
use std::io::{self, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::{decode, encode, DocumentStore, Versioned};
use crate::version::DocumentVersion;

/// Document stored as one pretty-printed JSON file.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so readers see either the old or the new document.
/// The version check and the rename happen under a process-local mutex;
/// writers in other processes are detected by the version check but can
/// still race inside that window.
pub struct JsonFileStore<T> {
    path: PathBuf,
    name: String,
    write_lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T> {
    /// Open a store at `path`. The file does not need to exist; its parent
    /// directory is created on first write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            path,
            name,
            write_lock: Mutex::new(()),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_bytes(&self) -> StoreResult<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn write_atomically(&self, bytes: &[u8]) -> StoreResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

impl<T> DocumentStore<T> for JsonFileStore<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    fn load(&self) -> StoreResult<Versioned<T>> {
        match self.read_bytes()? {
            Some(bytes) => {
                debug!(document = %self.name, size = bytes.len(), "loaded document");
                Ok(Versioned {
                    version: DocumentVersion::of(&bytes),
                    document: decode(&self.name, &bytes)?,
                })
            }
            None => {
                debug!(document = %self.name, "document missing, loading empty collection");
                Ok(Versioned {
                    version: DocumentVersion::ABSENT,
                    document: T::default(),
                })
            }
        }
    }

    fn replace(
        &self,
        expected: Option<DocumentVersion>,
        document: &T,
    ) -> StoreResult<DocumentVersion> {
        let encoded = encode(&self.name, document)?;
        let _guard = self.write_lock.lock().expect("write lock poisoned");

        if let Some(expected) = expected {
            let found = self
                .read_bytes()?
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

        self.write_atomically(&encoded)?;
        let version = DocumentVersion::of(&encoded);
        debug!(document = %self.name, %version, "replaced document");
        Ok(version)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<T> std::fmt::Debug for JsonFileStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileStore")
            .field("path", &self.path)
            .finish()
    }
}
