use std::fmt;

use serde::{Deserialize, Serialize};

/// Domain tag prepended to document bytes before hashing.
const DOMAIN: &[u8] = b"shelf-document-v1:";

/// Content-derived version stamp of a stored document.
///
/// Two loads observe the same version exactly when the stored bytes are
/// identical. A document that does not exist yet has the [`ABSENT`] version.
///
/// [`ABSENT`]: DocumentVersion::ABSENT
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentVersion([u8; 32]);

impl DocumentVersion {
    /// Version of a document that has never been written.
    pub const ABSENT: Self = Self([0u8; 32]);

    /// Compute the version of serialized document bytes.
    pub fn of(bytes: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(DOMAIN);
        hasher.update(bytes);
        Self(*hasher.finalize().as_bytes())
    }

    pub fn is_absent(&self) -> bool {
        *self == Self::ABSENT
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Debug for DocumentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentVersion({})", self.short_hex())
    }
}

impl fmt::Display for DocumentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_absent() {
            f.write_str("absent")
        } else {
            f.write_str(&self.short_hex())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_bytes_same_version() {
        assert_eq!(DocumentVersion::of(b"[]"), DocumentVersion::of(b"[]"));
    }

    #[test]
    fn different_bytes_different_version() {
        assert_ne!(DocumentVersion::of(b"[]"), DocumentVersion::of(b"[1]"));
    }

    #[test]
    fn empty_document_is_not_absent() {
        assert!(!DocumentVersion::of(b"").is_absent());
        assert!(DocumentVersion::ABSENT.is_absent());
    }

    #[test]
    fn display_forms() {
        assert_eq!(DocumentVersion::ABSENT.to_string(), "absent");
        assert_eq!(DocumentVersion::of(b"x").to_string().len(), 8);
    }
}
