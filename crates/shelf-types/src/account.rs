use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Name of an account.
///
/// Identifiers are opaque and compared byte-for-byte: `"Alice"` and
/// `"alice"` are two different accounts. An identifier is never empty.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Build an identifier, rejecting the empty string.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if name.is_empty() {
            return Err(TypeError::MissingField("username"));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({})", self.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A registered account.
///
/// Persisted as `{"username": ..., "password": ...}` where `password` holds
/// the PHC-formatted hash string, never the plaintext.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "username")]
    pub identifier: Identifier,
    #[serde(rename = "password")]
    pub credential_hash: String,
}

impl Account {
    pub fn new(identifier: Identifier, credential_hash: impl Into<String>) -> Self {
        Self {
            identifier,
            credential_hash: credential_hash.into(),
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("identifier", &self.identifier)
            .field("credential_hash", &"<redacted>")
            .finish()
    }
}
