/// Process-wide secret that signs session tokens.
///
/// Rotating the secret (constructing a new [`crate::TokenAuthority`] from a
/// different value) invalidates every token issued under the old one.
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    /// Length of secrets produced by [`SigningSecret::generate`].
    pub const GENERATED_LEN: usize = 32;

    /// Wrap raw secret bytes. Returns `None` for an empty secret.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Option<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return None;
        }
        Some(Self(bytes))
    }

    /// Wrap a configured passphrase. Returns `None` for an empty string.
    pub fn from_passphrase(passphrase: &str) -> Option<Self> {
        Self::from_bytes(passphrase.as_bytes())
    }

    /// Generate a fresh random secret.
    pub fn generate() -> Self {
        let mut bytes = vec![0u8; Self::GENERATED_LEN];
        rand::Rng::fill(&mut rand::thread_rng(), bytes.as_mut_slice());
        Self(bytes)
    }

    /// Raw secret bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SigningSecret(<redacted>)")
    }
}
