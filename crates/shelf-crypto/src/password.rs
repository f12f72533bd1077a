use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};

/// Argon2id cost parameters. Fixed for the lifetime of a [`CredentialHasher`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordPolicy {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl PasswordPolicy {
    /// The cheapest parameters Argon2 accepts. For tests only.
    pub fn minimal() -> Self {
        Self {
            memory_kib: Params::MIN_M_COST.max(8),
            iterations: 1,
            parallelism: 1,
        }
    }
}

/// Errors from password hashing.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("invalid password policy: {0}")]
    InvalidPolicy(String),
    #[error("hashing failed: {0}")]
    Hashing(String),
}

/// Salted one-way password hashing.
///
/// Every call to [`CredentialHasher::hash`] draws a fresh salt, so hashing
/// the same password twice yields different strings; both verify.
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl CredentialHasher {
    pub fn new(policy: &PasswordPolicy) -> Result<Self, PasswordError> {
        let params = Params::new(policy.memory_kib, policy.iterations, policy.parallelism, None)
            .map_err(|e| PasswordError::InvalidPolicy(e.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash `password` into a PHC string (`$argon2id$v=19$...`).
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::Hashing(e.to_string()))
    }

    /// Check `password` against a stored PHC string.
    ///
    /// A stored value that does not parse as a PHC string never verifies.
    /// The parameters embedded in the stored hash are used, so hashes made
    /// under an older policy keep working.
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        match PasswordHash::new(stored) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::debug!("stored credential hash is not a PHC string: {e}");
                false
            }
        }
    }
}

impl std::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CredentialHasher(argon2id)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> CredentialHasher {
        CredentialHasher::new(&PasswordPolicy::minimal()).unwrap()
    }

    #[test]
    fn hash_then_verify() {
        let h = hasher();
        let stored = h.hash("secret").unwrap();
        assert!(stored.starts_with("$argon2id$"));
        assert!(h.verify("secret", &stored));
    }

    #[test]
    fn wrong_password_fails() {
        let h = hasher();
        let stored = h.hash("secret").unwrap();
        assert!(!h.verify("wrong", &stored));
        assert!(!h.verify("", &stored));
        assert!(!h.verify("Secret", &stored));
    }

    #[test]
    fn same_password_different_hashes() {
        let h = hasher();
        let a = h.hash("secret").unwrap();
        let b = h.hash("secret").unwrap();
        assert_ne!(a, b);
        assert!(h.verify("secret", &a));
        assert!(h.verify("secret", &b));
    }

    #[test]
    fn hash_never_contains_plaintext() {
        let stored = hasher().hash("plaintext-password").unwrap();
        assert!(!stored.contains("plaintext-password"));
    }

    #[test]
    fn garbage_stored_hash_never_verifies() {
        let h = hasher();
        assert!(!h.verify("secret", "secret"));
        assert!(!h.verify("secret", ""));
    }

    #[test]
    fn verify_uses_embedded_parameters() {
        let strong = CredentialHasher::new(&PasswordPolicy {
            memory_kib: 64,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();
        let stored = strong.hash("secret").unwrap();
        assert!(hasher().verify("secret", &stored));
    }

    #[test]
    fn invalid_policy_rejected() {
        let err = CredentialHasher::new(&PasswordPolicy {
            memory_kib: 8,
            iterations: 0,
            parallelism: 1,
        })
        .unwrap_err();
        assert!(matches!(err, PasswordError::InvalidPolicy(_)));
    }

    #[test]
    fn default_policy_matches_argon2_defaults() {
        let policy = PasswordPolicy::default();
        assert_eq!(policy.memory_kib, 19 * 1024);
        assert_eq!(policy.iterations, 2);
        assert_eq!(policy.parallelism, 1);
    }
}
