use std::sync::Arc;

use shelf_crypto::CredentialHasher;
use shelf_store::{Collection, DocumentStore};
use shelf_types::{Account, Identifier};
use tracing::{debug, info};

use crate::error::{ServiceError, ServiceResult};

const MISSING_FIELDS: &str = "username & password required";
const ALREADY_EXISTS: &str = "User already exists";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Registered accounts.
///
/// Registration and login report failures differently on purpose: a taken
/// identifier is a distinct `Conflict`, while an unknown identifier and a
/// wrong password both surface as the same `Unauthenticated` error.
pub struct CredentialStore {
    accounts: Collection<Vec<Account>>,
    hasher: CredentialHasher,
    /// Hash checked when the identifier is unknown, so a miss costs the same
    /// as a wrong password.
    decoy_hash: String,
}

impl CredentialStore {
    pub fn new(
        store: Arc<dyn DocumentStore<Vec<Account>>>,
        hasher: CredentialHasher,
    ) -> ServiceResult<Self> {
        let decoy_hash = hasher.hash("shelf-decoy-password")?;
        Ok(Self {
            accounts: Collection::new(store),
            hasher,
            decoy_hash,
        })
    }

    /// Create an account. Fails `Conflict` if the identifier is taken and
    /// `InvalidInput` if either field is empty.
    pub fn register(&self, identifier: &str, password: &str) -> ServiceResult<Account> {
        if password.is_empty() {
            return Err(ServiceError::invalid_input(MISSING_FIELDS));
        }
        let identifier =
            Identifier::new(identifier).map_err(|_| ServiceError::invalid_input(MISSING_FIELDS))?;

        // Cheap early rejection before paying for the hash. The check is
        // repeated under the writer lock below.
        if self.find(&identifier)?.is_some() {
            debug!(user = %identifier, "registration rejected: identifier taken");
            return Err(ServiceError::conflict(ALREADY_EXISTS));
        }

        let account = Account::new(identifier, self.hasher.hash(password)?);
        self.accounts.modify(|accounts| {
            if accounts.iter().any(|a| a.identifier == account.identifier) {
                return Err(ServiceError::conflict(ALREADY_EXISTS));
            }
            accounts.push(account.clone());
            Ok(())
        })?;

        info!(user = %account.identifier, "registered account");
        Ok(account)
    }

    /// Check a password. Performs no write.
    pub fn verify(&self, identifier: &str, password: &str) -> ServiceResult<Account> {
        let account = Identifier::new(identifier)
            .ok()
            .map(|id| self.find(&id))
            .transpose()?
            .flatten();

        match account {
            Some(account) if self.hasher.verify(password, &account.credential_hash) => {
                debug!(user = %account.identifier, "credentials verified");
                Ok(account)
            }
            Some(account) => {
                debug!(user = %account.identifier, "login failed: wrong password");
                Err(ServiceError::unauthenticated(INVALID_CREDENTIALS))
            }
            None => {
                let _ = self.hasher.verify(password, &self.decoy_hash);
                debug!(user = identifier, "login failed: unknown identifier");
                Err(ServiceError::unauthenticated(INVALID_CREDENTIALS))
            }
        }
    }

    /// Look up an account by identifier.
    pub fn find(&self, identifier: &Identifier) -> ServiceResult<Option<Account>> {
        Ok(self
            .accounts
            .snapshot()?
            .into_iter()
            .find(|a| &a.identifier == identifier))
    }

    /// Number of registered accounts.
    pub fn len(&self) -> ServiceResult<usize> {
        Ok(self.accounts.snapshot()?.len())
    }

    pub fn is_empty(&self) -> ServiceResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("accounts", &self.accounts)
            .finish()
    }
}
