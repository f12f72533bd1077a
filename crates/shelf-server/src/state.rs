use std::sync::Arc;

use shelf_catalog::{CatalogStore, CredentialStore, ReviewMutator};
use shelf_crypto::{CredentialHasher, SigningSecret, TokenAuthority};
use shelf_store::{DocumentStore, JsonFileStore};
use shelf_types::{Account, Book};

use crate::auth::AuthGate;
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};

/// Shared handles passed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub catalog: Arc<CatalogStore>,
    pub credentials: Arc<CredentialStore>,
    pub reviews: ReviewMutator,
    pub tokens: Arc<TokenAuthority>,
}

impl AppState {
    /// Wire up the services over arbitrary document stores.
    pub fn new(
        users: Arc<dyn DocumentStore<Vec<Account>>>,
        books: Arc<dyn DocumentStore<Vec<Book>>>,
        hasher: CredentialHasher,
        tokens: TokenAuthority,
    ) -> ServerResult<Self> {
        let catalog = Arc::new(CatalogStore::new(books));
        Ok(Self {
            credentials: Arc::new(CredentialStore::new(users, hasher)?),
            reviews: ReviewMutator::new(Arc::clone(&catalog)),
            catalog,
            tokens: Arc::new(tokens),
        })
    }

    /// Services backed by the JSON documents under `config.data_dir`.
    pub fn from_config(config: &ServerConfig, secret: &SigningSecret) -> ServerResult<Self> {
        let hasher = CredentialHasher::new(&config.password)
            .map_err(|e| ServerError::Config(format!("password policy: {e}")))?;
        Self::new(
            Arc::new(JsonFileStore::<Vec<Account>>::open(config.users_path())),
            Arc::new(JsonFileStore::<Vec<Book>>::open(config.books_path())),
            hasher,
            TokenAuthority::new(secret, config.token_ttl()),
        )
    }

    pub fn gate(&self) -> AuthGate {
        AuthGate::new(Arc::clone(&self.tokens))
    }
}
