use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shelf_crypto::{PasswordPolicy, SigningSecret, DEFAULT_TOKEN_TTL};

use crate::error::{ServerError, ServerResult};

/// File name of the accounts document inside `data_dir`.
pub const USERS_FILE: &str = "users.json";
/// File name of the catalog document inside `data_dir`.
pub const BOOKS_FILE: &str = "books.json";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Directory holding `users.json` and `books.json`.
    pub data_dir: PathBuf,
    /// Secret keying session tokens. Must be supplied in any real deployment;
    /// when absent a random one is generated at startup.
    pub token_secret: Option<String>,
    pub token_ttl_secs: u64,
    /// Allow cross-origin requests from any origin.
    pub cors_permissive: bool,
    pub password: PasswordPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 3000)),
            data_dir: PathBuf::from("data"),
            token_secret: None,
            token_ttl_secs: DEFAULT_TOKEN_TTL.as_secs(),
            cors_permissive: true,
            password: PasswordPolicy::default(),
        }
    }
}

impl ServerConfig {
    /// Parse a TOML configuration. Missing keys take their defaults.
    pub fn from_toml(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Read a TOML configuration file.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("reading {}: {e}", path.display())))?;
        Self::from_toml(&text)
    }

    /// Render as TOML with the token secret masked.
    pub fn to_toml_redacted(&self) -> ServerResult<String> {
        let mut shown = self.clone();
        if shown.token_secret.is_some() {
            shown.token_secret = Some("<redacted>".into());
        }
        toml::to_string_pretty(&shown).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join(USERS_FILE)
    }

    pub fn books_path(&self) -> PathBuf {
        self.data_dir.join(BOOKS_FILE)
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    /// The configured signing secret, if one is set and non-empty.
    pub fn signing_secret(&self) -> Option<SigningSecret> {
        self.token_secret
            .as_deref()
            .and_then(SigningSecret::from_passphrase)
    }
}
