use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shelf_types::Identifier;

use crate::secret::SigningSecret;

/// Default lifetime of a session token.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(2 * 60 * 60);

/// Payload bound into a session token. Times are UNIX seconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Bound account identifier.
    pub sub: String,
    /// Issued-at.
    pub iat: u64,
    /// Expiry. The token is valid while `now < exp`.
    pub exp: u64,
}

/// Encoded session token: a compact HS256 JWT.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head: String = self.0.chars().take(12).collect();
        write!(f, "SessionToken({head}...)")
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors from token verification.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("invalid token signature")]
    BadSignature,
    #[error("token expired")]
    Expired,
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => Self::BadSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Malformed,
        }
    }
}

/// Issues and verifies session tokens.
///
/// Tokens are HS256 JWTs keyed by the [`SigningSecret`]. Only HS256 is
/// accepted on verification. Expiry is checked here against an explicit
/// clock rather than by the JWT library, so the boundary is exact.
pub struct TokenAuthority {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenAuthority {
    pub fn new(secret: &SigningSecret, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Authority with the default two-hour lifetime.
    pub fn with_default_ttl(secret: &SigningSecret) -> Self {
        Self::new(secret, DEFAULT_TOKEN_TTL)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `identifier`, valid from now for the configured ttl.
    pub fn issue(&self, identifier: &Identifier) -> Result<SessionToken, TokenError> {
        self.issue_at(identifier, unix_now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, identifier: &Identifier, now: u64) -> Result<SessionToken, TokenError> {
        let claims = Claims {
            sub: identifier.as_str().to_owned(),
            iat: now,
            exp: now.saturating_add(self.ttl.as_secs()),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map(SessionToken)
            .map_err(|e| TokenError::Serialization(e.to_string()))
    }

    /// Verify a token and return the identifier it is bound to.
    pub fn verify(&self, token: &str) -> Result<Identifier, TokenError> {
        self.verify_at(token, unix_now())
    }

    /// Verify a token as if the current time were `now`.
    pub fn verify_at(&self, token: &str, now: u64) -> Result<Identifier, TokenError> {
        let claims = self.open(token)?;
        if now >= claims.exp {
            return Err(TokenError::Expired);
        }
        Identifier::new(claims.sub).map_err(|_| TokenError::Malformed)
    }

    /// Check the signature and decode the claims without looking at the clock.
    pub fn open(&self, token: &str) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims)
    }
}

impl fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("key", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
