use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use shelf_crypto::TokenAuthority;
use shelf_types::Identifier;

use crate::error::ServerResult;
use crate::state::AppState;

/// Account a request was authenticated as.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub name: Identifier,
}

impl Identity {
    pub fn user(name: Identifier) -> Self {
        Self { name }
    }
}

/// Credentials presented in the `Authorization` header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
    Bearer(String),
    Anonymous,
}

impl Credentials {
    /// Parse an `Authorization` header value. The value must be exactly two
    /// space-separated parts, the first being `Bearer`.
    pub fn from_header(header: Option<&HeaderValue>) -> Result<Self, AuthError> {
        let Some(header) = header else {
            return Ok(Self::Anonymous);
        };
        let value = header.to_str().map_err(|_| AuthError::InvalidFormat)?;
        let parts: Vec<&str> = value.split(' ').collect();
        match parts.as_slice() {
            ["Bearer", token] => Ok(Self::Bearer((*token).to_owned())),
            _ => Err(AuthError::InvalidFormat),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingHeader,
    #[error("Invalid authorization format")]
    InvalidFormat,
    #[error("Invalid or expired token")]
    InvalidToken,
}

/// Access-control boundary in front of the review routes.
#[derive(Clone, Debug)]
pub struct AuthGate {
    tokens: Arc<TokenAuthority>,
}

impl AuthGate {
    pub fn new(tokens: Arc<TokenAuthority>) -> Self {
        Self { tokens }
    }

    /// Resolve the identity behind an `Authorization` header.
    pub fn authenticate(&self, header: Option<&HeaderValue>) -> Result<Identity, AuthError> {
        match Credentials::from_header(header)? {
            Credentials::Anonymous => Err(AuthError::MissingHeader),
            Credentials::Bearer(token) => match self.tokens.verify(&token) {
                Ok(name) => Ok(Identity::user(name)),
                Err(e) => {
                    tracing::debug!("bearer token rejected: {e}");
                    Err(AuthError::InvalidToken)
                }
            },
        }
    }
}

/// Middleware that rejects the request unless it carries a valid bearer
/// token, and otherwise attaches the [`Identity`] to its extensions.
pub async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ServerResult<Response> {
    let identity = state.gate().authenticate(request.headers().get(AUTHORIZATION))?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_crypto::SigningSecret;

    const T0: u64 = 1_700_000_000;

    fn authority() -> Arc<TokenAuthority> {
        Arc::new(TokenAuthority::with_default_ttl(
            &SigningSecret::from_passphrase("gate-test").unwrap(),
        ))
    }

    fn header(value: &str) -> HeaderValue {
        HeaderValue::from_str(value).unwrap()
    }

    fn alice() -> Identifier {
        Identifier::new("alice").unwrap()
    }

    #[test]
    fn absent_header_is_anonymous() {
        assert_eq!(Credentials::from_header(None), Ok(Credentials::Anonymous));
    }

    #[test]
    fn bearer_header_parsed() {
        assert_eq!(
            Credentials::from_header(Some(&header("Bearer abc"))),
            Ok(Credentials::Bearer("abc".into()))
        );
    }

    #[test]
    fn malformed_headers_rejected() {
        for value in ["Bearer", "Bearer a b", "Basic abc", "bearer abc", "Bearer  abc", "abc"] {
            assert_eq!(
                Credentials::from_header(Some(&header(value))),
                Err(AuthError::InvalidFormat),
                "{value:?}"
            );
        }
    }

    #[test]
    fn gate_requires_header() {
        let gate = AuthGate::new(authority());
        assert_eq!(gate.authenticate(None), Err(AuthError::MissingHeader));
    }

    #[test]
    fn gate_accepts_fresh_token() {
        let tokens = authority();
        let token = tokens.issue(&alice()).unwrap();
        let gate = AuthGate::new(tokens);
        let identity = gate
            .authenticate(Some(&header(&format!("Bearer {token}"))))
            .unwrap();
        assert_eq!(identity.name, alice());
    }

    #[test]
    fn gate_rejects_expired_token() {
        let tokens = authority();
        let token = tokens.issue_at(&alice(), T0).unwrap();
        let gate = AuthGate::new(tokens);
        assert_eq!(
            gate.authenticate(Some(&header(&format!("Bearer {token}")))),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn gate_rejects_token_from_other_secret() {
        let other = TokenAuthority::with_default_ttl(&SigningSecret::from_passphrase("other").unwrap());
        let token = other.issue(&alice()).unwrap();
        let gate = AuthGate::new(authority());
        assert_eq!(
            gate.authenticate(Some(&header(&format!("Bearer {token}")))),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(AuthError::MissingHeader.to_string(), "Missing authorization header");
        assert_eq!(AuthError::InvalidFormat.to_string(), "Invalid authorization format");
        assert_eq!(AuthError::InvalidToken.to_string(), "Invalid or expired token");
    }
}
