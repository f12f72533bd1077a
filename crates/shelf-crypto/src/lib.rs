//! Cryptographic primitives for Shelf.
//!
//! Provides Argon2id password hashing for stored credentials and the session
//! token authority, which issues HS256 JWTs over `{sub, iat, exp}` claims
//! signed with a process-wide secret.
//!
//! All crypto operations wrap established libraries. There is no custom cryptography.

pub mod password;
pub mod secret;
pub mod token;

pub use password::{CredentialHasher, PasswordError, PasswordPolicy};
pub use secret::SigningSecret;
pub use token::{Claims, SessionToken, TokenAuthority, TokenError, DEFAULT_TOKEN_TTL};
