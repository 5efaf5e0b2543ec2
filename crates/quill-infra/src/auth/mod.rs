//! ID token verifier implementations.

mod jwt;

#[cfg(feature = "firebase")]
mod firebase;

pub use jwt::{JwtConfig, JwtIdTokenVerifier};

#[cfg(feature = "firebase")]
pub use firebase::{FirebaseIdTokenVerifier, GOOGLE_JWKS_URL};

use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use quill_core::ports::AuthError;

fn map_jwt_error(err: JwtError) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken(err.to_string()),
    }
}
