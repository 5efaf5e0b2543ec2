//! Identity token verification port.

use async_trait::async_trait;

/// Identity established by a verified ID token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    /// Unique subject id of the signed-in user (`sub` claim).
    pub subject_id: String,
    /// Display name (`name` claim). Not unique.
    pub display_name: Option<String>,
    pub email: Option<String>,
}

impl VerifiedIdentity {
    /// Name recorded as a post's author.
    ///
    /// Falls back to the subject id when the token carries no display name.
    pub fn author_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.subject_id)
    }
}

/// Verifies identity tokens issued by an external authority.
#[async_trait]
pub trait IdTokenVerifier: Send + Sync {
    /// Validate and decode an ID token.
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError>;
}

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("No ID token was provided")]
    MissingToken,

    #[error("ID token has expired")]
    TokenExpired,

    #[error("Invalid ID token: {0}")]
    InvalidToken(String),

    #[error("Could not fetch token signing keys: {0}")]
    KeyFetch(String),
}

impl AuthError {
    /// Machine-readable error code, in the `auth/...` namespace clients of
    /// the identity provider already understand.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingToken | AuthError::InvalidToken(_) => "auth/argument-error",
            AuthError::TokenExpired => "auth/id-token-expired",
            AuthError::KeyFetch(_) => "auth/internal-error",
        }
    }
}
