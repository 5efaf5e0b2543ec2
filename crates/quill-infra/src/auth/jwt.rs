//! Shared-secret ID tokens, for local development and tests.

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use quill_core::ports::{AuthError, IdTokenVerifier, VerifiedIdentity};

use super::map_jwt_error;

/// Placeholder secret; a warning is logged when it is in use.
const DEFAULT_SECRET: &str = "change-me-in-production";

/// Shared-secret token configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    /// Used both as `iss` and as the expected `aud`.
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            expiration_hours: 1,
            issuer: "quill-dev".to_string(),
        }
    }
}

/// Claims carried by an ID token, shaped like the hosted provider's.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    exp: i64,
    iat: i64,
    iss: String,
    aud: String,
}

/// HS256 ID-token verifier that can also mint tokens.
pub struct JwtIdTokenVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: JwtConfig,
}

impl JwtIdTokenVerifier {
    pub fn new(config: JwtConfig) -> Self {
        if config.secret == DEFAULT_SECRET {
            tracing::warn!("Using default ID token secret. Set ID_TOKEN_SECRET for real use.");
        }

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            encoding_key,
            decoding_key,
            config,
        }
    }

    /// Mint an ID token for `subject_id`.
    pub fn issue_token(
        &self,
        subject_id: &str,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + TimeDelta::hours(self.config.expiration_hours);

        let claims = Claims {
            sub: subject_id.to_string(),
            name: name.map(String::from),
            email: email.map(String::from),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn validate(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.issuer]);

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(map_jwt_error)?;

        if token_data.claims.sub.is_empty() {
            return Err(AuthError::InvalidToken("empty subject".to_string()));
        }

        Ok(VerifiedIdentity {
            subject_id: token_data.claims.sub,
            display_name: token_data.claims.name,
            email: token_data.claims.email,
        })
    }
}

#[async_trait]
impl IdTokenVerifier for JwtIdTokenVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        self.validate(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key".to_string(),
            expiration_hours: 1,
            issuer: "test-issuer".to_string(),
        }
    }

    #[test]
    fn test_issue_token_success() {
        let verifier = JwtIdTokenVerifier::new(test_config());

        let token = verifier
            .issue_token("uid-1", Some("Ada"), Some("ada@example.com"))
            .unwrap();

        assert!(!token.is_empty());
    }

    #[tokio::test]
    async fn test_verify_token_success() {
        let verifier = JwtIdTokenVerifier::new(test_config());
        let token = verifier
            .issue_token("uid-1", Some("Ada"), Some("ada@example.com"))
            .unwrap();

        let identity = verifier.verify(&token).await.unwrap();

        assert_eq!(identity.subject_id, "uid-1");
        assert_eq!(identity.display_name.as_deref(), Some("Ada"));
        assert_eq!(identity.email.as_deref(), Some("ada@example.com"));
    }

    #[tokio::test]
    async fn test_verify_token_without_name() {
        let verifier = JwtIdTokenVerifier::new(test_config());
        let token = verifier.issue_token("uid-1", None, None).unwrap();

        let identity = verifier.verify(&token).await.unwrap();

        assert_eq!(identity.display_name, None);
        assert_eq!(identity.author_name(), "uid-1");
    }

    #[tokio::test]
    async fn test_verify_invalid_token() {
        let verifier = JwtIdTokenVerifier::new(test_config());

        let result = verifier.verify("invalid-token").await;

        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn test_verify_expired_token() {
        let verifier = JwtIdTokenVerifier::new(JwtConfig {
            expiration_hours: -2,
            ..test_config()
        });
        let token = verifier.issue_token("uid-1", None, None).unwrap();

        let result = verifier.verify(&token).await;

        assert_eq!(result, Err(AuthError::TokenExpired));
    }

    #[tokio::test]
    async fn test_verify_wrong_issuer_token() {
        let issuer1 = JwtIdTokenVerifier::new(JwtConfig {
            issuer: "issuer1".to_string(),
            ..test_config()
        });
        let issuer2 = JwtIdTokenVerifier::new(JwtConfig {
            issuer: "issuer2".to_string(),
            ..test_config()
        });

        let token = issuer1.issue_token("uid-1", None, None).unwrap();

        assert!(issuer2.verify(&token).await.is_err());
    }

    #[tokio::test]
    async fn test_verify_wrong_secret_token() {
        let signer = JwtIdTokenVerifier::new(JwtConfig {
            secret: "other-secret".to_string(),
            ..test_config()
        });
        let verifier = JwtIdTokenVerifier::new(test_config());

        let token = signer.issue_token("uid-1", None, None).unwrap();

        assert!(matches!(
            verifier.verify(&token).await,
            Err(AuthError::InvalidToken(_))
        ));
    }
}
