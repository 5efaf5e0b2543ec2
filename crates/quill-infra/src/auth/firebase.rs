//! Firebase ID token verification.
//!
//! Tokens are RS256 JWTs signed by Google. The signing keys are published as
//! a JWK set; the token header's `kid` selects the key. A valid token has
//! `aud` equal to the project id, `iss` equal to
//! `https://securetoken.google.com/{project_id}`, a non-empty `sub` and an
//! `auth_time` that is not in the future.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;

use quill_core::ports::{AuthError, IdTokenVerifier, VerifiedIdentity};

use super::map_jwt_error;

/// Where Google publishes the ID token signing keys.
pub const GOOGLE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// Allowed clock skew, in seconds.
const LEEWAY_SECS: u64 = 60;

#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    sub: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    auth_time: Option<i64>,
}

/// Firebase ID token verifier.
pub struct FirebaseIdTokenVerifier {
    client: reqwest::Client,
    project_id: String,
    jwks_url: String,
}

impl FirebaseIdTokenVerifier {
    pub fn new(project_id: impl Into<String>, timeout: Duration) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

        Ok(Self {
            client,
            project_id: project_id.into(),
            jwks_url: GOOGLE_JWKS_URL.to_string(),
        })
    }

    /// Override the key set URL (useful for testing or proxies).
    pub fn with_jwks_url(mut self, jwks_url: impl Into<String>) -> Self {
        self.jwks_url = jwks_url.into();
        self
    }

    fn issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.project_id)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = LEEWAY_SECS;
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[self.issuer()]);
        validation.set_required_spec_claims(&["exp", "iat", "aud", "iss", "sub"]);
        validation
    }

    async fn fetch_keys(&self) -> Result<JwkSet, AuthError> {
        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::KeyFetch(format!("key set request returned {status}")));
        }

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| AuthError::KeyFetch(e.to_string()))
    }

    /// Check `token` against an already fetched key set.
    fn verify_with(&self, token: &str, keys: &JwkSet) -> Result<VerifiedIdentity, AuthError> {
        let header = decode_header(token).map_err(map_jwt_error)?;
        if header.alg != Algorithm::RS256 {
            return Err(AuthError::InvalidToken(format!(
                "unexpected algorithm {:?}",
                header.alg
            )));
        }
        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidToken("token has no \"kid\" header".to_string()))?;
        let jwk = keys.find(&kid).ok_or_else(|| {
            AuthError::InvalidToken(format!("no signing key matches kid {kid}"))
        })?;
        let key = DecodingKey::from_jwk(jwk).map_err(map_jwt_error)?;

        let token_data = decode::<FirebaseClaims>(token, &key, &self.validation())
            .map_err(map_jwt_error)?;

        identity_from_claims(token_data.claims, Utc::now().timestamp())
    }
}

fn identity_from_claims(claims: FirebaseClaims, now: i64) -> Result<VerifiedIdentity, AuthError> {
    if claims.sub.is_empty() {
        return Err(AuthError::InvalidToken("empty \"sub\" claim".to_string()));
    }
    if claims.sub.len() > 128 {
        return Err(AuthError::InvalidToken(
            "\"sub\" claim longer than 128 characters".to_string(),
        ));
    }
    if let Some(auth_time) = claims.auth_time {
        if auth_time > now + LEEWAY_SECS as i64 {
            return Err(AuthError::InvalidToken(
                "\"auth_time\" claim is in the future".to_string(),
            ));
        }
    }

    Ok(VerifiedIdentity {
        subject_id: claims.sub,
        display_name: claims.name,
        email: claims.email,
    })
}

#[async_trait]
impl IdTokenVerifier for FirebaseIdTokenVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        let keys = self.fetch_keys().await?;
        self.verify_with(token, &keys)
    }
}
