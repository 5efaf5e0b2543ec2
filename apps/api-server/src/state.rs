//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{AuthError, IdTokenVerifier, PostStore};
use quill_core::{AuthorPolicy, PostService};
use quill_infra::{HtmlSanitizer, InMemoryPostStore, JwtIdTokenVerifier};

#[cfg(feature = "firebase")]
use quill_infra::{FirebaseConfig, FirebaseIdTokenVerifier, FirebasePostStore};

use crate::config::{AppConfig, IdentityConfig, StoreConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    ///
    /// A store that cannot be configured falls back to memory; a verifier
    /// that cannot be configured is fatal, since nobody could post.
    pub fn new(config: &AppConfig) -> Result<Self, AuthError> {
        let store = build_store(&config.store);
        let verifier = build_verifier(&config.identity)?;

        if config.authors.is_empty() {
            tracing::warn!("AUTHORIZED_AUTHOR_IDS is empty - nobody can create posts");
        } else {
            tracing::info!(authors = config.authors.len(), "Author allowlist loaded");
        }

        tracing::info!("Application state initialized");

        Ok(Self::from_parts(store, verifier, config.authors.clone()))
    }

    /// Assemble state from already-built collaborators.
    pub fn from_parts(
        store: Arc<dyn PostStore>,
        verifier: Arc<dyn IdTokenVerifier>,
        authors: AuthorPolicy,
    ) -> Self {
        let service = PostService::new(store, verifier, Arc::new(HtmlSanitizer::new()), authors);
        Self {
            posts: Arc::new(service),
        }
    }
}

fn build_store(config: &StoreConfig) -> Arc<dyn PostStore> {
    match config {
        #[cfg(feature = "firebase")]
        StoreConfig::Firebase {
            database_url,
            auth,
            timeout,
        } => {
            let firebase = FirebasePostStore::new(FirebaseConfig {
                database_url: database_url.clone(),
                auth: auth.clone(),
                timeout: *timeout,
            });
            match firebase {
                Ok(store) => Arc::new(store),
                Err(e) => {
                    tracing::error!(
                        "Failed to configure Firebase store: {}. Using in-memory fallback.",
                        e
                    );
                    Arc::new(InMemoryPostStore::new())
                }
            }
        }
        #[cfg(not(feature = "firebase"))]
        StoreConfig::Firebase { .. } => {
            tracing::warn!("Built without firebase feature - ignoring FIREBASE_DATABASE_URL");
            Arc::new(InMemoryPostStore::new())
        }
        StoreConfig::InMemory => {
            tracing::warn!(
                "FIREBASE_DATABASE_URL not set. Running without database (in-memory mode)."
            );
            Arc::new(InMemoryPostStore::new())
        }
    }
}

fn build_verifier(config: &IdentityConfig) -> Result<Arc<dyn IdTokenVerifier>, AuthError> {
    match config {
        #[cfg(feature = "firebase")]
        IdentityConfig::Firebase {
            project_id,
            timeout,
        } => {
            let verifier = FirebaseIdTokenVerifier::new(project_id.clone(), *timeout)?;
            tracing::info!(project_id = %project_id, "Verifying Firebase ID tokens");
            Ok(Arc::new(verifier))
        }
        #[cfg(not(feature = "firebase"))]
        IdentityConfig::Firebase { .. } => {
            tracing::error!(
                "Built without firebase feature - FIREBASE_PROJECT_ID ignored, using shared-secret tokens"
            );
            Ok(Arc::new(JwtIdTokenVerifier::new(quill_infra::JwtConfig::default())))
        }
        IdentityConfig::SharedSecret(jwt) => {
            tracing::info!(issuer = %jwt.issuer, "Verifying shared-secret ID tokens");
            Ok(Arc::new(JwtIdTokenVerifier::new(jwt.clone())))
        }
    }
}
