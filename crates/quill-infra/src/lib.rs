//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//! This crate contains the post stores, ID token verifiers and the HTML
//! sanitizer.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No hosted services, in-memory store and shared-secret tokens only
//! - `firebase` - Firebase Realtime Database store and Google-issued ID tokens

pub mod auth;
pub mod sanitize;
pub mod store;

// Re-exports - always available
pub use auth::{JwtConfig, JwtIdTokenVerifier};
pub use sanitize::HtmlSanitizer;
pub use store::{InMemoryPostStore, PushIdGenerator};

// Re-exports - Firebase
#[cfg(feature = "firebase")]
pub use auth::FirebaseIdTokenVerifier;
#[cfg(feature = "firebase")]
pub use store::{FirebaseConfig, FirebasePostStore};
