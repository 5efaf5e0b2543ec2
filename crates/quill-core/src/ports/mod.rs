//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod sanitize;
mod store;

pub use auth::{AuthError, IdTokenVerifier, VerifiedIdentity};
pub use sanitize::Sanitizer;
pub use store::PostStore;
