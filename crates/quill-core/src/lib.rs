//! # Quill Core
//!
//! The domain layer of the Quill posts API.
//! This crate contains the post model, the ports infrastructure must
//! implement, and the create-post workflow. It has no infrastructure
//! dependencies.

pub mod domain;
pub mod error;
pub mod policy;
pub mod ports;
pub mod service;

pub use error::StoreError;
pub use policy::AuthorPolicy;
pub use service::{CreateOutcome, PostDraft, PostService};
