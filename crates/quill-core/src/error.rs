//! Domain-level error types.

use thiserror::Error;

/// Errors raised by a [`PostStore`](crate::ports::PostStore) backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store connection failed: {0}")]
    Connection(String),

    #[error("Store request rejected: {0}")]
    Request(String),

    #[error("Stored data could not be decoded: {0}")]
    Decode(String),
}
