use async_trait::async_trait;

use crate::domain::{NewPost, PostCollection, PostRecord};
use crate::error::StoreError;

/// Post store - abstraction over the hosted document database.
///
/// The collection is append-only; there is no update or delete.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Short name of the backing store, reported by health checks.
    fn backend(&self) -> &'static str;

    /// Snapshot of the whole posts collection. Empty when nothing is stored.
    async fn read_all(&self) -> Result<PostCollection, StoreError>;

    /// The record stored under `posts/{id}`, if any, as stored.
    async fn read_one(&self, id: &str) -> Result<Option<PostRecord>, StoreError>;

    /// Allocate a fresh, collision-free key for a new child of the collection.
    fn generate_key(&self) -> String;

    /// Write `post` under `posts/{key}`, overwriting whatever was there.
    async fn write(&self, key: &str, post: &NewPost) -> Result<(), StoreError>;
}
