//! In-memory post store - used when no hosted database is configured.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use quill_core::domain::{NewPost, PostCollection, PostRecord};
use quill_core::error::StoreError;
use quill_core::ports::PostStore;

use super::push_id::PushIdGenerator;

/// In-memory store using a BTreeMap behind an async RwLock.
///
/// Server timestamps are resolved with this process's clock at write time.
/// Note: Data is lost on process restart.
pub struct InMemoryPostStore {
    posts: RwLock<PostCollection>,
    keys: PushIdGenerator,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(PostCollection::new()),
            keys: PushIdGenerator::new(),
        }
    }
}

impl Default for InMemoryPostStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn read_all(&self) -> Result<PostCollection, StoreError> {
        Ok(self.posts.read().await.clone())
    }

    async fn read_one(&self, id: &str) -> Result<Option<PostRecord>, StoreError> {
        Ok(self.posts.read().await.get(id).cloned())
    }

    fn generate_key(&self) -> String {
        self.keys.next_id()
    }

    async fn write(&self, key: &str, post: &NewPost) -> Result<(), StoreError> {
        let created = Utc::now().timestamp_millis();
        let record = serde_json::to_value(post.clone().resolve(created))
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        let mut posts = self.posts.write().await;
        posts.insert(key.to_string(), record);
        tracing::debug!(post_id = %key, "Post written to in-memory store");
        Ok(())
    }
}
