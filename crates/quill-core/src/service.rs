//! Post workflows - the read paths and the gated create sequence.

use std::sync::Arc;

use crate::domain::{NewPost, Post, PostCollection, PostRecord, derive_title, is_valid_key};
use crate::error::StoreError;
use crate::policy::AuthorPolicy;
use crate::ports::{AuthError, IdTokenVerifier, PostStore, Sanitizer};

/// Raw create request as the client sent it.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub content: Option<String>,
    pub title: Option<String>,
    pub token: Option<String>,
}

/// How a create request ended.
///
/// Only store failures are errors; every other outcome is a normal answer
/// the HTTP layer renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The post was written and read back.
    Created { id: String, post: Post },
    /// No usable content after sanitization. Nothing was written.
    MissingContent,
    /// The ID token did not verify. Nothing was written.
    Unauthenticated(AuthError),
    /// The token verified but the subject may not post. Nothing was written.
    Forbidden { subject_id: String },
    /// The write went through but reading it back returned nothing.
    NotSaved { id: String },
}

/// Posts service. Stateless apart from the injected collaborators.
pub struct PostService {
    store: Arc<dyn PostStore>,
    verifier: Arc<dyn IdTokenVerifier>,
    sanitizer: Arc<dyn Sanitizer>,
    policy: AuthorPolicy,
}

impl PostService {
    pub fn new(
        store: Arc<dyn PostStore>,
        verifier: Arc<dyn IdTokenVerifier>,
        sanitizer: Arc<dyn Sanitizer>,
        policy: AuthorPolicy,
    ) -> Self {
        Self {
            store,
            verifier,
            sanitizer,
            policy,
        }
    }

    pub fn policy(&self) -> &AuthorPolicy {
        &self.policy
    }

    pub fn store_backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Every stored post keyed by id, records untouched.
    pub async fn list(&self) -> Result<PostCollection, StoreError> {
        self.store.read_all().await
    }

    /// A single post. Ids the store could never hold resolve to `None`.
    pub async fn get(&self, id: &str) -> Result<Option<PostRecord>, StoreError> {
        if !is_valid_key(id) {
            return Ok(None);
        }
        self.store.read_one(id).await
    }

    /// Run the create sequence. Each gate stops processing before any write.
    pub async fn create(&self, draft: PostDraft) -> Result<CreateOutcome, StoreError> {
        let content = match draft.content.as_deref().filter(|c| !c.is_empty()) {
            Some(raw) => self.sanitizer.strip(raw),
            None => return Ok(CreateOutcome::MissingContent),
        };
        if content.is_empty() {
            return Ok(CreateOutcome::MissingContent);
        }

        let token = match draft.token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => token,
            None => return Ok(CreateOutcome::Unauthenticated(AuthError::MissingToken)),
        };
        let identity = match self.verifier.verify(token).await {
            Ok(identity) => identity,
            Err(e) => return Ok(CreateOutcome::Unauthenticated(e)),
        };

        if !self.policy.allows(&identity.subject_id) {
            return Ok(CreateOutcome::Forbidden {
                subject_id: identity.subject_id,
            });
        }

        let title = draft
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(|raw| self.sanitizer.strip(raw))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| derive_title(&content));

        let new_post = NewPost::new(identity.author_name().to_string(), title, content);
        let id = self.store.generate_key();
        self.store.write(&id, &new_post).await?;

        Ok(match self.store.read_one(&id).await? {
            Some(record) => {
                let post =
                    Post::from_record(record).map_err(|e| StoreError::Decode(e.to_string()))?;
                CreateOutcome::Created { id, post }
            }
            None => CreateOutcome::NotSaved { id },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::ports::VerifiedIdentity;

    const AUTHOR_UID: &str = "uid-author";
    const CREATED_AT: i64 = 1_700_000_000_000;

    #[derive(Default)]
    struct FakeStore {
        posts: Mutex<PostCollection>,
        next: AtomicU32,
        drop_writes: bool,
    }

    #[async_trait]
    impl PostStore for FakeStore {
        fn backend(&self) -> &'static str {
            "fake"
        }

        async fn read_all(&self) -> Result<PostCollection, StoreError> {
            Ok(self.posts.lock().unwrap().clone())
        }

        async fn read_one(&self, id: &str) -> Result<Option<PostRecord>, StoreError> {
            Ok(self.posts.lock().unwrap().get(id).cloned())
        }

        fn generate_key(&self) -> String {
            format!("key-{:03}", self.next.fetch_add(1, Ordering::SeqCst))
        }

        async fn write(&self, key: &str, post: &NewPost) -> Result<(), StoreError> {
            if !self.drop_writes {
                let record = serde_json::to_value(post.clone().resolve(CREATED_AT)).unwrap();
                self.posts.lock().unwrap().insert(key.to_string(), record);
            }
            Ok(())
        }
    }

    struct FakeVerifier;

    #[async_trait]
    impl IdTokenVerifier for FakeVerifier {
        async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
            match token {
                "author-token" => Ok(VerifiedIdentity {
                    subject_id: AUTHOR_UID.into(),
                    display_name: Some("Ada".into()),
                    email: None,
                }),
                "stranger-token" => Ok(VerifiedIdentity {
                    subject_id: "uid-stranger".into(),
                    display_name: Some("Mallory".into()),
                    email: None,
                }),
                "expired-token" => Err(AuthError::TokenExpired),
                other => Err(AuthError::InvalidToken(format!("unknown token {other}"))),
            }
        }
    }

    /// Drops anything between angle brackets.
    struct TagStripper;

    impl Sanitizer for TagStripper {
        fn strip(&self, input: &str) -> String {
            let mut out = String::new();
            let mut in_tag = false;
            for c in input.chars() {
                match c {
                    '<' => in_tag = true,
                    '>' => in_tag = false,
                    c if !in_tag => out.push(c),
                    _ => {}
                }
            }
            out
        }
    }

    fn service_with(store: Arc<FakeStore>) -> PostService {
        PostService::new(
            store,
            Arc::new(FakeVerifier),
            Arc::new(TagStripper),
            AuthorPolicy::new([AUTHOR_UID]),
        )
    }

    fn draft(content: Option<&str>, title: Option<&str>, token: Option<&str>) -> PostDraft {
        PostDraft {
            content: content.map(String::from),
            title: title.map(String::from),
            token: token.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_create_derives_title_from_sanitized_content() {
        let store = Arc::new(FakeStore::default());
        let service = service_with(store.clone());

        let outcome = service
            .create(draft(Some("<b>Hi</b> there"), None, Some("author-token")))
            .await
            .unwrap();

        let CreateOutcome::Created { id, post } = outcome else {
            panic!("expected a created post");
        };
        assert_eq!(id, "key-000");
        assert_eq!(post.author, "Ada");
        assert_eq!(post.content, "Hi there");
        assert_eq!(post.title, "Hi there...");
        assert_eq!(post.created, CREATED_AT);
        assert_eq!(store.posts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_sanitizes_supplied_title() {
        let service = service_with(Arc::new(FakeStore::default()));

        let outcome = service
            .create(draft(
                Some("body"),
                Some("<i>Hello</i> world"),
                Some("author-token"),
            ))
            .await
            .unwrap();

        let CreateOutcome::Created { post, .. } = outcome else {
            panic!("expected a created post");
        };
        assert_eq!(post.title, "Hello world");
    }

    #[tokio::test]
    async fn test_missing_or_empty_content_writes_nothing() {
        let store = Arc::new(FakeStore::default());
        let service = service_with(store.clone());

        for content in [None, Some(""), Some("<p></p>")] {
            let outcome = service
                .create(draft(content, Some("t"), Some("author-token")))
                .await
                .unwrap();
            assert_eq!(outcome, CreateOutcome::MissingContent);
        }
        assert!(store.posts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_content_is_checked_before_token() {
        let service = service_with(Arc::new(FakeStore::default()));

        let outcome = service.create(draft(None, None, None)).await.unwrap();

        assert_eq!(outcome, CreateOutcome::MissingContent);
    }

    #[tokio::test]
    async fn test_bad_or_missing_token_is_unauthenticated() {
        let store = Arc::new(FakeStore::default());
        let service = service_with(store.clone());

        let outcome = service
            .create(draft(Some("hello"), None, Some("expired-token")))
            .await
            .unwrap();
        assert_eq!(outcome, CreateOutcome::Unauthenticated(AuthError::TokenExpired));

        let outcome = service
            .create(draft(Some("hello"), None, None))
            .await
            .unwrap();
        assert_eq!(outcome, CreateOutcome::Unauthenticated(AuthError::MissingToken));

        assert!(store.posts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unlisted_subject_is_forbidden() {
        let store = Arc::new(FakeStore::default());
        let service = service_with(store.clone());

        let outcome = service
            .create(draft(Some("hello"), None, Some("stranger-token")))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            CreateOutcome::Forbidden {
                subject_id: "uid-stranger".into()
            }
        );
        assert!(store.posts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_read_back_is_not_saved() {
        let store = Arc::new(FakeStore {
            drop_writes: true,
            ..FakeStore::default()
        });
        let service = service_with(store);

        let outcome = service
            .create(draft(Some("hello"), None, Some("author-token")))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            CreateOutcome::NotSaved {
                id: "key-000".into()
            }
        );
    }

    #[tokio::test]
    async fn test_get_rejects_unaddressable_ids() {
        let service = service_with(Arc::new(FakeStore::default()));

        assert_eq!(service.get("a.b").await.unwrap(), None);
        assert_eq!(service.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_returns_every_created_post() {
        let service = service_with(Arc::new(FakeStore::default()));

        for n in 0..3 {
            let content = format!("post number {n}");
            service
                .create(draft(Some(&content), None, Some("author-token")))
                .await
                .unwrap();
        }

        let posts = service.list().await.unwrap();
        assert_eq!(posts.len(), 3);
        assert_eq!(posts["key-002"]["content"], "post number 2");
    }

    #[tokio::test]
    async fn test_reads_pass_stored_records_through() {
        let store = Arc::new(FakeStore::default());
        store.posts.lock().unwrap().extend([
            (
                "-Na".to_string(),
                serde_json::json!({
                    "author": "Ada", "title": "A", "content": "A", "created": 1, "tags": "x"
                }),
            ),
            (
                "-Nb".to_string(),
                serde_json::json!({ "title": "B", "content": "B", "created": 2 }),
            ),
        ]);
        let service = service_with(store);

        let posts = service.list().await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts["-Na"]["tags"], "x");
        assert!(posts["-Nb"].get("author").is_none());

        let one = service.get("-Na").await.unwrap().unwrap();
        assert_eq!(one["tags"], "x");
    }

    #[tokio::test]
    async fn test_malformed_read_back_is_a_store_error() {
        struct HollowStore;

        #[async_trait]
        impl PostStore for HollowStore {
            fn backend(&self) -> &'static str {
                "hollow"
            }

            async fn read_all(&self) -> Result<PostCollection, StoreError> {
                Ok(PostCollection::new())
            }

            async fn read_one(&self, _id: &str) -> Result<Option<PostRecord>, StoreError> {
                Ok(Some(serde_json::json!({ "content": "hello" })))
            }

            fn generate_key(&self) -> String {
                "key-000".to_string()
            }

            async fn write(&self, _key: &str, _post: &NewPost) -> Result<(), StoreError> {
                Ok(())
            }
        }

        let service = PostService::new(
            Arc::new(HollowStore),
            Arc::new(FakeVerifier),
            Arc::new(TagStripper),
            AuthorPolicy::new([AUTHOR_UID]),
        );

        let result = service
            .create(draft(Some("hello"), None, Some("author-token")))
            .await;

        assert!(matches!(result, Err(StoreError::Decode(_))));
    }
}
