//! Firebase Realtime Database store over the REST API.
//!
//! Every path is addressed as `{database_url}/{path}.json`. Reads of a path
//! that holds nothing return JSON `null`. Server values such as
//! `{".sv": "timestamp"}` in a `PUT` body are resolved by the database.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use quill_core::domain::{NewPost, PostCollection, PostRecord};
use quill_core::error::StoreError;
use quill_core::ports::PostStore;

use super::push_id::PushIdGenerator;

/// Name of the collection every post lives under.
const COLLECTION: &str = "posts";

/// Firebase store configuration.
#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    /// Database root, e.g. `https://my-project-default-rtdb.firebaseio.com`.
    pub database_url: String,
    /// Database secret or OAuth access token, sent as the `auth` parameter.
    pub auth: Option<String>,
    pub timeout: Duration,
}

/// Realtime Database backed post store.
pub struct FirebasePostStore {
    client: Client,
    config: FirebaseConfig,
    keys: PushIdGenerator,
}

impl FirebasePostStore {
    pub fn new(config: FirebaseConfig) -> Result<Self, StoreError> {
        // Reject an unusable URL at startup rather than on the first request.
        Self::url_for(&config, None)?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        tracing::info!(database_url = %config.database_url, "Firebase post store configured");

        Ok(Self {
            client,
            config,
            keys: PushIdGenerator::new(),
        })
    }

    /// REST URL for the collection (`key = None`) or one of its children.
    fn url_for(config: &FirebaseConfig, key: Option<&str>) -> Result<Url, StoreError> {
        let mut url = Url::parse(&config.database_url)
            .map_err(|e| StoreError::Connection(format!("invalid database URL: {e}")))?;

        url.path_segments_mut()
            .map_err(|_| StoreError::Connection("database URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(match key {
                Some(key) => vec![COLLECTION.to_string(), format!("{key}.json")],
                None => vec![format!("{COLLECTION}.json")],
            });

        if let Some(auth) = &config.auth {
            url.query_pairs_mut().append_pair("auth", auth);
        }

        Ok(url)
    }

    fn request(&self, method: Method, key: Option<&str>) -> Result<RequestBuilder, StoreError> {
        Ok(self
            .client
            .request(method, Self::url_for(&self.config, key)?))
    }

    /// Send a request and decode a possibly-`null` JSON body.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Option<T>, StoreError> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Request(format!("{status}: {body}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        decode_snapshot(&bytes)
    }
}

/// Decode a REST snapshot body; `null` means nothing is stored there.
fn decode_snapshot<T: DeserializeOwned>(body: &[u8]) -> Result<Option<T>, StoreError> {
    serde_json::from_slice::<Option<T>>(body).map_err(|e| StoreError::Decode(e.to_string()))
}

#[async_trait]
impl PostStore for FirebasePostStore {
    fn backend(&self) -> &'static str {
        "firebase"
    }

    async fn read_all(&self) -> Result<PostCollection, StoreError> {
        let request = self.request(Method::GET, None)?;
        let posts = self.send::<PostCollection>(request).await?;
        Ok(posts.unwrap_or_default())
    }

    async fn read_one(&self, id: &str) -> Result<Option<PostRecord>, StoreError> {
        let request = self.request(Method::GET, Some(id))?;
        self.send::<PostRecord>(request).await
    }

    fn generate_key(&self) -> String {
        self.keys.next_id()
    }

    async fn write(&self, key: &str, post: &NewPost) -> Result<(), StoreError> {
        let request = self.request(Method::PUT, Some(key))?.json(post);
        // The database echoes the resolved record; callers read it back
        // explicitly, so the echo is only checked for well-formedness.
        self.send::<serde_json::Value>(request).await?;
        tracing::debug!(post_id = %key, "Post written to Firebase");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(database_url: &str, auth: Option<&str>) -> FirebaseConfig {
        FirebaseConfig {
            database_url: database_url.to_string(),
            auth: auth.map(String::from),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_collection_url() {
        let url = FirebasePostStore::url_for(&config("https://demo.firebaseio.com", None), None)
            .unwrap();
        assert_eq!(url.as_str(), "https://demo.firebaseio.com/posts.json");
    }

    #[test]
    fn test_child_url_with_trailing_slash_and_auth() {
        let url = FirebasePostStore::url_for(
            &config("https://demo.firebaseio.com/", Some("s3cret")),
            Some("-NqYb3kQ9xZ0aBcDeFgH"),
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://demo.firebaseio.com/posts/-NqYb3kQ9xZ0aBcDeFgH.json?auth=s3cret"
        );
    }

    #[test]
    fn test_child_key_is_percent_encoded() {
        let url = FirebasePostStore::url_for(&config("https://demo.firebaseio.com", None), Some("a b?"))
            .unwrap();
        assert_eq!(url.as_str(), "https://demo.firebaseio.com/posts/a%20b%3F.json");
    }

    #[test]
    fn test_invalid_database_url_is_rejected() {
        assert!(FirebasePostStore::new(config("not a url", None)).is_err());
    }

    #[test]
    fn test_decode_null_snapshot() {
        let posts: Option<PostCollection> = decode_snapshot(b"null").unwrap();
        assert!(posts.is_none());
    }

    #[test]
    fn test_decode_collection_snapshot() {
        let body = br#"{
            "-Nb": {"author": "Ada", "title": "B...", "content": "B", "created": 2},
            "-Na": {"author": "Ada", "title": "A...", "content": "A", "created": 1}
        }"#;

        let posts: PostCollection = decode_snapshot(body).unwrap().unwrap();

        assert_eq!(posts.keys().collect::<Vec<_>>(), ["-Na", "-Nb"]);
        assert_eq!(posts["-Na"]["created"], 1);
    }

    #[test]
    fn test_decode_keeps_fields_as_stored() {
        let body = br#"{
            "-Na": {"author": "Ada", "title": "A", "content": "A", "created": 1, "tags": "x"},
            "-Nb": {"title": "B", "content": "B", "created": 2}
        }"#;

        let posts: PostCollection = decode_snapshot(body).unwrap().unwrap();

        assert_eq!(posts["-Na"]["tags"], "x");
        assert_eq!(
            posts["-Nb"],
            serde_json::json!({"title": "B", "content": "B", "created": 2})
        );
    }

    #[test]
    fn test_decode_single_record_as_stored() {
        let record: PostRecord = decode_snapshot(br#"{"author": 7, "extra": [1, 2]}"#)
            .unwrap()
            .unwrap();
        assert_eq!(record, serde_json::json!({"author": 7, "extra": [1, 2]}));
    }

    #[test]
    fn test_decode_malformed_body() {
        let result = decode_snapshot::<PostCollection>(b"<html>oops</html>");
        assert!(matches!(result, Err(StoreError::Decode(_))));
    }
}
