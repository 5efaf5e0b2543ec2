use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Number of content characters kept when a title is derived.
pub const TITLE_PREFIX_CHARS: usize = 20;

/// Suffix appended to a derived title.
pub const TITLE_ELLIPSIS: &str = "...";

/// Longest key the hosted store accepts, in bytes.
const MAX_KEY_BYTES: usize = 768;

/// Post entity - exactly the fields kept under `posts/{id}` in the store.
///
/// The id is not part of the record; it is the key the record lives under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub author: String,
    pub title: String,
    pub content: String,
    /// Milliseconds since the Unix epoch, assigned by the store's clock.
    pub created: i64,
}

impl Post {
    /// Decode a raw stored record into the typed post.
    pub fn from_record(record: PostRecord) -> Result<Self, serde_json::Error> {
        serde_json::from_value(record)
    }
}

/// A record exactly as the store holds it under `posts/{id}`.
///
/// Reads hand records through untouched, so fields written by other clients
/// survive and a record missing a field is still served.
pub type PostRecord = Value;

/// The whole posts collection keyed by post id.
///
/// Push keys sort chronologically, so iteration order is creation order.
pub type PostCollection = BTreeMap<String, PostRecord>;

/// Placeholder the store replaces with its own clock at write time.
///
/// Serializes to the Realtime Database server value `{".sv": "timestamp"}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServerTimestamp;

impl Serialize for ServerTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(".sv", "timestamp")?;
        map.end()
    }
}

/// A post ready to be written, with the timestamp still left to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPost {
    pub author: String,
    pub title: String,
    pub content: String,
    pub created: ServerTimestamp,
}

impl NewPost {
    pub fn new(author: String, title: String, content: String) -> Self {
        Self {
            author,
            title,
            content,
            created: ServerTimestamp,
        }
    }

    /// Materialize the stored record once the store has picked a timestamp.
    pub fn resolve(self, created: i64) -> Post {
        Post {
            author: self.author,
            title: self.title,
            content: self.content,
            created,
        }
    }
}

/// Title used when the client does not send one.
///
/// Takes the first [`TITLE_PREFIX_CHARS`] characters of the (already
/// sanitized) content and always appends [`TITLE_ELLIPSIS`], even when the
/// content is shorter than the prefix.
pub fn derive_title(content: &str) -> String {
    let mut title: String = content.chars().take(TITLE_PREFIX_CHARS).collect();
    title.push_str(TITLE_ELLIPSIS);
    title
}

/// Whether `key` can address a child of the posts collection.
///
/// Keys may not be empty, exceed the store's length limit, contain path
/// separators, `.`, `$`, `#`, `[`, `]` or ASCII control characters.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= MAX_KEY_BYTES
        && !key
            .chars()
            .any(|c| matches!(c, '.' | '$' | '#' | '[' | ']' | '/') || c.is_ascii_control())
}
