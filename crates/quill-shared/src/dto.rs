//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Request to create a post. Accepted as JSON or as a urlencoded form.
///
/// Every field is optional on the wire so that a missing field reaches the
/// handler instead of failing extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// Identity token of the author.
    #[serde(default)]
    pub token: Option<String>,
}

/// A freshly created post: the stored fields plus the key it was stored under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub author: String,
    pub title: String,
    pub content: String,
    pub created: i64,
}
