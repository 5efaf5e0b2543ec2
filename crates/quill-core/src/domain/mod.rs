//! Domain entities - the core business objects.

mod post;

pub use post::{
    NewPost, Post, PostCollection, PostRecord, ServerTimestamp, TITLE_ELLIPSIS, TITLE_PREFIX_CHARS,
    derive_title, is_valid_key,
};
