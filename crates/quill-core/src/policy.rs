//! Authorization rule for creating posts.

use std::collections::HashSet;

/// The set of subject ids allowed to author posts.
#[derive(Debug, Clone, Default)]
pub struct AuthorPolicy {
    authorized: HashSet<String>,
}

impl AuthorPolicy {
    pub fn new<I, S>(subject_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            authorized: subject_ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a comma-separated list of subject ids. Blank entries are skipped.
    pub fn from_list(list: &str) -> Self {
        Self::new(
            list.split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty()),
        )
    }

    pub fn allows(&self, subject_id: &str) -> bool {
        self.authorized.contains(subject_id)
    }

    /// True when nobody is allowed to post.
    pub fn is_empty(&self) -> bool {
        self.authorized.is_empty()
    }

    pub fn len(&self) -> usize {
        self.authorized.len()
    }
}
