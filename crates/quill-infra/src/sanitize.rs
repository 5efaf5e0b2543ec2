//! HTML sanitizer built on ammonia.

use std::collections::HashSet;

use quill_core::ports::Sanitizer;

/// Elements whose text is dropped along with the markup.
const DROPPED_CONTENT_TAGS: [&str; 5] = ["script", "style", "textarea", "noscript", "option"];

/// Strips every tag and attribute.
///
/// Other elements are unwrapped to their text, comments are removed and the
/// remaining text stays HTML-escaped, so the result can be embedded in a page
/// as-is.
#[derive(Debug, Clone)]
pub struct HtmlSanitizer {
    dropped_content: HashSet<&'static str>,
}

impl HtmlSanitizer {
    pub fn new() -> Self {
        Self {
            dropped_content: DROPPED_CONTENT_TAGS.into_iter().collect(),
        }
    }
}

impl Default for HtmlSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sanitizer for HtmlSanitizer {
    fn strip(&self, input: &str) -> String {
        ammonia::Builder::empty()
            .clean_content_tags(self.dropped_content.clone())
            .clean(input)
            .to_string()
    }
}
