/// Markup sanitizer for user-supplied text.
pub trait Sanitizer: Send + Sync {
    /// Remove every tag and attribute from `input`, keeping plain text only.
    fn strip(&self, input: &str) -> String;
}
