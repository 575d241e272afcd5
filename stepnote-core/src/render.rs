//! Markdown rendering seam
//!
//! Rendering markdown to HTML is a collaborator concern; the store only
//! guarantees that `body_html` is derived fresh from `body_md` on every read
//! and never persisted. Implementations are injected at construction.

/// Renders a tip's markdown body to HTML.
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, markdown: &str) -> String;
}

/// Placeholder renderer that returns the markdown unchanged. Useful in
/// tests and in deployments where the front end renders client-side.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughRenderer;

impl MarkdownRenderer for PassthroughRenderer {
    fn render(&self, markdown: &str) -> String {
        markdown.to_string()
    }
}
