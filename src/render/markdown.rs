//! Markdown rendering.

/// Turns markdown into an HTML fragment.
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, markdown: &str) -> String;
}

/// Comrak with the GitHub-flavoured extensions switched on. Inline html in
/// a text is passed through as written.
pub struct ComrakRenderer {
    options: comrak::Options<'static>,
}

impl ComrakRenderer {
    pub fn new() -> Self {
        let mut options = comrak::Options::default();
        options.extension.strikethrough = true;
        options.extension.table = true;
        options.extension.autolink = true;
        options.extension.tasklist = true;
        options.render.r#unsafe = true;
        Self { options }
    }
}

impl Default for ComrakRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer for ComrakRenderer {
    fn render(&self, markdown: &str) -> String {
        comrak::markdown_to_html(markdown, &self.options)
    }
}
