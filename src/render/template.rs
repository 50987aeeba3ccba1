//! HTML document template.

use std::sync::Arc;

pub const DEFAULT_TITLE: &str = "Document";
pub const DEFAULT_STYLES: &str = "body{font-family: monospace}";

/// `(rendered body, title, styles) -> html document`
pub type TemplateFn = Arc<dyn Fn(&str, Option<&str>, Option<&str>) -> String + Send + Sync>;

/// Wraps a rendered body in a full HTML5 document.
pub fn html_template(body: &str, title: Option<&str>, styles: Option<&str>) -> String {
    let title = escape_text(title.unwrap_or(DEFAULT_TITLE));
    let styles = styles.unwrap_or(DEFAULT_STYLES);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <meta http-equiv="X-UA-Compatible" content="ie=edge">
  <title>{title}</title>
  <style>{styles}</style>
</head>
<body>
  {body}
</body>
</html>"#
    )
}

/// Escapes `&`, `<` and `>` so text cannot open or close elements.
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// The default template as a [`TemplateFn`].
pub fn default_template() -> TemplateFn {
    Arc::new(html_template)
}

/// Canned body of every html 404.
pub fn not_found_page() -> String {
    html_template(
        "<h1>Sorry, that page wasn't found.</h1>",
        Some("Page Not Found"),
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let html = html_template("<p>x</p>", None, None);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Document</title>"));
        assert!(html.contains("<style>body{font-family: monospace}</style>"));
        assert!(html.contains("<p>x</p>"));
    }

    #[test]
    fn test_overrides() {
        let html = html_template("", Some("Blog"), Some("h1{color:red}"));
        assert!(html.contains("<title>Blog</title>"));
        assert!(html.contains("<style>h1{color:red}</style>"));
    }

    #[test]
    fn test_title_is_escaped() {
        let html = html_template("", Some("</title><script>alert(1)</script> & co"), None);
        assert!(html.contains(
            "<title>&lt;/title&gt;&lt;script&gt;alert(1)&lt;/script&gt; &amp; co</title>"
        ));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_not_found_page() {
        let html = not_found_page();
        assert!(html.contains("<title>Page Not Found</title>"));
        assert!(html.contains("Sorry, that page wasn't found."));
    }
}
