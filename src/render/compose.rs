//! Response Composer
//!
//! Turns resolved text into the body for the requested target.

use std::sync::Arc;

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};

use crate::error::ContentError;
use crate::render::{
    default_template, parse_text, ComrakRenderer, MarkdownRenderer, ParsedDocument, TemplateFn,
    TitleMode,
};
use crate::routing::{HtmlTransform, Target};

// == Composed ==
/// A finished response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Composed {
    Raw(String),
    Json(ParsedDocument),
    Html(String),
    NotFound,
}

impl Composed {
    /// Turns [`Composed::NotFound`] into an error so callers can `?` it.
    pub fn found(self, path: &str) -> Result<Self, ContentError> {
        match self {
            Composed::NotFound => Err(ContentError::NotFound(path.to_string())),
            found => Ok(found),
        }
    }
}

impl IntoResponse for Composed {
    fn into_response(self) -> Response {
        match self {
            Composed::Raw(text) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                text,
            )
                .into_response(),
            Composed::Json(doc) => Json(doc).into_response(),
            Composed::Html(html) => Html(html).into_response(),
            Composed::NotFound => ContentError::NotFound(String::new()).into_response(),
        }
    }
}

// == Presentation ==
/// Per-route overrides applied while composing html.
#[derive(Default, Clone, Copy)]
pub struct Presentation<'a> {
    /// Used when the text carries no title of its own
    pub title: Option<&'a str>,
    pub styles: Option<&'a str>,
    pub html_transform: Option<&'a HtmlTransform>,
}

// == Composer ==
pub struct Composer {
    renderer: Arc<dyn MarkdownRenderer>,
    template: TemplateFn,
    title_mode: TitleMode,
}

impl Composer {
    pub fn new(
        renderer: Arc<dyn MarkdownRenderer>,
        template: TemplateFn,
        title_mode: TitleMode,
    ) -> Self {
        Self {
            renderer,
            template,
            title_mode,
        }
    }

    /// Comrak renderer with the default template.
    pub fn with_title_mode(title_mode: TitleMode) -> Self {
        Self::new(Arc::new(ComrakRenderer::new()), default_template(), title_mode)
    }

    pub fn title_mode(&self) -> TitleMode {
        self.title_mode
    }

    // == Compose ==
    /// Composes markdown `text` for `target`.
    ///
    /// Absent text composes to an empty raw body; json and html need text.
    pub fn compose(&self, text: Option<&str>, target: Option<Target>) -> Composed {
        self.compose_with(text, target, Presentation::default())
    }

    pub fn compose_with(
        &self,
        text: Option<&str>,
        target: Option<Target>,
        presentation: Presentation<'_>,
    ) -> Composed {
        match (target, text) {
            (Some(Target::Raw), text) => Composed::Raw(text.unwrap_or_default().to_string()),
            (Some(Target::Json), Some(text)) => Composed::Json(parse_text(text, self.title_mode)),
            (Some(Target::Html), Some(text)) => {
                let doc = parse_text(text, self.title_mode);
                let mut html = self.renderer.render(&doc.body);
                if let Some(transform) = presentation.html_transform {
                    html = transform(html);
                }
                let title = doc.title.as_deref().or(presentation.title);
                Composed::Html((self.template)(&html, title, presentation.styles))
            }
            _ => Composed::NotFound,
        }
    }

    /// Composes an already rendered html fragment for `target`.
    pub fn compose_html(
        &self,
        html: &str,
        target: Option<Target>,
        presentation: Presentation<'_>,
    ) -> Composed {
        match target {
            Some(Target::Raw) => Composed::Raw(html.to_string()),
            Some(Target::Json) => Composed::Json(ParsedDocument {
                body: html.to_string(),
                title: presentation.title.map(str::to_string),
                description: None,
            }),
            Some(Target::Html) => {
                Composed::Html((self.template)(html, presentation.title, presentation.styles))
            }
            None => Composed::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composer(mode: TitleMode) -> Composer {
        Composer::with_title_mode(mode)
    }

    #[test]
    fn test_raw_is_unmodified() {
        let composed = composer(TitleMode::FrontMatter)
            .compose(Some("# hi, this is a test"), Some(Target::Raw));
        assert_eq!(composed, Composed::Raw("# hi, this is a test".into()));
    }

    #[test]
    fn test_raw_without_text_is_empty() {
        let composed = composer(TitleMode::FrontMatter).compose(None, Some(Target::Raw));
        assert_eq!(composed, Composed::Raw(String::new()));
    }

    #[test]
    fn test_json_front_matter_mode() {
        let composed = composer(TitleMode::FrontMatter)
            .compose(Some("# hi, this is a test"), Some(Target::Json));
        assert_eq!(
            composed,
            Composed::Json(ParsedDocument {
                body: "# hi, this is a test".into(),
                title: None,
                description: None,
            })
        );
    }

    #[test]
    fn test_json_heading_mode() {
        let composed =
            composer(TitleMode::Heading).compose(Some("# hi, this is a test"), Some(Target::Json));
        let Composed::Json(doc) = composed else {
            panic!("expected json");
        };
        assert_eq!(doc.title.as_deref(), Some("hi, this is a test"));
        assert_eq!(doc.body, "# hi, this is a test");
    }

    #[test]
    fn test_html_renders_and_templates() {
        let composed = composer(TitleMode::FrontMatter).compose(
            Some("---\ntitle: Greeting\n---\n# hi"),
            Some(Target::Html),
        );
        let Composed::Html(html) = composed else {
            panic!("expected html");
        };
        assert!(html.contains("<title>Greeting</title>"));
        assert!(html.contains("<h1>hi</h1>"));
        assert!(!html.contains("title: Greeting"));
    }

    #[test]
    fn test_html_keeps_inline_html() {
        let composed = composer(TitleMode::FrontMatter).compose(
            Some("<div class=\"note\">kept</div>\n\nhi"),
            Some(Target::Html),
        );
        let Composed::Html(html) = composed else {
            panic!("expected html");
        };
        assert!(html.contains("<div class=\"note\">kept</div>"));
        assert!(html.contains("<p>hi</p>"));
    }

    #[test]
    fn test_html_presentation_overrides() {
        let transform: HtmlTransform = Arc::new(|html: String| html.replace("h1", "h2"));
        let composed = composer(TitleMode::FrontMatter).compose_with(
            Some("# hi"),
            Some(Target::Html),
            Presentation {
                title: Some("Route title"),
                styles: Some("p{}"),
                html_transform: Some(&transform),
            },
        );
        let Composed::Html(html) = composed else {
            panic!("expected html");
        };
        assert!(html.contains("<title>Route title</title>"));
        assert!(html.contains("<style>p{}</style>"));
        assert!(html.contains("<h2>hi</h2>"));
    }

    #[test]
    fn test_missing_text_or_target_is_not_found() {
        let composer = composer(TitleMode::FrontMatter);
        assert_eq!(composer.compose(None, Some(Target::Json)), Composed::NotFound);
        assert_eq!(composer.compose(None, Some(Target::Html)), Composed::NotFound);
        assert_eq!(composer.compose(Some("text"), None), Composed::NotFound);
    }

    #[test]
    fn test_compose_html_fragment() {
        let composer = composer(TitleMode::FrontMatter);
        let presentation = Presentation {
            title: Some("Blog"),
            ..Presentation::default()
        };

        assert_eq!(
            composer.compose_html("<p>x</p>", Some(Target::Raw), presentation),
            Composed::Raw("<p>x</p>".into())
        );
        let Composed::Html(html) =
            composer.compose_html("<p>x</p>", Some(Target::Html), presentation)
        else {
            panic!("expected html");
        };
        assert!(html.contains("<title>Blog</title>"));
        assert!(html.contains("<p>x</p>"));
    }

    #[test]
    fn test_found() {
        assert!(Composed::NotFound.found("/x").is_err());
        assert!(Composed::Raw("x".into()).found("/x").is_ok());
    }
}
