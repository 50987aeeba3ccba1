//! Render Module
//!
//! Front matter parsing, markdown rendering, the html template and the
//! composer that ties them to a target format.

mod compose;
mod front_matter;
mod markdown;
mod template;

pub use compose::{Composed, Composer, Presentation};
pub use front_matter::{
    first_heading, parse_text, split_front_matter, Attributes, FrontMatter, ParsedDocument,
    TitleMode,
};
pub use markdown::{ComrakRenderer, MarkdownRenderer};
pub use template::{
    default_template, html_template, not_found_page, TemplateFn, DEFAULT_STYLES, DEFAULT_TITLE,
};
