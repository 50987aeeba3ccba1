//! Front Matter Module
//!
//! Splits a leading `---` YAML block from a text and derives the document
//! title and description.

use std::str::FromStr;

use serde::Serialize;
use serde_yaml::{Mapping, Value};
use tracing::warn;

const DELIMITER: &str = "---";

/// How a document title is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleMode {
    /// Only the `title` attribute of the front matter
    FrontMatter,
    /// The `title` attribute, else the first `# ` heading
    Heading,
}

impl FromStr for TitleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "front-matter" | "frontmatter" => Ok(TitleMode::FrontMatter),
            "heading" => Ok(TitleMode::Heading),
            other => Err(format!("unknown title mode `{}`", other)),
        }
    }
}

/// Metadata attributes the server understands. Others are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// A text split into its metadata and the markdown that follows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter<'a> {
    pub attributes: Attributes,
    pub body: &'a str,
}

impl<'a> FrontMatter<'a> {
    fn plain(text: &'a str) -> Self {
        Self {
            attributes: Attributes::default(),
            body: text,
        }
    }
}

/// The `{body, title, description}` view of a text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedDocument {
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Splits off the front matter block. Texts without one, or with YAML that
/// does not parse, come back whole with empty attributes.
pub fn split_front_matter(text: &str) -> FrontMatter<'_> {
    let Some(rest) = opening_delimiter(text) else {
        return FrontMatter::plain(text);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return match parse_attributes(yaml) {
                Ok(attributes) => FrontMatter { attributes, body },
                Err(err) => {
                    warn!(error = %err, "Ignoring malformed front matter");
                    FrontMatter::plain(text)
                }
            };
        }
        offset += line.len();
    }

    FrontMatter::plain(text)
}

fn opening_delimiter(text: &str) -> Option<&str> {
    let (first, rest) = text.split_once('\n')?;
    (first.trim_end() == DELIMITER).then_some(rest)
}

fn parse_attributes(yaml: &str) -> Result<Attributes, serde_yaml::Error> {
    if yaml.trim().is_empty() {
        return Ok(Attributes::default());
    }
    let mapping: Mapping = serde_yaml::from_str(yaml)?;
    Ok(Attributes {
        title: scalar(&mapping, "title"),
        description: scalar(&mapping, "description"),
    })
}

fn scalar(mapping: &Mapping, key: &str) -> Option<String> {
    match mapping.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Text of the first level-one ATX heading.
pub fn first_heading(markdown: &str) -> Option<String> {
    markdown.lines().find_map(|line| {
        let heading = line.trim_start().strip_prefix("# ")?.trim();
        (!heading.is_empty()).then(|| heading.to_string())
    })
}

/// Derives the document view of `text`.
pub fn parse_text(text: &str, mode: TitleMode) -> ParsedDocument {
    let FrontMatter { attributes, body } = split_front_matter(text);
    let title = match mode {
        TitleMode::FrontMatter => attributes.title,
        TitleMode::Heading => attributes.title.or_else(|| first_heading(body)),
    };
    ParsedDocument {
        body: body.to_string(),
        title,
        description: attributes.description,
    }
}
