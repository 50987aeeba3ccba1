//! Dynamic route handlers
//!
//! A handler produces content at request time. It sees the request url,
//! the parameters bound by the matcher and the same cache-or-disk
//! primitives file routes use.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::content::ContentAccess;
use crate::error::ContentError;

/// Post-processes rendered html before it is templated.
pub type HtmlTransform = Arc<dyn Fn(String) -> String + Send + Sync>;

// == Route Output ==
/// What a handler produced.
#[derive(Clone)]
pub enum RouteOutput {
    /// Markdown, composed like a file for the requested target
    Markdown {
        text: String,
        html_transform: Option<HtmlTransform>,
    },
    /// Pre-rendered html
    Html(String),
    /// Sent as-is whatever the requested target
    Raw(String),
}

impl RouteOutput {
    pub fn markdown(text: impl Into<String>) -> Self {
        RouteOutput::Markdown {
            text: text.into(),
            html_transform: None,
        }
    }
}

impl From<String> for RouteOutput {
    fn from(text: String) -> Self {
        RouteOutput::markdown(text)
    }
}

impl From<&str> for RouteOutput {
    fn from(text: &str) -> Self {
        RouteOutput::markdown(text)
    }
}

impl fmt::Debug for RouteOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteOutput::Markdown {
                text,
                html_transform,
            } => f
                .debug_struct("Markdown")
                .field("text", text)
                .field("html_transform", &html_transform.is_some())
                .finish(),
            RouteOutput::Html(html) => f.debug_tuple("Html").field(html).finish(),
            RouteOutput::Raw(raw) => f.debug_tuple("Raw").field(raw).finish(),
        }
    }
}

// == Handler Error ==
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("{0}")]
    Failed(String),

    #[error("handler panicked")]
    Panicked,

    #[error(transparent)]
    Content(#[from] ContentError),
}

impl HandlerError {
    pub fn failed(message: impl Into<String>) -> Self {
        HandlerError::Failed(message.into())
    }
}

pub type HandlerResult = Result<RouteOutput, HandlerError>;

// == Handler Context ==
/// Everything a handler may look at.
#[derive(Clone)]
pub struct HandlerContext {
    /// Request path and query
    pub url: String,
    /// Parameters bound from `:name` segments
    pub params: HashMap<String, String>,
    pub content: ContentAccess,
}

impl HandlerContext {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

// == Handler ==
#[async_trait]
pub trait Handler: Send + Sync {
    async fn produce(&self, ctx: HandlerContext) -> HandlerResult;
}

#[async_trait]
impl<F, Fut> Handler for F
where
    F: Fn(HandlerContext) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    async fn produce(&self, ctx: HandlerContext) -> HandlerResult {
        (self)(ctx).await
    }
}

/// Boxes an async closure as a handler.
pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn Handler>
where
    F: Fn(HandlerContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    Arc::new(f)
}

/// Runs a handler on its own task so a panic surfaces as an error instead
/// of tearing down the connection.
pub async fn invoke(handler: Arc<dyn Handler>, ctx: HandlerContext) -> HandlerResult {
    match tokio::spawn(async move { handler.produce(ctx).await }).await {
        Ok(result) => result,
        Err(err) if err.is_panic() => Err(HandlerError::Panicked),
        Err(err) => Err(HandlerError::Failed(err.to_string())),
    }
}
