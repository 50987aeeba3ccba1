//! Content Service
//!
//! The request pipeline: path -> target and endpoint -> route or file ->
//! composed body. One service owns the cache client and the route table of
//! a server and is shared by every request.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::cache::CacheClient;
use crate::config::{Config, MissingFilePolicy};
use crate::content::{ContentAccess, FsSource, TextSource};
use crate::error::{ContentError, Result};
use crate::render::{Composed, Composer, Presentation};
use crate::routing::{
    invoke, match_route, resolve_request, ApiRoutes, BarePathRouteMap, HandlerContext,
    HandlerRoute, Route, RouteMap, RouteOutput, RouteTable, Target,
};

// == Content Service ==
pub struct ContentService {
    cache: Arc<CacheClient>,
    routes: RouteTable,
    source: Arc<dyn TextSource>,
    composer: Composer,
    api_routes: ApiRoutes,
    route_map: Option<Arc<dyn RouteMap>>,
    texts_dir: String,
    extension: String,
    flush_on_start: bool,
    missing_file: MissingFilePolicy,
}

impl ContentService {
    // == Constructors ==
    /// Wires the service from configuration with the filesystem as source.
    pub fn from_config(config: &Config, cache: Arc<CacheClient>, routes: RouteTable) -> Self {
        let route_map: Option<Arc<dyn RouteMap>> = if config.bare_paths {
            Some(Arc::new(BarePathRouteMap::for_namespace(&config.namespace)))
        } else {
            None
        };

        Self {
            cache,
            routes,
            source: Arc::new(FsSource),
            composer: Composer::with_title_mode(config.title_mode),
            api_routes: ApiRoutes::new(&config.namespace),
            route_map,
            texts_dir: config.texts_dir.clone(),
            extension: config.content_extension.clone(),
            flush_on_start: config.flush_on_start,
            missing_file: config.missing_file,
        }
    }

    pub fn with_source(mut self, source: Arc<dyn TextSource>) -> Self {
        self.source = source;
        self
    }

    pub fn with_route_map(mut self, route_map: Arc<dyn RouteMap>) -> Self {
        self.route_map = Some(route_map);
        self
    }

    pub fn with_composer(mut self, composer: Composer) -> Self {
        self.composer = composer;
        self
    }

    pub fn cache(&self) -> &CacheClient {
        &self.cache
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    // == Resolve ==
    /// Resolves a request url (path and optional query) to a body.
    ///
    /// Every failure comes back as an error; with [`MissingFilePolicy::Exit`]
    /// an unreadable text terminates the process instead.
    pub async fn resolve(&self, url: &str) -> Result<Composed> {
        match self.resolve_inner(url).await {
            Err(err @ ContentError::DiskRead { .. }) => {
                if self.missing_file == MissingFilePolicy::Exit {
                    error!(error = %err, "Unreadable text, exiting");
                    std::process::exit(1);
                }
                error!(error = %err, "Unreadable text");
                Err(err)
            }
            other => other,
        }
    }

    async fn resolve_inner(&self, url: &str) -> Result<Composed> {
        let cache = self.cache.connect(self.flush_on_start).await;
        let path = url.split_once('?').map_or(url, |(path, _)| path);

        let request = resolve_request(path, &self.api_routes, self.route_map.as_deref())
            .ok_or_else(|| ContentError::NotFound(path.to_string()))?;
        let endpoint = request
            .endpoint
            .strip_prefix('/')
            .unwrap_or(&request.endpoint);
        let content = ContentAccess::new(
            cache,
            self.source.clone(),
            self.texts_dir.clone(),
            self.extension.clone(),
        );

        let matched = match_route(&self.routes, endpoint);
        debug!(path, endpoint, route = ?matched.route_key, "Resolved request");

        let route = matched
            .route_key
            .as_deref()
            .and_then(|key| self.routes.get(key).map(|route| (key, route)));

        let composed = match route {
            Some((_, Route::Static { text })) => {
                self.composer.compose(Some(text.as_str()), request.target)
            }
            Some((key, Route::Handler(route))) => {
                let ctx = HandlerContext {
                    url: url.to_string(),
                    params: matched.params,
                    content,
                };
                self.run_handler(key, route, ctx, request.target).await?
            }
            None => self.serve_file(endpoint, &content, request.target).await?,
        };

        composed.found(path)
    }

    async fn run_handler(
        &self,
        key: &str,
        route: &HandlerRoute,
        ctx: HandlerContext,
        target: Option<Target>,
    ) -> Result<Composed> {
        let output = invoke(route.handler.clone(), ctx).await.map_err(|err| {
            warn!(route = key, error = %err, "Handler failed");
            ContentError::HandlerFailure {
                route: key.to_string(),
                message: err.to_string(),
            }
        })?;

        let presentation = Presentation {
            title: route.title.as_deref(),
            styles: route.styles.as_deref(),
            html_transform: None,
        };
        let composed = match &output {
            RouteOutput::Markdown {
                text,
                html_transform,
            } => self.composer.compose_with(
                Some(text.as_str()),
                target,
                Presentation {
                    html_transform: html_transform.as_ref(),
                    ..presentation
                },
            ),
            RouteOutput::Html(html) => self.composer.compose_html(html, target, presentation),
            RouteOutput::Raw(body) => Composed::Raw(body.clone()),
        };
        Ok(composed)
    }

    async fn serve_file(
        &self,
        endpoint: &str,
        content: &ContentAccess,
        target: Option<Target>,
    ) -> Result<Composed> {
        let filename = format!("{}{}", endpoint, content.extension());
        let texts = content.list_texts().await?;
        if !texts.iter().any(|text| *text == filename) {
            return Err(ContentError::NotFound(endpoint.to_string()));
        }

        let text = content.fetch(&content.text_path(&filename)).await?;
        match text {
            Some(text) => Ok(self.composer.compose(Some(text.as_str()), target)),
            None => Err(ContentError::NotFound(endpoint.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use crate::render::{ParsedDocument, TitleMode};
    use crate::routing::{handler_fn, HandlerError};

    fn service(routes: RouteTable) -> ContentService {
        ContentService::from_config(
            &Config::default(),
            Arc::new(CacheClient::memory(Arc::new(MemoryStore::new()))),
            routes,
        )
    }

    fn routes() -> RouteTable {
        RouteTable::new()
            .with_static("test", "# hi, this is a test")
            .with_handler(
                "user/:id",
                handler_fn(|ctx: HandlerContext| async move {
                    let id = ctx.param("id").unwrap_or_default().to_string();
                    Ok(RouteOutput::markdown(format!("# user {}", id)))
                }),
            )
            .with_handler(
                "echo",
                handler_fn(|ctx: HandlerContext| async move { Ok(RouteOutput::Raw(ctx.url)) }),
            )
            .with_handler(
                "broken",
                handler_fn(|_ctx: HandlerContext| async move {
                    Err(HandlerError::failed("upstream unavailable"))
                }),
            )
    }

    #[tokio::test]
    async fn test_static_raw() {
        let composed = service(routes()).resolve("/mm/api/v1/raw/test").await.unwrap();
        assert_eq!(composed, Composed::Raw("# hi, this is a test".into()));
    }

    #[tokio::test]
    async fn test_static_json() {
        let composed = service(routes()).resolve("/mm/api/v1/json/test").await.unwrap();
        assert_eq!(
            composed,
            Composed::Json(ParsedDocument {
                body: "# hi, this is a test".into(),
                title: None,
                description: None,
            })
        );
    }

    #[tokio::test]
    async fn test_heading_mode_json() {
        let service = service(routes()).with_composer(Composer::with_title_mode(TitleMode::Heading));
        let Composed::Json(doc) = service.resolve("/mm/api/v1/json/test").await.unwrap() else {
            panic!("expected json");
        };
        assert_eq!(doc.title.as_deref(), Some("hi, this is a test"));
    }

    #[tokio::test]
    async fn test_query_string_is_ignored_for_matching() {
        let composed = service(routes())
            .resolve("/mm/api/v1/raw/test?draft=1")
            .await
            .unwrap();
        assert_eq!(composed, Composed::Raw("# hi, this is a test".into()));
    }

    #[tokio::test]
    async fn test_parametric_handler() {
        let composed = service(routes()).resolve("/mm/api/v1/raw/user/42").await.unwrap();
        assert_eq!(composed, Composed::Raw("# user 42".into()));
    }

    #[tokio::test]
    async fn test_raw_output_forces_raw_target() {
        let composed = service(routes())
            .resolve("/mm/api/v1/html/echo?x=1")
            .await
            .unwrap();
        assert_eq!(composed, Composed::Raw("/mm/api/v1/html/echo?x=1".into()));
    }

    #[tokio::test]
    async fn test_failing_handler_is_handler_failure() {
        let err = service(routes())
            .resolve("/mm/api/v1/html/broken")
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::HandlerFailure { route, .. } if route == "broken"));
    }

    #[tokio::test]
    async fn test_unknown_endpoint_is_not_found() {
        let service = service(routes()).with_source(Arc::new(EmptySource));
        let err = service
            .resolve("/mm/api/v1/raw/does-not-exist")
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_path_outside_namespace_is_not_found() {
        let err = service(routes()).resolve("/test").await.unwrap_err();
        assert!(matches!(err, ContentError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_missing_texts_dir_is_recoverable() {
        let service = ContentService::from_config(
            &Config {
                texts_dir: "/definitely/not/a/dir".into(),
                ..Config::default()
            },
            Arc::new(CacheClient::disabled()),
            RouteTable::new(),
        );
        let err = service.resolve("/mm/api/v1/raw/anything").await.unwrap_err();
        assert!(matches!(err, ContentError::DiskRead { .. }));
    }

    struct EmptySource;

    #[async_trait::async_trait]
    impl TextSource for EmptySource {
        async fn read_text(&self, path: &str) -> std::io::Result<String> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, path.to_string()))
        }

        async fn list_dir(&self, _dir: &str) -> std::io::Result<Vec<String>> {
            Ok(Vec::new())
        }
    }
}
