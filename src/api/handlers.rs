//! API Handlers
//!
//! HTTP request handlers for the content server.

use std::sync::Arc;

use axum::{
    extract::State,
    http::Uri,
    response::{IntoResponse, Response},
    Json,
};

use crate::cache::CacheClient;
use crate::config::{Config, NotFoundStyle};
use crate::content::ContentService;
use crate::models::HealthResponse;
use crate::routing::RouteTable;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Request pipeline, owner of the cache client
    pub content: Arc<ContentService>,
    /// Shared secret expected in `Authorization`
    pub auth: Option<String>,
    pub not_found_style: NotFoundStyle,
}

impl AppState {
    /// Creates a new AppState around a content service.
    pub fn new(content: ContentService) -> Self {
        Self {
            content: Arc::new(content),
            auth: None,
            not_found_style: NotFoundStyle::Html,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds the cache client and content service from the Config.
    pub fn from_config(config: &Config, routes: RouteTable) -> Self {
        let cache = Arc::new(CacheClient::from_config(config));
        let content = ContentService::from_config(config, cache, routes);
        Self {
            content: Arc::new(content),
            auth: config.auth.clone(),
            not_found_style: config.not_found_style,
        }
    }

    pub fn with_auth(mut self, secret: impl Into<String>) -> Self {
        self.auth = Some(secret.into());
        self
    }

    pub fn with_not_found_style(mut self, style: NotFoundStyle) -> Self {
        self.not_found_style = style;
        self
    }
}

/// Fallback handler serving every content path.
///
/// Failures are answered, never propagated: the connection always gets a
/// response and the server keeps serving.
pub async fn content_handler(State(state): State<AppState>, uri: Uri) -> Response {
    let url = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    match state.content.resolve(url).await {
        Ok(composed) => composed.into_response(),
        Err(err) => err.into_response_with(state.not_found_style),
    }
}

/// Handler for GET /health
///
/// Returns server health with the cache connection state.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let cache = state.content.cache();
    Json(HealthResponse::healthy(cache.state(), cache.stats()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{ConnectionState, MemoryStore};
    use axum::http::StatusCode;

    fn test_state() -> AppState {
        let routes = RouteTable::new().with_static("test", "# hi, this is a test");
        let cache = Arc::new(CacheClient::memory(Arc::new(MemoryStore::new())));
        AppState::new(ContentService::from_config(&Config::default(), cache, routes))
    }

    #[tokio::test]
    async fn test_content_handler_serves_route() {
        let response = content_handler(
            State(test_state()),
            Uri::from_static("/mm/api/v1/raw/test"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_content_handler_not_found() {
        let response = content_handler(State(test_state()), Uri::from_static("/nowhere")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_handler_reports_cache_state() {
        let state = test_state();
        let response = health_handler(State(state.clone())).await;
        assert_eq!(response.status, "healthy");
        assert_eq!(response.cache, ConnectionState::Idle);

        content_handler(State(state.clone()), Uri::from_static("/mm/api/v1/raw/test")).await;
        let response = health_handler(State(state)).await;
        assert_eq!(response.cache, ConnectionState::Ready);
    }
}
