//! API Routes
//!
//! Configures the Axum router for the content server.

use axum::{middleware, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::auth::auth_middleware;
use super::handlers::{content_handler, health_handler, AppState};

/// Creates the main router.
///
/// # Endpoints
/// - `GET /health` - Health check with cache state
/// - everything else - content resolution (`{namespace}/{raw,json,html}/...`,
///   or any path a route map claims)
///
/// # Middleware
/// - Auth: shared-secret check on every path when configured
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .fallback(content_handler)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheClient, MemoryStore};
    use crate::config::Config;
    use crate::content::ContentService;
    use crate::routing::RouteTable;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn create_test_app(auth: Option<&str>) -> Router {
        let routes = RouteTable::new().with_static("test", "# hi, this is a test");
        let cache = Arc::new(CacheClient::memory(Arc::new(MemoryStore::new())));
        let mut state = AppState::new(ContentService::from_config(&Config::default(), cache, routes));
        if let Some(secret) = auth {
            state = state.with_auth(secret);
        }
        create_router(state)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app(None);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_content_endpoint() {
        let app = create_test_app(None);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/mm/api/v1/html/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_secret_is_unauthorized() {
        let app = create_test_app(Some("s3cret"));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/mm/api/v1/raw/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_matching_secret_is_served() {
        let app = create_test_app(Some("s3cret"));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/mm/api/v1/raw/test")
                    .header("authorization", "s3cret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
