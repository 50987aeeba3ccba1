//! Shared-secret check
//!
//! When a secret is configured, requests whose `Authorization` header does
//! not equal it are answered 401 before any content work happens.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::api::AppState;
use crate::error::ContentError;

pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(secret) = state.auth.as_deref() else {
        return next.run(request).await;
    };

    let provided = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    if provided == Some(secret) {
        next.run(request).await
    } else {
        debug!(path = %request.uri().path(), "Rejected request without valid secret");
        ContentError::Unauthorized.into_response()
    }
}
