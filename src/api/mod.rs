//! API Module
//!
//! HTTP handlers and routing for the content server.
//!
//! # Endpoints
//! - `GET {namespace}/raw/{key}` - Raw text
//! - `GET {namespace}/json/{key}` - `{body, title, description}`
//! - `GET {namespace}/html/{key}` - Rendered html document
//! - `GET /health` - Health check endpoint

pub mod auth;
pub mod handlers;
pub mod routes;

pub use auth::auth_middleware;
pub use handlers::*;
pub use routes::create_router;
