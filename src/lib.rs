//! mm_server - a cache-mediated markdown content server
//!
//! Serves markdown texts and declared routes as raw text, JSON or rendered
//! HTML, reading through a Redis cache that degrades to direct reads when the
//! store is unavailable.

pub mod api;
pub mod cache;
pub mod config;
pub mod content;
pub mod error;
pub mod models;
pub mod render;
pub mod routing;

pub use api::{create_router, AppState};
pub use cache::CacheClient;
pub use config::Config;
pub use content::ContentService;
pub use error::{ContentError, Result};
pub use routing::{handler_fn, HandlerContext, RouteOutput, RouteTable, Target};
