//! Response DTOs for the content server API
//!
//! Documents are served as [`ParsedDocument`](crate::render::ParsedDocument);
//! this module holds the operational bodies.

use serde::Serialize;

use crate::cache::{ConnectionState, StatsSnapshot};

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Cache connection state
    pub cache: ConnectionState,
    /// Cache counters
    pub stats: StatsSnapshot,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(cache: ConnectionState, stats: StatsSnapshot) -> Self {
        Self {
            status: "healthy".to_string(),
            cache,
            stats,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
