//! Response models for the content server API
//!
//! DTOs serialized into operational response bodies.

pub mod responses;

// Re-export commonly used types
pub use responses::HealthResponse;
