//! Koica Lang HTTP presentation layer
//!
//! JSON and multipart API over the pronunciation, speech and conversation
//! services.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, ErrorResponse, set_expose_internal_errors};
pub use middleware::{
    RateLimiterConfig, RateLimiterLayer, ValidatedJson, ValidationError, spawn_cleanup_task,
};
pub use routes::create_router;
pub use state::AppState;
