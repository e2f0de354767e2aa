//! HTTP middleware: rate limiting, request ids and validated JSON bodies

pub mod rate_limit;
pub mod request_id;
pub mod validation;

pub use rate_limit::{
    RateLimiter, RateLimiterConfig, RateLimiterLayer, RateLimiterState, spawn_cleanup_task,
};
pub use request_id::{REQUEST_ID_HEADER, RequestId, propagate_request_id};
pub use validation::{ValidatedJson, ValidationError};
