//! Domain layer for Koica Lang
//!
//! Contains the pronunciation scoring core, learner-facing value objects and
//! the payloads exchanged with the language model. Nothing in here performs
//! I/O; every function is a pure computation over its inputs.

pub mod entities;
pub mod errors;
pub mod fallback;
pub mod scoring;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use fallback::{FallbackContext, ModelFallback};
pub use value_objects::*;
