//! Application layer - Use cases and orchestration
//!
//! Contains the learning use cases and the port definitions they depend on.
//! Orchestrates domain scoring and infrastructure adapters.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
