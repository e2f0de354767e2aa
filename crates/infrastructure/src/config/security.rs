//! Request rate limiting.

use serde::{Deserialize, Serialize};

/// Per-client request limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Enable rate limiting
    #[serde(default = "default_true")]
    pub rate_limit_enabled: bool,

    /// Requests per minute per IP
    #[serde(default = "default_rate_limit")]
    pub rate_limit_rpm: u32,

    /// Rate limiter cleanup interval in seconds (default: 300 = 5 minutes)
    #[serde(default = "default_cleanup_interval")]
    pub rate_limit_cleanup_interval_secs: u64,
}

const fn default_true() -> bool {
    true
}

const fn default_rate_limit() -> u32 {
    30
}

const fn default_cleanup_interval() -> u64 {
    300
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            rate_limit_enabled: true,
            rate_limit_rpm: default_rate_limit(),
            rate_limit_cleanup_interval_secs: default_cleanup_interval(),
        }
    }
}

impl SecurityConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if rate limiting is on with a zero budget.
    pub fn validate(&self) -> Result<(), String> {
        if self.rate_limit_enabled && self.rate_limit_rpm == 0 {
            return Err("security.rate_limit_rpm must be greater than 0".to_string());
        }
        Ok(())
    }
}
