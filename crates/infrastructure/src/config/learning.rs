//! Learner-facing defaults.

use std::time::Duration;

use domain::Language;
use serde::{Deserialize, Serialize};

/// Language and backend defaults for the learning services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningConfig {
    /// Language used when a request does not name one
    #[serde(default = "default_language_code")]
    pub default_language_code: String,

    /// Upper bound for a single speech or model call, in seconds
    #[serde(default = "default_backend_timeout")]
    pub backend_timeout_secs: u64,
}

fn default_language_code() -> String {
    Language::Khmer.code().to_string()
}

const fn default_backend_timeout() -> u64 {
    30
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            default_language_code: default_language_code(),
            backend_timeout_secs: default_backend_timeout(),
        }
    }
}

impl LearningConfig {
    #[must_use]
    pub const fn backend_timeout(&self) -> Duration {
        Duration::from_secs(self.backend_timeout_secs)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error for a language outside the catalogue or a zero timeout.
    pub fn validate(&self) -> Result<(), String> {
        if Language::from_code(&self.default_language_code).is_none() {
            return Err(format!(
                "learning.default_language_code '{}' is not a supported language",
                self.default_language_code
            ));
        }
        if self.backend_timeout_secs == 0 {
            return Err("learning.backend_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}
