//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP listener, CORS and body limits
//! - `security`: rate limiting
//! - `learning`: default language and backend timeout
//! - `logging`: log format and filter
//!
//! Speech and inference settings are the provider crates' own config types.
//! Sources are layered: built-in defaults, then an optional `config.toml`,
//! then `KOICALANG__*` environment variables (`__` separates sections, e.g.
//! `KOICALANG__SPEECH__API_KEY`).

mod learning;
mod logging;
mod security;
mod server;

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use ai_core::InferenceConfig;
use ai_speech::SpeechConfig;
use serde::{Deserialize, Serialize};

pub use learning::LearningConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use security::SecurityConfig;
pub use server::ServerConfig;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "KOICALANG";

/// Application environment (development or production)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!(
                "Invalid environment: {s}. Use 'development' or 'production'"
            )),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub app_name: String,

    #[serde(default)]
    pub environment: Environment,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub security: SecurityConfig,

    /// Google Speech-to-Text and Text-to-Speech
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Gemini
    #[serde(default)]
    pub inference: InferenceConfig,

    #[serde(default)]
    pub learning: LearningConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_app_name() -> String {
    "Koica Lang".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            environment: Environment::default(),
            server: ServerConfig::default(),
            security: SecurityConfig::default(),
            speech: SpeechConfig::default(),
            inference: InferenceConfig::default(),
            learning: LearningConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(Path::new("config"), None)
    }

    /// Load from a specific file stem and, optionally, an explicit variable map
    ///
    /// `env` replaces the process environment when given; keys keep their
    /// `KOICALANG__` prefix.
    pub fn load_from(
        file: &Path,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        let environment = config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("server.allowed_origins")
            .source(env);

        config::Config::builder()
            .add_source(config::File::from(file).required(false))
            .add_source(environment)
            .build()?
            .try_deserialize()
    }

    /// Validate everything except credentials
    ///
    /// Missing API keys are reported when the adapters are constructed.
    ///
    /// # Errors
    ///
    /// Returns the first invalid section's message.
    pub fn validate(&self) -> Result<(), String> {
        self.server.validate()?;
        self.security.validate()?;
        self.learning.validate()?;
        Ok(())
    }

    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self.environment, Environment::Production)
    }
}
