//! Configuration for inference engine

use std::fmt;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Configuration for the Gemini inference engine
#[derive(Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Gemini API key (sensitive)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Base URL of the Generative Language API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Default model to use
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Temperature for sampling (0.0 - 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Top-p (nucleus) sampling
    #[serde(default = "default_top_p")]
    pub top_p: f32,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

const fn default_timeout_ms() -> u64 {
    30000 // 30 seconds
}

const fn default_max_tokens() -> u32 {
    1024
}

const fn default_temperature() -> f32 {
    0.7
}

const fn default_top_p() -> f32 {
    0.95
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            default_model: default_model(),
            timeout_ms: default_timeout_ms(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
        }
    }
}

impl fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceConfig")
            .field(
                "api_key",
                &if self.api_key.is_some() {
                    Some("[REDACTED]")
                } else {
                    None
                },
            )
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .field("timeout_ms", &self.timeout_ms)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .finish()
    }
}

impl InferenceConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.is_none() {
            return Err("Gemini API key is required for inference".to_string());
        }

        if self.base_url.is_empty() {
            return Err("Inference base URL must not be empty".to_string());
        }

        if self.default_model.trim().is_empty() {
            return Err("Inference model must not be empty".to_string());
        }

        if self.timeout_ms == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            ));
        }

        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(format!("Top-p must be between 0.0 and 1.0, got {}", self.top_p));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_key() -> InferenceConfig {
        InferenceConfig {
            api_key: Some(SecretString::from("test-key")),
            ..Default::default()
        }
    }

    #[test]
    fn default_config_has_sensible_values() {
        let config = InferenceConfig::default();
        assert_eq!(
            config.base_url,
            "https://generativelanguage.googleapis.com/v1beta"
        );
        assert_eq!(config.default_model, "gemini-1.5-flash");
        assert_eq!(config.timeout_ms, 30000);
        assert_eq!(config.max_tokens, 1024);
        assert!((config.temperature - 0.7).abs() < 0.01);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn validation_requires_api_key() {
        assert!(InferenceConfig::default().validate().is_err());
        assert!(with_key().validate().is_ok());
    }

    #[test]
    fn validation_rejects_out_of_range_sampling() {
        let hot = InferenceConfig {
            temperature: 2.5,
            ..with_key()
        };
        assert!(hot.validate().is_err());

        let top_p = InferenceConfig {
            top_p: 1.5,
            ..with_key()
        };
        assert!(top_p.validate().is_err());
    }

    #[test]
    fn api_key_is_never_serialized() {
        let json = serde_json::to_string(&with_key()).unwrap();
        assert!(!json.contains("api_key"));
        assert!(!json.contains("test-key"));
    }

    #[test]
    fn debug_redacts_api_key() {
        let debug = format!("{:?}", with_key());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("test-key"));
    }

    #[test]
    fn config_deserialization_with_defaults() {
        let json = r#"{"default_model":"gemini-2.0-flash","api_key":"k"}"#;
        let config: InferenceConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.default_model, "gemini-2.0-flash");
        assert!(config.api_key.is_some());
        assert_eq!(config.timeout_ms, 30000);
    }
}
