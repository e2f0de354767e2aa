//! Recovery policy for structured language-model output
//!
//! Every payload the model is asked to produce implements [`ModelFallback`].
//! [`parse_model_output`] is the single place where raw model text becomes a
//! typed value: it tolerates Markdown code fences and surrounding prose, and
//! substitutes the payload's neutral fallback when nothing parseable remains.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Inputs available to a fallback constructor
#[derive(Debug, Clone, Copy)]
pub struct FallbackContext<'a> {
    /// Unmodified text returned by the model
    pub raw_output: &'a str,
    /// The learner's own text the request was about
    pub user_text: &'a str,
}

impl<'a> FallbackContext<'a> {
    #[must_use]
    pub const fn new(raw_output: &'a str, user_text: &'a str) -> Self {
        Self {
            raw_output,
            user_text,
        }
    }
}

/// A structured payload with a neutral substitute for unusable model output
pub trait ModelFallback: DeserializeOwned {
    /// Short name used in logs
    const KIND: &'static str;

    /// Value returned when the model output cannot be parsed
    fn fallback(ctx: &FallbackContext<'_>) -> Self;

    /// Bring a successfully parsed value into its valid range
    #[must_use]
    fn normalize(self) -> Self {
        self
    }
}

/// Result of [`parse_model_output`]
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutput<T> {
    Parsed(T),
    /// The fallback was substituted; `reason` holds the parse error
    Recovered { value: T, reason: String },
}

impl<T> ModelOutput<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Parsed(value) | Self::Recovered { value, .. } => value,
        }
    }

    pub const fn is_recovered(&self) -> bool {
        matches!(self, Self::Recovered { .. })
    }
}

/// Parse model text into `T`, or fall back to `T::fallback`
pub fn parse_model_output<T: ModelFallback>(ctx: &FallbackContext<'_>) -> ModelOutput<T> {
    let candidate = strip_code_fence(ctx.raw_output);

    let parsed = serde_json::from_str::<T>(candidate).or_else(|err| {
        match extract_json_object(ctx.raw_output) {
            Some(object) if object != candidate => serde_json::from_str::<T>(object),
            _ => Err(err),
        }
    });

    match parsed {
        Ok(value) => ModelOutput::Parsed(value.normalize()),
        Err(err) => ModelOutput::Recovered {
            value: T::fallback(ctx),
            reason: err.to_string(),
        },
    }
}

/// Remove a surrounding ```` ```lang ```` fence
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Opening line may carry an info string such as `json`
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Outermost `{ ... }` span of the text, if any
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}

/// Clamp a score into [0, 100]
#[must_use]
pub fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

/// Lenient field deserializers for model payloads
pub(crate) mod lenient {
    use super::{Deserialize, Deserializer, Value, de};

    /// Number, or a numeric string such as `"85"` or `"85%"`
    pub fn score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let number = match &value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
            _ => None,
        };
        number
            .filter(|n| n.is_finite())
            .ok_or_else(|| de::Error::custom(format!("invalid score: {value}")))
    }

    /// Any JSON value rendered as text; null becomes empty
    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => String::new(),
            Value::String(s) => s,
            other => other.to_string(),
        })
    }

    /// Array of strings; objects are kept as compact JSON, a lone string becomes one item
    pub fn string_list<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => Vec::new(),
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Null => None,
                    Value::String(s) => Some(s),
                    other => Some(other.to_string()),
                })
                .collect(),
            Value::String(s) => vec![s],
            other => vec![other.to_string()],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Probe {
        #[serde(deserialize_with = "lenient::score")]
        score: f64,
        #[serde(default, deserialize_with = "lenient::string_list")]
        tips: Vec<String>,
    }

    impl ModelFallback for Probe {
        const KIND: &'static str = "probe";

        fn fallback(ctx: &FallbackContext<'_>) -> Self {
            Self {
                score: 50.0,
                tips: vec![ctx.user_text.to_string()],
            }
        }

        fn normalize(self) -> Self {
            Self {
                score: clamp_score(self.score),
                ..self
            }
        }
    }

    #[test]
    fn parses_plain_json() {
        let ctx = FallbackContext::new(r#"{"score": 80, "tips": ["a"]}"#, "x");
        let out = parse_model_output::<Probe>(&ctx);
        assert!(!out.is_recovered());
        assert_eq!(
            out.into_inner(),
            Probe {
                score: 80.0,
                tips: vec!["a".to_string()]
            }
        );
    }

    #[test]
    fn strips_code_fence() {
        let raw = "```json\n{\"score\": \"75%\"}\n```";
        let out = parse_model_output::<Probe>(&FallbackContext::new(raw, "x"));
        assert!(!out.is_recovered());
        assert!((out.into_inner().score - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn extracts_object_from_prose() {
        let raw = "Here is the analysis: {\"score\": 60} Hope it helps!";
        let out = parse_model_output::<Probe>(&FallbackContext::new(raw, "x"));
        assert!(!out.is_recovered());
    }

    #[test]
    fn clamps_out_of_range_scores() {
        let out = parse_model_output::<Probe>(&FallbackContext::new(r#"{"score": 140}"#, "x"));
        assert!((out.into_inner().score - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn falls_back_on_garbage() {
        let out = parse_model_output::<Probe>(&FallbackContext::new("not json at all", "mine"));
        assert!(out.is_recovered());
        assert_eq!(
            out.into_inner(),
            Probe {
                score: 50.0,
                tips: vec!["mine".to_string()]
            }
        );
    }

    #[test]
    fn falls_back_when_required_field_missing() {
        let out = parse_model_output::<Probe>(&FallbackContext::new(r#"{"tips": []}"#, "x"));
        assert!(out.is_recovered());
    }

    #[test]
    fn string_list_accepts_objects_and_single_strings() {
        let probe: Probe =
            serde_json::from_str(r#"{"score": 1, "tips": [{"phrase": "hi"}, null, "b"]}"#)
                .unwrap();
        assert_eq!(probe.tips, vec![r#"{"phrase":"hi"}"#.to_string(), "b".to_string()]);

        let probe: Probe = serde_json::from_str(r#"{"score": 1, "tips": "only"}"#).unwrap();
        assert_eq!(probe.tips, vec!["only".to_string()]);
    }
}
