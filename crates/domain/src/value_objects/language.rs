//! Target languages offered to learners

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// A language a learner can practise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Khmer,
    Lao,
    Vietnamese,
}

impl Language {
    /// BCP-47 code understood by the speech backends
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Khmer => "km-KH",
            Self::Lao => "lo-LA",
            Self::Vietnamese => "vi-VN",
        }
    }

    /// Short ISO 639-1 code
    #[must_use]
    pub const fn short_code(&self) -> &'static str {
        match self {
            Self::Khmer => "km",
            Self::Lao => "lo",
            Self::Vietnamese => "vi",
        }
    }

    /// English name used in model prompts
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Khmer => "Khmer",
            Self::Lao => "Lao",
            Self::Vietnamese => "Vietnamese",
        }
    }

    /// Look up a language by its BCP-47 code
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().into_iter().find(|lang| lang.code() == code)
    }

    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Khmer, Self::Lao, Self::Vietnamese]
    }
}

/// Language name for a code, `"Unknown"` when the code is not mapped
#[must_use]
pub fn language_name(code: &str) -> &'static str {
    Language::from_code(code).map_or("Unknown", |lang| lang.name())
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = DomainError;

    /// Accepts a BCP-47 code, a short code or the English name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::all()
            .into_iter()
            .find(|lang| {
                lang.code().eq_ignore_ascii_case(needle)
                    || lang.short_code().eq_ignore_ascii_case(needle)
                    || lang.name().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| DomainError::UnsupportedLanguage(s.to_string()))
    }
}
