//! Letter grade derived from a composite pronunciation score

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// Letter grade bucket for a score in [0, 100]
///
/// Lower bounds are inclusive: 90 and above is `A`, 80 up to 90 is `B`,
/// 70 up to 80 is `C`, 60 up to 70 is `D`, anything lower is `F`.
/// Serialized as the full display string, e.g. `"A - 매우 우수"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Map a composite score onto its grade
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::A
        } else if score >= 80.0 {
            Self::B
        } else if score >= 70.0 {
            Self::C
        } else if score >= 60.0 {
            Self::D
        } else {
            Self::F
        }
    }

    /// The bare letter
    #[must_use]
    pub const fn letter(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }

    /// Qualitative label shown to the learner
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::A => "매우 우수",
            Self::B => "우수",
            Self::C => "양호",
            Self::D => "보통",
            Self::F => "연습 필요",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.letter(), self.label())
    }
}

impl From<Grade> for String {
    fn from(grade: Grade) -> Self {
        grade.to_string()
    }
}

impl TryFrom<String> for Grade {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim().chars().next() {
            Some('A') => Ok(Self::A),
            Some('B') => Ok(Self::B),
            Some('C') => Ok(Self::C),
            Some('D') => Ok(Self::D),
            Some('F') => Ok(Self::F),
            _ => Err(DomainError::ValidationError(format!(
                "unknown grade: {value}"
            ))),
        }
    }
}
