//! Conversation practice scenarios

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// Role-play setting for a practice conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    Market,
    Transport,
    Workplace,
    #[default]
    General,
}

impl Scenario {
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::Market => "market",
            Self::Transport => "transport",
            Self::Workplace => "workplace",
            Self::General => "general",
        }
    }

    #[must_use]
    pub const fn name_kr(&self) -> &'static str {
        match self {
            Self::Market => "시장에서 장보기",
            Self::Transport => "뚝뚝(툭툭) 이용 및 길 찾기",
            Self::Workplace => "현지 동료/상사와 인사",
            Self::General => "자유 대화",
        }
    }

    #[must_use]
    pub const fn name_en(&self) -> &'static str {
        match self {
            Self::Market => "Shopping at Market",
            Self::Transport => "Using Tuk-Tuk / Getting Directions",
            Self::Workplace => "Workplace Greetings",
            Self::General => "Free Conversation",
        }
    }

    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Market => {
                "현지 시장에서 물건을 사고, 가격을 흥정하고, 신선도를 확인하는 대화 연습"
            },
            Self::Transport => "뚝뚝을 타거나 길을 물어보는 실전 대화 연습",
            Self::Workplace => "직장에서 동료 및 상사와 인사하고 간단한 업무 대화하기",
            Self::General => "현지인 친구와 자유롭게 일상 대화하기",
        }
    }

    #[must_use]
    pub const fn difficulty(&self) -> &'static str {
        match self {
            Self::Market | Self::Transport | Self::General => "beginner",
            Self::Workplace => "intermediate",
        }
    }

    /// Persona instruction handed to the language model
    #[must_use]
    pub const fn role_instruction(&self) -> &'static str {
        match self {
            Self::Market => {
                "You are a market vendor in Cambodia. Use simple, practical Khmer. \
                 Focus on prices, products, and basic negotiation."
            },
            Self::Transport => {
                "You are a tuk-tuk driver in Cambodia. Use casual Khmer for directions, \
                 prices, and small talk."
            },
            Self::Workplace => {
                "You are a Cambodian colleague at work. Use polite Khmer with appropriate \
                 honorifics."
            },
            Self::General => {
                "You are a friendly Cambodian local helping a Korean volunteer practice Khmer."
            },
        }
    }

    /// Resolve an identifier, falling back to `General` for unknown ids
    #[must_use]
    pub fn from_id_or_general(id: &str) -> Self {
        id.parse().unwrap_or_default()
    }

    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Market, Self::Transport, Self::Workplace, Self::General]
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Scenario {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|scenario| scenario.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::ScenarioNotFound(s.to_string()))
    }
}
