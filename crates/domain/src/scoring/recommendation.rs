//! Practice recommendations

use crate::entities::{Recommendation, WordAnalysis};

/// Upper bound on suggested practice words
pub const MAX_PRACTICE_WORDS: usize = 5;

/// Score band that selects the recommendation copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeTier {
    /// Below 60
    Beginner,
    /// 60 up to 80
    Intermediate,
    /// 80 and above
    Advanced,
}

impl PracticeTier {
    #[must_use]
    pub fn from_score(overall_score: f64) -> Self {
        if overall_score < 60.0 {
            Self::Beginner
        } else if overall_score < 80.0 {
            Self::Intermediate
        } else {
            Self::Advanced
        }
    }

    #[must_use]
    pub const fn focus_areas(&self) -> &'static [&'static str] {
        match self {
            Self::Beginner => &[
                "기본 발음 연습",
                "천천히 말하기 연습",
                "원어민 발음 듣고 따라하기",
            ],
            Self::Intermediate => &["억양과 리듬 개선", "어려운 단어 집중 연습"],
            Self::Advanced => &["자연스러운 회화 속도", "문화적 맥락 이해"],
        }
    }

    #[must_use]
    pub const fn next_steps(&self) -> &'static [&'static str] {
        match self {
            Self::Beginner => &["매일 10분씩 발음 연습하기", "간단한 인사말부터 시작하기"],
            Self::Intermediate => &["실제 대화 상황에서 연습하기", "어려운 단어 반복 연습하기"],
            Self::Advanced => &["현지인과 실제 대화하기", "다양한 상황에서 연습하기"],
        }
    }
}

/// Build recommendations from a word analysis and its overall score
#[must_use]
pub fn recommend(word_analysis: &[WordAnalysis], overall_score: f64) -> Recommendation {
    let tier = PracticeTier::from_score(overall_score);
    let to_owned = |items: &[&str]| -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    };

    Recommendation {
        focus_areas: to_owned(tier.focus_areas()),
        practice_words: word_analysis
            .iter()
            .filter(|w| w.needs_practice)
            .take(MAX_PRACTICE_WORDS)
            .map(|w| w.word.clone())
            .collect(),
        next_steps: to_owned(tier.next_steps()),
    }
}
