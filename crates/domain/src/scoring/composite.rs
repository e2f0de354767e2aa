//! Composite pronunciation score

use crate::entities::WordAnalysis;

/// Relative weight of each signal in the composite score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub stt_confidence: f64,
    pub similarity: f64,
    pub word_confidence: f64,
}

impl ScoreWeights {
    /// 40% recognition confidence, 30% similarity, 30% mean word confidence
    pub const STANDARD: Self = Self {
        stt_confidence: 0.4,
        similarity: 0.3,
        word_confidence: 0.3,
    };
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Round to one decimal place
///
/// Rounds the exact binary value, so `0.15` (stored just below) becomes
/// `0.1`, and breaks exact ties toward the even digit: `35.25` becomes
/// `35.2`. Float formatting is correctly rounded, which scaling by ten and
/// calling [`f64::round`] is not.
#[must_use]
pub fn round_to_tenth(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

/// Blend recognition confidence, similarity and word confidence into [0, 100]
///
/// `stt_confidence` is in [0, 1] and `similarity_pct` in [0, 100]. Without
/// word analysis the mean word confidence is taken to equal the recognition
/// confidence.
#[must_use]
pub fn composite_score(
    stt_confidence: f64,
    similarity_pct: f64,
    word_analysis: &[WordAnalysis],
) -> f64 {
    composite_score_with(ScoreWeights::STANDARD, stt_confidence, similarity_pct, word_analysis)
}

/// [`composite_score`] with explicit weights
#[must_use]
pub fn composite_score_with(
    weights: ScoreWeights,
    stt_confidence: f64,
    similarity_pct: f64,
    word_analysis: &[WordAnalysis],
) -> f64 {
    let stt_score = stt_confidence * 100.0;

    let avg_word_confidence = if word_analysis.is_empty() {
        stt_score
    } else {
        let total: f64 = word_analysis.iter().map(|w| w.confidence_pct).sum();
        #[allow(clippy::cast_precision_loss)]
        let count = word_analysis.len() as f64;
        total / count
    };

    let overall = stt_score * weights.stt_confidence
        + similarity_pct * weights.similarity
        + avg_word_confidence * weights.word_confidence;

    round_to_tenth(overall)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::Grade;

    fn analysis(confidence_pct: f64) -> WordAnalysis {
        WordAnalysis {
            word: "w".to_string(),
            confidence_pct,
            start_time: 0.0,
            end_time: 0.1,
            needs_practice: confidence_pct < 70.0,
        }
    }

    #[test]
    fn perfect_inputs_without_words() {
        assert!((composite_score(1.0, 100.0, &[]) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn reference_example() {
        let score = composite_score(0.9, 100.0, &[]);
        assert!((score - 93.0).abs() < 1e-9);
        assert_eq!(Grade::from_score(score), Grade::A);
    }

    #[test]
    fn averages_word_confidence() {
        // 0.8*100*0.4 + 50*0.3 + mean(60, 80)*0.3 = 32 + 15 + 21
        let score = composite_score(0.8, 50.0, &[analysis(60.0), analysis(80.0)]);
        assert!((score - 68.0).abs() < 1e-9);
    }

    #[test]
    fn rounds_to_one_decimal() {
        // 0.333*100*0.4 + 0 + 33.3*0.3 = 13.32 + 9.99 = 23.31
        let score = composite_score(0.333, 0.0, &[]);
        assert!((score - 23.3).abs() < 1e-9);
    }

    #[test]
    fn exact_ties_round_to_even() {
        assert!((round_to_tenth(35.25) - 35.2).abs() < 1e-9);
        assert!((round_to_tenth(0.25) - 0.2).abs() < 1e-9);
        assert!((round_to_tenth(0.75) - 0.8).abs() < 1e-9);
        assert!((round_to_tenth(-2.25) + 2.2).abs() < 1e-9);
    }

    #[test]
    fn rounding_uses_the_stored_binary_value() {
        // 0.15 and 0.0015 * 100 sit just below their decimal midpoints
        assert!((round_to_tenth(0.15) - 0.1).abs() < 1e-9);
        assert!((round_to_tenth(0.0015 * 100.0) - 0.1).abs() < 1e-9);
        // so are 2.65 and 1.45
        assert!((round_to_tenth(2.65) - 2.6).abs() < 1e-9);
        assert!((round_to_tenth(1.45) - 1.4).abs() < 1e-9);
    }

    #[test]
    fn composite_tie_rounds_to_even() {
        // 7.5*0.4 + 100*0.3 + 7.5*0.3 lands on 35.25
        let score = composite_score(0.075, 100.0, &[]);
        assert!((score - 35.2).abs() < 1e-9);
    }

    #[test]
    fn standard_weights_sum_to_one() {
        let w = ScoreWeights::default();
        assert!((w.stt_confidence + w.similarity + w.word_confidence - 1.0).abs() < 1e-12);
    }

    #[test]
    fn custom_weights() {
        let weights = ScoreWeights {
            stt_confidence: 0.0,
            similarity: 1.0,
            word_confidence: 0.0,
        };
        let score = composite_score_with(weights, 0.2, 77.0, &[analysis(10.0)]);
        assert!((score - 77.0).abs() < 1e-9);
    }
}
