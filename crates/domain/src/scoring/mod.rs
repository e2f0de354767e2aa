//! Pronunciation scoring
//!
//! Pure functions that turn recognition output into scores:
//! - [`similarity`]: character-level match ratio between two texts
//! - [`analyze_words`]: per-word confidence and practice flag
//! - [`composite_score`]: weighted blend of the three signals
//! - [`recommend`]: practice advice from a score and its word analysis

mod composite;
mod recommendation;
mod similarity;
mod word_analysis;

pub use composite::{ScoreWeights, composite_score, composite_score_with, round_to_tenth};
pub use recommendation::{MAX_PRACTICE_WORDS, PracticeTier, recommend};
pub use similarity::similarity;
pub use word_analysis::{PRACTICE_THRESHOLD, analyze_words, needs_practice};
