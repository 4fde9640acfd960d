// Pipeline modules organized by functionality
pub mod inference;
pub mod lexicon_scoring;
pub mod mood_classification;
pub mod training;
pub mod utils;

pub use inference::*;
pub use lexicon_scoring::*;
pub use mood_classification::*;
pub use training::*;

use crate::models::{PolarityScores, VaderScorer};

/// Capability of turning a text into a polarity breakdown whose `compound`
/// lies in `[-1, 1]`.
pub trait PolarityScorer: Send + Sync {
    fn polarity_scores(&self, text: &str) -> PolarityScores;
}

impl PolarityScorer for VaderScorer {
    fn polarity_scores(&self, text: &str) -> PolarityScores {
        VaderScorer::polarity_scores(self, text)
    }
}

/// A back-end the classification facade can delegate to.
///
/// Implementations receive text that is already trimmed and non-empty, and
/// must be safe to call from many threads at once.
pub trait MoodBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn classify(&self, text: &str) -> anyhow::Result<ClassificationResult>;
}
