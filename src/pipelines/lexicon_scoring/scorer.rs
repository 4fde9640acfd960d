use crate::core::MoodLabel;
use crate::models::{PolarityScores, ValenceLexicon, VaderScorer};
use crate::pipelines::utils::round_to;
use crate::pipelines::{ClassificationResult, MoodBackend, PolarityScorer};
use std::path::Path;

/// Rule-based back-end: compound polarity mapped through the fixed mood
/// thresholds.
#[derive(Debug, Clone, Default)]
pub struct LexiconScorer<S: PolarityScorer = VaderScorer> {
    scorer: S,
}

impl LexiconScorer<VaderScorer> {
    /// Scorer over the built-in lexicon.
    pub fn new() -> Self {
        Self::with_scorer(VaderScorer::default())
    }

    /// Scorer over a VADER-format lexicon file.
    pub fn from_lexicon_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let lexicon = ValenceLexicon::from_file(path)?;
        Ok(Self::with_scorer(VaderScorer::new(lexicon)))
    }
}

impl<S: PolarityScorer> LexiconScorer<S> {
    pub fn with_scorer(scorer: S) -> Self {
        Self { scorer }
    }

    pub fn polarity_scores(&self, text: &str) -> PolarityScores {
        self.scorer.polarity_scores(text)
    }

    /// Compound polarity in `[-1, 1]`.
    pub fn score(&self, text: &str) -> f64 {
        self.polarity_scores(text).compound
    }

    pub fn classify(&self, text: &str) -> MoodLabel {
        MoodLabel::from_compound(self.score(text))
    }
}

impl<S: PolarityScorer> MoodBackend for LexiconScorer<S> {
    fn name(&self) -> &'static str {
        "lexicon"
    }

    fn classify(&self, text: &str) -> anyhow::Result<ClassificationResult> {
        let scores = self.polarity_scores(text);
        if !scores.compound.is_finite() {
            anyhow::bail!("polarity scorer returned a non-finite compound score");
        }
        let compound = scores.compound.clamp(-1.0, 1.0);
        let mut result = ClassificationResult::new(
            text,
            MoodLabel::from_compound(compound),
            round_to(compound.abs(), 3),
        );
        result.score = Some(compound);
        result.raw_scores = Some(scores);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f64);

    impl PolarityScorer for Fixed {
        fn polarity_scores(&self, _text: &str) -> PolarityScores {
            PolarityScores {
                negative: 0.0,
                neutral: 1.0,
                positive: 0.0,
                compound: self.0,
            }
        }
    }

    fn label_for(compound: f64) -> MoodLabel {
        LexiconScorer::with_scorer(Fixed(compound)).classify("x")
    }

    #[test]
    fn thresholds_are_applied_to_the_compound() {
        assert_eq!(label_for(-0.5), MoodLabel::MildlyNegative);
        assert_eq!(label_for(-0.2), MoodLabel::Neutral);
        assert_eq!(label_for(0.2), MoodLabel::Neutral);
        assert_eq!(label_for(0.5), MoodLabel::MildlyPositive);
        assert_eq!(label_for(0.5000001), MoodLabel::Positive);
    }

    #[test]
    fn backend_reports_raw_score_and_intensity() {
        let backend = LexiconScorer::with_scorer(Fixed(-0.6123));
        let result = MoodBackend::classify(&backend, "text").unwrap();
        assert_eq!(result.mood, MoodLabel::Negative);
        assert_eq!(result.score, Some(-0.6123));
        assert_eq!(result.confidence, 0.612);
        assert!(result.probabilities.is_none());
    }

    #[test]
    fn nan_compound_is_an_error() {
        let backend = LexiconScorer::with_scorer(Fixed(f64::NAN));
        assert!(MoodBackend::classify(&backend, "text").is_err());
    }

    #[test]
    fn builtin_lexicon_end_to_end() {
        let scorer = LexiconScorer::new();
        assert_eq!(
            scorer.classify("I absolutely love this, it's wonderful!"),
            MoodLabel::Positive
        );
        assert_eq!(scorer.classify("This is fine."), MoodLabel::Neutral);
        assert_eq!(
            scorer.classify("This is the worst, I hate it!"),
            MoodLabel::Negative
        );
    }
}
