use crate::core::MoodLabel;
use crate::models::PolarityScores;
use serde::Serialize;
use std::collections::BTreeMap;

/// Probability of every mood, in canonical label order.
pub type ClassProbabilities = BTreeMap<MoodLabel, f64>;

/// Normalised output of every back-end.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    /// The trimmed input.
    pub text: String,
    pub mood: MoodLabel,
    /// Always in `[0, 1]`, rounded to three decimals.
    pub confidence: f64,
    /// Raw compound polarity, lexicon back-end only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_scores: Option<PolarityScores>,
    /// Predicted class id, model back-end only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<u32>,
    #[serde(rename = "all_probs", skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<ClassProbabilities>,
}

impl ClassificationResult {
    pub fn new(text: impl Into<String>, mood: MoodLabel, confidence: f64) -> Self {
        Self {
            text: text.into(),
            mood,
            confidence,
            score: None,
            raw_scores: None,
            class_id: None,
            probabilities: None,
        }
    }
}
