//! Fitted TF-IDF + logistic regression pipeline and its on-disk form.

use super::logistic_regression::{LinearArtifact, LogisticRegression};
use super::tfidf::{TfidfArtifact, TfidfVectorizer};
use candle_core::{Device, Tensor};
use serde::{Deserialize, Serialize};

/// Raw text in, class probabilities out. The vectorizer is owned by the
/// pipeline so callers never vectorize separately.
#[derive(Debug, Clone)]
pub struct TextClassificationPipeline {
    vectorizer: TfidfVectorizer,
    classifier: LogisticRegression,
}

/// Serialised [`TextClassificationPipeline`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineArtifact {
    pub format_version: u32,
    /// Tag shared with the label vocabulary written by the same run.
    pub training_run: String,
    pub vectorizer: TfidfArtifact,
    pub classifier: LinearArtifact,
}

impl PipelineArtifact {
    pub const FORMAT_VERSION: u32 = 1;
}

impl TextClassificationPipeline {
    pub fn new(vectorizer: TfidfVectorizer, classifier: LogisticRegression) -> anyhow::Result<Self> {
        if vectorizer.num_features() != classifier.num_features() {
            anyhow::bail!(
                "vectorizer produces {} features but classifier expects {}",
                vectorizer.num_features(),
                classifier.num_features()
            );
        }
        Ok(Self {
            vectorizer,
            classifier,
        })
    }

    pub fn from_artifact(artifact: PipelineArtifact, device: &Device) -> anyhow::Result<Self> {
        if artifact.format_version != PipelineArtifact::FORMAT_VERSION {
            anyhow::bail!(
                "unsupported pipeline format version {}",
                artifact.format_version
            );
        }
        let classifier = LogisticRegression::from_artifact(&artifact.classifier, device)?;
        let vectorizer = TfidfVectorizer::from_artifact(artifact.vectorizer)?;
        Self::new(vectorizer, classifier)
    }

    pub fn to_artifact(&self, training_run: impl Into<String>) -> anyhow::Result<PipelineArtifact> {
        Ok(PipelineArtifact {
            format_version: PipelineArtifact::FORMAT_VERSION,
            training_run: training_run.into(),
            vectorizer: self.vectorizer.to_artifact(),
            classifier: self.classifier.to_artifact()?,
        })
    }

    pub fn num_classes(&self) -> usize {
        self.classifier.num_classes()
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    /// Probability of every class for one text, indexed by class id.
    pub fn predict_proba(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let row = self.vectorizer.transform(text)?;
        let features = Tensor::from_vec(
            row,
            (1, self.vectorizer.num_features()),
            self.classifier.device(),
        )?;
        Ok(self
            .classifier
            .predict_proba(&features)?
            .squeeze(0)?
            .to_vec1::<f32>()?)
    }

    /// Probability rows for many texts, one per input.
    pub fn predict_proba_batch<S: AsRef<str>>(&self, texts: &[S]) -> anyhow::Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let matrix = self.vectorizer.transform_batch(texts)?;
        let features = Tensor::from_vec(
            matrix,
            (texts.len(), self.vectorizer.num_features()),
            self.classifier.device(),
        )?;
        Ok(self.classifier.predict_proba(&features)?.to_vec2::<f32>()?)
    }
}
