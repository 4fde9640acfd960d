use crate::core::error::{MoodError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default file name of the fitted pipeline artifact.
pub const PIPELINE_FILE_NAME: &str = "moodify_pipeline.json";
/// Default file name of the label vocabulary artifact.
pub const LABELS_FILE_NAME: &str = "moodify_labels.json";

/// Knobs for the TF-IDF stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerConfig {
    pub lowercase: bool,
    /// Tokens shorter than this many characters are ignored.
    pub min_token_chars: usize,
    /// Terms must appear in at least this many training documents.
    pub min_df: usize,
    /// Keep only the most frequent terms when set.
    pub max_features: Option<usize>,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            min_token_chars: 2,
            min_df: 1,
            max_features: None,
        }
    }
}

/// Offline training parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Fraction of cleaned records held out for evaluation.
    pub test_fraction: f64,
    /// Seed for the train/evaluation shuffle.
    pub seed: u64,
    /// Full-batch optimizer iterations.
    pub max_iter: usize,
    pub learning_rate: f64,
    /// Inverse L2 regularisation strength.
    pub c: f64,
    pub vectorizer: VectorizerConfig,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
            max_iter: 1000,
            learning_rate: 0.05,
            c: 1.0,
            vectorizer: VectorizerConfig::default(),
        }
    }
}

impl TrainingConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.test_fraction) {
            return Err(MoodError::InvalidConfig(format!(
                "test_fraction must be in [0, 1), got {}",
                self.test_fraction
            )));
        }
        for (name, value) in [("c", self.c), ("learning_rate", self.learning_rate)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(MoodError::InvalidConfig(format!(
                    "{name} must be a positive finite number, got {value}"
                )));
            }
        }
        if self.max_iter == 0 {
            return Err(MoodError::InvalidConfig(
                "max_iter must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Which back-end a deployment serves with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum BackendConfig {
    /// Rule-based valence lexicon. Uses the built-in word table unless a
    /// VADER-format lexicon file is given.
    Lexicon {
        #[serde(default)]
        lexicon_file: Option<PathBuf>,
    },
    /// Trained pipeline loaded from a paired artifact set.
    Model { pipeline: PathBuf, labels: PathBuf },
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::Lexicon { lexicon_file: None }
    }
}

impl BackendConfig {
    /// Model back-end reading the default artifact names from `dir`.
    pub fn model_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        BackendConfig::Model {
            pipeline: dir.join(PIPELINE_FILE_NAME),
            labels: dir.join(LABELS_FILE_NAME),
        }
    }
}

/// Deployment configuration for the classification facade.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoodConfig {
    #[serde(flatten)]
    pub backend: BackendConfig,
    /// Force CPU execution for the model back-end.
    #[serde(default)]
    pub cpu: bool,
}

impl MoodConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| MoodError::artifact_load(path, e))?;
        serde_json::from_str(&content).map_err(|e| MoodError::artifact_load(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_model_backend() {
        let cfg: MoodConfig = serde_json::from_str(
            r#"{"backend":"model","pipeline":"m/p.json","labels":"m/l.json","cpu":true}"#,
        )
        .unwrap();
        assert!(cfg.cpu);
        assert_eq!(
            cfg.backend,
            BackendConfig::Model {
                pipeline: "m/p.json".into(),
                labels: "m/l.json".into()
            }
        );
    }

    #[test]
    fn lexicon_backend_defaults() {
        let cfg: MoodConfig = serde_json::from_str(r#"{"backend":"lexicon"}"#).unwrap();
        assert_eq!(cfg, MoodConfig::default());
    }

    #[test]
    fn training_defaults_match_reference_setup() {
        let cfg = TrainingConfig::default();
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.test_fraction, 0.2);
        assert_eq!(cfg.max_iter, 1000);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn non_finite_or_non_positive_parameters_are_rejected() {
        let tweaks: [fn(&mut TrainingConfig); 7] = [
            |c| c.c = f64::NAN,
            |c| c.c = f64::INFINITY,
            |c| c.c = 0.0,
            |c| c.learning_rate = f64::NAN,
            |c| c.learning_rate = -0.1,
            |c| c.test_fraction = f64::NAN,
            |c| c.max_iter = 0,
        ];
        for tweak in tweaks {
            let mut cfg = TrainingConfig::default();
            tweak(&mut cfg);
            assert!(
                matches!(cfg.validate(), Err(MoodError::InvalidConfig(_))),
                "{cfg:?}"
            );
        }
    }
}
