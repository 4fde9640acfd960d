use super::pipeline::MoodClassifier;
use crate::core::{BackendConfig, MoodConfig, MoodError, Result};
use crate::loaders::ArtifactPaths;
use crate::pipelines::inference::EngineHandle;
use crate::pipelines::lexicon_scoring::LexiconScorer;
use crate::pipelines::utils::{DeviceRequest, DeviceSelectable};
use std::path::{Path, PathBuf};

pub struct MoodClassifierBuilder {
    backend: BackendConfig,
    device_request: DeviceRequest,
}

impl DeviceSelectable for MoodClassifierBuilder {
    fn device_request_mut(&mut self) -> &mut DeviceRequest {
        &mut self.device_request
    }
}

impl MoodClassifierBuilder {
    pub fn new(backend: BackendConfig) -> Self {
        Self {
            backend,
            device_request: DeviceRequest::Default,
        }
    }

    /// Rule-based back-end over the built-in lexicon.
    pub fn lexicon() -> Self {
        Self::new(BackendConfig::default())
    }

    /// Trained back-end from an explicit artifact pair.
    pub fn model(pipeline: impl Into<PathBuf>, labels: impl Into<PathBuf>) -> Self {
        Self::new(BackendConfig::Model {
            pipeline: pipeline.into(),
            labels: labels.into(),
        })
    }

    /// Trained back-end reading the default artifact names from `dir`.
    pub fn model_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(BackendConfig::model_dir(dir))
    }

    pub fn from_config(config: MoodConfig) -> Self {
        let builder = Self::new(config.backend);
        if config.cpu {
            builder.cpu()
        } else {
            builder
        }
    }

    /// Use a VADER-format lexicon file instead of the built-in table.
    /// Switches a model builder back to the lexicon back-end.
    pub fn lexicon_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.backend = BackendConfig::Lexicon {
            lexicon_file: Some(path.into()),
        };
        self
    }

    /// Loads whatever the back-end needs. Any artifact problem surfaces here,
    /// never on the first request.
    pub fn build(self) -> Result<MoodClassifier> {
        let classifier = match self.backend {
            BackendConfig::Lexicon { lexicon_file: None } => MoodClassifier::new(LexiconScorer::new()),
            BackendConfig::Lexicon {
                lexicon_file: Some(path),
            } => {
                let scorer = LexiconScorer::from_lexicon_file(&path)
                    .map_err(|e| MoodError::artifact_load(&path, format!("{e:#}")))?;
                MoodClassifier::new(scorer)
            }
            BackendConfig::Model { pipeline, labels } => {
                let paths = ArtifactPaths::new(pipeline, labels);
                MoodClassifier::new(EngineHandle::load_with_device(&paths, self.device_request)?)
            }
        };
        tracing::info!(backend = classifier.backend_name(), "mood classifier ready");
        Ok(classifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MoodLabel;
    use std::io::Write;

    #[test]
    fn lexicon_builder_needs_no_artifacts() {
        let classifier = MoodClassifierBuilder::lexicon().build().unwrap();
        assert_eq!(classifier.backend_name(), "lexicon");
    }

    #[test]
    fn custom_lexicon_file_is_used() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# custom words").unwrap();
        writeln!(file, "zorgly\t3.2\t0.4\t[3, 3, 4, 3]").unwrap();
        let classifier = MoodClassifierBuilder::lexicon()
            .lexicon_file(file.path())
            .build()
            .unwrap();
        let result = classifier.classify("zorgly").unwrap();
        assert_eq!(result.mood, MoodLabel::Positive);
    }

    #[test]
    fn missing_lexicon_file_is_an_artifact_error() {
        let err = MoodClassifierBuilder::lexicon()
            .lexicon_file("/definitely/not/here.txt")
            .build()
            .unwrap_err();
        assert!(matches!(err, MoodError::ArtifactLoad { .. }));
    }

    #[test]
    fn missing_model_artifacts_fail_at_build() {
        let dir = tempfile::tempdir().unwrap();
        let err = MoodClassifierBuilder::model_dir(dir.path())
            .cpu()
            .build()
            .unwrap_err();
        assert!(matches!(err, MoodError::ArtifactLoad { .. }));
    }
}
