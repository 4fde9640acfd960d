use crate::core::{LabelVocabulary, LabelVocabularyArtifact, MoodError, MoodLabel, Result};
use crate::loaders::{ArtifactPaths, JsonArtifact};
use crate::models::{PipelineArtifact, TextClassificationPipeline};
use crate::pipelines::utils::{argmax, round_to, DeviceRequest};
use crate::pipelines::{ClassProbabilities, ClassificationResult, MoodBackend};
use candle_core::Device;

/// Output of one prediction by the trained pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub class_id: u32,
    pub label: MoodLabel,
    /// Indexed by class id.
    pub probabilities: Vec<f32>,
}

impl Prediction {
    pub fn confidence(&self) -> f32 {
        self.probabilities[self.class_id as usize]
    }
}

/// A loaded, immutable pipeline + vocabulary pair.
///
/// Built once at startup and shared by reference (or `Arc`) between callers.
/// Nothing is mutated after loading.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    pipeline: TextClassificationPipeline,
    vocabulary: LabelVocabulary,
    training_run: String,
}

impl EngineHandle {
    /// Loads both artifacts on the CPU. Any problem with either
    /// file, or a pair that was not produced by the same training run, is an
    /// [`MoodError::ArtifactLoad`].
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        Self::load_with_device(paths, DeviceRequest::Cpu)
    }

    pub fn load_with_device(paths: &ArtifactPaths, device: DeviceRequest) -> Result<Self> {
        let device = device
            .resolve()
            .map_err(|e| MoodError::artifact_load(&paths.pipeline, e))?;
        let pipeline = JsonArtifact::<PipelineArtifact>::new(&paths.pipeline).load()?;
        let labels = JsonArtifact::<LabelVocabularyArtifact>::new(&paths.labels).load()?;

        if pipeline.training_run != labels.training_run {
            return Err(MoodError::artifact_load(
                &paths.labels,
                format!(
                    "vocabulary belongs to training run '{}' but the pipeline to '{}'",
                    labels.training_run, pipeline.training_run
                ),
            ));
        }
        let engine = Self::from_artifacts(pipeline, &labels, &device).map_err(|e| {
            MoodError::artifact_load(&paths.pipeline, e)
        })?;

        tracing::info!(
            pipeline = ?paths.pipeline,
            labels = ?paths.labels,
            training_run = %engine.training_run,
            features = engine.pipeline.vectorizer().num_features(),
            "loaded mood classification pipeline"
        );
        Ok(engine)
    }

    /// Builds a handle from already deserialised artifacts.
    pub fn from_artifacts(
        pipeline: PipelineArtifact,
        labels: &LabelVocabularyArtifact,
        device: &Device,
    ) -> anyhow::Result<Self> {
        if pipeline.training_run != labels.training_run {
            anyhow::bail!(
                "pipeline run '{}' does not match vocabulary run '{}'",
                pipeline.training_run,
                labels.training_run
            );
        }
        let vocabulary = labels.to_vocabulary()?;
        let training_run = pipeline.training_run.clone();
        let pipeline = TextClassificationPipeline::from_artifact(pipeline, device)?;
        Self::new(pipeline, vocabulary, training_run)
    }

    pub(crate) fn new(
        pipeline: TextClassificationPipeline,
        vocabulary: LabelVocabulary,
        training_run: String,
    ) -> anyhow::Result<Self> {
        if pipeline.num_classes() != vocabulary.len() {
            anyhow::bail!(
                "classifier has {} classes but the vocabulary has {} labels",
                pipeline.num_classes(),
                vocabulary.len()
            );
        }
        Ok(Self {
            pipeline,
            vocabulary,
            training_run,
        })
    }

    pub fn vocabulary(&self) -> &LabelVocabulary {
        &self.vocabulary
    }

    pub fn training_run(&self) -> &str {
        &self.training_run
    }

    /// Runs the pipeline on raw text and resolves the arg-max class.
    pub fn predict(&self, text: &str) -> anyhow::Result<Prediction> {
        let probabilities = self.pipeline.predict_proba(text)?;
        let (index, _) = argmax(&probabilities)
            .ok_or_else(|| anyhow::anyhow!("classifier returned no probabilities"))?;
        let class_id = index as u32;
        let label = self
            .vocabulary
            .id_to_label(class_id)
            .ok_or_else(|| anyhow::anyhow!("Predicted ID '{}' not found in vocabulary", class_id))?;
        Ok(Prediction {
            class_id,
            label,
            probabilities,
        })
    }

    /// Probability of every label, as plain `f64`.
    pub fn probability_map(&self, prediction: &Prediction) -> ClassProbabilities {
        self.vocabulary
            .iter()
            .filter_map(|(id, label)| {
                prediction
                    .probabilities
                    .get(id as usize)
                    .map(|p| (label, f64::from(*p)))
            })
            .collect()
    }
}

impl MoodBackend for EngineHandle {
    fn name(&self) -> &'static str {
        "model"
    }

    fn classify(&self, text: &str) -> anyhow::Result<ClassificationResult> {
        let prediction = self.predict(text)?;
        let mut result = ClassificationResult::new(
            text,
            prediction.label,
            round_to(f64::from(prediction.confidence()), 3),
        );
        result.class_id = Some(prediction.class_id);
        result.probabilities = Some(self.probability_map(&prediction));
        Ok(result)
    }
}
