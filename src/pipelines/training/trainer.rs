use super::dataset::Dataset;
#[cfg(test)]
use super::dataset::LabeledRecord;
use crate::core::{
    LabelVocabulary, LabelVocabularyArtifact, MoodError, MoodLabel, Result, TrainingConfig,
};
use crate::loaders::{save_pair, ArtifactPaths};
use crate::models::{
    FitOptions, LogisticRegression, PipelineArtifact, TextClassificationPipeline, TfidfVectorizer,
};
use crate::pipelines::inference::EngineHandle;
use crate::pipelines::utils::{argmax, DeviceRequest, DeviceSelectable};
use candle_core::Tensor;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

/// Summary of one training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub total_records: usize,
    /// Records discarded for a missing text or label.
    pub dropped_records: usize,
    pub train_records: usize,
    pub eval_records: usize,
    /// Count of cleaned records per label.
    pub label_support: BTreeMap<MoodLabel, usize>,
    pub num_features: usize,
    pub final_loss: f32,
    /// Accuracy on the held-out partition, `None` when it is empty.
    pub eval_accuracy: Option<f64>,
}

/// Fitted pipeline plus its vocabulary, tagged with one training run id.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub pipeline: TextClassificationPipeline,
    pub vocabulary: LabelVocabulary,
    pub training_run: String,
    pub report: TrainingReport,
}

impl TrainedModel {
    /// The two artifacts of this run.
    pub fn to_artifacts(&self) -> Result<(PipelineArtifact, LabelVocabularyArtifact)> {
        let pipeline = self
            .pipeline
            .to_artifact(self.training_run.clone())
            .map_err(MoodError::training)?;
        let labels = LabelVocabularyArtifact::new(&self.vocabulary, self.training_run.clone());
        Ok((pipeline, labels))
    }

    /// Writes the pipeline and label artifacts as a pair. If either write
    /// fails, neither target file is replaced.
    pub fn save(&self, paths: &ArtifactPaths) -> Result<()> {
        let (pipeline, labels) = self.to_artifacts()?;
        save_pair(paths, &pipeline, &labels)?;
        tracing::info!(
            pipeline = ?paths.pipeline,
            labels = ?paths.labels,
            training_run = %self.training_run,
            "saved model artifacts"
        );
        Ok(())
    }

    /// Serves this model directly without a round trip through disk.
    pub fn into_engine(self) -> Result<EngineHandle> {
        EngineHandle::new(self.pipeline, self.vocabulary, self.training_run)
            .map_err(MoodError::training)
    }
}

/// Offline trainer for the TF-IDF + logistic regression pipeline.
///
/// ```rust,no_run
/// use moodify::core::TrainingConfig;
/// use moodify::loaders::ArtifactPaths;
/// use moodify::pipelines::training::{Dataset, Trainer};
///
/// # fn run() -> moodify::core::Result<()> {
/// let dataset = Dataset::from_csv_path("dataset.csv")?;
/// let model = Trainer::new(TrainingConfig::default()).train(&dataset)?;
/// model.save(&ArtifactPaths::in_dir("model"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Trainer {
    config: TrainingConfig,
    device_request: DeviceRequest,
}

impl DeviceSelectable for Trainer {
    fn device_request_mut(&mut self) -> &mut DeviceRequest {
        &mut self.device_request
    }
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            device_request: DeviceRequest::Cpu,
        }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn train(&self, dataset: &Dataset) -> Result<TrainedModel> {
        self.config.validate()?;
        let vocabulary = LabelVocabulary::canonical();
        let (texts, labels, dropped) = clean(dataset)?;

        let label_support = labels.iter().fold(BTreeMap::new(), |mut acc, label| {
            *acc.entry(*label).or_insert(0) += 1;
            acc
        });
        if texts.is_empty() {
            return Err(MoodError::InvalidDataset(
                "no usable records after dropping rows with missing text or label".to_string(),
            ));
        }
        if label_support.len() < 2 {
            return Err(MoodError::InvalidDataset(format!(
                "need at least 2 distinct labels, found {}",
                label_support.len()
            )));
        }

        let (train_idx, eval_idx) =
            split_indices(texts.len(), self.config.test_fraction, self.config.seed);
        tracing::info!(
            records = texts.len(),
            dropped,
            train = train_idx.len(),
            eval = eval_idx.len(),
            seed = self.config.seed,
            "starting training run"
        );

        let train_texts: Vec<&str> = train_idx.iter().map(|&i| texts[i].as_str()).collect();
        let train_targets: Vec<u32> = train_idx
            .iter()
            .map(|&i| class_id(&vocabulary, labels[i]))
            .collect::<Result<_>>()?;

        let device = self
            .device_request
            .clone()
            .resolve()
            .map_err(|e| MoodError::training(e.context("device unavailable")))?;

        let mut vectorizer = TfidfVectorizer::new(self.config.vectorizer.clone());
        vectorizer.fit(&train_texts).map_err(MoodError::training)?;
        let num_features = vectorizer.num_features();
        if num_features == 0 {
            return Err(MoodError::InvalidDataset(
                "training texts contain no usable tokens".to_string(),
            ));
        }

        let matrix = vectorizer
            .transform_batch(&train_texts)
            .map_err(MoodError::training)?;
        let features = Tensor::from_vec(matrix, (train_texts.len(), num_features), &device)?;
        let targets = Tensor::new(train_targets.as_slice(), &device)?;
        let options = FitOptions {
            max_iter: self.config.max_iter,
            learning_rate: self.config.learning_rate,
            c: self.config.c,
            ..FitOptions::default()
        };
        let (classifier, final_loss) =
            LogisticRegression::fit(&features, &targets, vocabulary.len(), &options)
                .map_err(MoodError::training)?;
        let pipeline = TextClassificationPipeline::new(vectorizer, classifier)
            .map_err(MoodError::training)?;

        let eval_accuracy = evaluate(&pipeline, &vocabulary, &texts, &labels, &eval_idx)?;
        let report = TrainingReport {
            total_records: dataset.len(),
            dropped_records: dropped,
            train_records: train_idx.len(),
            eval_records: eval_idx.len(),
            label_support,
            num_features,
            final_loss,
            eval_accuracy,
        };
        let training_run = format!("{:016x}", rand::rng().random::<u64>());
        tracing::info!(
            training_run = %training_run,
            features = num_features,
            loss = final_loss,
            accuracy = ?eval_accuracy,
            "training finished"
        );

        Ok(TrainedModel {
            pipeline,
            vocabulary,
            training_run,
            report,
        })
    }

    /// Trains and writes both artifacts. Nothing is written if training fails.
    pub fn train_and_save(&self, dataset: &Dataset, paths: &ArtifactPaths) -> Result<TrainedModel> {
        let model = self.train(dataset)?;
        model.save(paths)?;
        Ok(model)
    }
}

/// Drops rows with a missing or blank text or label. Labels must match a
/// canonical spelling exactly, surrounding whitespace included.
fn clean(dataset: &Dataset) -> Result<(Vec<String>, Vec<MoodLabel>, usize)> {
    let mut texts = Vec::with_capacity(dataset.len());
    let mut labels = Vec::with_capacity(dataset.len());
    let mut dropped = 0;
    for (row, record) in dataset.records().iter().enumerate() {
        let text = record.text.as_deref().map(str::trim).filter(|t| !t.is_empty());
        let label = record.label.as_deref().filter(|l| !l.trim().is_empty());
        let (Some(text), Some(label)) = (text, label) else {
            dropped += 1;
            continue;
        };
        let label: MoodLabel = label
            .parse()
            .map_err(|e| MoodError::InvalidDataset(format!("record {row}: {e}")))?;
        texts.push(text.to_string());
        labels.push(label);
    }
    if dropped > 0 {
        tracing::warn!(dropped, "dropped records with missing text or label");
    }
    Ok((texts, labels, dropped))
}

/// Seeded shuffle; the first `ceil(n * fraction)` indices are held out, but
/// at least one record always stays in training.
fn split_indices(n: usize, test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    let eval_len = ((n as f64 * test_fraction).ceil() as usize).min(n.saturating_sub(1));
    let train = indices.split_off(eval_len);
    (train, indices)
}

fn class_id(vocabulary: &LabelVocabulary, label: MoodLabel) -> Result<u32> {
    vocabulary
        .label_to_id(label)
        .ok_or_else(|| MoodError::Training(format!("label '{label}' has no class id")))
}

fn evaluate(
    pipeline: &TextClassificationPipeline,
    vocabulary: &LabelVocabulary,
    texts: &[String],
    labels: &[MoodLabel],
    eval_idx: &[usize],
) -> Result<Option<f64>> {
    if eval_idx.is_empty() {
        return Ok(None);
    }
    let eval_texts: Vec<&str> = eval_idx.iter().map(|&i| texts[i].as_str()).collect();
    let rows = pipeline
        .predict_proba_batch(&eval_texts)
        .map_err(MoodError::training)?;
    let mut correct = 0usize;
    for (row, &i) in rows.iter().zip(eval_idx) {
        let predicted = argmax(row).map(|(id, _)| id as u32);
        if predicted == Some(class_id(vocabulary, labels[i])?) {
            correct += 1;
        }
    }
    Ok(Some(correct as f64 / eval_idx.len() as f64))
}
