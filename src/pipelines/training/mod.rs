//! Offline training of the TF-IDF + logistic regression pipeline.
//!
//! Reads labeled records, drops incomplete rows, holds out a seeded
//! evaluation partition and fits the pipeline on the rest. The fitted
//! pipeline and its label vocabulary are written together and carry the
//! same training run tag, so the engine refuses to load a mixed pair.
//!
//! ## Main Types
//!
//! - [`Dataset`] - Raw labeled records, usually read from CSV
//! - [`Trainer`] - Cleans, splits and fits
//! - [`TrainedModel`] - The fitted pipeline, ready to save or serve
//! - [`TrainingReport`] - Counts and held-out accuracy of a run

pub mod dataset;
pub mod trainer;

pub use dataset::{Dataset, LabeledRecord};
pub use trainer::{TrainedModel, Trainer, TrainingReport};
