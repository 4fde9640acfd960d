pub mod config;
pub mod error;
pub mod label;
pub mod vocabulary;

pub use config::{
    BackendConfig, MoodConfig, TrainingConfig, VectorizerConfig, LABELS_FILE_NAME,
    PIPELINE_FILE_NAME,
};
pub use error::{MoodError, Result};
pub use label::{MoodLabel, UnknownLabel};
pub use vocabulary::{LabelEntry, LabelVocabulary, LabelVocabularyArtifact};
