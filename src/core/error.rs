use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MoodError {
    // Serving
    /// The input was empty after trimming. Client-caused.
    #[error("Text input is empty")]
    EmptyInput,

    /// A back-end failed on an otherwise valid request. The cause is kept
    /// for logs and never rendered in the message.
    #[error("Internal classification error")]
    InternalClassification(#[source] Box<dyn std::error::Error + Send + Sync>),

    // Artifacts
    #[error("Failed to load artifact {path:?}: {reason}")]
    ArtifactLoad { path: PathBuf, reason: String },

    #[error("Failed to write artifact {path:?}: {reason}")]
    ArtifactWrite { path: PathBuf, reason: String },

    // Training
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The fit itself failed on valid input, e.g. the device is unavailable
    /// or the optimizer diverged.
    #[error("Training failed: {0}")]
    Training(String),

    // Pass-through from dependencies
    #[error(transparent)]
    Candle(#[from] candle_core::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, MoodError>;

impl MoodError {
    pub(crate) fn artifact_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        MoodError::ArtifactLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn artifact_write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        MoodError::ArtifactWrite {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn training(err: anyhow::Error) -> Self {
        MoodError::Training(format!("{err:#}"))
    }

    pub(crate) fn internal(err: anyhow::Error) -> Self {
        MoodError::InternalClassification(err.into())
    }

    /// True for errors the caller should report as a client error.
    pub fn is_client_error(&self) -> bool {
        matches!(self, MoodError::EmptyInput)
    }
}
