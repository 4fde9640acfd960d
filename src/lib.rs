pub mod core;
pub mod loaders;
pub mod models;
pub mod pipelines;

// Re-export core types
pub use core::{MoodConfig, MoodError, MoodLabel, Result, TrainingConfig};

// Re-export pipeline entry points for easier access
pub use pipelines::mood_classification::{
    ClassificationResult, MoodClassifier, MoodClassifierBuilder,
};
pub use pipelines::inference::EngineHandle;
pub use pipelines::training::{Dataset, Trainer};
pub use pipelines::utils::DeviceSelectable;
