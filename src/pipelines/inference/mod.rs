//! Serving-time inference over a trained pipeline.
//!
//! [`EngineHandle::load`] reads a pipeline artifact and its label vocabulary
//! once, validates that they form a pair, and returns an immutable handle.
//!
//! ```rust,no_run
//! use moodify::loaders::ArtifactPaths;
//! use moodify::pipelines::inference::EngineHandle;
//!
//! # fn run() -> moodify::core::Result<()> {
//! let engine = EngineHandle::load(&ArtifactPaths::in_dir("model"))?;
//! let prediction = engine.predict("What a lovely afternoon").expect("valid text");
//! println!("{} ({:.3})", prediction.label, prediction.confidence());
//! # Ok(())
//! # }
//! ```

pub mod engine;

pub use engine::{EngineHandle, Prediction};
