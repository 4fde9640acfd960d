//! Mood classification facade.
//!
//! Classifies a text into one of five ordered moods, from Negative to
//! Positive. The facade is the same whichever back-end serves it: the
//! rule-based valence lexicon, or a trained TF-IDF + logistic regression
//! pipeline loaded from disk.
//!
//! ## Main Types
//!
//! - [`MoodClassifier`] - Validates input and delegates to a back-end
//! - [`MoodClassifierBuilder`] - Chooses and loads the back-end
//! - [`ClassificationResult`] - Normalised output of every back-end
//!
//! ## Usage Example
//!
//! ```rust
//! use moodify::pipelines::mood_classification::*;
//!
//! let classifier = MoodClassifierBuilder::lexicon().build()?;
//! let result = classifier.classify("This is the worst, I hate it!")?;
//! println!("Mood: {} (confidence: {:.3})", result.mood, result.confidence);
//! # Ok::<(), moodify::core::MoodError>(())
//! ```

pub mod builder;
pub mod pipeline;
pub mod result;

pub use builder::MoodClassifierBuilder;
pub use pipeline::MoodClassifier;
pub use result::{ClassProbabilities, ClassificationResult};

pub use crate::core::MoodLabel;
pub use crate::pipelines::utils::DeviceSelectable;
