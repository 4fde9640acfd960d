//! Rule-based mood scoring.
//!
//! A [`PolarityScorer`](crate::pipelines::PolarityScorer) produces a compound
//! polarity in `[-1, 1]`, which [`MoodLabel::from_compound`](crate::core::MoodLabel::from_compound)
//! maps onto one of the five moods.
//!
//! ```rust
//! use moodify::core::MoodLabel;
//! use moodify::pipelines::lexicon_scoring::LexiconScorer;
//!
//! let scorer = LexiconScorer::new();
//! assert_eq!(scorer.classify("I absolutely love this, it's wonderful!"), MoodLabel::Positive);
//! ```

pub mod scorer;

pub use scorer::LexiconScorer;
