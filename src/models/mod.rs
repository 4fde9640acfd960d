pub mod lexicon;
pub mod logistic_regression;
pub mod text_classifier;
pub mod tfidf;

pub use lexicon::{PolarityScores, ValenceLexicon, VaderScorer};
pub use logistic_regression::{FitOptions, LinearArtifact, LogisticRegression};
pub use text_classifier::{PipelineArtifact, TextClassificationPipeline};
pub use tfidf::{TfidfArtifact, TfidfVectorizer};
