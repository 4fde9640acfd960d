use super::result::ClassificationResult;
use crate::core::{MoodError, Result};
use crate::pipelines::MoodBackend;
use std::sync::Arc;

/// Front door for mood classification.
///
/// Validates input, delegates to the configured back-end and hides back-end
/// failures behind [`MoodError::InternalClassification`]. Cloning is cheap and
/// all clones share the same back-end.
#[derive(Clone)]
pub struct MoodClassifier {
    backend: Arc<dyn MoodBackend>,
}

impl std::fmt::Debug for MoodClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoodClassifier")
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl MoodClassifier {
    pub fn new(backend: impl MoodBackend + 'static) -> Self {
        Self::from_shared(Arc::new(backend))
    }

    pub fn from_shared(backend: Arc<dyn MoodBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Classify one text.
    ///
    /// Leading and trailing whitespace is removed first; a text that is empty
    /// afterwards fails with [`MoodError::EmptyInput`] without reaching the
    /// back-end.
    pub fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let text = text.trim();
        if text.is_empty() {
            return Err(MoodError::EmptyInput);
        }

        let result = self.backend.classify(text).map_err(|e| {
            tracing::error!(backend = self.backend.name(), error = ?e, "classification failed");
            MoodError::internal(e)
        })?;

        tracing::debug!(
            backend = self.backend.name(),
            mood = %result.mood,
            confidence = result.confidence,
            "classified text"
        );
        Ok(result)
    }

    /// Classify many texts. Each entry succeeds or fails on its own.
    pub fn classify_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<Result<ClassificationResult>> {
        texts.iter().map(|t| self.classify(t.as_ref())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MoodLabel;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl MoodBackend for Counting {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn classify(&self, text: &str) -> anyhow::Result<ClassificationResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ClassificationResult::new(text, MoodLabel::Neutral, 1.0))
        }
    }

    struct Failing;

    impl MoodBackend for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn classify(&self, _text: &str) -> anyhow::Result<ClassificationResult> {
            anyhow::bail!("weights file vanished")
        }
    }

    #[test]
    fn blank_input_never_reaches_the_backend() {
        let backend = Arc::new(Counting::default());
        let classifier = MoodClassifier::from_shared(backend.clone());
        for text in ["", "   ", "\n\t"] {
            assert!(matches!(classifier.classify(text), Err(MoodError::EmptyInput)));
        }
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn input_is_trimmed_before_delegation() {
        let classifier = MoodClassifier::new(Counting::default());
        let result = classifier.classify("  hello there \n").unwrap();
        assert_eq!(result.text, "hello there");
    }

    #[test]
    fn backend_failures_get_a_generic_message() {
        let classifier = MoodClassifier::new(Failing);
        let err = classifier.classify("anything").unwrap_err();
        assert_eq!(err.to_string(), "Internal classification error");
        let source = std::error::Error::source(&err).unwrap();
        assert!(source.to_string().contains("weights file vanished"));
        assert!(!err.is_client_error());
    }

    #[test]
    fn batch_entries_fail_independently() {
        let classifier = MoodClassifier::new(Counting::default());
        let results = classifier.classify_batch(&["good", " ", "bad"]);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(MoodError::EmptyInput)));
        assert!(results[2].is_ok());
    }
}
