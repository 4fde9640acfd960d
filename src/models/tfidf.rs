//! TF-IDF text vectorizer.
//!
//! Word splitting uses the BERT pre-tokenizer (whitespace + punctuation), then
//! keeps tokens made only of word characters and at least
//! `min_token_chars` long. Weights are `tf * idf` with the smoothed
//! `idf = ln((1 + n) / (1 + df)) + 1`, and every row is l2-normalised.

use crate::core::VectorizerConfig;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
use tokenizers::{OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer};

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    config: VectorizerConfig,
    index: HashMap<String, usize>,
    terms: Vec<String>,
    idf: Vec<f32>,
}

/// Serialisable fitted state of a [`TfidfVectorizer`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfArtifact {
    pub config: VectorizerConfig,
    /// Feature column `i` is `terms[i]`.
    pub terms: Vec<String>,
    pub idf: Vec<f32>,
}

impl TfidfVectorizer {
    pub fn new(config: VectorizerConfig) -> Self {
        Self {
            config,
            index: HashMap::new(),
            terms: Vec::new(),
            idf: Vec::new(),
        }
    }

    pub fn from_artifact(artifact: TfidfArtifact) -> anyhow::Result<Self> {
        if artifact.terms.len() != artifact.idf.len() {
            anyhow::bail!(
                "vectorizer has {} terms but {} idf weights",
                artifact.terms.len(),
                artifact.idf.len()
            );
        }
        if let Some(bad) = artifact.idf.iter().find(|w| !w.is_finite() || **w <= 0.0) {
            anyhow::bail!("vectorizer has an invalid idf weight {}", bad);
        }
        let mut index = HashMap::with_capacity(artifact.terms.len());
        for (i, term) in artifact.terms.iter().enumerate() {
            if index.insert(term.clone(), i).is_some() {
                anyhow::bail!("vectorizer term '{}' is duplicated", term);
            }
        }
        Ok(Self {
            config: artifact.config,
            index,
            terms: artifact.terms,
            idf: artifact.idf,
        })
    }

    pub fn to_artifact(&self) -> TfidfArtifact {
        TfidfArtifact {
            config: self.config.clone(),
            terms: self.terms.clone(),
            idf: self.idf.clone(),
        }
    }

    pub fn num_features(&self) -> usize {
        self.terms.len()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Splits `text` into the tokens this vectorizer counts.
    pub fn analyze(&self, text: &str) -> anyhow::Result<Vec<String>> {
        let text = if self.config.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        let mut pretokenized = PreTokenizedString::from(text.as_str());
        BertPreTokenizer
            .pre_tokenize(&mut pretokenized)
            .map_err(|e| anyhow::anyhow!("Pre-tokenization error: {}", e))?;

        let min_chars = self.config.min_token_chars;
        Ok(pretokenized
            .get_splits(OffsetReferential::Original, OffsetType::Char)
            .into_iter()
            .map(|(word, _, _)| word)
            .filter(|word| word.chars().count() >= min_chars)
            .filter(|word| word.chars().all(|c| c.is_alphanumeric() || c == '_'))
            .map(str::to_string)
            .collect())
    }

    /// Learns the vocabulary and idf weights from `documents`.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) -> anyhow::Result<()> {
        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        let mut term_frequency: HashMap<String, usize> = HashMap::new();
        for doc in documents {
            let tokens = self.analyze(doc.as_ref())?;
            let unique: HashSet<&String> = tokens.iter().collect();
            for token in unique {
                *document_frequency.entry(token.clone()).or_insert(0) += 1;
            }
            for token in tokens {
                *term_frequency.entry(token).or_insert(0) += 1;
            }
        }

        let mut kept: Vec<(String, usize)> = document_frequency
            .into_iter()
            .filter(|(_, df)| *df >= self.config.min_df)
            .collect();
        if let Some(max) = self.config.max_features {
            // most frequent first, ties broken alphabetically
            kept.sort_by(|(a, _), (b, _)| {
                term_frequency[b].cmp(&term_frequency[a]).then_with(|| a.cmp(b))
            });
            kept.truncate(max);
            kept.sort_by(|(a, _), (b, _)| a.cmp(b));
        }

        let n = documents.len() as f32;
        self.terms = kept.iter().map(|(term, _)| term.clone()).collect();
        self.idf = kept
            .iter()
            .map(|(_, df)| ((1.0 + n) / (1.0 + *df as f32)).ln() + 1.0)
            .collect();
        self.index = self
            .terms
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i))
            .collect();

        tracing::debug!(
            documents = documents.len(),
            features = self.terms.len(),
            "fitted tf-idf vocabulary"
        );
        Ok(())
    }

    /// Dense, l2-normalised feature row for one document. Unknown terms are
    /// ignored, so a document with no known terms maps to all zeros.
    pub fn transform(&self, document: &str) -> anyhow::Result<Vec<f32>> {
        let mut row = vec![0f32; self.terms.len()];
        for token in self.analyze(document)? {
            if let Some(&i) = self.index.get(&token) {
                row[i] += 1.0;
            }
        }
        for (value, idf) in row.iter_mut().zip(&self.idf) {
            *value *= idf;
        }
        let norm = row.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            row.iter_mut().for_each(|v| *v /= norm);
        }
        Ok(row)
    }

    /// Row-major `documents.len() x num_features` matrix.
    pub fn transform_batch<S: AsRef<str>>(&self, documents: &[S]) -> anyhow::Result<Vec<f32>> {
        let mut matrix = Vec::with_capacity(documents.len() * self.terms.len());
        for doc in documents {
            matrix.extend(self.transform(doc.as_ref())?);
        }
        Ok(matrix)
    }
}
