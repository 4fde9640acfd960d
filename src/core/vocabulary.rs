//! Persisted id <-> label mapping shared by the trainer and the inference engine.

use crate::core::label::MoodLabel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bidirectional mapping between classifier output ids and mood labels.
///
/// The trainer always builds the canonical vocabulary (Negative = 0 ...
/// Positive = 4), whatever labels the dataset actually contains, so ids are
/// stable across retraining runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelVocabulary {
    id_to_label: BTreeMap<u32, MoodLabel>,
}

impl LabelVocabulary {
    pub fn canonical() -> Self {
        Self {
            id_to_label: MoodLabel::ALL.iter().map(|l| (l.id(), *l)).collect(),
        }
    }

    /// Builds a vocabulary from explicit `(id, label)` pairs, rejecting any
    /// set that is not exactly the canonical one.
    pub fn from_pairs<I>(pairs: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (u32, String)>,
    {
        let mut id_to_label = BTreeMap::new();
        for (id, raw) in pairs {
            let label: MoodLabel = raw.parse()?;
            if label.id() != id {
                anyhow::bail!(
                    "label '{}' is bound to id {} but its canonical id is {}",
                    label,
                    id,
                    label.id()
                );
            }
            if id_to_label.insert(id, label).is_some() {
                anyhow::bail!("id {} appears more than once", id);
            }
        }
        if id_to_label.len() != MoodLabel::COUNT {
            anyhow::bail!(
                "expected {} labels, found {}",
                MoodLabel::COUNT,
                id_to_label.len()
            );
        }
        Ok(Self { id_to_label })
    }

    pub fn len(&self) -> usize {
        self.id_to_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_label.is_empty()
    }

    pub fn id_to_label(&self, id: u32) -> Option<MoodLabel> {
        self.id_to_label.get(&id).copied()
    }

    pub fn label_to_id(&self, label: MoodLabel) -> Option<u32> {
        self.id_to_label
            .iter()
            .find(|(_, l)| **l == label)
            .map(|(id, _)| *id)
    }

    /// `(id, label)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, MoodLabel)> + '_ {
        self.id_to_label.iter().map(|(id, l)| (*id, *l))
    }
}

/// On-disk form of a [`LabelVocabulary`].
///
/// Pairs are written explicitly so that reordering the file can never
/// silently remap ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelVocabularyArtifact {
    pub format_version: u32,
    /// Tag shared with the pipeline artifact produced by the same run.
    pub training_run: String,
    pub labels: Vec<LabelEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEntry {
    pub id: u32,
    pub label: String,
}

impl LabelVocabularyArtifact {
    pub const FORMAT_VERSION: u32 = 1;

    pub fn new(vocabulary: &LabelVocabulary, training_run: impl Into<String>) -> Self {
        Self {
            format_version: Self::FORMAT_VERSION,
            training_run: training_run.into(),
            labels: vocabulary
                .iter()
                .map(|(id, label)| LabelEntry {
                    id,
                    label: label.as_str().to_string(),
                })
                .collect(),
        }
    }

    pub fn to_vocabulary(&self) -> anyhow::Result<LabelVocabulary> {
        if self.format_version != Self::FORMAT_VERSION {
            anyhow::bail!(
                "unsupported label vocabulary format version {}",
                self.format_version
            );
        }
        LabelVocabulary::from_pairs(self.labels.iter().map(|e| (e.id, e.label.clone())))
    }
}
