use crate::core::{MoodError, Result};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// One raw training row. Either field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LabeledRecord {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

impl LabeledRecord {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            label: Some(label.into()),
        }
    }
}

/// Labeled text records, as read from disk and before any cleaning.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<LabeledRecord>,
}

impl Dataset {
    pub fn new(records: Vec<LabeledRecord>) -> Self {
        Self { records }
    }

    /// Reads a CSV with a header row containing `text` and `label` columns.
    /// Other columns are ignored; empty cells count as missing.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        for column in ["text", "label"] {
            if !headers.iter().any(|h| h == column) {
                return Err(MoodError::InvalidDataset(format!(
                    "missing '{column}' column in header"
                )));
            }
        }
        let records = csv_reader
            .deserialize::<LabeledRecord>()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { records })
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            MoodError::InvalidDataset(format!("cannot open dataset {:?}: {}", path, e))
        })?;
        let dataset = Self::from_csv_reader(std::io::BufReader::new(file))?;
        tracing::info!(path = ?path, records = dataset.len(), "read dataset");
        Ok(dataset)
    }

    pub fn push(&mut self, record: LabeledRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[LabeledRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<T: Into<String>, L: Into<String>> FromIterator<(T, L)> for Dataset {
    fn from_iter<I: IntoIterator<Item = (T, L)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(text, label)| LabeledRecord::new(text, label))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_csv_with_missing_cells() {
        let data = "id,text,label\n1,I love it,Positive\n2,,Neutral\n3,meh,\n";
        let dataset = Dataset::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.records()[0], LabeledRecord::new("I love it", "Positive"));
        assert_eq!(dataset.records()[1].text, None);
        assert_eq!(dataset.records()[2].label, None);
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let data = "text,label\n\"Well, that was nice\",Mildly Positive\n";
        let dataset = Dataset::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(
            dataset.records()[0],
            LabeledRecord::new("Well, that was nice", "Mildly Positive")
        );
    }

    #[test]
    fn header_must_name_both_columns() {
        let data = "sentence,label\nhello,Neutral\n";
        assert!(matches!(
            Dataset::from_csv_reader(data.as_bytes()),
            Err(MoodError::InvalidDataset(_))
        ));
    }

    #[test]
    fn collects_from_pairs() {
        let dataset: Dataset = [("good", "Positive"), ("bad", "Negative")].into_iter().collect();
        assert_eq!(dataset.len(), 2);
    }
}
