//! Reading and writing the paired training artifacts.
//!
//! ## Main Types
//!
//! - [`ArtifactPaths`] - Locations of a pipeline artifact and its label vocabulary
//! - [`JsonArtifact`] - Typed JSON file loader/writer with path-aware errors
//! - [`save_pair`] - Writes a pipeline and its vocabulary together
//!
//! Writes go to a sibling temp file first and are renamed into place, so a
//! failed run never leaves a half-written artifact behind.

use crate::core::{MoodError, Result, LABELS_FILE_NAME, PIPELINE_FILE_NAME};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Where a matching pipeline/vocabulary pair lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub pipeline: PathBuf,
    pub labels: PathBuf,
}

impl ArtifactPaths {
    pub fn new(pipeline: impl Into<PathBuf>, labels: impl Into<PathBuf>) -> Self {
        Self {
            pipeline: pipeline.into(),
            labels: labels.into(),
        }
    }

    /// Default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join(PIPELINE_FILE_NAME), dir.join(LABELS_FILE_NAME))
    }
}

#[derive(Debug, Clone)]
pub struct JsonArtifact<T> {
    pub path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T> JsonArtifact<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> JsonArtifact<T> {
    pub fn load(&self) -> Result<T> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| MoodError::artifact_load(&self.path, e))?;
        serde_json::from_str(&content).map_err(|e| MoodError::artifact_load(&self.path, e))
    }
}

impl<T: Serialize> JsonArtifact<T> {
    pub fn save(&self, value: &T) -> Result<()> {
        self.stage(value)?.commit()
    }

    /// Writes `value` next to the target without replacing it yet.
    fn stage(&self, value: &T) -> Result<StagedArtifact> {
        let tmp = tmp_path(&self.path);
        let write = || -> std::io::Result<()> {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let mut file = std::fs::File::create(&tmp)?;
            serde_json::to_writer(&mut file, value)?;
            file.write_all(b"\n")?;
            file.sync_all()
        };
        let staged = StagedArtifact {
            tmp: Some(tmp.clone()),
            path: self.path.clone(),
        };
        write().map_err(|e| MoodError::artifact_write(&self.path, e))?;
        Ok(staged)
    }
}

/// A fully written temp file waiting to be renamed over its target. Dropped
/// without [`commit`](Self::commit), the temp file is removed.
struct StagedArtifact {
    tmp: Option<PathBuf>,
    path: PathBuf,
}

impl StagedArtifact {
    fn commit(mut self) -> Result<()> {
        match self.tmp.take() {
            Some(tmp) => std::fs::rename(&tmp, &self.path).map_err(|e| {
                let _ = std::fs::remove_file(&tmp);
                MoodError::artifact_write(&self.path, e)
            }),
            None => Ok(()),
        }
    }
}

impl Drop for StagedArtifact {
    fn drop(&mut self) {
        if let Some(tmp) = self.tmp.take() {
            let _ = std::fs::remove_file(tmp);
        }
    }
}

/// Writes a pipeline artifact and its label vocabulary together. Both are
/// staged before either target is replaced, so a failed write leaves the
/// previous pair in place.
pub fn save_pair<P: Serialize, L: Serialize>(
    paths: &ArtifactPaths,
    pipeline: &P,
    labels: &L,
) -> Result<()> {
    let pipeline = JsonArtifact::new(&paths.pipeline).stage(pipeline)?;
    let labels = JsonArtifact::new(&paths.labels).stage(labels)?;
    pipeline.commit()?;
    labels.commit()
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = JsonArtifact::<BTreeMap<String, u32>>::new(dir.path().join("nested/a.json"));
        let value = BTreeMap::from([("x".to_string(), 1)]);
        artifact.save(&value).unwrap();
        assert_eq!(artifact.load().unwrap(), value);
        assert!(!dir.path().join("nested/a.json.tmp").exists());
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = JsonArtifact::<u32>::new(dir.path().join("absent.json"));
        assert!(matches!(artifact.load(), Err(MoodError::ArtifactLoad { .. })));
    }

    #[test]
    fn malformed_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        let artifact = JsonArtifact::<u32>::new(path);
        assert!(matches!(artifact.load(), Err(MoodError::ArtifactLoad { .. })));
    }

    #[test]
    fn failed_pair_write_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let paths = ArtifactPaths::new(dir.path().join("p.json"), blocker.join("l.json"));

        let err = save_pair(&paths, &1u32, &2u32).unwrap_err();
        assert!(matches!(err, MoodError::ArtifactWrite { .. }));
        assert!(!paths.pipeline.exists());
        assert!(!dir.path().join("p.json.tmp").exists());
    }

    #[test]
    fn failed_pair_write_keeps_the_previous_pair() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        save_pair(&paths, &"old", &"old").unwrap();

        // A directory squatting on the labels temp path makes staging fail.
        std::fs::create_dir(tmp_path(&paths.labels)).unwrap();
        assert!(save_pair(&paths, &"new", &"new").is_err());

        let pipeline: String = JsonArtifact::new(&paths.pipeline).load().unwrap();
        assert_eq!(pipeline, "old");
        assert!(!tmp_path(&paths.pipeline).exists());
    }
}
