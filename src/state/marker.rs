//! Completion markers.
//!
//! A marker is a small JSON file written only after a provisioning step has
//! fully succeeded. Its presence is what makes a step safe to skip; a
//! directory without a marker may be the remains of an interrupted run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ComfyupError, Result};

/// A provisioning step that leaves a marker behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Sandbox,
    Source,
    Dependencies,
}

impl Step {
    /// All steps, in bootstrap order.
    pub const ALL: [Step; 3] = [Step::Sandbox, Step::Source, Step::Dependencies];

    /// File stem of the marker.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Source => "source",
            Self::Dependencies => "dependencies",
        }
    }
}

/// Persisted completion record for one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepMarker {
    pub step: Step,

    /// When the step completed.
    pub completed_at: DateTime<Utc>,

    /// Free-form detail (interpreter path, clone URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// SHA-256 of the dependency manifest at install time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest_sha256: Option<String>,
}

impl StepMarker {
    /// A marker completed now.
    pub fn now(step: Step) -> Self {
        Self {
            step,
            completed_at: Utc::now(),
            detail: None,
            manifest_sha256: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_manifest_hash(mut self, hash: impl Into<String>) -> Self {
        self.manifest_sha256 = Some(hash.into());
        self
    }
}

/// Reads and writes markers under `<state_dir>/state/`.
#[derive(Debug, Clone)]
pub struct MarkerStore {
    dir: PathBuf,
}

impl MarkerStore {
    /// Create a store rooted at the configured state directory.
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        Self {
            dir: state_dir.as_ref().join("state"),
        }
    }

    /// Directory holding the marker files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the marker for `step`.
    pub fn path(&self, step: Step) -> PathBuf {
        self.dir.join(format!("{}.json", step.name()))
    }

    /// Whether `step` has a readable marker.
    ///
    /// A corrupt marker does not count, matching [`MarkerStore::load`].
    pub fn exists(&self, step: Step) -> bool {
        self.load(step).is_some()
    }

    /// Load the marker for `step`.
    ///
    /// An unreadable or corrupt marker is treated as absent.
    pub fn load(&self, step: Step) -> Option<StepMarker> {
        let path = self.path(step);
        let content = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(marker) => Some(marker),
            Err(e) => {
                tracing::warn!("Ignoring corrupt marker {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Write a marker atomically (temp file, then rename).
    pub fn write(&self, marker: &StepMarker) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path(marker.step);
        let content = serde_json::to_string_pretty(marker).map_err(|e| {
            ComfyupError::Other(anyhow::anyhow!("Failed to serialize marker: {}", e))
        })?;

        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!("Wrote marker {}", path.display());
        Ok(())
    }
}

/// Hex SHA-256 of a file's contents.
pub fn file_sha256(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_then_load() {
        let temp = TempDir::new().unwrap();
        let store = MarkerStore::new(temp.path());

        let marker = StepMarker::now(Step::Sandbox).with_detail("comfy_venv/bin/python");
        store.write(&marker).unwrap();

        assert!(store.exists(Step::Sandbox));
        assert_eq!(store.load(Step::Sandbox), Some(marker));
        assert_eq!(
            store.path(Step::Sandbox),
            temp.path().join("state").join("sandbox.json")
        );
    }

    #[test]
    fn write_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let store = MarkerStore::new(temp.path());
        store.write(&StepMarker::now(Step::Source)).unwrap();

        let names: Vec<_> = fs::read_dir(store.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["source.json"]);
    }

    #[test]
    fn missing_marker_loads_none() {
        let temp = TempDir::new().unwrap();
        let store = MarkerStore::new(temp.path());
        assert!(!store.exists(Step::Dependencies));
        assert_eq!(store.load(Step::Dependencies), None);
    }

    #[test]
    fn corrupt_marker_loads_none() {
        let temp = TempDir::new().unwrap();
        let store = MarkerStore::new(temp.path());
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.path(Step::Source), "{not json").unwrap();

        assert_eq!(store.load(Step::Source), None);
        assert!(!store.exists(Step::Source));
    }

    #[test]
    fn serialized_marker_omits_empty_fields() {
        let marker = StepMarker::now(Step::Dependencies);
        let json = serde_json::to_string(&marker).unwrap();
        assert!(json.contains("\"step\":\"dependencies\""));
        assert!(!json.contains("manifest_sha256"));
    }

    #[test]
    fn hashes_file_contents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("requirements.txt");
        fs::write(&path, "abc").unwrap();

        assert_eq!(
            file_sha256(&path).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
