use std::fs;
use std::path::Path;
use std::path::PathBuf;

use crate::tones::Tone;

/// File under the toneshift home that carries the user's custom tones.
pub const CUSTOM_TONES_FILE: &str = "custom_tones.json";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize custom tones: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
}

/// Durable store for the custom tone list. This process is the sole writer,
/// so `save` simply replaces the whole record.
#[derive(Clone, Debug)]
pub struct CustomToneStore {
    path: PathBuf,
}

impl CustomToneStore {
    pub fn new(toneshift_home: &Path) -> Self {
        Self {
            path: toneshift_home.join(CUSTOM_TONES_FILE),
        }
    }

    /// Reads the stored list. A missing record yields an empty list. An
    /// unparsable record is discarded (the file is deleted) and logged;
    /// the user starts over with an empty custom list rather than seeing
    /// an error.
    pub fn load(&self) -> Vec<Tone> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                tracing::warn!("failed to read {}: {err}", self.path.display());
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<Tone>>(&contents) {
            Ok(tones) => tones,
            Err(err) => {
                tracing::warn!(
                    "discarding corrupt custom tone record {}: {err}",
                    self.path.display()
                );
                if let Err(err) = fs::remove_file(&self.path) {
                    tracing::warn!("failed to remove {}: {err}", self.path.display());
                }
                Vec::new()
            }
        }
    }

    /// Replaces the record with the full list. Write-to-temp-then-rename so
    /// a crash mid-write never leaves a torn record behind.
    pub fn save(&self, tones: &[Tone]) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(tones)
            .map_err(|source| StorageError::Serialize { source })?;
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|source| StorageError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|source| StorageError::Write {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })
    }
}
