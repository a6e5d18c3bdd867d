use serde::Deserialize;
use serde::Serialize;
use std::path::Path;

use crate::storage::CustomToneStore;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ToneError {
    #[error("Both name and description are required.")]
    MissingField,
    #[error("A tone named `{name}` already exists.")]
    DuplicateName { name: String },
}

/// A named descriptor of writing style used to steer the rewrite.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tone {
    pub name: String,
    pub description: String,
}

/// Built-in tones in their fixed display order, followed by user-created
/// tones in creation order. Names are unique case-insensitively across the
/// merged set; the invariant is enforced at creation time.
#[derive(Clone, Debug)]
pub struct ToneCatalog {
    built_ins: Vec<Tone>,
    custom: Vec<Tone>,
    store: CustomToneStore,
}

impl ToneCatalog {
    fn built_in_bundle() -> Vec<Tone> {
        let bytes = include_bytes!("tones/builtins.json");
        // The bundle ships inside the binary; a parse failure means a broken
        // build, not a user error, so fall back to an empty set.
        serde_json::from_slice(bytes).unwrap_or_default()
    }

    pub fn load(toneshift_home: &Path) -> Self {
        let store = CustomToneStore::new(toneshift_home);
        let custom = store.load();
        Self {
            built_ins: Self::built_in_bundle(),
            custom,
            store,
        }
    }

    /// Built-ins first, then custom tones in creation order.
    pub fn all(&self) -> impl Iterator<Item = &Tone> {
        self.built_ins.iter().chain(self.custom.iter())
    }

    pub fn len(&self) -> usize {
        self.built_ins.len() + self.custom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.built_ins.is_empty() && self.custom.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Tone> {
        if index < self.built_ins.len() {
            self.built_ins.get(index)
        } else {
            self.custom.get(index - self.built_ins.len())
        }
    }

    pub fn find(&self, name: &str) -> Option<&Tone> {
        self.all().find(|tone| tone.name == name)
    }

    pub fn is_built_in(&self, name: &str) -> bool {
        self.built_ins.iter().any(|tone| tone.name == name)
    }

    fn name_taken(&self, candidate: &str) -> bool {
        self.all()
            .any(|tone| tone.name.eq_ignore_ascii_case(candidate))
    }

    /// Appends a custom tone and persists the list. Fails without mutating
    /// anything when either field trims to empty or the trimmed name
    /// collides (case-insensitively) with any existing tone.
    pub fn create(&mut self, name: &str, description: &str) -> Result<(), ToneError> {
        let name = name.trim();
        let description = description.trim();
        if name.is_empty() || description.is_empty() {
            return Err(ToneError::MissingField);
        }
        if self.name_taken(name) {
            return Err(ToneError::DuplicateName {
                name: name.to_string(),
            });
        }
        self.custom.push(Tone {
            name: name.to_string(),
            description: description.to_string(),
        });
        self.persist();
        Ok(())
    }

    /// Removes the custom tone with the exact given name and persists the
    /// list. Returns false (and touches nothing) when no custom tone
    /// matches; built-ins are never deletable. Obtaining user confirmation
    /// is the caller's job.
    pub fn delete(&mut self, name: &str) -> bool {
        let before = self.custom.len();
        self.custom.retain(|tone| tone.name != name);
        if self.custom.len() == before {
            return false;
        }
        self.persist();
        true
    }

    fn persist(&self) {
        // Best-effort: the in-memory list is authoritative for this run, so
        // a failed write degrades to losing the change at exit, not a crash.
        if let Err(err) = self.store.save(&self.custom) {
            tracing::warn!("failed to persist custom tones: {err}");
        }
    }
}
