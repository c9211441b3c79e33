//! JSON file settings store.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::Value;

use super::SettingsStore;
use crate::error::{Result, RuntimeError};

type Namespaces = BTreeMap<String, BTreeMap<String, Value>>;

/// Settings kept in a single JSON document `{ namespace: { key: value } }`.
///
/// The document is read once on open and rewritten on every `set` (temp file
/// then rename).
pub struct FileSettingsStore {
    path: PathBuf,
    values: RwLock<Namespaces>,
}

impl FileSettingsStore {
    /// Opens the store at `path`, creating parent directories as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let values = if path.exists() {
            let bytes = fs::read(&path)?;
            if bytes.is_empty() {
                Namespaces::new()
            } else {
                serde_json::from_slice(&bytes)?
            }
        } else {
            Namespaces::new()
        };

        tracing::debug!(target: "spellpoints::settings", path = %path.display(), "Opened settings file");

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &Namespaces) -> Result<()> {
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, serde_json::to_vec_pretty(values)?)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl SettingsStore for FileSettingsStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<Value>> {
        let values = self.values.read().map_err(|_| RuntimeError::LockPoisoned)?;
        Ok(values
            .get(namespace)
            .and_then(|entries| entries.get(key))
            .cloned())
    }

    fn set(&self, namespace: &str, key: &str, value: Value) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| RuntimeError::LockPoisoned)?;
        values
            .entry(namespace.to_owned())
            .or_default()
            .insert(key.to_owned(), value);
        self.persist(&values)?;

        tracing::debug!(target: "spellpoints::settings", namespace, key, "Saved setting");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let store = FileSettingsStore::open(&path).unwrap();
        store.set("dnd5e-spellpoints", "spEnableSpellpoints", json!(true)).unwrap();
        drop(store);

        let reopened = FileSettingsStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("dnd5e-spellpoints", "spEnableSpellpoints").unwrap(),
            Some(json!(true))
        );
        assert_eq!(reopened.get("dnd5e-spellpoints", "settings").unwrap(), None);
    }
}
