//! Settings persistence.
//!
//! The host keeps module settings as JSON values addressed by
//! `(namespace, key)`. Spell points use two keys under [`MODULE_NAME`]: the
//! world toggle [`ENABLED_KEY`] and the [`SETTINGS_KEY`] blob holding
//! everything else.

mod file;
mod memory;

pub use file::FileSettingsStore;
pub use memory::InMemorySettingsStore;

use serde_json::Value;
use spellpoints_core::{MODULE_NAME, Settings};

use crate::error::Result;

/// Key of the world-level enable toggle.
pub const ENABLED_KEY: &str = "spEnableSpellpoints";

/// Key of the settings blob.
pub const SETTINGS_KEY: &str = "settings";

/// Host settings storage.
pub trait SettingsStore: Send + Sync {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<Value>>;

    fn set(&self, namespace: &str, key: &str, value: Value) -> Result<()>;
}

/// Loads the active settings: defaults, then the stored blob, then the toggle.
///
/// The result is normalized so cost and points tables are fully populated.
pub fn load_settings(store: &dyn SettingsStore) -> Result<Settings> {
    let mut settings = match store.get(MODULE_NAME, SETTINGS_KEY)? {
        Some(Value::Null) | None => Settings::new(),
        Some(blob) => serde_json::from_value(blob)?,
    };

    if let Some(enabled) = store.get(MODULE_NAME, ENABLED_KEY)?.as_ref().and_then(flag) {
        settings.enabled = enabled;
    }

    settings.normalize();
    Ok(settings)
}

/// Writes `settings` back as blob plus toggle.
pub fn store_settings(store: &dyn SettingsStore, settings: &Settings) -> Result<()> {
    store.set(MODULE_NAME, SETTINGS_KEY, serde_json::to_value(settings)?)?;
    store.set(MODULE_NAME, ENABLED_KEY, Value::Bool(settings.enabled))
}

fn flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
