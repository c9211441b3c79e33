//! In-memory settings store for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

use super::SettingsStore;
use crate::error::{Result, RuntimeError};

#[derive(Default)]
pub struct InMemorySettingsStore {
    values: RwLock<HashMap<(String, String), Value>>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for InMemorySettingsStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<Value>> {
        let values = self.values.read().map_err(|_| RuntimeError::LockPoisoned)?;
        Ok(values
            .get(&(namespace.to_owned(), key.to_owned()))
            .cloned())
    }

    fn set(&self, namespace: &str, key: &str, value: Value) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| RuntimeError::LockPoisoned)?;
        values.insert((namespace.to_owned(), key.to_owned()), value);
        Ok(())
    }
}
