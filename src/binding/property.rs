//! Boolean property bindings for toggle rows.

use crate::domain::error::{PanelError, Result};
use crate::store::backend::SettingsStore;
use crate::store::path::StorePath;
use crate::store::value::Value;

const FIELD: &str = "property";

/// A bool row's `property`, resolved once into a validated store path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyBinding {
    row: usize,
    path: StorePath,
}

impl PropertyBinding {
    /// Validates `source` as a store path.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Evaluation`] if `source` is not a dotted path.
    pub fn resolve(row: usize, source: &str) -> Result<Self> {
        let path = source
            .trim()
            .parse::<StorePath>()
            .map_err(|e| PanelError::evaluation(Some(row), FIELD, source, e.to_string()))?;
        Ok(Self { row, path })
    }

    #[must_use]
    pub fn path(&self) -> &StorePath {
        &self.path
    }

    /// Current value of the property.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Evaluation`] if the path is missing from the
    /// store or holds something other than a bool.
    pub fn read(&self, store: &dyn SettingsStore) -> Result<bool> {
        match store.read(&self.path) {
            Some(Value::Bool(b)) => Ok(b),
            Some(other) => Err(self.error(format!("expected bool, found {}", other.kind()))),
            None => Err(self.error("path not present in store")),
        }
    }

    /// Writes `value` to the property.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Evaluation`] if the store rejects the write.
    pub fn write(&self, store: &mut dyn SettingsStore, value: bool) -> Result<()> {
        store
            .write(&self.path, Value::Bool(value))
            .map_err(|e| self.error(e.to_string()))
    }

    /// Flips the property and returns its new value.
    ///
    /// # Errors
    ///
    /// Fails as [`read`](Self::read) or [`write`](Self::write) do; the store
    /// is left untouched when the read fails.
    pub fn toggle(&self, store: &mut dyn SettingsStore) -> Result<bool> {
        let value = !self.read(store)?;
        self.write(store, value)?;
        Ok(value)
    }

    fn error(&self, message: impl Into<String>) -> PanelError {
        PanelError::evaluation(Some(self.row), FIELD, self.path.to_string(), message)
    }
}
