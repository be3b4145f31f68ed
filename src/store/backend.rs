//! Settings store abstraction.
//!
//! The store is owned by the host and outlives every screen. The build
//! pipeline receives it as an explicit `&mut dyn SettingsStore` so tests can
//! substitute an in-memory fake.

use crate::domain::error::Result;
use crate::store::path::StorePath;
use crate::store::value::Value;

/// Path-addressable mutable store of primitive setting values.
///
/// # Implementations
///
/// - [`MemoryStore`](crate::store::MemoryStore): nested JSON object held in memory
///
/// # Examples
///
/// ```
/// use settings_panel::store::{MemoryStore, SettingsStore, StorePath, Value};
///
/// let mut store = MemoryStore::from_json(r#"{"audio": {"music": true}}"#)?;
/// let path: StorePath = "audio.music".parse().unwrap();
/// store.write(&path, Value::Bool(false))?;
/// assert_eq!(store.read(&path), Some(Value::Bool(false)));
/// # Ok::<(), settings_panel::PanelError>(())
/// ```
pub trait SettingsStore {
    /// Returns the primitive value at `path`, or `None` if nothing primitive
    /// lives there.
    fn read(&self, path: &StorePath) -> Option<Value>;

    /// Stores `value` at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Store`](crate::PanelError::Store) if the path
    /// cannot hold a value (missing parent, non-object parent) or the value is
    /// not representable.
    fn write(&mut self, path: &StorePath, value: Value) -> Result<()>;
}
