//! In-memory settings store backed by a JSON object tree.
//!
//! Useful as the host's store in headless tools and as the fake store in
//! tests. Loading from JSON is provided for fixtures; persistence stays with
//! the host.

use crate::domain::error::{PanelError, Result};
use crate::store::backend::SettingsStore;
use crate::store::path::StorePath;
use crate::store::value::Value;
use serde_json::{Map, Number};
use std::fs;
use std::path::Path;

/// Nested key/value store.
///
/// # File Format
///
/// ```json
/// {
///   "audio": { "available": true, "music": false },
///   "profile": { "name": "guest", "level": 3 }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    root: Map<String, serde_json::Value>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Store`] if the text is not valid JSON or its top
    /// level is not an object.
    pub fn from_json(json: &str) -> Result<Self> {
        match serde_json::from_str::<serde_json::Value>(json) {
            Ok(serde_json::Value::Object(root)) => Ok(Self { root }),
            Ok(other) => Err(PanelError::Store(format!(
                "store root must be an object, found {}",
                json_kind(&other)
            ))),
            Err(e) => Err(PanelError::Store(format!("invalid store JSON: {e}"))),
        }
    }

    /// Loads a JSON object from disk.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or
    /// [`PanelError::Store`] if it is not a JSON object.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Serializes the store as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Store`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.root)
            .map_err(|e| PanelError::Store(format!("failed to serialize store: {e}")))
    }

    /// Convenience setter that parses `path`, creating intermediate objects.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Store`] if `path` is malformed or crosses a
    /// non-object value.
    pub fn insert(&mut self, path: &str, value: impl Into<Value>) -> Result<()> {
        let path: StorePath = path
            .parse()
            .map_err(|e| PanelError::Store(format!("invalid path `{path}`: {e}")))?;
        let mut current = &mut self.root;
        for segment in path.parents() {
            let entry = current
                .entry(segment.clone())
                .or_insert_with(|| serde_json::Value::Object(Map::new()));
            current = match entry {
                serde_json::Value::Object(map) => map,
                other => {
                    return Err(PanelError::Store(format!(
                        "`{segment}` in `{path}` is a {}, not an object",
                        json_kind(other)
                    )))
                }
            };
        }
        current.insert(path.leaf().to_string(), to_json(&path, value.into())?);
        Ok(())
    }

    fn parent(&self, path: &StorePath) -> Option<&Map<String, serde_json::Value>> {
        path.parents().iter().try_fold(&self.root, |map, segment| {
            map.get(segment).and_then(serde_json::Value::as_object)
        })
    }

    fn parent_mut(&mut self, path: &StorePath) -> Result<&mut Map<String, serde_json::Value>> {
        let mut current = &mut self.root;
        for segment in path.parents() {
            current = current
                .get_mut(segment)
                .and_then(serde_json::Value::as_object_mut)
                .ok_or_else(|| {
                    PanelError::Store(format!("`{path}` has no object at `{segment}`"))
                })?;
        }
        Ok(current)
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

fn from_json(value: &serde_json::Value) -> Option<Value> {
    match value {
        serde_json::Value::Null => Some(Value::Null),
        serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
        serde_json::Value::Number(n) => n.as_f64().map(Value::Number),
        serde_json::Value::String(s) => Some(Value::Text(s.clone())),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
    }
}

fn to_json(path: &StorePath, value: Value) -> Result<serde_json::Value> {
    Ok(match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(b),
        Value::Number(n) => Number::from_f64(n)
            .map(serde_json::Value::Number)
            .ok_or_else(|| PanelError::Store(format!("cannot store {n} at `{path}`")))?,
        Value::Text(s) => serde_json::Value::String(s),
        Value::Element(id) => {
            return Err(PanelError::Store(format!(
                "cannot store element {id} at `{path}`"
            )))
        }
    })
}

impl SettingsStore for MemoryStore {
    fn read(&self, path: &StorePath) -> Option<Value> {
        self.parent(path)?.get(path.leaf()).and_then(from_json)
    }

    fn write(&mut self, path: &StorePath, value: Value) -> Result<()> {
        let json = to_json(path, value)?;
        self.parent_mut(path)?.insert(path.leaf().to_string(), json);
        tracing::debug!(path = %path, "store value written");
        Ok(())
    }
}
