//! Lookup of schema documents by key.
//!
//! The screen only knows its schema by the `xml_key` option; the host owns the
//! actual text (an asset cache, a directory, an embedded string).

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Resolves a schema key to raw document text.
pub trait SchemaSource {
    /// Returns the document registered under `key`, or `None` if unknown.
    fn fetch(&self, key: &str) -> Option<String>;
}

impl SchemaSource for HashMap<String, String> {
    fn fetch(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Serves `<dir>/<key>.xml` from disk.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SchemaSource for DirectorySource {
    fn fetch(&self, key: &str) -> Option<String> {
        let path = self.root.join(format!("{key}.xml"));
        match fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "schema document not readable");
                None
            }
        }
    }
}
