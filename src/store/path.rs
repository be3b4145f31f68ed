//! Validated dotted key paths into a settings store.

use std::fmt;
use std::str::FromStr;

/// A dotted key path such as `audio.music.enabled`.
///
/// Segments are identifiers: an ASCII letter, `_` or `$`, followed by ASCII
/// letters, digits, `_` or `$`. Paths are validated once when a binding or
/// expression is compiled, so interaction-time lookups never re-parse text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorePath {
    segments: Vec<String>,
}

/// Reasons a path string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("empty path")]
    Empty,
    #[error("empty segment at position {0}")]
    EmptySegment(usize),
    #[error("invalid segment `{0}`")]
    InvalidSegment(String),
}

pub(crate) fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

pub(crate) fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(is_ident_start) && chars.all(is_ident_continue)
}

impl StorePath {
    /// Builds a path from already-validated identifier segments.
    pub(crate) fn from_segments(segments: Vec<String>) -> Self {
        Self { segments }
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// First segment, the root key.
    #[must_use]
    pub fn root(&self) -> &str {
        self.segments.first().map_or("", String::as_str)
    }

    /// Last segment, the key that holds the value.
    #[must_use]
    pub fn leaf(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// Every segment except the leaf.
    #[must_use]
    pub fn parents(&self) -> &[String] {
        &self.segments[..self.segments.len().saturating_sub(1)]
    }
}

impl FromStr for StorePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PathError::Empty);
        }
        let mut segments = Vec::new();
        for (index, segment) in trimmed.split('.').enumerate() {
            if segment.is_empty() {
                return Err(PathError::EmptySegment(index));
            }
            if !is_identifier(segment) {
                return Err(PathError::InvalidSegment(segment.to_string()));
            }
            segments.push(segment.to_string());
        }
        Ok(Self { segments })
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}
