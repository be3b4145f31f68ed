//! Error types for the settings panel.
//!
//! This module defines the centralized error type [`PanelError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.
//!
//! # Severity
//!
//! Errors fall into two groups:
//!
//! - **Fatal**: configuration and schema problems abort the build before or
//!   while rows are processed.
//! - **Reported**: evaluation problems in rules, actions and properties are
//!   collected as diagnostics and logged, but never abort a build or a click.
//!
//! Use [`PanelError::is_fatal`] to tell them apart.

use crate::domain::element::ElementId;
use thiserror::Error;

/// The main error type for settings panel operations.
///
/// Every variant carries enough context (row index, field name, raw expression
/// text) to diagnose a broken schema without re-running the build.
///
/// # Examples
///
/// ```
/// use settings_panel::PanelError;
///
/// let err = PanelError::schema(Some(2), "missing required attribute `text`");
/// assert!(err.is_fatal());
/// assert_eq!(err.to_string(), "Schema error at row 2: missing required attribute `text`");
/// ```
#[derive(Debug, Error)]
pub enum PanelError {
    /// Screen options are invalid or missing.
    ///
    /// Raised at configure time when the schema reference is empty, and at
    /// build time when the reference names no known document.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A schema row is structurally invalid.
    ///
    /// Missing `type`, `text` or (for bool rows) `property` attributes, or an
    /// unrecognised `type` value. `row` is the zero-based row ordinal.
    #[error("Schema error{}: {message}", fmt_row(.row))]
    Schema {
        /// Zero-based ordinal of the offending row, if the error is row-specific.
        row: Option<usize>,
        /// Description of the problem.
        message: String,
    },

    /// A rule, action or property expression could not be compiled or evaluated.
    ///
    /// Never fatal: rules fail closed (row hidden), interactions become no-ops.
    #[error("Evaluation error{} in `{field}` ({expression:?}): {message}", fmt_row(.row))]
    Evaluation {
        /// Zero-based ordinal of the row, `None` for the header done control.
        row: Option<usize>,
        /// Schema field the expression came from (`rule`, `action`, `property`).
        field: &'static str,
        /// Raw expression text as written in the schema.
        expression: String,
        /// Description of the problem.
        message: String,
    },

    /// The schema document is not well-formed XML.
    #[error("XML error: {0}")]
    Xml(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An options file could not be decoded.
    #[error("Options error: {0}")]
    Options(String),

    /// The settings store rejected a read or write.
    #[error("Store error: {0}")]
    Store(String),

    /// A host-registered action handler failed.
    #[error("Action error: {0}")]
    Action(String),

    /// A screen operation was called in the wrong lifecycle phase.
    #[error("Invalid screen state: expected {expected}, found {actual}")]
    InvalidState {
        /// Phase the operation requires.
        expected: &'static str,
        /// Phase the screen was in.
        actual: &'static str,
    },

    /// An interaction targeted an element the screen does not own.
    #[error("Unknown element: {0}")]
    UnknownElement(ElementId),
}

fn fmt_row(row: &Option<usize>) -> String {
    row.map_or_else(String::new, |r| format!(" at row {r}"))
}

impl PanelError {
    /// Builds a [`PanelError::Schema`] for the given row.
    pub fn schema(row: Option<usize>, message: impl Into<String>) -> Self {
        Self::Schema {
            row,
            message: message.into(),
        }
    }

    /// Builds a [`PanelError::Evaluation`] carrying the offending expression.
    pub fn evaluation(
        row: Option<usize>,
        field: &'static str,
        expression: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Evaluation {
            row,
            field,
            expression: expression.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if the error aborts the build it occurred in.
    ///
    /// Evaluation, store and action failures are reported and swallowed.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::Evaluation { .. } | Self::Store(_) | Self::Action(_)
        )
    }
}

impl From<quick_xml::Error> for PanelError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Xml(err.to_string())
    }
}

impl From<toml::de::Error> for PanelError {
    fn from(err: toml::de::Error) -> Self {
        Self::Options(err.to_string())
    }
}

/// A specialized `Result` type for settings panel operations.
///
/// This is a type alias for `std::result::Result<T, PanelError>` that simplifies
/// function signatures throughout the codebase.
pub type Result<T> = std::result::Result<T, PanelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluation_errors_are_not_fatal() {
        let err = PanelError::evaluation(Some(0), "rule", "a &&", "unexpected end of input");
        assert!(!err.is_fatal());
        let text = err.to_string();
        assert!(text.contains("row 0"));
        assert!(text.contains("`rule`"));
        assert!(text.contains("a &&"));
    }

    #[test]
    fn configuration_errors_are_fatal() {
        assert!(PanelError::Configuration("xml_key not set".into()).is_fatal());
        assert!(PanelError::schema(None, "bad").is_fatal());
    }

    #[test]
    fn schema_error_without_row_omits_location() {
        let err = PanelError::schema(None, "no root element");
        assert_eq!(err.to_string(), "Schema error: no root element");
    }
}
