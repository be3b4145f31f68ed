//! Row descriptor domain model.
//!
//! A settings screen is an ordered list of rows. Each row is either a boolean
//! toggle bound to a store property, or a link that runs an action when its
//! label is clicked. Descriptors hold the raw schema text; compiling rules and
//! bindings happens later in the build pipeline.

use crate::domain::error::{PanelError, Result};
use std::fmt;
use std::str::FromStr;

/// The kind of a settings row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    /// A label with an on/off toggle bound to a boolean store property.
    Bool,
    /// A clickable label that invokes an action.
    Link,
}

impl RowKind {
    /// Returns the schema spelling of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Link => "link",
        }
    }
}

impl fmt::Display for RowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RowKind {
    type Err = PanelError;

    /// Parses `bool` or `link`. Anything else is a schema error without a row
    /// index; callers attach the index.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "bool" => Ok(Self::Bool),
            "link" => Ok(Self::Link),
            other => Err(PanelError::schema(
                None,
                format!("unrecognized row type `{other}` (expected `bool` or `link`)"),
            )),
        }
    }
}

/// One row of the settings schema, in document order.
///
/// `property` is guaranteed present for [`RowKind::Bool`] rows by the extractor.
/// `action` and `rule` come from either an attribute or a same-named child
/// element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDescriptor {
    /// Zero-based position among all rows, hidden ones included.
    pub ordinal: usize,
    pub kind: RowKind,
    pub text: String,
    pub property: Option<String>,
    pub action: Option<String>,
    pub rule: Option<String>,
}

/// The header "done" control as described by the schema.
///
/// The control is always drawn; only its action is schema-driven.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoneDescriptor {
    pub action: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_kinds() {
        assert_eq!("bool".parse::<RowKind>().unwrap(), RowKind::Bool);
        assert_eq!("link".parse::<RowKind>().unwrap(), RowKind::Link);
    }

    #[test]
    fn rejects_unknown_kind() {
        let err = "slider".parse::<RowKind>().unwrap_err();
        assert!(err.to_string().contains("slider"));
        assert!(err.is_fatal());
    }

    #[test]
    fn kind_is_case_sensitive() {
        assert!("Bool".parse::<RowKind>().is_err());
    }
}
