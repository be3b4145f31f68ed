//! Opaque handles to host visuals.

use std::fmt;

/// Identifier of a visual created through an
/// [`ElementFactory`](crate::ui::ElementFactory).
///
/// The factory allocates ids; the screen only stores and compares them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
