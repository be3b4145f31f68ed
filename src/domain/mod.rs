//! Domain layer for the settings panel.
//!
//! This module contains the core domain types, independent of any rendering
//! backend or schema format.
//!
//! # Organization
//!
//! - [`element`]: Opaque visual handles
//! - [`error`]: Error types and result aliases
//! - [`row`]: Row descriptors extracted from the schema
//!
//! # Examples
//!
//! ```
//! use settings_panel::domain::{PanelError, Result, RowKind};
//!
//! fn kind_of(raw: &str) -> Result<RowKind> {
//!     raw.parse()
//! }
//!
//! assert!(kind_of("link").is_ok());
//! assert!(matches!(kind_of("radio"), Err(PanelError::Schema { .. })));
//! ```

pub mod element;
pub mod error;
pub mod row;

pub use element::ElementId;
pub use error::{PanelError, Result};
pub use row::{DoneDescriptor, RowDescriptor, RowKind};
