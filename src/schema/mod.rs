//! Schema layer: document parsing and row extraction.
//!
//! ```text
//! SchemaSource ──fetch(key)──▶ XML text ──parse──▶ SchemaDocument ──extract──▶ RowDescriptor[]
//! ```
//!
//! # Modules
//!
//! - [`source`]: key → document text lookup
//! - [`document`]: `quick_xml`-backed attribute tree
//! - [`extract`]: field resolution and row/done extraction

pub mod document;
pub mod extract;
pub mod source;

pub use document::{Node, SchemaDocument};
pub use extract::{extract_done, extract_rows, resolve_field};
pub use source::{DirectorySource, SchemaSource};
