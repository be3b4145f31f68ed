//! Settings store access.
//!
//! The store itself belongs to the host; this module defines how the screen
//! talks to it and ships an in-memory implementation.
//!
//! # Modules
//!
//! - `backend`: [`SettingsStore`] trait
//! - `path`: validated dotted key paths
//! - `value`: primitive values
//! - `memory`: JSON-tree backed [`MemoryStore`]

pub mod backend;
pub mod memory;
pub mod path;
pub mod value;

pub use backend::SettingsStore;
pub use memory::MemoryStore;
pub use path::{PathError, StorePath};
pub use value::Value;
