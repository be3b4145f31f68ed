//! Row bindings against the settings store.
//!
//! - [`property`]: a bool row's `property` as read/write/toggle operations
//! - [`action`]: an `action` field as a direct handler or a compiled script
//! - [`registry`]: the named handlers actions may reference
//!
//! Everything here is resolved once while the screen builds. Interactions
//! only run what was resolved.

pub mod action;
pub mod property;
pub mod registry;

pub use action::ActionBinding;
pub use property::PropertyBinding;
pub use registry::{ActionContext, ActionHandler, ActionRegistry};
