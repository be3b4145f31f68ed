//! Application layer coordinating the screen lifecycle.
//!
//! This module sits between the host (or `main.rs`) and the lower layers. It
//! owns the screen state machine and drives schema loading, rule evaluation,
//! materialization and interaction dispatch.
//!
//! # Architecture
//!
//! ```text
//! configure → build ──────────────→ interact* → teardown
//!               │                       │
//!               ├─ VisibilityPlan       ├─ PropertyBinding::toggle
//!               └─ materialize rows     └─ ActionBinding::invoke
//! ```
//!
//! # Modules
//!
//! - [`modes`]: Screen lifecycle phases
//! - [`visibility`]: Rule evaluation and slot compaction
//! - [`screen`]: The screen itself

pub mod modes;
pub mod screen;
pub mod visibility;

pub use modes::ScreenPhase;
pub use screen::{BuildReport, Interaction, RowOutcome, SettingsScreen};
pub use visibility::{slot_multiplier, RowSlot, VisibilityPlan};
