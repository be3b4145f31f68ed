//! Visual layer: element creation and placement.
//!
//! The screen talks to the host renderer only through [`ElementFactory`].
//! Elements are created at provisional positions, measured, and then placed
//! by a two-phase [`LayoutPass`].
//!
//! # Architecture
//!
//! ```text
//! LayoutConfig + RowDescriptor → materialize → ElementFactory (phase 1)
//!                                     ↓
//!                              LayoutPass::resolve_all        (phase 2)
//! ```
//!
//! # Modules
//!
//! - [`element`]: Factory contract and element geometry
//! - [`anchor`]: Anchor specs and the two-phase layout pass
//! - [`materialize`]: Header, done control and row construction
//! - [`recording`]: Headless in-memory factory
//!
//! # Example
//!
//! ```rust
//! use settings_panel::ui::{AnchorSpec, ElementFactory, LayoutPass, Placement, RecordingFactory};
//!
//! let mut factory = RecordingFactory::new();
//! let label = factory.create_label(0.0, 0.0, "DroidSans_100", "Done", 20.0);
//!
//! let mut pass = LayoutPass::new();
//! pass.place(label, Placement::at(AnchorSpec::right_aligned(300.0, 20.0), 10.0));
//! pass.resolve_all(&mut factory)?;
//!
//! assert_eq!(factory.geometry(label).map(|g| g.x), Some(240.0));
//! # Ok::<(), settings_panel::PanelError>(())
//! ```

pub mod anchor;
pub mod element;
pub mod materialize;
pub mod recording;

pub use anchor::{AnchorSpec, LayoutPass, Placement};
pub use element::{ElementFactory, ElementId, Geometry};
pub use materialize::{materialize_header, materialize_row, HeaderVisuals, RowVisuals};
pub use recording::{ElementKind, RecordedElement, RecordingFactory};
