//! Element factory contract.
//!
//! The screen never draws anything itself. It asks an [`ElementFactory`] for
//! tiles, labels and buttons, then positions them through the handles the
//! factory returns. Labels come back already sized to their rendered text,
//! which is what anchor resolution measures.

use crate::config::options::Color;
use crate::domain::error::Result;

pub use crate::domain::element::ElementId;

/// Position and measured size of an element.
///
/// `x`/`y` are the element's anchor point; how the factory draws relative to
/// it depends on the element's origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Host rendering primitives.
///
/// Mutators return [`PanelError::UnknownElement`](crate::PanelError::UnknownElement)
/// for handles the factory did not issue or has already destroyed.
pub trait ElementFactory {
    /// Sets the colour behind every element.
    fn set_background(&mut self, color: Color);

    /// Creates an image tile stretched to `width × height`.
    fn create_tile(&mut self, x: f64, y: f64, width: f64, height: f64, image: &str) -> ElementId;

    /// Creates a text label sized to its rendered text.
    fn create_label(&mut self, x: f64, y: f64, font: &str, text: &str, size: f64) -> ElementId;

    /// Creates a clickable element showing `image` at its intrinsic size.
    fn create_button(&mut self, x: f64, y: f64, image: &str) -> ElementId;

    /// Current geometry, or `None` for unknown handles.
    fn geometry(&self, id: ElementId) -> Option<Geometry>;

    fn set_position(&mut self, id: ElementId, x: f64, y: f64) -> Result<()>;

    fn set_size(&mut self, id: ElementId, width: f64, height: f64) -> Result<()>;

    /// Sets the normalized anchor origin; `(0, 0.5)` centres vertically on `y`.
    fn set_origin(&mut self, id: ElementId, x: f64, y: f64) -> Result<()>;

    fn set_tint(&mut self, id: ElementId, color: Color) -> Result<()>;

    /// Swaps the displayed image of a tile or button.
    fn set_image(&mut self, id: ElementId, image: &str) -> Result<()>;

    /// Releases the element.
    fn destroy(&mut self, id: ElementId) -> Result<()>;
}
