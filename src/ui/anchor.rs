//! Two-phase element placement.
//!
//! Some positions depend on sizes that are only known once an element exists.
//! A label's width is fixed by its rendered text, and a toggle is pinned to the
//! right edge by its own width. Placement therefore runs in two phases:
//!
//! 1. Elements are created at a provisional origin and measured by the factory.
//! 2. [`LayoutPass::resolve_all`] evaluates every [`AnchorSpec`] against the
//!    measured geometry, in creation order, and moves or resizes the elements.
//!
//! Each anchor captures exactly the values it needs when it is built. Nothing
//! is read from shared loop state at resolve time.

use crate::domain::error::{PanelError, Result};
use crate::ui::element::{ElementFactory, ElementId, Geometry};
use std::fmt;
use std::rc::Rc;

/// A function of a measured geometry.
pub type Measure = Rc<dyn Fn(&Geometry) -> f64>;

/// One coordinate or dimension of a placement.
#[derive(Clone)]
pub enum AnchorSpec {
    /// A literal value.
    Fixed(f64),
    /// Computed from the element's own measured geometry.
    Measured(Measure),
    /// Computed from another element's geometry. The source must be placed
    /// earlier in the same pass, or not be part of the pass at all.
    Linked { source: ElementId, measure: Measure },
}

impl AnchorSpec {
    pub fn measured(f: impl Fn(&Geometry) -> f64 + 'static) -> Self {
        Self::Measured(Rc::new(f))
    }

    pub fn linked(source: ElementId, f: impl Fn(&Geometry) -> f64 + 'static) -> Self {
        Self::Linked {
            source,
            measure: Rc::new(f),
        }
    }

    /// Pins the element's right edge `margin` units left of `edge`:
    /// `edge − width − margin`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use settings_panel::ui::anchor::AnchorSpec;
    /// use settings_panel::ui::element::Geometry;
    ///
    /// let x = AnchorSpec::right_aligned(300.0, 20.0);
    /// assert_eq!(x.evaluate(&Geometry::new(0.0, 0.0, 50.0, 10.0)), Some(230.0));
    /// ```
    #[must_use]
    pub fn right_aligned(edge: f64, margin: f64) -> Self {
        Self::measured(move |own| edge - own.width - margin)
    }

    /// Evaluates a fixed or self-measured spec. Linked specs need a factory
    /// and return `None` here.
    #[must_use]
    pub fn evaluate(&self, own: &Geometry) -> Option<f64> {
        match self {
            Self::Fixed(value) => Some(*value),
            Self::Measured(measure) => Some(measure(own)),
            Self::Linked { .. } => None,
        }
    }

    /// Resolves the spec for an element whose measured geometry is `own`.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::UnknownElement`] if a linked source no longer
    /// exists.
    pub fn resolve(&self, own: &Geometry, factory: &dyn ElementFactory) -> Result<f64> {
        match self {
            Self::Linked { source, measure } => factory
                .geometry(*source)
                .map(|geometry| measure(&geometry))
                .ok_or(PanelError::UnknownElement(*source)),
            other => Ok(other.evaluate(own).unwrap_or_default()),
        }
    }
}

impl From<f64> for AnchorSpec {
    fn from(value: f64) -> Self {
        Self::Fixed(value)
    }
}

impl fmt::Debug for AnchorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            Self::Measured(_) => f.write_str("Measured(..)"),
            Self::Linked { source, .. } => f
                .debug_struct("Linked")
                .field("source", source)
                .finish_non_exhaustive(),
        }
    }
}

/// Where an element goes once measured. Unset dimensions keep the element's
/// intrinsic size.
#[derive(Debug, Clone)]
pub struct Placement {
    pub x: AnchorSpec,
    pub y: AnchorSpec,
    pub width: Option<AnchorSpec>,
    pub height: Option<AnchorSpec>,
}

impl Placement {
    pub fn at(x: impl Into<AnchorSpec>, y: impl Into<AnchorSpec>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            width: None,
            height: None,
        }
    }

    #[must_use]
    pub fn with_width(mut self, width: impl Into<AnchorSpec>) -> Self {
        self.width = Some(width.into());
        self
    }

    #[must_use]
    pub fn with_height(mut self, height: impl Into<AnchorSpec>) -> Self {
        self.height = Some(height.into());
        self
    }
}

/// Placements collected during phase 1, applied in phase 2.
#[derive(Debug, Default)]
pub struct LayoutPass {
    pending: Vec<(ElementId, Placement)>,
}

impl LayoutPass {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `placement` for `id`. Order of calls is resolution order.
    pub fn place(&mut self, id: ElementId, placement: Placement) {
        self.pending.push((id, placement));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Resolves and applies every queued placement.
    ///
    /// All specs of one element are evaluated against its measured geometry
    /// before anything about it changes, so a width spec never sees a
    /// position computed in the same step.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::UnknownElement`] if a queued element or a linked
    /// source has been destroyed.
    pub fn resolve_all(self, factory: &mut dyn ElementFactory) -> Result<()> {
        let count = self.pending.len();
        for (id, placement) in self.pending {
            let own = factory.geometry(id).ok_or(PanelError::UnknownElement(id))?;

            let view: &dyn ElementFactory = &*factory;
            let x = placement.x.resolve(&own, view)?;
            let y = placement.y.resolve(&own, view)?;
            let width = placement
                .width
                .as_ref()
                .map(|spec| spec.resolve(&own, view))
                .transpose()?;
            let height = placement
                .height
                .as_ref()
                .map(|spec| spec.resolve(&own, view))
                .transpose()?;

            factory.set_position(id, x, y)?;
            if width.is_some() || height.is_some() {
                factory.set_size(id, width.unwrap_or(own.width), height.unwrap_or(own.height))?;
            }
        }
        tracing::debug!(elements = count, "layout pass resolved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::recording::RecordingFactory;

    #[test]
    fn right_edge_anchor_uses_measured_width() {
        let mut factory = RecordingFactory::new();
        let label = factory.create_label(0.0, 0.0, "font", "x", 10.0);
        factory.set_size(label, 50.0, 10.0).unwrap();

        let mut pass = LayoutPass::new();
        pass.place(label, Placement::at(AnchorSpec::right_aligned(300.0, 20.0), 40.0));
        pass.resolve_all(&mut factory).unwrap();

        let geometry = factory.geometry(label).unwrap();
        assert_eq!(geometry.x, 230.0);
        assert_eq!(geometry.y, 40.0);
    }

    #[test]
    fn linked_specs_see_earlier_placements() {
        let mut factory = RecordingFactory::new();
        let label = factory.create_label(0.0, 0.0, "font", "Done", 20.0);
        let overlay = factory.create_button(0.0, 0.0, "transp");
        let label_width = factory.geometry(label).unwrap().width;

        let mut pass = LayoutPass::new();
        pass.place(label, Placement::at(AnchorSpec::right_aligned(400.0, 20.0), 30.0));
        pass.place(
            overlay,
            Placement::at(AnchorSpec::linked(label, |g| g.x), 0.0)
                .with_width(AnchorSpec::linked(label, |g| g.width))
                .with_height(60.0),
        );
        pass.resolve_all(&mut factory).unwrap();

        let overlay = factory.geometry(overlay).unwrap();
        assert_eq!(overlay.x, 400.0 - label_width - 20.0);
        assert_eq!(overlay.width, label_width);
        assert_eq!(overlay.height, 60.0);
    }

    #[test]
    fn each_element_keeps_its_own_anchor() {
        let mut factory = RecordingFactory::new();
        let mut pass = LayoutPass::new();
        let labels: Vec<_> = ["a", "bbbb", "cccccccc"]
            .iter()
            .map(|text| factory.create_label(0.0, 0.0, "font", text, 10.0))
            .collect();
        for &label in &labels {
            pass.place(label, Placement::at(AnchorSpec::right_aligned(200.0, 0.0), 0.0));
        }
        pass.resolve_all(&mut factory).unwrap();

        for label in labels {
            let g = factory.geometry(label).unwrap();
            assert_eq!(g.x + g.width, 200.0);
        }
    }

    #[test]
    fn destroyed_element_fails_resolution() {
        let mut factory = RecordingFactory::new();
        let label = factory.create_label(0.0, 0.0, "font", "gone", 10.0);
        factory.destroy(label).unwrap();

        let mut pass = LayoutPass::new();
        pass.place(label, Placement::at(0.0, 0.0));
        assert!(matches!(
            pass.resolve_all(&mut factory),
            Err(PanelError::UnknownElement(id)) if id == label
        ));
    }
}
