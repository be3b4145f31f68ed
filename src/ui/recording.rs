//! Headless element factory.
//!
//! [`RecordingFactory`] keeps every element it creates in memory instead of
//! drawing it. Text is measured with a fixed advance (`0.5 × size` per
//! character) and images have configurable intrinsic sizes, which makes
//! layouts fully deterministic. The command-line front end and the tests
//! build screens through it.

use crate::config::options::Color;
use crate::domain::error::{PanelError, Result};
use crate::ui::element::{ElementFactory, ElementId, Geometry};
use std::collections::HashMap;
use std::fmt;

/// Horizontal advance of one character, as a fraction of the font size.
const GLYPH_ADVANCE: f64 = 0.5;

/// Intrinsic size of images with no registered size.
const DEFAULT_IMAGE_SIZE: (f64, f64) = (64.0, 32.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Tile,
    Label,
    Button,
}

impl ElementKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tile => "tile",
            Self::Label => "label",
            Self::Button => "button",
        }
    }
}

/// Everything the factory knows about one element.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedElement {
    pub id: ElementId,
    pub kind: ElementKind,
    pub geometry: Geometry,
    pub origin: (f64, f64),
    /// Image key for tiles and buttons.
    pub image: Option<String>,
    /// Text and font for labels.
    pub text: Option<String>,
    pub font: Option<String>,
    pub font_size: Option<f64>,
    pub tint: Option<Color>,
}

impl fmt::Display for RecordedElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let g = &self.geometry;
        write!(
            f,
            "{:<4} {:<6} x={:<8.1} y={:<8.1} w={:<8.1} h={:<8.1}",
            self.id.to_string(),
            self.kind.as_str(),
            g.x,
            g.y,
            g.width,
            g.height
        )?;
        if let Some(text) = &self.text {
            write!(f, " text={text:?}")?;
        }
        if let Some(image) = &self.image {
            write!(f, " image={image}")?;
        }
        if let Some(tint) = self.tint {
            write!(f, " tint={tint}")?;
        }
        Ok(())
    }
}

/// In-memory [`ElementFactory`].
#[derive(Debug, Default)]
pub struct RecordingFactory {
    next_id: u64,
    elements: Vec<RecordedElement>,
    image_sizes: HashMap<String, (f64, f64)>,
    background: Option<Color>,
    destroyed: Vec<ElementId>,
    fail_destroy: bool,
}

impl RecordingFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the intrinsic size of `image`.
    #[must_use]
    pub fn with_image_size(mut self, image: impl Into<String>, width: f64, height: f64) -> Self {
        self.image_sizes.insert(image.into(), (width, height));
        self
    }

    /// Makes every later `destroy` call fail, after releasing the element.
    /// Used to exercise teardown error handling.
    pub fn fail_on_destroy(&mut self, fail: bool) {
        self.fail_destroy = fail;
    }

    /// Live elements in creation order.
    #[must_use]
    pub fn elements(&self) -> &[RecordedElement] {
        &self.elements
    }

    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&RecordedElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// First live label showing exactly `text`.
    #[must_use]
    pub fn find_label(&self, text: &str) -> Option<&RecordedElement> {
        self.elements
            .iter()
            .find(|e| e.kind == ElementKind::Label && e.text.as_deref() == Some(text))
    }

    /// Topmost live button whose bounds contain `(x, y)`. Bounds honour the
    /// element's origin.
    #[must_use]
    pub fn button_at(&self, x: f64, y: f64) -> Option<&RecordedElement> {
        self.elements.iter().rev().find(|e| {
            if e.kind != ElementKind::Button {
                return false;
            }
            let g = &e.geometry;
            let left = g.x - e.origin.0 * g.width;
            let top = g.y - e.origin.1 * g.height;
            x >= left && x <= left + g.width && y >= top && y <= top + g.height
        })
    }

    #[must_use]
    pub const fn background(&self) -> Option<Color> {
        self.background
    }

    /// Handles released so far, in release order.
    #[must_use]
    pub fn destroyed(&self) -> &[ElementId] {
        &self.destroyed
    }

    fn push(&mut self, kind: ElementKind, geometry: Geometry) -> &mut RecordedElement {
        self.next_id += 1;
        self.elements.push(RecordedElement {
            id: ElementId(self.next_id),
            kind,
            geometry,
            origin: (0.0, 0.0),
            image: None,
            text: None,
            font: None,
            font_size: None,
            tint: None,
        });
        let index = self.elements.len() - 1;
        &mut self.elements[index]
    }

    fn get_mut(&mut self, id: ElementId) -> Result<&mut RecordedElement> {
        self.elements
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(PanelError::UnknownElement(id))
    }

    fn image_size(&self, image: &str) -> (f64, f64) {
        self.image_sizes
            .get(image)
            .copied()
            .unwrap_or(DEFAULT_IMAGE_SIZE)
    }
}

impl ElementFactory for RecordingFactory {
    fn set_background(&mut self, color: Color) {
        self.background = Some(color);
    }

    fn create_tile(&mut self, x: f64, y: f64, width: f64, height: f64, image: &str) -> ElementId {
        let element = self.push(ElementKind::Tile, Geometry::new(x, y, width, height));
        element.image = Some(image.to_string());
        element.id
    }

    fn create_label(&mut self, x: f64, y: f64, font: &str, text: &str, size: f64) -> ElementId {
        let width = text.chars().count() as f64 * size * GLYPH_ADVANCE;
        let element = self.push(ElementKind::Label, Geometry::new(x, y, width, size));
        element.text = Some(text.to_string());
        element.font = Some(font.to_string());
        element.font_size = Some(size);
        element.id
    }

    fn create_button(&mut self, x: f64, y: f64, image: &str) -> ElementId {
        let (width, height) = self.image_size(image);
        let element = self.push(ElementKind::Button, Geometry::new(x, y, width, height));
        element.image = Some(image.to_string());
        element.id
    }

    fn geometry(&self, id: ElementId) -> Option<Geometry> {
        self.element(id).map(|e| e.geometry)
    }

    fn set_position(&mut self, id: ElementId, x: f64, y: f64) -> Result<()> {
        let element = self.get_mut(id)?;
        element.geometry.x = x;
        element.geometry.y = y;
        Ok(())
    }

    fn set_size(&mut self, id: ElementId, width: f64, height: f64) -> Result<()> {
        let element = self.get_mut(id)?;
        element.geometry.width = width;
        element.geometry.height = height;
        Ok(())
    }

    fn set_origin(&mut self, id: ElementId, x: f64, y: f64) -> Result<()> {
        self.get_mut(id)?.origin = (x, y);
        Ok(())
    }

    fn set_tint(&mut self, id: ElementId, color: Color) -> Result<()> {
        self.get_mut(id)?.tint = Some(color);
        Ok(())
    }

    fn set_image(&mut self, id: ElementId, image: &str) -> Result<()> {
        self.get_mut(id)?.image = Some(image.to_string());
        Ok(())
    }

    fn destroy(&mut self, id: ElementId) -> Result<()> {
        let index = self
            .elements
            .iter()
            .position(|e| e.id == id)
            .ok_or(PanelError::UnknownElement(id))?;
        self.elements.remove(index);
        self.destroyed.push(id);
        if self.fail_destroy {
            return Err(PanelError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("failed to release {id}"),
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_measured_from_text() {
        let mut factory = RecordingFactory::new();
        let id = factory.create_label(5.0, 6.0, "DroidSans_100", "Music", 20.0);
        assert_eq!(factory.geometry(id), Some(Geometry::new(5.0, 6.0, 50.0, 20.0)));
        assert_eq!(factory.find_label("Music").map(|e| e.id), Some(id));
    }

    #[test]
    fn buttons_use_intrinsic_image_size() {
        let mut factory = RecordingFactory::new().with_image_size("switchOn", 80.0, 40.0);
        let on = factory.create_button(0.0, 0.0, "switchOn");
        let other = factory.create_button(0.0, 0.0, "transp");
        assert_eq!(factory.geometry(on).unwrap().width, 80.0);
        assert_eq!(factory.geometry(other).unwrap().width, DEFAULT_IMAGE_SIZE.0);
    }

    #[test]
    fn hit_testing_honours_origin() {
        let mut factory = RecordingFactory::new();
        let id = factory.create_button(100.0, 50.0, "switchOn");
        factory.set_origin(id, 0.0, 0.5).unwrap();
        assert_eq!(factory.button_at(110.0, 40.0).map(|e| e.id), Some(id));
        assert!(factory.button_at(110.0, 70.0).is_none());
    }

    #[test]
    fn destroyed_elements_are_gone() {
        let mut factory = RecordingFactory::new();
        let id = factory.create_tile(0.0, 0.0, 10.0, 10.0, "bgSettings");
        factory.destroy(id).unwrap();
        assert!(factory.geometry(id).is_none());
        assert_eq!(factory.destroyed(), &[id]);
        assert!(matches!(factory.set_tint(id, Color(0)), Err(PanelError::UnknownElement(_))));
        assert!(factory.destroy(id).is_err());
    }

    #[test]
    fn failing_destroy_still_releases() {
        let mut factory = RecordingFactory::new();
        let id = factory.create_tile(0.0, 0.0, 10.0, 10.0, "bgSettings");
        factory.fail_on_destroy(true);
        assert!(factory.destroy(id).is_err());
        assert!(factory.elements().is_empty());
    }
}
