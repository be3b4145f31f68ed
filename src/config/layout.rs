//! Layout configuration resolver.
//!
//! Turns host [`PanelOptions`] plus the current [`Viewport`] into a fully
//! populated, immutable [`LayoutConfig`]. Resolution is a pure function: the
//! same options and viewport always produce the same geometry.
//!
//! # Defaulting Cascade
//!
//! With `common = 0.1 × height`:
//!
//! | Field | Default (when unset / non-positive) |
//! |---|---|
//! | `width` | viewport width × scale |
//! | `height` | viewport height × scale − `additionalHeight` |
//! | `font_size` | `0.5 × common` |
//! | `header` | `width × common` |
//! | `text` | `(width / 2, common / 2)` |
//! | `done` | `(width, common / 2)` |
//! | `row` | `x = 0` (only if negative), `y = common`, `width`, `height = common`, `text_x = 20` |

use crate::config::options::{Color, PanelOptions};
use crate::domain::error::{PanelError, Result};

/// Fraction of the screen height used by the header and by each row slot.
const COMMON_HEIGHT_RATIO: f64 = 0.1;

/// Font size as a fraction of the common height.
const FONT_RATIO: f64 = 0.5;

/// Default left offset of row labels.
const DEFAULT_ROW_TEXT_X: f64 = 20.0;

/// Host viewport the screen is drawn into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Logical width.
    pub width: f64,
    /// Logical height.
    pub height: f64,
    /// Device pixel ratio.
    pub scale: f64,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: f64, height: f64, scale: f64) -> Self {
        Self {
            width,
            height,
            scale,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Resolved geometry of the row list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowGeometry {
    pub x: f64,
    /// Slot height unit; a row's top edge is `y × multiplier`.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Left offset of the row label.
    pub text_x: f64,
}

impl RowGeometry {
    /// Top edge of a row with the given slot multiplier.
    #[must_use]
    pub fn top(&self, multiplier: f64) -> f64 {
        self.y * multiplier
    }

    /// Vertical centre line used by the row's label and controls.
    #[must_use]
    pub fn center(&self, multiplier: f64) -> f64 {
        self.top(multiplier) + self.y / 2.0
    }
}

/// Image keys used by the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSet {
    pub row: String,
    pub switch_on: String,
    pub switch_off: String,
    pub transparent: String,
}

/// Immutable screen geometry and styling, computed once per configure cycle.
///
/// A rebuilt screen gets a fresh `LayoutConfig`; nothing in the crate hands
/// out mutable access to a resolved one.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub schema_key: String,
    pub background_color: Color,
    pub images: ImageSet,
    pub font: String,
    pub link_tint: Color,
    pub title: String,
    pub close_label: String,

    pub width: f64,
    pub height: f64,
    pub font_size: f64,
    pub header: Size,
    pub text: Point,
    pub done: Point,
    pub row: RowGeometry,
}

/// Returns `value` when positive, otherwise `fallback`.
fn positive_or(value: f64, fallback: f64) -> f64 {
    if value > 0.0 {
        value
    } else {
        fallback
    }
}

impl LayoutConfig {
    /// Resolves options against the viewport.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Configuration`] if `xml_key` is empty or blank.
    /// No geometry is computed in that case.
    ///
    /// # Example
    ///
    /// ```rust
    /// use settings_panel::config::{LayoutConfig, PanelOptions, Viewport};
    ///
    /// let options = PanelOptions::with_schema("settings");
    /// let layout = LayoutConfig::resolve(&options, &Viewport::new(400.0, 500.0, 2.0))?;
    /// assert_eq!(layout.width, 800.0);
    /// assert_eq!(layout.header.height, 100.0);
    /// # Ok::<(), settings_panel::PanelError>(())
    /// ```
    pub fn resolve(options: &PanelOptions, viewport: &Viewport) -> Result<Self> {
        if options.xml_key.trim().is_empty() {
            return Err(PanelError::Configuration(
                "schema document key (`xml_key`) is not set".to_string(),
            ));
        }

        let width = positive_or(options.width, viewport.width * viewport.scale);
        let height = if options.height > 0.0 {
            options.height
        } else {
            let derived = viewport.height * viewport.scale;
            if options.additional_height > 0.0 {
                derived - options.additional_height
            } else {
                derived
            }
        };

        let common = COMMON_HEIGHT_RATIO * height;

        let row = RowGeometry {
            x: if options.row.x < 0.0 { 0.0 } else { options.row.x },
            y: positive_or(options.row.y, common),
            width: positive_or(options.row.width, width),
            height: positive_or(options.row.height, common),
            text_x: positive_or(options.row.text.x, DEFAULT_ROW_TEXT_X),
        };

        let layout = Self {
            schema_key: options.xml_key.clone(),
            background_color: options.background_color,
            images: ImageSet {
                row: options.img_row.clone(),
                switch_on: options.img_switch_on.clone(),
                switch_off: options.img_switch_off.clone(),
                transparent: options.img_transparent.clone(),
            },
            font: options.font.clone(),
            link_tint: options.link_tint,
            title: options.lbl_title.clone(),
            close_label: options.lbl_close.clone(),
            width,
            height,
            font_size: positive_or(options.font_size, FONT_RATIO * common),
            header: Size {
                width: positive_or(options.header.width, width),
                height: positive_or(options.header.height, common),
            },
            text: Point {
                x: positive_or(options.text.x, width / 2.0),
                y: positive_or(options.text.y, common / 2.0),
            },
            done: Point {
                x: positive_or(options.done.x, width),
                y: positive_or(options.done.y, common / 2.0),
            },
            row,
        };

        tracing::debug!(
            width = layout.width,
            height = layout.height,
            font_size = layout.font_size,
            row_height = layout.row.height,
            "layout resolved"
        );

        Ok(layout)
    }
}
