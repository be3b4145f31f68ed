//! Raw screen options as supplied by the host.
//!
//! [`PanelOptions`] mirrors the option bag a host hands to the settings screen.
//! Every field is optional: omitted fields keep their defaults, and geometry
//! fields left at `-1` (or any non-positive value) are derived from the
//! viewport by [`LayoutConfig::resolve`](crate::config::LayoutConfig::resolve).
//!
//! # TOML Format
//!
//! ```toml
//! xml_key = "settings"
//! backgroundColor = 0x282828
//! link_tint = "#007bf2"
//! lbl_title = "Preferences"
//!
//! [row]
//! height = 64.0
//!
//! [row.text]
//! x = 32.0
//! ```

use crate::domain::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// An RGB colour packed as `0xRRGGBB`.
///
/// Deserializes from either an integer (`0x282828`) or a hex string
/// (`"#282828"` / `"282828"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr", into = "u32")]
pub struct Color(pub u32);

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Int(u32),
    Hex(String),
}

impl TryFrom<ColorRepr> for Color {
    type Error = String;

    fn try_from(repr: ColorRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            ColorRepr::Int(value) if value <= 0x00ff_ffff => Ok(Self(value)),
            ColorRepr::Int(value) => Err(format!("colour {value:#x} exceeds 0xffffff")),
            ColorRepr::Hex(hex) => Self::from_hex(&hex),
        }
    }
}

impl From<Color> for u32 {
    fn from(color: Color) -> Self {
        color.0
    }
}

impl Color {
    /// Parses `#rrggbb` or `rrggbb`.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if the string is not six hex digits.
    pub fn from_hex(hex: &str) -> std::result::Result<Self, String> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 {
            return Err(format!("invalid colour `{hex}`: expected six hex digits"));
        }
        u32::from_str_radix(digits, 16)
            .map(Self)
            .map_err(|e| format!("invalid colour `{hex}`: {e}"))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

/// Header bar size overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeOptions {
    pub width: f64,
    pub height: f64,
}

impl Default for SizeOptions {
    fn default() -> Self {
        Self {
            width: -1.0,
            height: -1.0,
        }
    }
}

/// A position override (title text, done control).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointOptions {
    pub x: f64,
    pub y: f64,
}

impl Default for PointOptions {
    fn default() -> Self {
        Self { x: -1.0, y: -1.0 }
    }
}

/// Row label offset override.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowTextOptions {
    pub x: f64,
}

impl Default for RowTextOptions {
    fn default() -> Self {
        Self { x: -1.0 }
    }
}

/// Row geometry overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowOptions {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub text: RowTextOptions,
}

impl Default for RowOptions {
    fn default() -> Self {
        Self {
            x: -1.0,
            y: -1.0,
            width: -1.0,
            height: -1.0,
            text: RowTextOptions::default(),
        }
    }
}

/// Host-supplied screen options.
///
/// Field names follow the host's option keys so that TOML files written for
/// the screen read naturally (`backgroundColor`, `xml_key`, `img_switchOn`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelOptions {
    #[serde(rename = "backgroundColor")]
    pub background_color: Color,

    /// Key of the schema document. Required and non-empty.
    pub xml_key: String,

    pub img_row: String,
    #[serde(rename = "img_switchOn")]
    pub img_switch_on: String,
    #[serde(rename = "img_switchOff")]
    pub img_switch_off: String,
    pub img_transparent: String,

    pub font: String,

    pub width: f64,
    pub height: f64,
    /// Deducted from the viewport-derived height (e.g. for a banner).
    #[serde(rename = "additionalHeight")]
    pub additional_height: f64,

    pub link_tint: Color,

    pub lbl_title: String,
    pub lbl_close: String,

    #[serde(rename = "fontSize")]
    pub font_size: f64,
    pub header: SizeOptions,
    pub text: PointOptions,
    pub done: PointOptions,
    pub row: RowOptions,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            background_color: Color(0x28_2828),
            xml_key: String::new(),
            img_row: "bgSettings".to_string(),
            img_switch_on: "switchOn".to_string(),
            img_switch_off: "switchOff".to_string(),
            img_transparent: "transp".to_string(),
            font: "DroidSans_100".to_string(),
            width: -1.0,
            height: -1.0,
            additional_height: 0.0,
            link_tint: Color(0x00_7bf2),
            lbl_title: "Settings".to_string(),
            lbl_close: "Done".to_string(),
            font_size: -1.0,
            header: SizeOptions::default(),
            text: PointOptions::default(),
            done: PointOptions::default(),
            row: RowOptions::default(),
        }
    }
}

impl PanelOptions {
    /// Options with defaults everywhere except the schema key.
    #[must_use]
    pub fn with_schema(xml_key: impl Into<String>) -> Self {
        Self {
            xml_key: xml_key.into(),
            ..Self::default()
        }
    }

    /// Parses options from a TOML document. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Options`](crate::PanelError::Options) on invalid
    /// syntax or type mismatches.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Loads options from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read (file not found, permission denied, etc.)
    /// - The TOML content cannot be parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading panel options");
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_yields_defaults() {
        let options = PanelOptions::from_toml_str("").unwrap();
        assert_eq!(options, PanelOptions::default());
        assert_eq!(options.img_switch_on, "switchOn");
        assert_eq!(options.row.text.x, -1.0);
    }

    #[test]
    fn host_option_names_are_honoured() {
        let options = PanelOptions::from_toml_str(
            r##"
            xml_key = "prefs"
            backgroundColor = 0x101010
            img_switchOn = "on"
            additionalHeight = 40.0
            fontSize = 18.0
            link_tint = "#ff0000"

            [row.text]
            x = 12.0
            "##,
        )
        .unwrap();

        assert_eq!(options.xml_key, "prefs");
        assert_eq!(options.background_color, Color(0x10_1010));
        assert_eq!(options.img_switch_on, "on");
        assert_eq!(options.additional_height, 40.0);
        assert_eq!(options.font_size, 18.0);
        assert_eq!(options.link_tint, Color(0xff_0000));
        assert_eq!(options.row.text.x, 12.0);
        assert_eq!(options.row.height, -1.0);
    }

    #[test]
    fn malformed_colour_is_rejected() {
        let err = PanelOptions::from_toml_str(r##"link_tint = "#12""##).unwrap_err();
        assert!(matches!(err, crate::PanelError::Options(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "xml_key = \"from-disk\"").unwrap();

        let options = PanelOptions::from_file(file.path()).unwrap();
        assert_eq!(options.xml_key, "from-disk");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = PanelOptions::from_file("/nonexistent/options.toml").unwrap_err();
        assert!(matches!(err, crate::PanelError::Io(_)));
    }

    #[test]
    fn colour_displays_as_hex() {
        assert_eq!(Color(0x00_7bf2).to_string(), "#007bf2");
    }
}
