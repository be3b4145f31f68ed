//! Screen configuration: raw host options and the resolved layout.
//!
//! - [`options`]: serde-backed option bag with host defaults, loadable from TOML
//! - [`layout`]: pure resolver producing the immutable [`LayoutConfig`]

pub mod layout;
pub mod options;

pub use layout::{ImageSet, LayoutConfig, Point, RowGeometry, Size, Viewport};
pub use options::{Color, PanelOptions, PointOptions, RowOptions, RowTextOptions, SizeOptions};
