//! Settings Panel: schema-driven settings screens.
//!
//! A settings screen is described by an XML schema of rows. Each row is a
//! boolean toggle bound to a path in a shared settings store, or a link that
//! runs an action. Rows may carry a visibility rule evaluated against the
//! store when the screen is built; hidden rows take no vertical space.
//!
//! The crate provides:
//! - Layout resolution from host options and the viewport
//! - Schema parsing and row extraction
//! - A sandboxed expression language for rules and actions
//! - Two-phase placement of elements whose positions depend on their size
//! - A screen state machine driving an abstract element factory
//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Host or headless CLI (main.rs)                     │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - configure / build / interact / teardown          │
//! │  - Visibility rules and compaction                  │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Binding Layer │   │ Schema Layer  │
//! │ (ui/)         │   │ (binding/)    │   │ (schema/)     │
//! │ - Factory API │   │ - Properties  │   │ - XML tree    │
//! │ - Anchoring   │   │ - Actions     │   │ - Row extract │
//! │ - Rows/header │   │ - Registry    │   │ - Sources     │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Expression, Store, Config & Domain Layers          │
//! │  - Rule/action compiler (expr/)                     │
//! │  - Settings store trait and paths (store/)          │
//! │  - Options and layout (config/)                     │
//! │  - Errors and row model (domain/)                   │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - tracing subscriber on stderr                     │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Screen lifecycle, visibility and interaction dispatch
//! - [`binding`]: Property and action bindings, action registry
//! - [`config`]: Host options and the resolved layout
//! - [`domain`]: Core domain types (rows, errors, element handles)
//! - [`expr`]: Rule and action expression language
//! - [`schema`]: Schema documents and row extraction
//! - [`store`]: Settings store access
//! - [`ui`]: Element factory contract, anchoring, materialization
//! - [`observability`]: Tracing subscriber setup
//!
//! # Schema Format
//!
//! ```xml
//! <settings>
//!     <done action="close"/>
//!     <row type="bool" text="Music" property="audio.music"/>
//!     <row type="bool" text="Vibration" property="device.vibrate"
//!          rule="device.hasVibrator"/>
//!     <row type="link" text="Credits">
//!         <action>credits.seen = true; open(o, 'credits')</action>
//!     </row>
//! </settings>
//! ```
//!
//! `rule` and `action` may be attributes or child elements. `type`, `text`
//! and (for bool rows) `property` must be attributes.
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use settings_panel::{ActionRegistry, MemoryStore, PanelOptions, SettingsScreen, Viewport};
//! use settings_panel::ui::RecordingFactory;
//!
//! let schemas = HashMap::from([(
//!     "settings".to_string(),
//!     r#"<settings>
//!          <row type="link" text="Hidden" rule="false"/>
//!          <row type="bool" text="Music" property="audio.music"/>
//!        </settings>"#
//!         .to_string(),
//! )]);
//! let store = MemoryStore::from_json(r#"{"audio": {"music": true}}"#)?;
//! let mut factory = RecordingFactory::new();
//!
//! let mut screen = SettingsScreen::new();
//! screen.configure(&PanelOptions::with_schema("settings"), &Viewport::default())?;
//! let report = screen.build(&schemas, &mut factory, &store, &ActionRegistry::new())?;
//!
//! assert_eq!(report.rows[0].multiplier, None);
//! assert_eq!(report.rows[1].multiplier, Some(1.5));
//! # Ok::<(), settings_panel::PanelError>(())
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod binding;
pub mod config;
pub mod domain;
pub mod expr;
pub mod schema;
pub mod store;
pub mod ui;

pub mod observability;

pub use app::{BuildReport, Interaction, ScreenPhase, SettingsScreen};
pub use binding::{ActionContext, ActionRegistry};
pub use config::{LayoutConfig, PanelOptions, Viewport};
pub use domain::{PanelError, Result};
pub use store::{MemoryStore, SettingsStore, StorePath, Value};

use clap::Parser;
use std::path::PathBuf;

/// Runtime configuration of the headless front end.
///
/// # Example
///
/// ```rust
/// use clap::Parser;
/// use settings_panel::RuntimeConfig;
///
/// let config = RuntimeConfig::parse_from([
///     "settings-panel",
///     "settings.xml",
///     "--store",
///     "store.json",
///     "--click",
///     "Music",
///     "--width",
///     "360",
/// ]);
/// assert_eq!(config.clicks, vec!["Music"]);
/// assert_eq!(config.viewport().width, 360.0);
/// assert_eq!(config.viewport().height, 600.0);
/// ```
#[derive(Parser, Debug, Clone)]
#[command(
    name = "settings-panel",
    version,
    about = "Build a settings screen from a schema and replay interactions headlessly"
)]
pub struct RuntimeConfig {
    /// Schema document (XML).
    #[arg(value_name = "SCHEMA")]
    pub schema_file: PathBuf,

    /// Screen options (TOML). Defaults apply to anything omitted.
    #[arg(long = "options", value_name = "FILE")]
    pub options_file: Option<PathBuf>,

    /// Initial settings store (JSON object). Empty when omitted.
    #[arg(long = "store", value_name = "FILE")]
    pub store_file: Option<PathBuf>,

    /// Label text of a control to interact with. Repeatable, applied in order.
    #[arg(long = "click", value_name = "LABEL")]
    pub clicks: Vec<String>,

    /// Viewport width in logical units.
    #[arg(long, default_value_t = 800.0)]
    pub width: f64,

    /// Viewport height in logical units.
    #[arg(long, default_value_t = 600.0)]
    pub height: f64,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.0)]
    pub scale: f64,

    /// Tracing level (`trace`, `debug`, `info`, `warn`, `error`). `RUST_LOG`
    /// takes precedence.
    #[arg(long)]
    pub trace_level: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let viewport = Viewport::default();
        Self {
            schema_file: PathBuf::new(),
            options_file: None,
            store_file: None,
            clicks: Vec::new(),
            width: viewport.width,
            height: viewport.height,
            scale: viewport.scale,
            trace_level: None,
        }
    }
}

impl RuntimeConfig {
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height, self.scale)
    }

    /// Options from `options_file`, or defaults. An unset `xml_key` falls
    /// back to the schema file's stem.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Io`] or [`PanelError::Options`] if the options
    /// file cannot be read or decoded.
    pub fn panel_options(&self) -> Result<PanelOptions> {
        let mut options = match &self.options_file {
            Some(path) => PanelOptions::from_file(path)?,
            None => PanelOptions::default(),
        };
        if options.xml_key.trim().is_empty() {
            if let Some(stem) = self.schema_file.file_stem() {
                options.xml_key = stem.to_string_lossy().into_owned();
            }
        }
        Ok(options)
    }
}
