//! The settings screen: configure, build, interact, tear down.
//!
//! [`SettingsScreen`] owns the resolved layout, the handles of everything it
//! created, and the binding wired to each interactive element. The settings
//! store, the element factory and the action registry belong to the host and
//! are passed into each call.
//!
//! # Pipeline
//!
//! ```text
//! configure: PanelOptions + Viewport → LayoutConfig
//! build:     SchemaSource → SchemaDocument → rows + done
//!            → VisibilityPlan (store) → materialize → LayoutPass
//! interact:  ElementId → binding → store / registry
//! ```
//!
//! Rules are evaluated once per build. Interactions never re-evaluate them,
//! so changing a setting does not show or hide other rows until the host
//! builds a new screen.

use crate::app::modes::ScreenPhase;
use crate::app::visibility::VisibilityPlan;
use crate::binding::{ActionBinding, ActionRegistry, PropertyBinding};
use crate::config::layout::{LayoutConfig, Viewport};
use crate::config::options::PanelOptions;
use crate::domain::error::{PanelError, Result};
use crate::domain::row::RowKind;
use crate::schema::document::SchemaDocument;
use crate::schema::extract::{extract_done, extract_rows};
use crate::schema::source::SchemaSource;
use crate::store::backend::SettingsStore;
use crate::ui::anchor::LayoutPass;
use crate::ui::element::{ElementFactory, ElementId};
use crate::ui::materialize::{materialize_header, materialize_row, HeaderVisuals, RowVisuals};
use std::collections::HashMap;

/// What an interactive element does when used.
#[derive(Debug)]
enum Handler {
    Toggle {
        row: usize,
        /// `None` when the property path itself was invalid.
        property: Option<PropertyBinding>,
        action: ActionBinding,
    },
    Link {
        row: usize,
        action: ActionBinding,
    },
    Done {
        action: ActionBinding,
    },
}

/// Result of building one schema row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowOutcome {
    pub ordinal: usize,
    pub kind: RowKind,
    pub text: String,
    /// Slot multiplier, `None` for hidden rows.
    pub multiplier: Option<f64>,
    /// Created elements, `None` for hidden rows.
    pub visuals: Option<RowVisuals>,
}

/// Summary of a successful build.
#[derive(Debug)]
pub struct BuildReport {
    pub header: HeaderVisuals,
    pub rows: Vec<RowOutcome>,
    /// Reported, non-fatal problems: failed rules, unresolvable actions and
    /// properties.
    pub diagnostics: Vec<PanelError>,
}

impl BuildReport {
    #[must_use]
    pub fn visible_rows(&self) -> impl Iterator<Item = &RowOutcome> {
        self.rows.iter().filter(|row| row.visuals.is_some())
    }

    /// The interactive element belonging to `label`: the done overlay for the
    /// done label, a row's toggle or link overlay for its label.
    #[must_use]
    pub fn control_for_label(&self, label: ElementId) -> Option<ElementId> {
        if label == self.header.done_label {
            return Some(self.header.done_button);
        }
        self.rows
            .iter()
            .filter_map(|row| row.visuals)
            .find(|visuals| visuals.label == label)
            .map(|visuals| visuals.control)
    }
}

/// Effects of one interaction.
#[derive(Debug)]
pub struct Interaction {
    pub element: ElementId,
    /// Row the element belongs to, `None` for the done control.
    pub row: Option<usize>,
    /// New property value when a toggle flipped.
    pub toggled: Option<bool>,
    /// Reported problems; the interaction did nothing past the first one.
    pub diagnostics: Vec<PanelError>,
}

/// A settings screen instance.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use settings_panel::app::SettingsScreen;
/// use settings_panel::binding::ActionRegistry;
/// use settings_panel::config::{PanelOptions, Viewport};
/// use settings_panel::store::MemoryStore;
/// use settings_panel::ui::RecordingFactory;
///
/// let schemas = HashMap::from([(
///     "settings".to_string(),
///     r#"<settings><row type="bool" text="Music" property="audio.music"/></settings>"#.to_string(),
/// )]);
/// let mut store = MemoryStore::from_json(r#"{"audio": {"music": false}}"#)?;
/// let mut factory = RecordingFactory::new();
///
/// let mut screen = SettingsScreen::new();
/// screen.configure(&PanelOptions::with_schema("settings"), &Viewport::default())?;
/// let report = screen.build(&schemas, &mut factory, &store, &ActionRegistry::new())?;
///
/// let toggle = report.rows[0].visuals.unwrap().control;
/// let interaction = screen.interact(toggle, &mut factory, &mut store)?;
/// assert_eq!(interaction.toggled, Some(true));
///
/// screen.teardown(&mut factory)?;
/// # Ok::<(), settings_panel::PanelError>(())
/// ```
#[derive(Debug, Default)]
pub struct SettingsScreen {
    phase: ScreenPhase,
    layout: Option<LayoutConfig>,
    /// Every created element, in creation order.
    elements: Vec<ElementId>,
    handlers: HashMap<ElementId, Handler>,
}

impl SettingsScreen {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn phase(&self) -> ScreenPhase {
        self.phase
    }

    #[must_use]
    pub const fn layout(&self) -> Option<&LayoutConfig> {
        self.layout.as_ref()
    }

    /// Handles of all live elements the screen created.
    #[must_use]
    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }

    /// Whether `element` reacts to [`interact`](Self::interact).
    #[must_use]
    pub fn is_interactive(&self, element: ElementId) -> bool {
        self.handlers.contains_key(&element)
    }

    fn advance(&mut self, next: ScreenPhase) -> Result<()> {
        if !self.phase.can_advance_to(next) {
            return Err(PanelError::InvalidState {
                expected: expected_before(next),
                actual: self.phase.as_str(),
            });
        }
        tracing::info!(from = %self.phase, to = %next, "screen phase changed");
        self.phase = next;
        Ok(())
    }

    fn require(&self, phase: ScreenPhase) -> Result<()> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(PanelError::InvalidState {
                expected: phase.as_str(),
                actual: self.phase.as_str(),
            })
        }
    }

    /// Resolves the layout.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::InvalidState`] unless the screen is
    /// unconfigured, and [`PanelError::Configuration`] if the schema key is
    /// missing. A failed configure leaves the screen unconfigured.
    pub fn configure(&mut self, options: &PanelOptions, viewport: &Viewport) -> Result<()> {
        self.require(ScreenPhase::Unconfigured)?;
        let layout = LayoutConfig::resolve(options, viewport)?;
        self.layout = Some(layout);
        self.advance(ScreenPhase::Configured)
    }

    /// Loads the schema, evaluates rules and materializes every visible row.
    ///
    /// The store is only read. Rule, action and property problems are
    /// collected in [`BuildReport::diagnostics`] and never fail the build.
    ///
    /// # Errors
    ///
    /// - [`PanelError::InvalidState`] unless the screen is configured
    /// - [`PanelError::Configuration`] if the source has no document for the
    ///   schema key
    /// - [`PanelError::Xml`] or [`PanelError::Schema`] for malformed schemas;
    ///   nothing is created in that case
    /// - factory errors while placing elements; everything created so far is
    ///   released and the screen stays configured
    pub fn build(
        &mut self,
        source: &dyn SchemaSource,
        factory: &mut dyn ElementFactory,
        store: &dyn SettingsStore,
        registry: &ActionRegistry,
    ) -> Result<BuildReport> {
        self.require(ScreenPhase::Configured)?;
        let Some(layout) = self.layout.as_ref() else {
            return Err(PanelError::InvalidState {
                expected: ScreenPhase::Configured.as_str(),
                actual: self.phase.as_str(),
            });
        };

        let text = source.fetch(&layout.schema_key).ok_or_else(|| {
            PanelError::Configuration(format!(
                "no schema document for key `{}`",
                layout.schema_key
            ))
        })?;
        let document = SchemaDocument::parse(&text)?;
        let rows = extract_rows(&document)?;
        let done = extract_done(&document);
        tracing::debug!(key = %layout.schema_key, rows = rows.len(), "schema loaded");

        let plan = VisibilityPlan::compute(&rows, store);
        let mut diagnostics = plan.diagnostics;
        let mut pass = LayoutPass::new();
        let mut created = Vec::new();
        let mut handlers = HashMap::new();

        let header = match materialize_header(layout, factory, &mut pass, &mut created) {
            Ok(header) => header,
            Err(err) => return Err(release_partial(factory, created, err)),
        };
        let done_action = resolve_action(None, done.action.as_deref(), registry, &mut diagnostics);
        handlers.insert(header.done_button, Handler::Done { action: done_action });

        let mut outcomes = Vec::with_capacity(rows.len());
        for (row, slot) in rows.iter().zip(&plan.slots) {
            let mut outcome = RowOutcome {
                ordinal: row.ordinal,
                kind: row.kind,
                text: row.text.clone(),
                multiplier: slot.multiplier,
                visuals: None,
            };
            let Some(multiplier) = slot.multiplier else {
                outcomes.push(outcome);
                continue;
            };

            let action =
                resolve_action(Some(row.ordinal), row.action.as_deref(), registry, &mut diagnostics);

            let (handler, switch_on) = match row.kind {
                RowKind::Bool => {
                    let property =
                        PropertyBinding::resolve(row.ordinal, row.property.as_deref().unwrap_or_default());
                    let (property, switch_on) = match property {
                        Ok(binding) => {
                            let initial = binding.read(store).unwrap_or_else(|err| {
                                report(&mut diagnostics, err);
                                false
                            });
                            (Some(binding), initial)
                        }
                        Err(err) => {
                            report(&mut diagnostics, err);
                            (None, false)
                        }
                    };
                    let handler = Handler::Toggle {
                        row: row.ordinal,
                        property,
                        action,
                    };
                    (handler, switch_on)
                }
                RowKind::Link => {
                    let handler = Handler::Link {
                        row: row.ordinal,
                        action,
                    };
                    (handler, false)
                }
            };

            let visuals = match materialize_row(
                layout,
                row,
                multiplier,
                switch_on,
                factory,
                &mut pass,
                &mut created,
            ) {
                Ok(visuals) => visuals,
                Err(err) => return Err(release_partial(factory, created, err)),
            };
            handlers.insert(visuals.control, handler);
            outcome.visuals = Some(visuals);
            outcomes.push(outcome);
        }

        if let Err(err) = pass.resolve_all(factory) {
            return Err(release_partial(factory, created, err));
        }
        self.elements = created;
        self.handlers = handlers;
        self.advance(ScreenPhase::Built)?;

        tracing::info!(
            rows = outcomes.len(),
            visible = outcomes.iter().filter(|o| o.visuals.is_some()).count(),
            elements = self.elements.len(),
            diagnostics = diagnostics.len(),
            "screen built"
        );

        Ok(BuildReport {
            header,
            rows: outcomes,
            diagnostics,
        })
    }

    /// Runs the binding wired to `element`.
    ///
    /// A toggle flips its property, swaps its image and then runs its row's
    /// action with the toggle as `o`. Links and the done control run their
    /// action with themselves as `o`. Evaluation failures end up in
    /// [`Interaction::diagnostics`].
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::InvalidState`] unless the screen is built, and
    /// [`PanelError::UnknownElement`] for elements with no binding.
    pub fn interact(
        &mut self,
        element: ElementId,
        factory: &mut dyn ElementFactory,
        store: &mut dyn SettingsStore,
    ) -> Result<Interaction> {
        self.require(ScreenPhase::Built)?;
        let handler = self
            .handlers
            .get(&element)
            .ok_or(PanelError::UnknownElement(element))?;

        let mut interaction = Interaction {
            element,
            row: None,
            toggled: None,
            diagnostics: Vec::new(),
        };

        match handler {
            Handler::Toggle {
                row,
                property,
                action,
            } => {
                interaction.row = Some(*row);
                let Some(property) = property else {
                    report(
                        &mut interaction.diagnostics,
                        PanelError::evaluation(Some(*row), "property", "", "property is not bound"),
                    );
                    return Ok(interaction);
                };
                match property.toggle(store) {
                    Ok(value) => {
                        interaction.toggled = Some(value);
                        if let Some(layout) = &self.layout {
                            let image = if value {
                                &layout.images.switch_on
                            } else {
                                &layout.images.switch_off
                            };
                            if let Err(err) = factory.set_image(element, image) {
                                report(&mut interaction.diagnostics, err);
                            }
                        }
                        if let Err(err) = action.invoke(Some(*row), element, store) {
                            report(&mut interaction.diagnostics, err);
                        }
                    }
                    Err(err) => report(&mut interaction.diagnostics, err),
                }
            }
            Handler::Link { row, action } => {
                interaction.row = Some(*row);
                if let Err(err) = action.invoke(Some(*row), element, store) {
                    report(&mut interaction.diagnostics, err);
                }
            }
            Handler::Done { action } => {
                if let Err(err) = action.invoke(None, element, store) {
                    report(&mut interaction.diagnostics, err);
                }
            }
        }

        tracing::debug!(
            element = %element,
            row = ?interaction.row,
            toggled = ?interaction.toggled,
            "interaction handled"
        );
        Ok(interaction)
    }

    /// Releases every element, newest first.
    ///
    /// Release failures are logged and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::InvalidState`] if the screen is already torn
    /// down.
    pub fn teardown(&mut self, factory: &mut dyn ElementFactory) -> Result<()> {
        self.advance(ScreenPhase::TornDown)?;
        let mut failures = 0usize;
        for id in self.elements.drain(..).rev() {
            if let Err(err) = factory.destroy(id) {
                failures += 1;
                tracing::warn!(element = %id, error = %err, "failed to release element");
            }
        }
        self.handlers.clear();
        self.layout = None;
        tracing::debug!(failures, "screen released");
        Ok(())
    }
}

/// The phase an operation leading to `next` must start from.
const fn expected_before(next: ScreenPhase) -> &'static str {
    match next {
        ScreenPhase::Configured => "unconfigured",
        ScreenPhase::Built => "configured",
        ScreenPhase::Unconfigured | ScreenPhase::TornDown => "not torn down",
    }
}

/// Destroys the elements of an aborted build, newest first, and hands back
/// the error that aborted it.
fn release_partial(
    factory: &mut dyn ElementFactory,
    created: Vec<ElementId>,
    err: PanelError,
) -> PanelError {
    tracing::warn!(error = %err, elements = created.len(), "build aborted, releasing elements");
    for id in created.into_iter().rev() {
        if let Err(release) = factory.destroy(id) {
            tracing::warn!(element = %id, error = %release, "failed to release element");
        }
    }
    err
}

fn report(diagnostics: &mut Vec<PanelError>, err: PanelError) {
    tracing::warn!(error = %err, "reported");
    diagnostics.push(err);
}

fn resolve_action(
    row: Option<usize>,
    source: Option<&str>,
    registry: &ActionRegistry,
    diagnostics: &mut Vec<PanelError>,
) -> ActionBinding {
    ActionBinding::resolve(row, source, registry).unwrap_or_else(|err| {
        report(diagnostics, err);
        ActionBinding::None
    })
}
