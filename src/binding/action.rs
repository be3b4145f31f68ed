//! Action bindings for links, toggles and the done control.

use crate::binding::registry::{ActionContext, ActionHandler, ActionRegistry};
use crate::domain::element::ElementId;
use crate::domain::error::{PanelError, Result};
use crate::expr::compile::{CompiledScript, Scope};
use crate::store::backend::SettingsStore;
use std::fmt;

const FIELD: &str = "action";

/// A resolved `action` field.
///
/// An action that is exactly a registered name is a direct reference and is
/// invoked with no arguments. Anything else is compiled as an action script
/// with `o` bound to the interacted element.
#[derive(Clone, Default)]
pub enum ActionBinding {
    /// No action configured; invoking does nothing.
    #[default]
    None,
    Direct {
        name: String,
        handler: ActionHandler,
    },
    Script {
        source: String,
        program: std::rc::Rc<CompiledScript>,
    },
}

impl ActionBinding {
    /// Resolves the raw action text of `row` (`None` for the done control).
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Evaluation`] when the script does not compile.
    /// Callers report it and bind [`ActionBinding::None`] instead.
    pub fn resolve(
        row: Option<usize>,
        source: Option<&str>,
        registry: &ActionRegistry,
    ) -> Result<Self> {
        let Some(source) = source.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(Self::None);
        };

        if let Some(handler) = registry.get(source) {
            return Ok(Self::Direct {
                name: source.to_string(),
                handler: handler.clone(),
            });
        }

        let program = CompiledScript::compile(source, registry)
            .map_err(|e| PanelError::evaluation(row, FIELD, source, e.to_string()))?;
        Ok(Self::Script {
            source: source.to_string(),
            program: std::rc::Rc::new(program),
        })
    }

    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Runs the action on behalf of `element`.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Evaluation`] if the handler or a script step
    /// fails. Script steps that ran before the failure keep their effects.
    pub fn invoke(
        &self,
        row: Option<usize>,
        element: ElementId,
        store: &mut dyn SettingsStore,
    ) -> Result<()> {
        match self {
            Self::None => Ok(()),
            Self::Direct { name, handler } => {
                let mut context = ActionContext {
                    element,
                    args: &[],
                    store,
                };
                handler(&mut context)
                    .map_err(|e| PanelError::evaluation(row, FIELD, name.as_str(), e.to_string()))
            }
            Self::Script { source, program } => {
                let mut scope = Scope::for_action(store, element);
                program
                    .run(&mut scope)
                    .map_err(|e| PanelError::evaluation(row, FIELD, source.as_str(), e.to_string()))
            }
        }
    }
}

impl fmt::Debug for ActionBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Direct { name, .. } => f.debug_tuple("Direct").field(name).finish(),
            Self::Script { source, .. } => f.debug_tuple("Script").field(source).finish(),
        }
    }
}
