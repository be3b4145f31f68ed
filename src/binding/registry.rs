//! Host-registered action handlers.

use crate::domain::element::ElementId;
use crate::domain::error::Result;
use crate::store::backend::SettingsStore;
use crate::store::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// What a handler sees when it runs.
pub struct ActionContext<'a> {
    /// The element the user interacted with.
    pub element: ElementId,
    /// Evaluated call arguments; empty for direct references.
    pub args: &'a [Value],
    pub store: &'a mut dyn SettingsStore,
}

/// A callable action. Shared between the registry and every binding compiled
/// against it.
pub type ActionHandler = Rc<dyn Fn(&mut ActionContext<'_>) -> Result<()>>;

/// Named actions a schema may reference, either directly (`action="close"`)
/// or as calls inside an action script (`action="close(o)"`).
#[derive(Clone, Default)]
pub struct ActionRegistry {
    handlers: HashMap<String, ActionHandler>,
}

impl ActionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `name`, replacing any previous handler.
    pub fn register<F>(&mut self, name: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&mut ActionContext<'_>) -> Result<()> + 'static,
    {
        let name = name.into();
        tracing::debug!(action = %name, "registered action");
        self.handlers.insert(name, Rc::new(handler));
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ActionHandler> {
        self.handlers.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("actions", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn register_and_invoke() {
        let mut registry = ActionRegistry::new();
        registry
            .register("close", |_ctx: &mut ActionContext<'_>| Ok(()))
            .register("mute", |ctx: &mut ActionContext<'_>| {
                ctx.store.write(&"audio.music".parse().unwrap(), Value::Bool(false))
            });

        assert_eq!(registry.names(), vec!["close", "mute"]);
        assert!(registry.contains("close"));
        assert!(!registry.contains("open"));

        let mut store = MemoryStore::from_json(r#"{"audio": {"music": true}}"#).unwrap();
        let handler = Rc::clone(registry.get("mute").unwrap());
        let mut ctx = ActionContext {
            element: ElementId(1),
            args: &[],
            store: &mut store,
        };
        handler(&mut ctx).unwrap();
        assert_eq!(
            store.read(&"audio.music".parse().unwrap()),
            Some(Value::Bool(false))
        );
    }
}
