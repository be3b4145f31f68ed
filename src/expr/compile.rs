//! Compilation of parsed expressions into closures.
//!
//! Rules and actions are compiled once at build time. Each AST node becomes a
//! boxed closure over a [`Scope`], so evaluating a rule or running an action on
//! click never touches source text again. Store paths are validated and call
//! targets resolved against the [`ActionRegistry`] during compilation.

use crate::binding::registry::{ActionContext, ActionHandler, ActionRegistry};
use crate::domain::element::ElementId;
use crate::expr::parser::{parse_rule, parse_script, BinaryOp, Expr, Statement, CONTEXT_PARAM};
use crate::expr::ExprError;
use crate::store::backend::SettingsStore;
use crate::store::path::StorePath;
use crate::store::value::Value;
use std::cmp::Ordering;
use std::fmt;

enum StoreAccess<'a> {
    Read(&'a dyn SettingsStore),
    Write(&'a mut dyn SettingsStore),
}

/// Evaluation environment: the store plus, for actions, the interacted element.
pub struct Scope<'a> {
    store: StoreAccess<'a>,
    element: Option<ElementId>,
}

impl<'a> Scope<'a> {
    /// Read-only scope used for visibility rules.
    #[must_use]
    pub fn read_only(store: &'a dyn SettingsStore) -> Self {
        Self {
            store: StoreAccess::Read(store),
            element: None,
        }
    }

    /// Mutable scope used while an action runs on behalf of `element`.
    pub fn for_action(store: &'a mut dyn SettingsStore, element: ElementId) -> Self {
        Self {
            store: StoreAccess::Write(store),
            element: Some(element),
        }
    }

    fn read(&self, path: &StorePath) -> Option<Value> {
        match &self.store {
            StoreAccess::Read(store) => store.read(path),
            StoreAccess::Write(store) => store.read(path),
        }
    }

    fn write(&mut self, path: &StorePath, value: Value) -> Result<(), ExprError> {
        match &mut self.store {
            StoreAccess::Write(store) => store
                .write(path, value)
                .map_err(|e| ExprError::new(e.to_string())),
            StoreAccess::Read(_) => Err(ExprError::new(format!(
                "cannot assign `{path}` outside an action"
            ))),
        }
    }

    fn invoke(&mut self, name: &str, handler: &ActionHandler, args: &[Value]) -> Result<(), ExprError> {
        let element = self
            .element
            .ok_or_else(|| ExprError::new(format!("cannot call `{name}` outside an action")))?;
        match &mut self.store {
            StoreAccess::Write(store) => {
                let mut context = ActionContext {
                    element,
                    args,
                    store: &mut **store,
                };
                handler(&mut context).map_err(|e| ExprError::new(format!("`{name}` failed: {e}")))
            }
            StoreAccess::Read(_) => Err(ExprError::new(format!(
                "cannot call `{name}` outside an action"
            ))),
        }
    }
}

type Thunk = Box<dyn Fn(&mut Scope<'_>) -> Result<Value, ExprError>>;
type Step = Box<dyn Fn(&mut Scope<'_>) -> Result<(), ExprError>>;

/// A visibility rule compiled to a boolean predicate over the store.
pub struct CompiledRule {
    source: String,
    thunk: Thunk,
}

impl CompiledRule {
    /// Compiles rule text. `return` prefixes and a trailing `;` are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ExprError`] on syntax errors, and when the rule calls an
    /// action, assigns, or references the `o` parameter.
    ///
    /// # Example
    ///
    /// ```rust
    /// use settings_panel::expr::CompiledRule;
    /// use settings_panel::store::MemoryStore;
    ///
    /// let store = MemoryStore::from_json(r#"{"audio": {"available": true}, "level": 4}"#)?;
    /// let rule = CompiledRule::compile("return audio.available && level >= 3").unwrap();
    /// assert_eq!(rule.evaluate(&store), Ok(true));
    /// # Ok::<(), settings_panel::PanelError>(())
    /// ```
    pub fn compile(source: &str) -> Result<Self, ExprError> {
        let expr = parse_rule(source)?;
        Ok(Self {
            source: source.to_string(),
            thunk: compile_expr(&expr, None)?,
        })
    }

    /// Evaluates the rule; non-boolean results are converted by truthiness.
    ///
    /// # Errors
    ///
    /// Returns [`ExprError`] when a referenced path is missing from the store
    /// or an operator is applied to incompatible values.
    pub fn evaluate(&self, store: &dyn SettingsStore) -> Result<bool, ExprError> {
        let mut scope = Scope::read_only(store);
        (self.thunk)(&mut scope).map(|value| value.is_truthy())
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for CompiledRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledRule")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// An action script compiled to a sequence of steps.
pub struct CompiledScript {
    source: String,
    steps: Vec<Step>,
}

impl CompiledScript {
    /// Compiles a `;`-separated action script.
    ///
    /// # Errors
    ///
    /// Returns [`ExprError`] on syntax errors and on calls to names the
    /// registry does not know.
    pub fn compile(source: &str, registry: &ActionRegistry) -> Result<Self, ExprError> {
        let steps = parse_script(source)?
            .into_iter()
            .map(|statement| compile_statement(statement, registry))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            source: source.to_string(),
            steps,
        })
    }

    /// Runs every step in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first step's [`ExprError`]; earlier steps' effects remain.
    pub fn run(&self, scope: &mut Scope<'_>) -> Result<(), ExprError> {
        for step in &self.steps {
            step(scope)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Debug for CompiledScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledScript")
            .field("source", &self.source)
            .field("steps", &self.steps.len())
            .finish()
    }
}

fn compile_statement(statement: Statement, registry: &ActionRegistry) -> Result<Step, ExprError> {
    match statement {
        Statement::Assign { target, value } => {
            let value = compile_expr(&value, Some(registry))?;
            Ok(Box::new(move |scope: &mut Scope<'_>| {
                let value = value(scope)?;
                scope.write(&target, value)
            }))
        }
        Statement::Eval(expr) => {
            let thunk = compile_expr(&expr, Some(registry))?;
            Ok(Box::new(move |scope: &mut Scope<'_>| thunk(scope).map(|_| ())))
        }
    }
}

/// Compiles one expression. `registry` is `None` for rules, which may not
/// call actions or see the `o` parameter.
fn compile_expr(expr: &Expr, registry: Option<&ActionRegistry>) -> Result<Thunk, ExprError> {
    let thunk: Thunk = match expr {
        Expr::Literal(value) => {
            let value = value.clone();
            Box::new(move |_: &mut Scope<'_>| Ok(value.clone()))
        }
        Expr::Path(path) => {
            let path = path.clone();
            Box::new(move |scope: &mut Scope<'_>| {
                scope
                    .read(&path)
                    .ok_or_else(|| ExprError::new(format!("unknown path `{path}`")))
            })
        }
        Expr::Context => {
            if registry.is_none() {
                return Err(ExprError::new(format!(
                    "`{CONTEXT_PARAM}` is only available in actions"
                )));
            }
            Box::new(|scope: &mut Scope<'_>| {
                scope
                    .element
                    .map(Value::Element)
                    .ok_or_else(|| ExprError::new(format!("`{CONTEXT_PARAM}` is not bound")))
            })
        }
        Expr::Not(inner) => {
            let inner = compile_expr(inner, registry)?;
            Box::new(move |scope: &mut Scope<'_>| Ok(Value::Bool(!inner(scope)?.is_truthy())))
        }
        Expr::Neg(inner) => {
            let inner = compile_expr(inner, registry)?;
            Box::new(move |scope: &mut Scope<'_>| match inner(scope)? {
                Value::Number(n) => Ok(Value::Number(-n)),
                other => Err(ExprError::new(format!("cannot negate {}", other.kind()))),
            })
        }
        Expr::Binary { op, left, right } => {
            let left = compile_expr(left, registry)?;
            let right = compile_expr(right, registry)?;
            let op = *op;
            match op {
                BinaryOp::And => Box::new(move |scope: &mut Scope<'_>| {
                    if !left(scope)?.is_truthy() {
                        return Ok(Value::Bool(false));
                    }
                    Ok(Value::Bool(right(scope)?.is_truthy()))
                }),
                BinaryOp::Or => Box::new(move |scope: &mut Scope<'_>| {
                    if left(scope)?.is_truthy() {
                        return Ok(Value::Bool(true));
                    }
                    Ok(Value::Bool(right(scope)?.is_truthy()))
                }),
                _ => Box::new(move |scope: &mut Scope<'_>| {
                    let l = left(scope)?;
                    let r = right(scope)?;
                    apply_comparison(op, &l, &r).map(Value::Bool)
                }),
            }
        }
        Expr::Call { name, args } => {
            let Some(registry) = registry else {
                return Err(ExprError::new(format!(
                    "calls are not allowed in rules (`{name}`)"
                )));
            };
            let handler = registry
                .get(name)
                .cloned()
                .ok_or_else(|| ExprError::new(format!("unknown action `{name}`")))?;
            let args = args
                .iter()
                .map(|arg| compile_expr(arg, Some(registry)))
                .collect::<Result<Vec<_>, _>>()?;
            let name = name.clone();
            Box::new(move |scope: &mut Scope<'_>| {
                let values = args
                    .iter()
                    .map(|arg| arg(scope))
                    .collect::<Result<Vec<_>, _>>()?;
                scope.invoke(&name, &handler, &values)?;
                Ok(Value::Null)
            })
        }
    };
    Ok(thunk)
}

fn apply_comparison(op: BinaryOp, left: &Value, right: &Value) -> Result<bool, ExprError> {
    match op {
        BinaryOp::Eq => Ok(left == right),
        BinaryOp::Ne => Ok(left != right),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let ordering = match (left, right) {
                (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
                (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
                _ => {
                    return Err(ExprError::new(format!(
                        "cannot order {} and {}",
                        left.kind(),
                        right.kind()
                    )))
                }
            };
            // NaN compares false in every direction
            Ok(ordering.is_some_and(|ordering| match op {
                BinaryOp::Lt => ordering == Ordering::Less,
                BinaryOp::Le => ordering != Ordering::Greater,
                BinaryOp::Gt => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            }))
        }
        BinaryOp::And | BinaryOp::Or => Ok(left.is_truthy() && right.is_truthy()),
    }
}
