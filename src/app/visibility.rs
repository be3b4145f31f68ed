//! Visibility rules and vertical compaction.
//!
//! Rows are walked in schema order with a running `skip` counter. A hidden
//! row takes no slot and bumps the counter; a visible row at ordinal `i`
//! gets the slot multiplier `(i + 1 − skip) × 1.5`, so every hidden row above
//! it pulls it up by one slot.
//!
//! A rule that cannot be compiled or evaluated hides its row exactly like a
//! rule that evaluates to `false`. The failure is kept as a diagnostic.

use crate::domain::error::PanelError;
use crate::domain::row::RowDescriptor;
use crate::expr::compile::CompiledRule;
use crate::store::backend::SettingsStore;

/// Spacing between consecutive slots, in row-height units.
pub const SLOT_SPACING: f64 = 1.5;

/// Slot multiplier of the row at `ordinal`, given the rows hidden before it.
#[must_use]
pub fn slot_multiplier(ordinal: usize, skipped_before: usize) -> f64 {
    (ordinal + 1).saturating_sub(skipped_before) as f64 * SLOT_SPACING
}

/// Evaluates a row's rule. Rows without a rule are visible.
///
/// # Errors
///
/// Returns [`PanelError::Evaluation`] when the rule is malformed or cannot be
/// evaluated against `store`.
pub fn evaluate_rule(row: &RowDescriptor, store: &dyn SettingsStore) -> Result<bool, PanelError> {
    let Some(source) = row.rule.as_deref() else {
        return Ok(true);
    };
    let source = source.trim();
    CompiledRule::compile(source)
        .and_then(|rule| rule.evaluate(store))
        .map_err(|e| PanelError::evaluation(Some(row.ordinal), "rule", source, e.to_string()))
}

/// Outcome for one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowSlot {
    pub ordinal: usize,
    /// `None` when the row is hidden.
    pub multiplier: Option<f64>,
}

impl RowSlot {
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.multiplier.is_some()
    }
}

/// Visibility of every row, computed in one pass.
#[derive(Debug, Default)]
pub struct VisibilityPlan {
    pub slots: Vec<RowSlot>,
    /// Rule failures. Each failed row is also hidden.
    pub diagnostics: Vec<PanelError>,
}

impl VisibilityPlan {
    /// Evaluates every rule against `store` in order.
    #[must_use]
    pub fn compute(rows: &[RowDescriptor], store: &dyn SettingsStore) -> Self {
        let mut plan = Self::default();
        let mut skip = 0;

        for row in rows {
            let visible = match evaluate_rule(row, store) {
                Ok(visible) => visible,
                Err(err) => {
                    tracing::warn!(row = row.ordinal, error = %err, "rule failed, hiding row");
                    plan.diagnostics.push(err);
                    false
                }
            };

            let multiplier = visible.then(|| slot_multiplier(row.ordinal, skip));
            if !visible {
                skip += 1;
            }
            tracing::debug!(row = row.ordinal, visible, skip, "row visibility");
            plan.slots.push(RowSlot {
                ordinal: row.ordinal,
                multiplier,
            });
        }

        plan
    }

    /// Number of hidden rows.
    #[must_use]
    pub fn hidden(&self) -> usize {
        self.slots.iter().filter(|slot| !slot.is_visible()).count()
    }
}
