//! Conversion form state
//!
//! The single conversion screen as a plain value: active category, selected
//! units, the entered amount, and whether the amount field has focus. The
//! form never holds units from a category other than the active one.

use serde::{Deserialize, Serialize};
use tracing::trace;
use unitopia_core::{Category, ConversionError};
use unitopia_units::{Unit, UNITS};
use crate::{Conversion, ConversionRequest, Unitopia};

/// Shown instead of a result when there is nothing to display
pub const PLACEHOLDER: &str = "--";

/// When the result area shows the placeholder instead of the computed value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayPolicy {
    /// Always render the computed result, including for zero
    Always,
    /// Placeholder while the field is focused, empty, or zero
    #[default]
    PlaceholderWhenIdle,
}

impl DisplayPolicy {
    pub fn from_name(s: &str) -> Option<DisplayPolicy> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "always" => Some(DisplayPolicy::Always),
            "placeholder_when_idle" | "placeholder" => Some(DisplayPolicy::PlaceholderWhenIdle),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionForm {
    category: Category,
    source: &'static Unit,
    target: &'static Unit,
    amount: Option<f64>,
    focused: bool,
}

impl ConversionForm {
    /// Initial state: first category, its default pair, no amount
    pub fn new() -> Self {
        let category = Category::default();
        let (source, target) = UNITS.default_pair(category);
        Self { category, source, target, amount: None, focused: false }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn source(&self) -> &'static Unit {
        self.source
    }

    pub fn target(&self) -> &'static Unit {
        self.target
    }

    pub fn amount(&self) -> Option<f64> {
        self.amount
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Units the pickers offer for the active category
    pub fn available_units(&self) -> &'static [Unit] {
        UNITS.units_for(self.category)
    }

    /// Switch category and reset the selection to its default pair
    pub fn select_category(&mut self, category: Category) {
        let (source, target) = UNITS.default_pair(category);
        self.category = category;
        self.source = source;
        self.target = target;
        trace!(category = category.name(), source = source.key, target = target.key, "category selected");
    }

    pub fn select_source(&mut self, unit: &'static Unit) -> Result<(), ConversionError> {
        self.check_selectable(unit, self.target, true)?;
        self.source = unit;
        Ok(())
    }

    pub fn select_target(&mut self, unit: &'static Unit) -> Result<(), ConversionError> {
        self.check_selectable(unit, self.source, false)?;
        self.target = unit;
        Ok(())
    }

    pub fn set_amount(&mut self, amount: Option<f64>) {
        self.amount = amount;
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Back to the initial state
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Build the request for the current selection
    pub fn request(&self) -> Result<ConversionRequest<'static>, ConversionError> {
        let amount = self.amount
            .ok_or_else(|| ConversionError::InvalidAmount("amount is empty".to_string()))?;
        ConversionRequest::new(amount, self.source, self.target)
    }

    pub fn evaluate(&self, engine: &Unitopia) -> Result<Conversion<'static>, ConversionError> {
        engine.evaluate(&self.request()?)
    }

    /// Text for the result area under the given policy
    pub fn display(&self, engine: &Unitopia, policy: DisplayPolicy) -> String {
        if policy == DisplayPolicy::PlaceholderWhenIdle && self.is_idle() {
            return PLACEHOLDER.to_string();
        }
        self.evaluate(engine)
            .map(|c| c.formatted)
            .unwrap_or_else(|_| PLACEHOLDER.to_string())
    }

    fn is_idle(&self) -> bool {
        self.focused || self.amount.map_or(true, |a| a == 0.0)
    }

    fn check_selectable(&self, unit: &Unit, other: &Unit, is_source: bool) -> Result<(), ConversionError> {
        if unit.category != self.category {
            let (from, to) = if is_source { (unit, other) } else { (other, unit) };
            return Err(ConversionError::CategoryMismatch {
                from: from.symbol.to_string(),
                to: to.symbol.to_string(),
                from_category: from.category,
                to_category: to.category,
            });
        }
        if !UNITS.contains(unit) {
            return Err(ConversionError::UnknownUnit(unit.key.to_string()));
        }
        Ok(())
    }
}

impl Default for ConversionForm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(name: &str) -> &'static Unit {
        UNITS.get(name).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let form = ConversionForm::new();
        assert_eq!(form.category(), Category::Temperature);
        assert_eq!(form.source().key, "fahrenheit");
        assert_eq!(form.target().key, "celsius");
        assert_eq!(form.amount(), None);
        assert!(!form.is_focused());
    }

    #[test]
    fn test_category_switch_resets_to_defaults() {
        let mut form = ConversionForm::new();
        form.select_target(unit("kelvin")).unwrap();
        form.select_category(Category::Mass);
        assert_eq!(form.source().key, "grams");
        assert_eq!(form.target().key, "kilograms");
        assert_eq!(form.available_units().len(), 4);
    }

    #[test]
    fn test_selecting_foreign_unit_is_rejected() {
        let mut form = ConversionForm::new();
        let err = form.select_source(unit("meters")).unwrap_err();
        assert!(matches!(err, ConversionError::CategoryMismatch { .. }));
        assert_eq!(form.source().key, "fahrenheit");

        let err = form.select_target(unit("kg")).unwrap_err();
        match err {
            ConversionError::CategoryMismatch { from_category, to_category, .. } => {
                assert_eq!(from_category, Category::Temperature);
                assert_eq!(to_category, Category::Mass);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(form.target().key, "celsius");
    }

    #[test]
    fn test_request_needs_amount() {
        let form = ConversionForm::new();
        assert!(matches!(form.request(), Err(ConversionError::InvalidAmount(_))));
    }

    #[test]
    fn test_evaluate_zero_converts_normally() {
        let engine = Unitopia::default();
        let mut form = ConversionForm::new();
        form.select_source(unit("celsius")).unwrap();
        form.select_target(unit("fahrenheit")).unwrap();
        form.set_amount(Some(0.0));

        let conversion = form.evaluate(&engine).unwrap();
        assert!((conversion.value - 32.0).abs() < 1e-9);
        assert_eq!(form.display(&engine, DisplayPolicy::Always), "32°F");
        assert_eq!(form.display(&engine, DisplayPolicy::PlaceholderWhenIdle), PLACEHOLDER);
    }

    #[test]
    fn test_placeholder_while_focused_or_empty() {
        let engine = Unitopia::default();
        let mut form = ConversionForm::new();
        assert_eq!(form.display(&engine, DisplayPolicy::PlaceholderWhenIdle), PLACEHOLDER);
        assert_eq!(form.display(&engine, DisplayPolicy::Always), PLACEHOLDER);

        form.set_amount(Some(212.0));
        form.set_focused(true);
        assert_eq!(form.display(&engine, DisplayPolicy::PlaceholderWhenIdle), PLACEHOLDER);

        form.set_focused(false);
        assert_eq!(form.display(&engine, DisplayPolicy::PlaceholderWhenIdle), "100°C");
    }

    #[test]
    fn test_reset() {
        let mut form = ConversionForm::new();
        form.select_category(Category::Volume);
        form.set_amount(Some(3.0));
        form.set_focused(true);
        form.reset();
        assert_eq!(form, ConversionForm::new());
    }

    #[test]
    fn test_policy_from_name() {
        assert_eq!(DisplayPolicy::from_name("always"), Some(DisplayPolicy::Always));
        assert_eq!(DisplayPolicy::from_name("placeholder-when-idle"), Some(DisplayPolicy::PlaceholderWhenIdle));
        assert_eq!(DisplayPolicy::from_name("never"), None);
    }
}
