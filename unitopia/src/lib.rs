//! Unitopia - Unit conversion engine
//!
//! Turns an amount, a source unit, and a target unit into a converted value
//! and a display string. The engine is stateless; all unit data lives in the
//! static registry from `unitopia-units`.

mod conversion;
mod format;
mod form;
mod record;

pub use conversion::{Conversion, ConversionRequest};
pub use format::{FormatOptions, MeasurementFormatter, UnitStyle};
pub use form::{ConversionForm, DisplayPolicy, PLACEHOLDER};
pub use record::ConversionRecord;

use tracing::debug;
use unitopia_core::{Category, ConversionError};
use unitopia_units::{parse_query, Unit, UnitRegistry, UNITS};

/// Main conversion engine
#[derive(Debug, Clone)]
pub struct Unitopia {
    formatter: MeasurementFormatter,
}

impl Unitopia {
    pub fn new(options: FormatOptions) -> Self {
        Self { formatter: MeasurementFormatter::new(options) }
    }

    pub fn with_precision(self, max_fraction_digits: usize) -> Self {
        Self::new(self.options().clone().with_precision(max_fraction_digits))
    }

    pub fn with_style(self, style: UnitStyle) -> Self {
        Self::new(self.options().clone().with_style(style))
    }

    pub fn options(&self) -> &FormatOptions {
        self.formatter.options()
    }

    pub fn formatter(&self) -> &MeasurementFormatter {
        &self.formatter
    }

    pub fn registry(&self) -> &'static UnitRegistry {
        &UNITS
    }

    pub fn categories(&self) -> &'static [Category] {
        UNITS.categories()
    }

    pub fn units_for(&self, category: Category) -> &'static [Unit] {
        UNITS.units_for(category)
    }

    pub fn default_pair(&self, category: Category) -> (&'static Unit, &'static Unit) {
        UNITS.default_pair(category)
    }

    /// Convert an amount; the raw numeric result
    pub fn convert(&self, amount: f64, source: &Unit, target: &Unit) -> Result<f64, ConversionError> {
        UNITS.convert(amount, source, target).inspect_err(|e| {
            debug!(amount, from = source.key, to = target.key, error = %e, "conversion rejected");
        })
    }

    /// Convert an amount and render it for display, e.g. "37°C"
    pub fn format(&self, amount: f64, source: &Unit, target: &Unit) -> Result<String, ConversionError> {
        let value = self.convert(amount, source, target)?;
        Ok(self.formatter.format(value, target))
    }

    /// Convert an amount; value and display string together
    pub fn conversion<'a>(&self, amount: f64, source: &'a Unit, target: &'a Unit) -> Result<Conversion<'a>, ConversionError> {
        self.evaluate(&ConversionRequest::new(amount, source, target)?)
    }

    pub fn evaluate<'a>(&self, request: &ConversionRequest<'a>) -> Result<Conversion<'a>, ConversionError> {
        let value = self.convert(request.amount, request.source, request.target)?;
        let formatted = self.formatter.format(value, request.target);
        debug!(amount = request.amount, from = request.source.key, to = request.target.key, value, "converted");

        Ok(Conversion {
            amount: request.amount,
            source: request.source,
            target: request.target,
            value,
            formatted,
        })
    }

    /// Parse and run a query like "100 km -> mi"
    pub fn convert_query(&self, query: &str) -> Result<Conversion<'static>, ConversionError> {
        let (amount, source, target) = parse_query(query)?;
        self.conversion(amount, source, target)
    }
}

impl Default for Unitopia {
    fn default() -> Self {
        Self::new(FormatOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(name: &str) -> &'static Unit {
        UNITS.get(name).unwrap()
    }

    fn engine() -> Unitopia {
        Unitopia::default()
    }

    #[test]
    fn test_format_fahrenheit_to_celsius() {
        let s = engine().format(98.6, unit("fahrenheit"), unit("celsius")).unwrap();
        assert_eq!(s, "37°C");
    }

    #[test]
    fn test_format_keeps_display_precision() {
        let s = engine().format(72.5, unit("fahrenheit"), unit("celsius")).unwrap();
        assert_eq!(s, "22.5°C");
        let s = engine().format(5.0, unit("km"), unit("mi")).unwrap();
        assert_eq!(s, "3.107mi");
    }

    #[test]
    fn test_format_zero() {
        let s = engine().format(0.0, unit("celsius"), unit("fahrenheit")).unwrap();
        assert_eq!(s, "32°F");
    }

    #[test]
    fn test_conversion_carries_value_and_string() {
        let c = engine().conversion(1.0, unit("km"), unit("m")).unwrap();
        assert!((c.value - 1000.0).abs() < 1e-9);
        assert_eq!(c.formatted, "1,000m");
        assert_eq!(c.category(), Category::Length);
    }

    #[test]
    fn test_mismatch_rejected() {
        let err = engine().format(10.0, unit("celsius"), unit("meters")).unwrap_err();
        assert!(matches!(err, ConversionError::CategoryMismatch { .. }));
    }

    #[test]
    fn test_non_finite_never_displayed() {
        for x in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = engine().format(x, unit("km"), unit("mi")).unwrap_err();
            assert!(matches!(err, ConversionError::InvalidAmount(_)));
        }
        let err = engine().format(f64::MAX, unit("af"), unit("mL")).unwrap_err();
        assert!(matches!(err, ConversionError::OutOfRange { .. }));
    }

    #[test]
    fn test_builders() {
        let e = engine().with_precision(1).with_style(UnitStyle::Long);
        assert_eq!(e.options().max_fraction_digits, 1);
        let s = e.format(1.0, unit("mi"), unit("km")).unwrap();
        assert_eq!(s, "1.6 kilometers");
    }

    #[test]
    fn test_convert_query() {
        let c = engine().convert_query("100 C -> F").unwrap();
        assert_eq!(c.formatted, "212°F");
        assert_eq!(c.target.key, "fahrenheit");
    }

    #[test]
    fn test_default_pair_for_mass() {
        let (source, target) = engine().default_pair(Category::Mass);
        assert_eq!(source.key, engine().units_for(Category::Mass)[0].key);
        assert_eq!(target.key, engine().units_for(Category::Mass)[1].key);
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Unitopia>();
    }
}
