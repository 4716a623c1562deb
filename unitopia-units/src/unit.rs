//! Unit representation with its conversion rule

use std::fmt;
use serde::Serialize;
use unitopia_core::{Category, ConversionError};

/// A selectable unit and its relationship to the category's base unit
///
/// The rule is affine: `base = (value + offset) * scale`. Linear units have
/// a zero offset; only temperature needs one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Unit {
    /// Stable identifier (e.g., "kilometers", "fahrenheit")
    pub key: &'static str,
    /// Short display symbol (e.g., "km", "°F")
    pub symbol: &'static str,
    /// Singular long name (e.g., "kilometer")
    pub name: &'static str,
    /// Plural long name (e.g., "kilometers")
    pub plural: &'static str,
    pub category: Category,
    /// Multiplier applied after the offset when converting to base
    pub scale: f64,
    /// Added to the value before scaling when converting to base
    pub offset: f64,
}

impl Unit {
    /// Create a unit with proportional conversion (no offset)
    pub fn new(
        key: &'static str,
        symbol: &'static str,
        name: &'static str,
        plural: &'static str,
        category: Category,
        scale: f64,
    ) -> Self {
        Unit { key, symbol, name, plural, category, scale, offset: 0.0 }
    }

    /// Create a unit with offset (temperature scales)
    pub fn with_offset(
        key: &'static str,
        symbol: &'static str,
        name: &'static str,
        plural: &'static str,
        category: Category,
        scale: f64,
        offset: f64,
    ) -> Self {
        Unit { key, symbol, name, plural, category, scale, offset }
    }

    /// Check if this is the base unit of its category
    pub fn is_base(&self) -> bool {
        self.scale == 1.0 && self.offset == 0.0
    }

    /// Check if this unit has an offset (non-proportional conversion)
    pub fn has_offset(&self) -> bool {
        self.offset != 0.0
    }

    /// Check if two units can be converted into each other
    pub fn is_compatible(&self, other: &Unit) -> bool {
        self.category == other.category
    }

    /// Convert a value in this unit to the category's base unit
    pub fn to_base(&self, value: f64) -> f64 {
        (value + self.offset) * self.scale
    }

    /// Convert a base-unit value into this unit
    pub fn from_base(&self, base: f64) -> f64 {
        base / self.scale - self.offset
    }

    /// Convert a value from this unit to another unit of the same category
    pub fn convert_to(&self, value: f64, target: &Unit) -> Result<f64, ConversionError> {
        if !self.is_compatible(target) {
            return Err(ConversionError::CategoryMismatch {
                from: self.symbol.to_string(),
                to: target.symbol.to_string(),
                from_category: self.category,
                to_category: target.category,
            });
        }

        if !value.is_finite() {
            return Err(ConversionError::non_finite(value));
        }

        // Same unit: skip the round trip through base so identity is exact
        if self.key == target.key {
            return Ok(value);
        }

        let result = if !self.has_offset() && !target.has_offset() {
            value * (self.scale / target.scale)
        } else {
            let via_base = target.from_base(self.to_base(value));
            if via_base.is_finite() {
                via_base
            } else {
                // The base value can overflow where the result itself fits
                (value + self.offset) * (self.scale / target.scale) - target.offset
            }
        };
        if !result.is_finite() {
            return Err(ConversionError::OutOfRange {
                from: self.symbol.to_string(),
                to: target.symbol.to_string(),
            });
        }

        Ok(result)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meter() -> Unit {
        Unit::new("meters", "m", "meter", "meters", Category::Length, 1.0)
    }

    fn kilometer() -> Unit {
        Unit::new("kilometers", "km", "kilometer", "kilometers", Category::Length, 1000.0)
    }

    fn celsius() -> Unit {
        Unit::with_offset("celsius", "°C", "degree Celsius", "degrees Celsius",
            Category::Temperature, 1.0, 273.15)
    }

    fn fahrenheit() -> Unit {
        Unit::with_offset("fahrenheit", "°F", "degree Fahrenheit", "degrees Fahrenheit",
            Category::Temperature, 5.0 / 9.0, 459.67)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn test_base_unit() {
        assert!(meter().is_base());
        assert!(!kilometer().is_base());
        assert!(!celsius().is_base());
    }

    #[test]
    fn test_has_offset() {
        assert!(celsius().has_offset());
        assert!(!kilometer().has_offset());
    }

    #[test]
    fn test_to_base_applies_offset_then_scale() {
        assert!(close(fahrenheit().to_base(32.0), 273.15));
        assert!(close(celsius().to_base(0.0), 273.15));
        assert_eq!(kilometer().to_base(5.0), 5000.0);
    }

    #[test]
    fn test_from_base() {
        assert_eq!(kilometer().from_base(5000.0), 5.0);
        assert!(close(fahrenheit().from_base(373.15), 212.0));
    }

    #[test]
    fn test_convert_linear() {
        let result = meter().convert_to(5000.0, &kilometer()).unwrap();
        assert_eq!(result, 5.0);
    }

    #[test]
    fn test_convert_affine() {
        let result = celsius().convert_to(100.0, &fahrenheit()).unwrap();
        assert!(close(result, 212.0));
        let result = fahrenheit().convert_to(-40.0, &celsius()).unwrap();
        assert!(close(result, -40.0));
    }

    #[test]
    fn test_identity_is_exact() {
        let f = fahrenheit();
        for x in [0.1, -17.3, 98.6, 1e12] {
            assert_eq!(f.convert_to(x, &f).unwrap(), x);
        }
    }

    #[test]
    fn test_category_mismatch_checked_first() {
        // A non-finite amount still reports the mismatch
        let err = celsius().convert_to(f64::NAN, &meter()).unwrap_err();
        assert!(matches!(err, ConversionError::CategoryMismatch { .. }));
    }

    #[test]
    fn test_non_finite_amount_rejected() {
        let err = meter().convert_to(f64::INFINITY, &kilometer()).unwrap_err();
        assert!(matches!(err, ConversionError::InvalidAmount(_)));
    }

    #[test]
    fn test_overflow_rejected() {
        let err = kilometer().convert_to(f64::MAX, &meter()).unwrap_err();
        assert!(matches!(err, ConversionError::OutOfRange { .. }));
    }

    #[test]
    fn test_large_value_converts_when_result_fits() {
        let acre_foot = Unit::new("acre_feet", "af", "acre-foot", "acre-feet", Category::Volume, 1233481.83754752);
        let bushel = Unit::new("bushels", "bsh", "bushel", "bushels", Category::Volume, 35.23907016688);
        let amount = f64::MAX / 1e6;
        let expected = amount * (acre_foot.scale / bushel.scale);

        let result = acre_foot.convert_to(amount, &bushel).unwrap();
        assert!(result.is_finite());
        assert!(close(result, expected));
    }

    #[test]
    fn test_large_affine_value_overflowing_in_base() {
        let kelvin = Unit::new("kelvin", "K", "kelvin", "kelvins", Category::Temperature, 1.0);
        let coarse = Unit::with_offset("coarse", "C1", "coarse", "coarse", Category::Temperature, 1e10, 1.0);
        let shifted = Unit::with_offset("shifted", "C2", "shifted", "shifted", Category::Temperature, 1e10, 2.0);
        let amount = f64::MAX / 1e5;

        let result = coarse.convert_to(amount, &shifted).unwrap();
        assert!(close(result, amount - 1.0));

        let err = coarse.convert_to(amount, &kelvin).unwrap_err();
        assert!(matches!(err, ConversionError::OutOfRange { .. }));
    }

    #[test]
    fn test_display_is_symbol() {
        assert_eq!(format!("{}", fahrenheit()), "°F");
    }
}
