//! Measurement type - an amount with an associated unit

use std::fmt;
use serde::Serialize;
use unitopia_core::{Category, ConversionError};
use crate::{Unit, UNITS};

/// An amount expressed in a registry unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement<'a> {
    pub value: f64,
    pub unit: &'a Unit,
}

impl<'a> Measurement<'a> {
    pub fn new(value: f64, unit: &'a Unit) -> Self {
        Measurement { value, unit }
    }

    pub fn category(&self) -> Category {
        self.unit.category
    }

    /// Check if two measurements can be converted into each other
    pub fn is_compatible(&self, other: &Measurement<'_>) -> bool {
        self.unit.is_compatible(other.unit)
    }

    /// Convert to another unit of the same category
    pub fn convert_to<'b>(&self, target: &'b Unit) -> Result<Measurement<'b>, ConversionError> {
        let value = self.unit.convert_to(self.value, target)?;
        Ok(Measurement::new(value, target))
    }

    /// Express this measurement in its category's base unit
    pub fn to_base(&self) -> Result<Measurement<'static>, ConversionError> {
        let base = UNITS.base_unit(self.category())
            .ok_or_else(|| ConversionError::UnknownUnit(self.category().base_unit_key().to_string()))?;
        self.convert_to(base)
    }
}

impl fmt::Display for Measurement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_to() {
        let km = UNITS.get("km").unwrap();
        let m = UNITS.get("m").unwrap();
        let converted = Measurement::new(5.0, km).convert_to(m).unwrap();
        assert!((converted.value - 5000.0).abs() < 1e-9);
        assert_eq!(converted.unit.key, "meters");
    }

    #[test]
    fn test_to_base() {
        let c = UNITS.get("celsius").unwrap();
        let base = Measurement::new(100.0, c).to_base().unwrap();
        assert_eq!(base.unit.key, "kelvin");
        assert!((base.value - 373.15).abs() < 1e-9);
    }

    #[test]
    fn test_compatibility() {
        let lb = Measurement::new(1.0, UNITS.get("lb").unwrap());
        let oz = Measurement::new(16.0, UNITS.get("oz").unwrap());
        let hr = Measurement::new(1.0, UNITS.get("hr").unwrap());
        assert!(lb.is_compatible(&oz));
        assert!(!lb.is_compatible(&hr));
    }

    #[test]
    fn test_display() {
        let m = Measurement::new(2.5, UNITS.get("kg").unwrap());
        assert_eq!(format!("{}", m), "2.5 kg");
    }
}
