//! Conversion requests and results

use serde::Serialize;
use unitopia_core::{Category, ConversionError};
use unitopia_units::Unit;
use crate::ConversionRecord;

/// A validated request: finite amount, both units in one category
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionRequest<'a> {
    pub amount: f64,
    pub source: &'a Unit,
    pub target: &'a Unit,
}

impl<'a> ConversionRequest<'a> {
    pub fn new(amount: f64, source: &'a Unit, target: &'a Unit) -> Result<Self, ConversionError> {
        if !source.is_compatible(target) {
            return Err(ConversionError::CategoryMismatch {
                from: source.symbol.to_string(),
                to: target.symbol.to_string(),
                from_category: source.category,
                to_category: target.category,
            });
        }
        if !amount.is_finite() {
            return Err(ConversionError::non_finite(amount));
        }
        Ok(Self { amount, source, target })
    }

    pub fn category(&self) -> Category {
        self.source.category
    }
}

/// Result of one conversion: the raw value and its display string
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion<'a> {
    pub amount: f64,
    pub source: &'a Unit,
    pub target: &'a Unit,
    pub value: f64,
    pub formatted: String,
}

impl Conversion<'_> {
    pub fn category(&self) -> Category {
        self.source.category
    }

    /// Opaque record for an external history collaborator
    pub fn to_record(&self) -> ConversionRecord {
        ConversionRecord {
            amount: self.amount,
            category: self.category(),
            source: self.source.key.to_string(),
            target: self.target.key.to_string(),
            value: self.value,
            formatted: self.formatted.clone(),
        }
    }
}
