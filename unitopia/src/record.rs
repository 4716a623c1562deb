//! Conversion records
//!
//! A record is what a history collaborator would store. Nothing in this
//! crate persists them.

use serde::{Deserialize, Serialize};
use unitopia_core::{Category, ConversionError};
use unitopia_units::parse_unit;
use crate::ConversionRequest;

/// Serializable snapshot of one conversion; units are referenced by key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRecord {
    pub amount: f64,
    pub category: Category,
    pub source: String,
    pub target: String,
    pub value: f64,
    pub formatted: String,
}

impl ConversionRecord {
    /// Rebuild the request this record was produced from
    pub fn request(&self) -> Result<ConversionRequest<'static>, ConversionError> {
        let source = parse_unit(&self.source)?;
        let target = parse_unit(&self.target)?;
        ConversionRequest::new(self.amount, source, target)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
