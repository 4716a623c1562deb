//! Conversion errors and their structured form
//!
//! `ConversionError` is what the registry and engine return. Outer surfaces
//! turn it into a `UnitopiaError`, which carries a machine-readable code and
//! a suggestion and serializes cleanly.

use crate::Category;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const CATEGORY_MISMATCH: &str = "CATEGORY_MISMATCH";
    pub const INVALID_AMOUNT: &str = "INVALID_AMOUNT";
    pub const OUT_OF_RANGE: &str = "OUT_OF_RANGE";
    pub const UNKNOWN_UNIT: &str = "UNKNOWN_UNIT";
    pub const UNKNOWN_CATEGORY: &str = "UNKNOWN_CATEGORY";
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Error returned by a single conversion
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("cannot convert {from} ({from_category}) to {to} ({to_category}): units belong to different categories")]
    CategoryMismatch {
        from: String,
        to: String,
        from_category: Category,
        to_category: Category,
    },

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("converting {from} to {to} overflows the representable range")]
    OutOfRange { from: String, to: String },

    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    #[error("unknown category: {0}")]
    UnknownCategory(String),
}

impl ConversionError {
    /// Machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ConversionError::CategoryMismatch { .. } => codes::CATEGORY_MISMATCH,
            ConversionError::InvalidAmount(_) => codes::INVALID_AMOUNT,
            ConversionError::OutOfRange { .. } => codes::OUT_OF_RANGE,
            ConversionError::UnknownUnit(_) => codes::UNKNOWN_UNIT,
            ConversionError::UnknownCategory(_) => codes::UNKNOWN_CATEGORY,
        }
    }

    /// Build the error for a non-finite input amount
    pub fn non_finite(amount: f64) -> Self {
        ConversionError::InvalidAmount(format!("{} is not a finite number", amount))
    }
}

/// Severity level of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The requested conversion failed; the caller may retry with new input
    Error,
    /// The surface itself is broken
    Fatal,
}

/// Structured error for outer surfaces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitopiaError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    pub severity: Severity,
}

impl UnitopiaError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
            severity: Severity::Error,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: set severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn invalid_request(details: impl Into<String>) -> Self {
        Self::new(codes::INVALID_REQUEST, format!("Invalid request: {}", details.into()))
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL, format!("Internal error: {}", details.into()))
            .with_suggestion("This is a bug, please report it")
            .with_severity(Severity::Fatal)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| {
            serde_json::json!({ "code": self.code, "message": self.message })
        })
    }
}

impl std::fmt::Display for UnitopiaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for UnitopiaError {}

impl From<ConversionError> for UnitopiaError {
    fn from(err: ConversionError) -> Self {
        let base = Self::new(err.code(), err.to_string());
        match err {
            ConversionError::CategoryMismatch { from_category, .. } => base.with_suggestion(format!(
                "Pick both units from the {} category",
                from_category.title()
            )),
            ConversionError::InvalidAmount(_) => {
                base.with_suggestion("Enter a finite decimal number, e.g. 72.5")
            }
            ConversionError::OutOfRange { .. } => {
                base.with_suggestion("Use a smaller amount or a larger target unit")
            }
            ConversionError::UnknownUnit(_) => {
                base.with_suggestion("Use list_units to see the units of a category")
            }
            ConversionError::UnknownCategory(_) => base.with_suggestion(
                "Valid categories: temperature, length, mass, duration, speed, volume",
            ),
        }
    }
}
