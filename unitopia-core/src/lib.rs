//! Unitopia Core - Fundamental types
//!
//! This crate provides the core types shared by the registry, the engine and
//! the server:
//! - `Category`: the closed set of conversion families
//! - `ConversionError`: what a single conversion can fail with
//! - `UnitopiaError`: structured errors for outer surfaces

mod category;
mod error;

pub use category::Category;
pub use error::{ConversionError, UnitopiaError, Severity, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Category, ConversionError, UnitopiaError, Severity};
    pub use crate::error::codes;
}
