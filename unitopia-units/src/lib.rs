//! Unitopia Units - Unit registry and conversion arithmetic
//!
//! Every unit converts through its category's base unit with an affine rule
//! `base = (value + offset) * scale`.
//!
//! Categories:
//! - Temperature (°F, °C, K)
//! - Length (in, ft, m, cm, mi, km)
//! - Mass (g, kg, lb, oz)
//! - Duration (hr, min, s, ms)
//! - Speed (mph, km/h, m/s)
//! - Volume (L, gal, af, bsh, pt, qt, fl oz, cL, mL, cup)

mod unit;
mod units;
mod measurement;
mod parse;

pub use unit::Unit;
pub use units::{UnitRegistry, UNITS};
pub use measurement::Measurement;
pub use parse::{parse_unit, parse_category, parse_amount, parse_quantity, parse_query};

use unitopia_core::{Category, ConversionError};

/// Ordered units of a category from the global registry
pub fn units_for(category: Category) -> &'static [Unit] {
    UNITS.units_for(category)
}

/// Convert an amount between two units of the same category
pub fn convert(amount: f64, source: &Unit, target: &Unit) -> Result<f64, ConversionError> {
    UNITS.convert(amount, source, target)
}
