//! Measurement formatting
//!
//! Renders a converted value with its unit for direct display, e.g.
//! "72.5°F", "1,000 m", or "37 degrees Celsius".

use serde::{Deserialize, Serialize};
use unitopia_units::{Measurement, Unit};

/// How the unit is attached to the number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitStyle {
    /// Symbol glued to the value: "72.5°F", "12km"
    #[default]
    Short,
    /// Symbol after a space, degree symbols stay attached: "72.5°F", "12 km"
    Medium,
    /// Spelled-out name: "12 kilometers", "1 degree Celsius"
    Long,
}

impl UnitStyle {
    pub fn from_name(s: &str) -> Option<UnitStyle> {
        match s.trim().to_lowercase().as_str() {
            "short" => Some(UnitStyle::Short),
            "medium" => Some(UnitStyle::Medium),
            "long" => Some(UnitStyle::Long),
            _ => None,
        }
    }
}

/// Number and unit rendering options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Values are rounded to this many fraction digits
    pub max_fraction_digits: usize,
    /// Trailing zeros are stripped down to this many fraction digits
    pub min_fraction_digits: usize,
    /// Insert a grouping separator every three integer digits
    pub grouping: bool,
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub unit_style: UnitStyle,
}

impl FormatOptions {
    pub fn with_precision(mut self, max_fraction_digits: usize) -> Self {
        self.max_fraction_digits = max_fraction_digits;
        self
    }

    pub fn with_min_fraction_digits(mut self, min_fraction_digits: usize) -> Self {
        self.min_fraction_digits = min_fraction_digits;
        self
    }

    pub fn with_grouping(mut self, grouping: bool) -> Self {
        self.grouping = grouping;
        self
    }

    pub fn with_separators(mut self, decimal: char, grouping: char) -> Self {
        self.decimal_separator = decimal;
        self.grouping_separator = grouping;
        self
    }

    pub fn with_style(mut self, unit_style: UnitStyle) -> Self {
        self.unit_style = unit_style;
        self
    }
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            max_fraction_digits: 3,
            min_fraction_digits: 0,
            grouping: true,
            decimal_separator: '.',
            grouping_separator: ',',
            unit_style: UnitStyle::Short,
        }
    }
}

/// Formats measurements according to `FormatOptions`
#[derive(Debug, Clone, Default)]
pub struct MeasurementFormatter {
    options: FormatOptions,
}

impl MeasurementFormatter {
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// Render a bare number
    pub fn format_number(&self, value: f64) -> String {
        if !value.is_finite() {
            return value.to_string();
        }

        let opts = &self.options;
        let max = opts.max_fraction_digits.max(opts.min_fraction_digits);
        let fixed = format!("{:.*}", max, value.abs());

        let (int_part, frac_part) = match fixed.split_once('.') {
            Some((i, f)) => (i, f),
            None => (fixed.as_str(), ""),
        };

        let mut frac = frac_part.to_string();
        while frac.len() > opts.min_fraction_digits && frac.ends_with('0') {
            frac.pop();
        }

        let is_zero = int_part.bytes().all(|b| b == b'0') && frac.bytes().all(|b| b == b'0');

        let mut out = String::new();
        if value < 0.0 && !is_zero {
            out.push('-');
        }
        if opts.grouping {
            out.push_str(&group_digits(int_part, opts.grouping_separator));
        } else {
            out.push_str(int_part);
        }
        if !frac.is_empty() {
            out.push(opts.decimal_separator);
            out.push_str(&frac);
        }
        out
    }

    /// Render a value in the given unit
    pub fn format(&self, value: f64, unit: &Unit) -> String {
        let number = self.format_number(value);
        match self.options.unit_style {
            UnitStyle::Short => format!("{}{}", number, unit.symbol),
            UnitStyle::Medium if unit.symbol.starts_with('°') => format!("{}{}", number, unit.symbol),
            UnitStyle::Medium => format!("{} {}", number, unit.symbol),
            UnitStyle::Long => {
                let name = if self.rounded(value) == 1.0 { unit.name } else { unit.plural };
                format!("{} {}", number, name)
            }
        }
    }

    /// The value as displayed, before separators are applied
    fn rounded(&self, value: f64) -> f64 {
        let digits = self.options.max_fraction_digits.max(self.options.min_fraction_digits);
        format!("{:.*}", digits, value).parse().unwrap_or(value)
    }

    pub fn format_measurement(&self, measurement: &Measurement<'_>) -> String {
        self.format(measurement.value, measurement.unit)
    }

    /// Picker label for a unit, e.g. "Degrees Fahrenheit"
    pub fn unit_label(&self, unit: &Unit) -> String {
        capitalize_words(unit.plural)
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

fn capitalize_words(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = c == ' ' || c == '-';
    }
    out
}
