//! Text parsing - amounts, unit names, and queries like "100 km -> mi"

use unitopia_core::{Category, ConversionError};
use crate::{Unit, UNITS};

/// Separators accepted between the quantity and the target unit, in the
/// order they are tried
const QUERY_SEPARATORS: [&str; 5] = ["->", "→", "=>", " to ", " in "];

/// Parse a unit by key, symbol, or alias
pub fn parse_unit(s: &str) -> Result<&'static Unit, ConversionError> {
    let s = s.trim();
    UNITS.get(s).ok_or_else(|| ConversionError::UnknownUnit(s.to_string()))
}

/// Parse a category by machine name or picker title
pub fn parse_category(s: &str) -> Result<Category, ConversionError> {
    Category::from_name(s).ok_or_else(|| ConversionError::UnknownCategory(s.trim().to_string()))
}

/// Parse a user-entered amount
///
/// A lone comma is read as the decimal separator ("2,5"); when a dot is
/// present, commas are grouping separators ("1,234.5").
pub fn parse_amount(s: &str) -> Result<f64, ConversionError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ConversionError::InvalidAmount("amount is empty".to_string()));
    }

    let normalized = if s.contains('.') {
        s.replace(',', "")
    } else if s.matches(',').count() == 1 {
        s.replace(',', ".")
    } else {
        s.to_string()
    };

    let value: f64 = normalized.parse()
        .map_err(|_| ConversionError::InvalidAmount(format!("'{}' is not a number", s)))?;

    if !value.is_finite() {
        return Err(ConversionError::non_finite(value));
    }
    Ok(value)
}

/// Parse a quantity like "72.5 °F", "100km", or "-40 C"
pub fn parse_quantity(s: &str) -> Result<(f64, &'static Unit), ConversionError> {
    let s = s.trim();

    let split_pos = number_prefix_len(s);

    if split_pos == 0 {
        return Err(ConversionError::InvalidAmount(format!("no number found in: {}", s)));
    }

    let (num_str, unit_str) = s.split_at(split_pos);
    let unit_str = unit_str.trim();
    if unit_str.is_empty() {
        return Err(ConversionError::UnknownUnit(format!("no unit found in: {}", s)));
    }

    Ok((parse_amount(num_str)?, parse_unit(unit_str)?))
}

/// Parse a full conversion query like "100 km -> mi" or "32 F to C"
pub fn parse_query(s: &str) -> Result<(f64, &'static Unit, &'static Unit), ConversionError> {
    let (quantity, target) = QUERY_SEPARATORS.iter()
        .find_map(|sep| s.rsplit_once(sep))
        .ok_or_else(|| ConversionError::UnknownUnit(
            format!("invalid conversion format: {}, expected '<amount> <unit> -> <unit>'", s.trim())
        ))?;

    let (amount, source) = parse_quantity(quantity)?;
    let target = parse_unit(target)?;
    Ok((amount, source, target))
}

/// Byte length of the leading number, including an exponent like "e-3"
fn number_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_digit() || b == b'.' || b == b',' || (i == 0 && (b == b'-' || b == b'+')) {
            i += 1;
            continue;
        }
        // An exponent needs a digit before it and a digit (after an optional sign) following
        if (b == b'e' || b == b'E') && i > 0 && bytes[i - 1].is_ascii_digit() {
            let mut j = i + 1;
            if matches!(bytes.get(j), Some(b'-' | b'+')) {
                j += 1;
            }
            if bytes.get(j).is_some_and(u8::is_ascii_digit) {
                i = j;
                continue;
            }
        }
        break;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unit() {
        assert_eq!(parse_unit(" km ").unwrap().key, "kilometers");
        assert_eq!(parse_unit("Fahrenheit").unwrap().key, "fahrenheit");
        assert!(matches!(parse_unit("furlong"), Err(ConversionError::UnknownUnit(_))));
    }

    #[test]
    fn test_parse_category() {
        assert_eq!(parse_category("Distance").unwrap(), Category::Length);
        assert!(matches!(parse_category("energy"), Err(ConversionError::UnknownCategory(_))));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("72.5").unwrap(), 72.5);
        assert_eq!(parse_amount(" -40 ").unwrap(), -40.0);
        assert_eq!(parse_amount("2,5").unwrap(), 2.5);
        assert_eq!(parse_amount("1,234.5").unwrap(), 1234.5);
        assert_eq!(parse_amount("1e3").unwrap(), 1000.0);
    }

    #[test]
    fn test_parse_amount_rejects_non_finite() {
        for s in ["NaN", "inf", "-infinity", "1e400"] {
            assert!(matches!(parse_amount(s), Err(ConversionError::InvalidAmount(_))), "{}", s);
        }
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert!(parse_amount("").is_err());
        assert!(parse_amount("twelve").is_err());
        assert!(parse_amount("1,2,3").is_err());
    }

    #[test]
    fn test_parse_quantity() {
        let (value, unit) = parse_quantity("72.5 °F").unwrap();
        assert_eq!(value, 72.5);
        assert_eq!(unit.key, "fahrenheit");

        let (value, unit) = parse_quantity("100km").unwrap();
        assert_eq!(value, 100.0);
        assert_eq!(unit.key, "kilometers");

        let (value, unit) = parse_quantity("-40 C").unwrap();
        assert_eq!(value, -40.0);
        assert_eq!(unit.key, "celsius");

        let (_, unit) = parse_quantity("8 fl oz").unwrap();
        assert_eq!(unit.key, "fluid_ounces");
    }

    #[test]
    fn test_parse_quantity_with_exponent() {
        let (value, unit) = parse_quantity("1e3 km").unwrap();
        assert_eq!(value, 1000.0);
        assert_eq!(unit.key, "kilometers");

        let (value, unit) = parse_quantity("2.5E-3kg").unwrap();
        assert!((value - 0.0025).abs() < 1e-12);
        assert_eq!(unit.key, "kilograms");

        let (_, from, to) = parse_query("1e2 C -> F").unwrap();
        assert_eq!((from.key, to.key), ("celsius", "fahrenheit"));
    }

    #[test]
    fn test_parse_quantity_errors() {
        assert!(matches!(parse_quantity("km"), Err(ConversionError::InvalidAmount(_))));
        assert!(matches!(parse_quantity("12"), Err(ConversionError::UnknownUnit(_))));
    }

    #[test]
    fn test_parse_query() {
        let (amount, from, to) = parse_query("100 km -> mi").unwrap();
        assert_eq!(amount, 100.0);
        assert_eq!(from.key, "kilometers");
        assert_eq!(to.key, "miles");

        let (_, from, to) = parse_query("32 F to C").unwrap();
        assert_eq!((from.key, to.key), ("fahrenheit", "celsius"));

        let (_, from, to) = parse_query("1 kg in lb").unwrap();
        assert_eq!((from.key, to.key), ("kilograms", "pounds"));
    }

    #[test]
    fn test_parse_query_with_inches() {
        let (amount, from, to) = parse_query("12 in in cm").unwrap();
        assert_eq!(amount, 12.0);
        assert_eq!((from.key, to.key), ("inches", "centimeters"));
    }

    #[test]
    fn test_parse_query_without_separator() {
        assert!(parse_query("100 km mi").is_err());
    }
}
