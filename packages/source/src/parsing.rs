//! Field parsing helpers for raw dataset cells.
//!
//! Source files store integers inconsistently (`"7"` vs `"7.0"`) and leave
//! casualty and coordinate cells blank when unknown, so every numeric field
//! goes through one of these helpers.

/// Parses an integer cell. Accepts plain integers and floats with no
/// fractional part (`"1985.0"`). Returns `None` for blank or invalid cells.
#[must_use]
pub fn parse_integer(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(value) = s.parse::<i64>() {
        return Some(value);
    }
    let value = s.parse::<f64>().ok()?;
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let value = value as i64;
    Some(value)
}

/// Parses a casualty count. Blank cells are `0`; fractional values are
/// truncated toward zero. Returns `None` for negative, non-numeric, or
/// out-of-range values.
#[must_use]
pub fn parse_count(s: &str) -> Option<u32> {
    let s = s.trim();
    if s.is_empty() {
        return Some(0);
    }
    let value = s.parse::<f64>().ok()?;
    if value.is_nan() {
        return Some(0);
    }
    if !value.is_finite() || value < 0.0 || value > f64::from(u32::MAX) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = value.trunc() as u32;
    Some(count)
}

/// Parses an optional coordinate. Blank and `NaN` cells are `Ok(None)`.
///
/// # Errors
///
/// Returns the float parse error for non-blank, non-numeric cells.
pub fn parse_coordinate(s: &str) -> Result<Option<f64>, std::num::ParseFloatError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    let value = s.parse::<f64>()?;
    Ok(Some(value).filter(|v| !v.is_nan()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_float_integers() {
        assert_eq!(parse_integer("197000000001"), Some(197_000_000_001));
        assert_eq!(parse_integer(" 7 "), Some(7));
        assert_eq!(parse_integer("7.0"), Some(7));
    }

    #[test]
    fn rejects_fractional_and_blank_integers() {
        assert_eq!(parse_integer("7.5"), None);
        assert_eq!(parse_integer(""), None);
        assert_eq!(parse_integer("July"), None);
    }

    #[test]
    fn blank_count_is_zero() {
        assert_eq!(parse_count(""), Some(0));
        assert_eq!(parse_count("   "), Some(0));
    }

    #[test]
    fn fractional_count_truncates() {
        assert_eq!(parse_count("2.9"), Some(2));
        assert_eq!(parse_count("0.5"), Some(0));
        assert_eq!(parse_count("1383"), Some(1383));
    }

    #[test]
    fn rejects_negative_and_garbage_counts() {
        assert_eq!(parse_count("-1"), None);
        assert_eq!(parse_count("many"), None);
        assert_eq!(parse_count("inf"), None);
    }

    #[test]
    fn parses_coordinates() {
        let lon = parse_coordinate("-74.0059").unwrap().unwrap();
        assert!((lon - -74.0059).abs() < f64::EPSILON);
        assert_eq!(parse_coordinate("").unwrap(), None);
        assert_eq!(parse_coordinate("NaN").unwrap(), None);
        assert!(parse_coordinate("north").is_err());
    }
}
