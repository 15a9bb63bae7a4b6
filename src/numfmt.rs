//! Number and date display heuristics.
//!
//! Number format codes are not parsed in full. A format only matters when it
//! contains one of the fixed-decimal markers (`0.00`, `#.##`, `0.0`); the
//! decimal count then comes from the first run of zeros after a dot, or from
//! the configured default when the code has no such run (e.g. `#.##`).
//! Everything else falls back to the value's natural representation.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDateTime};
use regex::Regex;

/// Substrings that switch a format code to fixed-decimal output.
pub const FIXED_DECIMAL_MARKERS: [&str; 3] = ["0.00", "#.##", "0.0"];

/// Shown for NaN and infinities.
pub const NUM_ERROR: &str = "#NUM!";

fn decimal_run_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\.0+").ok()).as_ref()
}

/// Whether a format code requests a fixed number of decimals.
pub fn has_fixed_decimals(format_code: &str) -> bool {
    FIXED_DECIMAL_MARKERS
        .iter()
        .any(|marker| format_code.contains(marker))
}

/// Decimal places requested by a format code, or `None` when it requests none.
pub fn decimal_places(format_code: &str, default_decimals: usize) -> Option<usize> {
    if !has_fixed_decimals(format_code) {
        return None;
    }
    let places = decimal_run_pattern()
        .and_then(|re| re.find(format_code))
        .map_or(default_decimals, |m| m.as_str().len() - 1);
    Some(places)
}

/// Format a number for display according to the narrow format heuristic.
pub fn format_number(value: f64, format_code: &str, default_decimals: usize) -> String {
    if !value.is_finite() {
        return NUM_ERROR.to_string();
    }
    match decimal_places(format_code, default_decimals) {
        Some(places) => format!("{value:.places$}"),
        None => format_natural(value),
    }
}

/// Integer text for integral values, shortest round-trip text otherwise.
pub fn format_natural(value: f64) -> String {
    if !value.is_finite() {
        return NUM_ERROR.to_string();
    }
    if value == 0.0 {
        // Avoid "-0"
        return "0".to_string();
    }
    // f64 Display never uses exponent notation and drops ".0" on integral values
    format!("{value}")
}

/// Render an ISO 8601 timestamp as a short US date (`M/D/YYYY`, UTC).
///
/// Returns the input unchanged when it cannot be parsed.
pub fn format_iso_date(iso: &str) -> String {
    let trimmed = iso.trim();
    let parsed = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.3fZ")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.naive_utc())
        });
    match parsed {
        Some(dt) => dt.format("%-m/%-d/%Y").to_string(),
        None => iso.to_string(),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("0.00", Some(2))]
    #[test_case("#,##0.000", Some(3))]
    #[test_case("0.0", Some(1))]
    #[test_case("0.0%", Some(1))]
    #[test_case("#.##", Some(2) ; "no zero run uses default")]
    #[test_case("$#,##0.00_);($#,##0.00)", Some(2))]
    #[test_case("General", None)]
    #[test_case("0", None)]
    #[test_case("", None)]
    fn test_decimal_places(format: &str, expected: Option<usize>) {
        assert_eq!(decimal_places(format, 2), expected);
    }

    #[test]
    #[allow(clippy::approx_constant)]
    fn test_fixed_decimals() {
        assert_eq!(format_number(700.0, "0.00", 2), "700.00");
        assert_eq!(format_number(3.14159, "0.000", 2), "3.142");
        assert_eq!(format_number(1.5, "#.##", 4), "1.5000");
    }

    #[test]
    fn test_long_zero_run_is_not_capped() {
        let format = format!("0.{}", "0".repeat(25));
        assert_eq!(decimal_places(&format, 2), Some(25));
        assert_eq!(format_number(0.5, &format, 2), format!("0.5{}", "0".repeat(24)));
    }

    #[test]
    fn test_natural_representation() {
        assert_eq!(format_number(700.0, "", 2), "700");
        assert_eq!(format_number(3.5, "", 2), "3.5");
        assert_eq!(format_number(-12.0, "General", 2), "-12");
        assert_eq!(format_number(-0.0, "", 2), "0");
        assert_eq!(format_number(0.1 + 0.2, "", 2), "0.30000000000000004");
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(format_number(f64::NAN, "0.00", 2), NUM_ERROR);
        assert_eq!(format_number(f64::INFINITY, "", 2), NUM_ERROR);
    }

    #[test]
    fn test_iso_dates() {
        assert_eq!(format_iso_date("2024-03-05T00:00:00.000Z"), "3/5/2024");
        assert_eq!(format_iso_date("1999-12-31T23:59:59.999Z"), "12/31/1999");
        assert_eq!(format_iso_date("2024-03-05T10:00:00+00:00"), "3/5/2024");
        assert_eq!(format_iso_date("not a date"), "not a date");
        assert_eq!(format_iso_date("2024-13-40T00:00:00.000Z"), "2024-13-40T00:00:00.000Z");
    }
}
