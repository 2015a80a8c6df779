//! Part-number patterns
//!
//! DSS part numbers are a 3-digit class (first digit 1 or 2), one letter
//! code, four digits and an optional dash number: `123F4567-100`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches a DSS part number anywhere in the string.
pub static DSS_PART_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[12][0-9]{2}[FQNGEXT][0-9]{4}").expect("Invalid regex pattern for DSS part number")
});

/// Captures the drawing-number prefix of a leading DSS part number.
static DSS_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([12][0-9]{2}[FQNGEXT][0-9]{4})").expect("Invalid regex pattern for DSS prefix")
});

/// Captures a leading DSS part number up to and including its dash number.
static DSS_DASH_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([12][0-9]{2}[FQNGEXT][0-9]{4}-[0-9]*)")
        .expect("Invalid regex pattern for DSS dash number")
});

/// Matches the "-1" variant: dash one at the end, or followed by an underscore.
static DSS_DASH_ONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[12][0-9]{2}[FQNGEXT][0-9]{4}(-1$|-1_)")
        .expect("Invalid regex pattern for DSS dash-1")
});

/// True when the value contains a DSS part number.
pub fn is_dss(part_number: &str) -> bool {
    DSS_PART_NUMBER.is_match(part_number)
}

/// True when the value is a dash-1 DSS part number.
pub fn is_dash_one(part_number: &str) -> bool {
    DSS_DASH_ONE.is_match(part_number)
}

/// Drawing number (class + letter + digits) for values that start with a DSS part number.
pub fn drawing_number(part_number: &str) -> Option<&str> {
    DSS_PREFIX
        .captures(part_number)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Drops free text that follows a DSS dash number (`123F4567-100-DEPLOYED` -> `123F4567-100`).
///
/// Values that do not start with a dashed DSS part number are returned unchanged.
pub fn trim_after_dash_number(part_number: &str) -> &str {
    match DSS_DASH_NUMBER.captures(part_number).and_then(|c| c.get(1)) {
        Some(m) => m.as_str(),
        None => part_number,
    }
}
