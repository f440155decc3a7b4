use once_cell::sync::Lazy;
use regex::Regex;

use crate::process::raw_table::Cell;

/// `1.234,56`, `-42`, `0,25`: `.` groups thousands, `,` marks the decimals.
static LOCALE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(\d{1,3}(\.\d{3})+|\d+)(,\d+)?$").unwrap());

/// True when `s` is written in the `.`-thousands / `,`-decimal convention.
pub fn looks_like_locale_number(s: &str) -> bool {
    LOCALE_NUMBER.is_match(s.trim())
}

/// Parse a `.`-thousands / `,`-decimal string.
///
/// Every `.` is removed and every `,` becomes the decimal point before parsing, so
/// `"1.234,56"` → `1234.56` and `"42"` → `42.0`. Anything that still fails to parse
/// (or parses to NaN) is `None`.
pub fn parse_locale_str(s: &str) -> Option<f64> {
    let cleaned = s.trim().replace('.', "").replace(',', ".");
    cleaned.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Coerce a loaded cell to a float, `None` being the missing marker.
pub fn parse_locale_number(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(v) if v.is_nan() => None,
        Cell::Number(v) => Some(*v),
        Cell::Text(s) => parse_locale_str(s),
        Cell::Missing => None,
    }
}
