//! Field normalization: headers, invoice identifiers, amounts and dates.
//!
//! Everything here is pure and infallible at the public surface. Amounts that cannot be read
//! become `0.0` and dates become `None`; the loader then drops rows whose amount is not
//! strictly positive. Callers that want to know *why* a value was rejected can use the
//! `try_*` variants, which return a [`ParseFailure`] instead of the silent default.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;

use crate::types::Cell;

/// Currency symbols stripped from amount text before parsing.
pub const CURRENCY_SYMBOLS: &[char] = &['$', '₱', '₹', '₩', '₪', '€', '¥'];

/// Spreadsheet day-serial epoch (serial `1` is `1899-12-31`, i.e. the 1900 leap-year quirk
/// is already folded in).
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Largest day offset accepted from a serial before the date is considered out of range.
const MAX_SERIAL_DAYS: f64 = 100_000_000.0;

/// Layouts carrying a UTC offset; the date is taken after conversion to UTC.
const ZONED_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%a %b %d %Y %H:%M:%S GMT%z",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%a %b %d %Y %H:%M:%S",
];

/// `%b` and `%a` also accept full month and weekday names when parsing.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%d %b %Y",
    "%d %B %Y",
    "%d-%b-%Y",
    "%a %b %d %Y",
    "%a, %b %d, %Y",
    "%a, %d %b %Y",
    "%a %d %b %Y",
];

/// Why a value was rejected by a strict parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    /// Empty cell, empty text, `0` or `false`.
    #[error("value is empty")]
    Empty,
    /// Text that does not start with a number after cleanup.
    #[error("not a number: '{raw}'")]
    NotNumeric { raw: String },
    /// Neither a usable day serial nor a recognizable calendar date.
    #[error("not a date: '{raw}'")]
    NotADate { raw: String },
}

/// Normalize a header cell for comparison. Never used for display.
pub fn normalize_header(cell: &Cell) -> String {
    if cell.is_blank() {
        return String::new();
    }
    normalize_header_str(&cell.to_text())
}

/// Lowercase, trim, and keep only ASCII letters and digits.
///
/// `"Order No."`, `"order_no"` and `"ORDER-NO"` all become `"orderno"`.
pub fn normalize_header_str(text: &str) -> String {
    text.to_lowercase()
        .trim()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Normalize an invoice/order identifier: text coercion, trim, uppercase.
///
/// Blank input yields an empty string, which the loader treats as invalid.
pub fn normalize_invoice(cell: &Cell) -> String {
    if cell.is_blank() {
        return String::new();
    }
    cell.to_text().trim().to_uppercase()
}

/// Parse an amount cell, defaulting to `0.0` when it cannot be read.
pub fn parse_numeric_value(cell: &Cell) -> f64 {
    try_parse_numeric_value(cell).unwrap_or(0.0)
}

/// Strict form of [`parse_numeric_value`].
///
/// Numeric cells pass through untouched. For text, currency symbols and whitespace are
/// removed, then the *last* `.` or `,` is taken as the decimal point and every earlier
/// separator is dropped as a thousands grouping. That reads both `1.234,56` and `1,234.56` as
/// `1234.56`, and reads `1,234` as `1.234`. The cleaned text is parsed as a leading number, so
/// trailing garbage is ignored and leading garbage rejects the value.
pub fn try_parse_numeric_value(cell: &Cell) -> Result<f64, ParseFailure> {
    let raw = match cell {
        Cell::Number(n) => return Ok(*n),
        Cell::Empty => return Err(ParseFailure::Empty),
        Cell::Text(s) if s.is_empty() => return Err(ParseFailure::Empty),
        Cell::Text(s) => s.as_str(),
        Cell::Bool(b) => {
            return Err(ParseFailure::NotNumeric {
                raw: b.to_string(),
            });
        }
    };

    let stripped: String = raw
        .trim()
        .chars()
        .filter(|c| !CURRENCY_SYMBOLS.contains(c) && !c.is_whitespace())
        .collect();

    let canonical = match stripped.rfind(|c: char| c == '.' || c == ',') {
        Some(last) => {
            let (before, after) = (&stripped[..last], &stripped[last + 1..]);
            let integral: String = before.chars().filter(|c| *c != '.' && *c != ',').collect();
            format!("{integral}.{after}")
        }
        None => stripped,
    };

    parse_float_prefix(&canonical).ok_or_else(|| ParseFailure::NotNumeric {
        raw: raw.to_string(),
    })
}

/// Parse the longest leading decimal literal (`[+-]digits[.digits][e[+-]digits]`).
fn parse_float_prefix(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Parse a date cell into an ISO `YYYY-MM-DD` string, or `None`.
pub fn parse_date(cell: &Cell) -> Option<String> {
    try_parse_date(cell).ok()
}

/// Strict form of [`parse_date`].
///
/// Numbers are spreadsheet day serials counted from `1899-12-30`; any time-of-day fraction is
/// dropped. Text is tried as RFC 3339 or RFC 2822 (normalized to UTC), then a list of common
/// date-time and date layouts. Slash dates are month-first. A bare year (`2024`) or year-month
/// (`2024-03`) means the first day of that period.
pub fn try_parse_date(cell: &Cell) -> Result<String, ParseFailure> {
    if cell.is_blank() {
        return Err(ParseFailure::Empty);
    }

    let date = match cell {
        Cell::Number(serial) => serial_to_date(*serial),
        Cell::Text(s) => parse_date_text(s.trim()),
        _ => None,
    };

    date.filter(|d| (0..=9999).contains(&d.year()))
        .map(|d| d.format("%Y-%m-%d").to_string())
        .ok_or_else(|| ParseFailure::NotADate {
            raw: cell.to_text(),
        })
}

/// Convert a spreadsheet day serial to a calendar date.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial.abs() > MAX_SERIAL_DAYS {
        return None;
    }
    let (y, m, d) = SERIAL_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(y, m, d)?;
    let days = serial.floor() as i64;
    if days >= 0 {
        epoch.checked_add_days(Days::new(days as u64))
    } else {
        epoch.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}

fn parse_date_text(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    if let Some(d) = parse_partial_date(s) {
        return Some(d);
    }
    // `Tue Mar 05 2024 10:00:00 GMT+0700 (Western Indonesia Time)`
    let s = s.split(" (").next().unwrap_or(s).trim_end();
    let zoned = DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_rfc2822(s))
        .ok()
        .or_else(|| {
            ZONED_FORMATS
                .iter()
                .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
        });
    if let Some(dt) = zoned {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// `YYYY` or `YYYY-MM`, resolved to the first day of the period.
fn parse_partial_date(s: &str) -> Option<NaiveDate> {
    let (year, month) = match s.split_once('-') {
        Some((y, m)) if m.len() == 2 && m.bytes().all(|b| b.is_ascii_digit()) => (y, m.parse().ok()?),
        Some(_) => return None,
        None => (s, 1),
    };
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month, 1)
}
