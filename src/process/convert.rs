// src/process/convert.rs

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use crate::error::{Convention, FormatError};

/// Optional minus, digits, at most one decimal point, at least one digit.
static DECIMAL_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?(?:\d+(?:\.\d*)?|\.\d+)$").expect("decimal literal regex"));

const MILLION: i64 = 1_000_000;
const BILLION: i64 = 1_000_000_000;

/// `"1.5m"` → 1500000, `"2B"` → 2000000000.
pub fn decode_magnitude(text: &str) -> Result<Decimal, FormatError> {
    let err = |reason| FormatError::new(Convention::Magnitude, text, reason);

    let suffix = text.chars().last().ok_or_else(|| err("empty value"))?;
    let scale = match suffix.to_ascii_lowercase() {
        'm' => MILLION,
        'b' => BILLION,
        _ => return Err(err("missing m/b suffix")),
    };
    let prefix = &text[..text.len() - suffix.len_utf8()];

    let value = parse_literal(prefix).ok_or_else(|| err("not a decimal number"))?;
    value
        .checked_mul(Decimal::from(scale))
        .ok_or_else(|| err("out of range"))
}

/// `"45%"` → 0.45. No range check.
pub fn decode_percentage(text: &str) -> Result<Decimal, FormatError> {
    let err = |reason| FormatError::new(Convention::Percentage, text, reason);

    let prefix = text.strip_suffix('%').ok_or_else(|| err("missing % suffix"))?;
    let value = parse_literal(prefix).ok_or_else(|| err("not a decimal number"))?;
    value
        .checked_div(Decimal::ONE_HUNDRED)
        .ok_or_else(|| err("out of range"))
}

/// Exact parse of a plain decimal literal; surrounding whitespace is ignored.
fn parse_literal(raw: &str) -> Option<Decimal> {
    let s = raw.trim();
    if !DECIMAL_LITERAL.is_match(s) {
        return None;
    }

    // normalise "-.5" / "3." into forms every decimal parser accepts
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s),
    };
    let digits = digits.strip_suffix('.').unwrap_or(digits);
    let normalised = if digits.starts_with('.') {
        format!("{}0{}", sign, digits)
    } else {
        format!("{}{}", sign, digits)
    };

    Decimal::from_str_exact(&normalised).ok()
}
