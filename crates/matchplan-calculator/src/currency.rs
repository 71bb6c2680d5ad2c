//! Currency normalization between user-entered text and integer cents.
//!
//! Parsing is lenient: text that does not start with a number normalizes to zero
//! cents instead of failing. The engine never sees the text, only the cents.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::str::FromStr;

const GROUPING_SEPARATOR: char = ',';

/// Parses a decimal-dollar string such as `"24,500.00"` into cents.
///
/// Grouping separators are stripped and the longest numeric prefix is used, so
/// `"12.50 per week"` is 1250 cents. Fractions of a cent round to the nearest cent with
/// halves rounding up. Empty, non-numeric or out-of-range text yields 0.
pub fn parse_cents(text: &str) -> i64 {
    let cleaned: String = text.chars().filter(|&c| c != GROUPING_SEPARATOR).collect();
    numeric_prefix(cleaned.trim_start())
        .and_then(|prefix| to_cents(&prefix))
        .unwrap_or(0)
}

/// Formats cents as dollars with two decimals and grouping separators, e.g. `"24,500.00"`.
pub fn format_cents(cents: i64) -> String {
    let magnitude = cents.unsigned_abs();
    let dollars = (magnitude / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, digit) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(GROUPING_SEPARATOR);
        }
        grouped.push(digit);
    }

    let sign = if cents < 0 { "-" } else { "" };
    format!("{sign}{grouped}.{:02}", magnitude % 100)
}

/// Formats an optional cent value; a missing value formats as an empty string.
pub fn format_optional_cents(cents: Option<i64>) -> String {
    cents.map(format_cents).unwrap_or_default()
}

/// Normalizes user-entered text to its canonical display form, e.g. `"1234.5"` to
/// `"1,234.50"`.
pub fn normalize(text: &str) -> String {
    format_cents(parse_cents(text))
}

/// The longest leading number in `text`, rewritten in a form [`Decimal`] accepts:
/// `".5"` becomes `"0.5"`, `"5."` becomes `"5"` and a dangling exponent marker is
/// dropped.
fn numeric_prefix(text: &str) -> Option<String> {
    let mut chars = text.chars().peekable();
    let mut number = String::new();

    match chars.peek() {
        Some('-') => {
            number.push('-');
            chars.next();
        }
        Some('+') => {
            chars.next();
        }
        _ => {}
    }

    let mut integer = String::new();
    while let Some(digit) = chars.next_if(char::is_ascii_digit) {
        integer.push(digit);
    }

    let mut fraction = String::new();
    if chars.next_if_eq(&'.').is_some() {
        while let Some(digit) = chars.next_if(char::is_ascii_digit) {
            fraction.push(digit);
        }
    }

    if integer.is_empty() && fraction.is_empty() {
        return None;
    }

    number.push_str(if integer.is_empty() { "0" } else { &integer });
    if !fraction.is_empty() {
        number.push('.');
        number.push_str(&fraction);
    }

    // An exponent only counts when at least one digit follows the marker.
    if chars.next_if(|&c| c == 'e' || c == 'E').is_some() {
        let negative = match chars.peek() {
            Some('-') => {
                chars.next();
                true
            }
            Some('+') => {
                chars.next();
                false
            }
            _ => false,
        };

        let exponent: String =
            std::iter::from_fn(|| chars.next_if(char::is_ascii_digit)).collect();
        if !exponent.is_empty() {
            number.push('e');
            if negative {
                number.push('-');
            }
            number.push_str(&exponent);
        }
    }

    Some(number)
}

fn to_cents(number: &str) -> Option<i64> {
    let dollars = if number.contains('e') {
        Decimal::from_scientific(number)
    } else {
        Decimal::from_str(number)
    }
    .ok()?;

    // floor(cents + 1/2) sends half a cent toward positive infinity.
    dollars
        .checked_mul(Decimal::ONE_HUNDRED)?
        .checked_add(Decimal::new(5, 1))?
        .floor()
        .to_i64()
}
