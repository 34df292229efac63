//! Number and date parsing for export fields.
//!
//! Amounts follow the en_US convention (`,` groups thousands, `.` separates
//! decimals) and are parsed strictly: a value that only partially matches the
//! convention is rejected instead of being truncated.

use crate::error::{ConverterError, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

static AMOUNT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:[1-9]\d{0,2}(?:,\d{3})+|\d+)(?:\.\d+)?$").expect("amount pattern is valid")
});

/// Parse a decimal amount written with en_US separators
pub fn parse_amount(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    if !AMOUNT_PATTERN.is_match(trimmed) {
        return Err(ConverterError::InvalidNumber {
            value: text.to_string(),
        });
    }

    trimmed
        .replace(',', "")
        .parse::<f64>()
        .map_err(|_| ConverterError::InvalidNumber {
            value: text.to_string(),
        })
}

/// Parse an amount that may be left blank, treating blank as zero
pub fn parse_optional_amount(text: &str) -> Result<f64> {
    if text.is_empty() {
        Ok(0.0)
    } else {
        parse_amount(text)
    }
}

/// Parse a date in the given `chrono` format
///
/// The text must be exactly what the format produces for the parsed date, so
/// short years (`05-03-24` for `%d-%m-%Y`) and unpadded fields are rejected.
pub fn parse_date(text: &str, format: &str) -> Result<NaiveDate> {
    let invalid = |source| ConverterError::InvalidDate {
        value: text.to_string(),
        format: format.to_string(),
        source,
    };

    let date = NaiveDate::parse_from_str(text, format).map_err(|source| invalid(Some(source)))?;
    if date.format(format).to_string() != text {
        return Err(invalid(None));
    }
    Ok(date)
}
