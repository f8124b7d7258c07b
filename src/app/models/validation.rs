//! Validation functions shared by entity constructors
//!
//! Every function is a pure function of its raw input returning either the
//! validated value or an [`Error::Validation`].

use crate::constants::{DATE_INPUT_FORMATS, DATETIME_INPUT_FORMATS, XML_DATETIME_FORMAT};
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use std::fmt::Display;

/// Validate a hydrometric site code: one uppercase letter then 7 uppercase alphanumerics
pub fn code_sitehydro(code: &str) -> Result<String> {
    hydro_code("site", code, 8)
}

/// Validate a hydrometric station code (10 characters)
pub fn code_station(code: &str) -> Result<String> {
    hydro_code("station", code, 10)
}

/// Validate a sensor code (12 characters)
pub fn code_capteur(code: &str) -> Result<String> {
    hydro_code("capteur", code, 12)
}

fn hydro_code(entity: &str, code: &str, length: usize) -> Result<String> {
    let code = code.trim();
    let mut chars = code.chars();
    let first_ok = chars.next().is_some_and(|c| c.is_ascii_uppercase());
    let rest_ok = chars.all(|c| c.is_ascii_digit() || c.is_ascii_uppercase());

    if code.chars().count() != length || !first_ok || !rest_ok {
        return Err(Error::validation(format!(
            "invalid {entity} code '{code}': \
             expected an uppercase letter followed by {} uppercase alphanumerics",
            length - 1
        )));
    }
    Ok(code.to_string())
}

/// Validate a meteorological site code (9 digits)
pub fn code_sitemeteo(code: &str) -> Result<String> {
    let code = code.trim();
    if code.len() != 9 || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::validation(format!(
            "invalid meteo site code '{code}': expected 9 digits"
        )));
    }
    Ok(code.to_string())
}

/// Validate a non-empty identifier or label
pub fn not_empty(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::validation(format!("{field} cannot be empty")));
    }
    Ok(value.to_string())
}

/// Validate that a value belongs to a code list
pub fn one_of<T: PartialEq + Display + Copy>(field: &str, value: T, allowed: &[T]) -> Result<T> {
    if allowed.contains(&value) {
        Ok(value)
    } else {
        let allowed: Vec<String> = allowed.iter().map(ToString::to_string).collect();
        Err(Error::validation(format!(
            "invalid {field} '{value}': expected one of {}",
            allowed.join(", ")
        )))
    }
}

/// Validate that a textual code belongs to a code list, returning an owned copy
pub fn code_in(field: &str, value: &str, allowed: &[&str]) -> Result<String> {
    let value = value.trim();
    one_of(field, value, allowed).map(str::to_string)
}

/// Validate an inclusive numeric range
pub fn in_range<T: PartialOrd + Display + Copy>(
    field: &str,
    value: T,
    min: T,
    max: T,
) -> Result<T> {
    if value < min || value > max {
        return Err(Error::validation(format!(
            "invalid {field} {value}: must be between {min} and {max}"
        )));
    }
    Ok(value)
}

/// Validate that a float is finite
pub fn finite(field: &str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(Error::validation(format!("{field} must be a finite number")));
    }
    Ok(value)
}

/// Validate that an optional period is ordered
pub fn period(
    field: &str,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
) -> Result<()> {
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(Error::validation(format!(
                "{field}: start {start} is after end {end}"
            )));
        }
    }
    Ok(())
}

// =============================================================================
// Date/time handling
// =============================================================================

/// Datetime input accepted by constructors: text, epoch seconds or a value
#[derive(Debug, Clone, PartialEq)]
pub enum DateTimeInput {
    Text(String),
    Epoch(i64),
    Value(NaiveDateTime),
}

impl DateTimeInput {
    /// Normalize to the canonical datetime type
    pub fn resolve(&self) -> Result<NaiveDateTime> {
        match self {
            Self::Text(text) => parse_datetime(text),
            Self::Epoch(seconds) => DateTime::from_timestamp(*seconds, 0)
                .map(|dt| dt.naive_utc())
                .ok_or_else(|| Error::validation(format!("epoch {seconds} out of range"))),
            Self::Value(value) => Ok(*value),
        }
    }
}

impl From<&str> for DateTimeInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for DateTimeInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<i64> for DateTimeInput {
    fn from(seconds: i64) -> Self {
        Self::Epoch(seconds)
    }
}

impl From<NaiveDateTime> for DateTimeInput {
    fn from(value: NaiveDateTime) -> Self {
        Self::Value(value)
    }
}

impl From<DateTime<Utc>> for DateTimeInput {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Value(value.naive_utc())
    }
}

/// Parse an ISO-8601-like datetime (`T` or space separator, optional seconds,
/// date-only or RFC 3339 with offset)
pub fn parse_datetime(text: &str) -> Result<NaiveDateTime> {
    let text = text.trim();

    for format in DATETIME_INPUT_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(dt);
        }
    }

    for format in DATE_INPUT_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            if let Some(dt) = date.and_hms_opt(0, 0, 0) {
                return Ok(dt);
            }
        }
    }

    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.naive_local())
        .map_err(|e| Error::datetime_parsing(format!("invalid datetime '{text}'"), e))
}

/// Format a datetime the way SANDRE XML expects it
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(XML_DATETIME_FORMAT).to_string()
}

/// Current UTC time truncated to the second
pub fn now() -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    now.with_nanosecond(0).unwrap_or(now)
}
