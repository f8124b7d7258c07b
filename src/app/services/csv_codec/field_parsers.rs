//! Field parsing utilities for CSV rows
//!
//! This module turns the raw `(header, value)` pairs of one row into the
//! attribute bag of one entity kind, applying date normalization and decimal
//! separator substitution, and provides typed accessors with validation.

use super::mapper::{EntityKind, FieldMap};
use crate::app::models::validation::parse_datetime;
use crate::{Error, Result};
use chrono::NaiveDateTime;
use regex::Regex;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::LazyLock;

/// `DD/MM/YYYY` followed by an optional time part
static FRENCH_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2})/(\d{2})/(\d{4})(\s+\d{2}:\d{2}(:\d{2})?)?$").expect("valid date regex")
});

/// Rewrite `DD/MM/YYYY hh:mm:ss` to `YYYY-MM-DD hh:mm:ss`
///
/// Values without `/` pass through unchanged; other values containing `/`
/// are malformed.
pub fn normalize_date(value: &str) -> std::result::Result<String, String> {
    if !value.contains('/') {
        return Ok(value.to_string());
    }
    match FRENCH_DATE.captures(value) {
        Some(caps) => Ok(format!(
            "{}-{}-{}{}",
            &caps[3],
            &caps[2],
            &caps[1],
            caps.get(4).map_or("", |m| m.as_str())
        )),
        None => Err(format!("malformed date '{value}'")),
    }
}

/// Replace the configured decimal separator by `.`
pub fn substitute_decimal(value: &str, separator: Option<char>) -> String {
    match separator {
        Some(separator) if separator != '.' => value.replace(separator, "."),
        _ => value.to_string(),
    }
}

/// Non-empty attribute values of one entity kind extracted from a row
#[derive(Debug, Clone)]
pub struct Attrs {
    kind: EntityKind,
    values: BTreeMap<String, Vec<String>>,
}

impl Attrs {
    /// Extract the attributes mapped by `table` from the row pairs
    pub fn extract(
        kind: EntityKind,
        table: &FieldMap,
        row: &[(&str, &str)],
        decimal_separator: Option<char>,
        line: u64,
    ) -> Result<Self> {
        let mut values: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for (field, raw) in row {
            let Some(Some(attr)) = table.get(*field) else {
                continue;
            };
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }

            let value = if kind.date_fields().contains(&attr.as_str()) {
                normalize_date(raw)
                    .map_err(|message| Error::format_at_line(line, format!("{field}: {message}")))?
            } else if kind.decimal_fields().contains(&attr.as_str()) {
                substitute_decimal(raw, decimal_separator)
            } else {
                raw.to_string()
            };

            values.entry(attr.clone()).or_default().push(value);
        }

        Ok(Self { kind, values })
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn label(&self) -> &'static str {
        self.kind.key()
    }

    /// First value of an attribute
    pub fn text(&self, attr: &str) -> Option<&str> {
        self.values
            .get(attr)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values of a multi-valued attribute
    pub fn texts(&self, attr: &str) -> Vec<String> {
        self.values.get(attr).cloned().unwrap_or_default()
    }

    pub fn owned(&self, attr: &str) -> Option<String> {
        self.text(attr).map(str::to_string)
    }

    pub fn required(&self, attr: &str) -> Result<&str> {
        self.text(attr)
            .ok_or_else(|| Error::validation(format!("missing {} {attr}", self.label())))
    }

    /// Parse an attribute with `FromStr` (integers, floats)
    pub fn parsed<T: FromStr>(&self, attr: &str) -> Result<Option<T>> {
        match self.text(attr) {
            None => Ok(None),
            Some(value) => value.parse::<T>().map(Some).map_err(|_| {
                Error::validation(format!(
                    "invalid {} {attr} '{value}'",
                    self.label()
                ))
            }),
        }
    }

    pub fn required_parsed<T: FromStr>(&self, attr: &str) -> Result<T> {
        self.parsed(attr)?
            .ok_or_else(|| Error::validation(format!("missing {} {attr}", self.label())))
    }

    pub fn datetime(&self, attr: &str) -> Result<Option<NaiveDateTime>> {
        self.text(attr).map(parse_datetime).transpose()
    }

    pub fn required_datetime(&self, attr: &str) -> Result<NaiveDateTime> {
        self.datetime(attr)?
            .ok_or_else(|| Error::validation(format!("missing {} {attr}", self.label())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_date() {
        assert_eq!(
            normalize_date("26/02/2010 12:53:10").unwrap(),
            "2010-02-26 12:53:10"
        );
        assert_eq!(normalize_date("26/02/2010").unwrap(), "2010-02-26");
        assert_eq!(
            normalize_date("2010-02-26 12:53:10").unwrap(),
            "2010-02-26 12:53:10"
        );
        assert!(normalize_date("2010/02/26").is_err());
        assert!(normalize_date("26/02/10 12:00").is_err());
    }

    #[test]
    fn test_substitute_decimal() {
        assert_eq!(substitute_decimal("55,8", Some(',')), "55.8");
        assert_eq!(substitute_decimal("55.8", None), "55.8");
        assert_eq!(substitute_decimal("55.8", Some(',')), "55.8");
    }

    #[test]
    fn test_extract_skips_unsupported_and_empty() {
        let table: FieldMap = [
            ("<DtObsHydro>".to_string(), Some("dte".to_string())),
            ("<ResObsHydro>".to_string(), Some("res".to_string())),
            ("<QualObsHydro>".to_string(), None),
            ("<MethObsHydro>".to_string(), Some("mth".to_string())),
        ]
        .into_iter()
        .collect();
        let row = [
            ("<DtObsHydro>", "26/02/2010 12:53:10"),
            ("<ResObsHydro>", "55,8"),
            ("<QualObsHydro>", "16"),
            ("<MethObsHydro>", " "),
        ];

        let attrs =
            Attrs::extract(EntityKind::ObservationHydro, &table, &row, Some(','), 3).unwrap();
        assert_eq!(attrs.text("dte"), Some("2010-02-26 12:53:10"));
        assert_eq!(attrs.parsed::<f64>("res").unwrap(), Some(55.8));
        assert_eq!(attrs.text("qal"), None);
        assert_eq!(attrs.text("mth"), None);
    }

    #[test]
    fn test_extract_malformed_date_names_line() {
        let table: FieldMap = [("<DtObsHydro>".to_string(), Some("dte".to_string()))]
            .into_iter()
            .collect();
        let row = [("<DtObsHydro>", "26/2/2010")];
        let err = Attrs::extract(EntityKind::ObservationHydro, &table, &row, None, 7).unwrap_err();
        assert!(matches!(err, Error::Format { ref location, .. } if location == "line 7"));
    }
}
