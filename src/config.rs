//! Configuration management and validation.
//!
//! Provides the explicit configuration values handed to the CSV codec: the
//! dialect of the simplified exchange format and the parsing options. Values
//! are built once by the caller and passed into each parse call.

use crate::app::services::csv_codec::Mapper;
use crate::constants::{CSV_DECIMAL_SEPARATOR, CSV_DELIMITER, CSV_ENCODING, CSV_FLAG};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Dialect of the simplified CSV exchange format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvDialect {
    /// Field delimiter byte
    pub delimiter: u8,

    /// End-of-record flag value expected on every data row; the header row
    /// carries the same token between angle brackets. `None` disables the check.
    pub flag: Option<String>,

    /// Skip one extra header line (units/description row)
    pub second_line: bool,

    /// Decimal separator substituted for `.` in numeric fields
    pub decimal_separator: Option<char>,

    /// Text encoding label (WHATWG labels, e.g. "utf-8", "latin1")
    pub encoding: String,
}

impl Default for CsvDialect {
    fn default() -> Self {
        Self {
            delimiter: CSV_DELIMITER,
            flag: Some(CSV_FLAG.to_string()),
            second_line: false,
            decimal_separator: Some(CSV_DECIMAL_SEPARATOR),
            encoding: CSV_ENCODING.to_string(),
        }
    }
}

impl CsvDialect {
    /// Header sentinel matching the row flag, e.g. `<FLG>`
    pub fn header_flag(&self) -> Option<String> {
        self.flag.as_ref().map(|flag| format!("<{flag}>"))
    }

    /// Resolve the configured encoding label
    pub fn resolve_encoding(&self) -> Result<&'static encoding_rs::Encoding> {
        encoding_rs::Encoding::for_label(self.encoding.trim().as_bytes()).ok_or_else(|| {
            Error::invalid_argument(format!("unknown encoding '{}'", self.encoding))
        })
    }
}

/// Options of one CSV parse call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvOptions {
    /// CSV dialect
    pub dialect: CsvDialect,

    /// Merge records describing the same parent entity
    pub merge: bool,

    /// Fail on columns absent from the mapping tables instead of dropping them
    pub strict: bool,

    /// Custom mapping tables replacing the default ones
    #[serde(skip)]
    pub mapper: Option<Mapper>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            dialect: CsvDialect::default(),
            merge: true,
            strict: true,
            mapper: None,
        }
    }
}

impl CsvOptions {
    /// Enable or disable record merging
    pub fn with_merge(mut self, merge: bool) -> Self {
        self.merge = merge;
        self
    }

    /// Enable or disable strict column checking
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set the end-of-record flag (`None` disables it)
    pub fn with_flag(mut self, flag: Option<&str>) -> Self {
        self.dialect.flag = flag.map(str::to_string);
        self
    }

    /// Skip a second header line
    pub fn with_second_line(mut self, second_line: bool) -> Self {
        self.dialect.second_line = second_line;
        self
    }

    /// Set the decimal separator (`None` keeps numeric fields untouched)
    pub fn with_decimal_separator(mut self, separator: Option<char>) -> Self {
        self.dialect.decimal_separator = separator;
        self
    }

    /// Set the text encoding label
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.dialect.encoding = encoding.into();
        self
    }

    /// Use custom mapping tables
    pub fn with_mapper(mut self, mapper: Mapper) -> Self {
        self.mapper = Some(mapper);
        self
    }

    /// Validate option consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(separator) = self.dialect.decimal_separator {
            if separator.is_ascii() && separator as u8 == self.dialect.delimiter {
                return Err(Error::invalid_argument(format!(
                    "decimal separator '{separator}' cannot be the field delimiter"
                )));
            }
        }

        if let Some(flag) = &self.dialect.flag {
            if flag.trim().is_empty() {
                return Err(Error::invalid_argument("flag cannot be empty"));
            }
        }

        self.dialect.resolve_encoding()?;
        debug!("CSV options validated: {:?}", self.dialect);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dialect() {
        let dialect = CsvDialect::default();
        assert_eq!(dialect.delimiter, b';');
        assert_eq!(dialect.header_flag().as_deref(), Some("<FLG>"));
        assert_eq!(dialect.decimal_separator, Some(','));
        assert!(!dialect.second_line);
    }

    #[test]
    fn test_resolve_encoding() {
        let dialect = CsvDialect {
            encoding: "latin1".to_string(),
            ..Default::default()
        };
        assert_eq!(dialect.resolve_encoding().unwrap().name(), "windows-1252");

        let bad = CsvDialect {
            encoding: "klingon".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            bad.resolve_encoding(),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_separator_equal_to_delimiter() {
        let options = CsvOptions::default().with_decimal_separator(Some(';'));
        assert!(options.validate().is_err());

        let options = CsvOptions::default().with_decimal_separator(None);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let options = CsvOptions::default()
            .with_merge(false)
            .with_strict(false)
            .with_flag(None)
            .with_second_line(true);
        assert!(!options.merge);
        assert!(!options.strict);
        assert_eq!(options.dialect.header_flag(), None);
        assert!(options.dialect.second_line);
    }
}
