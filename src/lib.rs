//! Hydrometrie Library
//!
//! A Rust library for exchanging hydrometric data following the French SANDRE
//! "Hydrometrie" standard.
//!
//! This library provides tools for:
//! - An object model for sites, stations, sensors, series, thresholds, events,
//!   simulations, rating curves, gaugings and contacts
//! - Reading the simplified CSV exchange format, with record merging by identity
//! - Reading and writing SANDRE Hydrometrie v1.1 XML messages
//! - A message facade bundling a scenario header with entity collections

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod csv_codec;
        pub mod message;
        pub mod xml_codec;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{Scenario, Sitehydro, Sitemeteo};
pub use app::services::message::{Collection, Message};
pub use config::{CsvDialect, CsvOptions};

/// Result type alias for hydrometrie operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for conversion and model operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Caller passed a structurally wrong parameter
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Serialized input violates the expected dialect
    #[error("Format error at {location}: {message}")]
    Format {
        location: String,
        message: String,
        #[source]
        source: Option<Box<Error>>,
    },

    /// Domain value rejected by an entity constructor
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Entity is not of the kind required at this place
    #[error("Wrong entity kind: expected {expected}, found {found}")]
    EntityKind { expected: String, found: String },

    /// Destination file already exists
    #[error("File already exists: {path} (use force to overwrite)")]
    IoConflict { path: String },

    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV reading error
    #[error("CSV error: {message}")]
    Csv {
        message: String,
        #[source]
        source: csv::Error,
    },

    /// XML document could not be parsed
    #[error("XML parsing error: {message}")]
    XmlParsing {
        message: String,
        #[source]
        source: roxmltree::Error,
    },

    /// XML document could not be written
    #[error("XML writing error: {message}")]
    XmlWriting { message: String },

    /// Date/time parsing error
    #[error("Date/time parsing error: {message}")]
    DateTimeParsing {
        message: String,
        #[source]
        source: chrono::ParseError,
    },
}

impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a format error at a given location (tag path or line)
    pub fn format(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Format {
            location: location.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a format error for a CSV line (1-based)
    pub fn format_at_line(line: u64, message: impl Into<String>) -> Self {
        Self::format(format!("line {line}"), message)
    }

    /// Wrap a record construction failure with its CSV line number
    pub fn construction_at_line(line: u64, cause: Error) -> Self {
        Self::Format {
            location: format!("line {line}"),
            message: format!("cannot build record: {cause}"),
            source: Some(Box::new(cause)),
        }
    }

    /// Wrap a construction failure with its XML tag path
    pub fn construction_at_path(path: impl Into<String>, cause: Error) -> Self {
        Self::Format {
            location: path.into(),
            message: format!("cannot build element: {cause}"),
            source: Some(Box::new(cause)),
        }
    }

    /// Create a domain validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a wrong entity kind error
    pub fn entity_kind(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::EntityKind {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create a destination conflict error
    pub fn io_conflict(path: impl Into<String>) -> Self {
        Self::IoConflict { path: path.into() }
    }

    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV error with context
    pub fn csv(message: impl Into<String>, source: csv::Error) -> Self {
        Self::Csv {
            message: message.into(),
            source,
        }
    }

    /// Create an XML writing error
    pub fn xml_writing(message: impl Into<String>) -> Self {
        Self::XmlWriting {
            message: message.into(),
        }
    }

    /// Create a date/time parsing error
    pub fn datetime_parsing(message: impl Into<String>, source: chrono::ParseError) -> Self {
        Self::DateTimeParsing {
            message: message.into(),
            source,
        }
    }

    /// Check whether this error is (or wraps) a format error
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::Csv {
            message: "CSV reading failed".to_string(),
            source: error,
        }
    }
}

impl From<roxmltree::Error> for Error {
    fn from(error: roxmltree::Error) -> Self {
        Self::XmlParsing {
            message: "XML parsing failed".to_string(),
            source: error,
        }
    }
}

impl From<chrono::ParseError> for Error {
    fn from(error: chrono::ParseError) -> Self {
        Self::DateTimeParsing {
            message: "Date/time parsing failed".to_string(),
            source: error,
        }
    }
}
