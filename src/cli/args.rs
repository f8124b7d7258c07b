//! Command-line argument definitions for the hydrometrie converter
//!
//! This module defines the CLI interface using the clap derive API.

use crate::app::services::csv_codec::DataType;
use crate::config::CsvOptions;
use crate::constants::{CSV_DECIMAL_SEPARATOR, CSV_ENCODING, CSV_FLAG};
use crate::{Error, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the SANDRE Hydrometrie converter
#[derive(Debug, Clone, Parser)]
#[command(
    name = "hydrometrie",
    version,
    about = "Convert SANDRE simplified CSV exports to Hydrometrie v1.1 XML messages",
    long_about = "Reads hydrometric and meteorological sites or observation series from the \
                  SANDRE simplified CSV exchange format and writes SANDRE Hydrometrie v1.1 XML \
                  messages. Existing XML messages can be inspected with the show command."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Convert a CSV export to an XML message
    Convert(ConvertArgs),
    /// Print the content summary of an XML message
    Show(ShowArgs),
}

/// Arguments for the convert command
#[derive(Debug, Clone, Parser)]
pub struct ConvertArgs {
    /// CSV file to convert
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Kind of records held by the file
    #[arg(
        short = 't',
        long = "type",
        value_name = "DTYPE",
        help = "Data type: sitehydro, sitemeteo, seriehydro or seriemeteo"
    )]
    pub data_type: DataType,

    /// Intervenant code of the sender
    #[arg(long = "emetteur", value_name = "CODE")]
    pub emetteur: String,

    /// Intervenant code of the recipient
    #[arg(long = "destinataire", value_name = "CODE")]
    pub destinataire: String,

    /// Output XML file; defaults to the input path with an `.xml` extension
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Overwrite an existing output file
    #[arg(long = "force", help = "Overwrite an existing output file")]
    pub force: bool,

    /// Keep one record per row instead of merging rows by identity
    #[arg(long = "no-merge")]
    pub no_merge: bool,

    /// Input has no FLG end-of-record column
    #[arg(long = "no-flag")]
    pub no_flag: bool,

    /// Input has a second header line to skip
    #[arg(long = "second-line")]
    pub second_line: bool,

    /// Input character encoding (any WHATWG label)
    #[arg(long = "encoding", value_name = "LABEL", default_value = CSV_ENCODING)]
    pub encoding: String,

    /// Decimal separator replaced by '.' in numeric fields
    #[arg(
        long = "decimal",
        value_name = "CHAR",
        default_value_t = CSV_DECIMAL_SEPARATOR,
        conflicts_with = "no_decimal"
    )]
    pub decimal: char,

    /// Numeric fields already use '.'
    #[arg(long = "no-decimal")]
    pub no_decimal: bool,

    /// Drop unknown columns instead of failing
    #[arg(long = "lenient")]
    pub lenient: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the show command
#[derive(Debug, Clone, Parser)]
pub struct ShowArgs {
    /// XML message to inspect
    #[arg(value_name = "XML")]
    pub input: PathBuf,

    /// Accept messages without a scenario
    #[arg(long = "lenient")]
    pub lenient: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,
}

impl ConvertArgs {
    /// Validate the convert command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if !self.input.is_file() {
            return Err(Error::invalid_argument(format!(
                "Input file does not exist: {}",
                self.input.display()
            )));
        }
        if self.output_path() == self.input {
            return Err(Error::invalid_argument(
                "Output file must differ from the input file",
            ));
        }
        self.csv_options()?.validate()
    }

    /// Output path, derived from the input when not given
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.input.with_extension("xml"))
    }

    /// Parser options built from the dialect flags
    pub fn csv_options(&self) -> Result<CsvOptions> {
        let options = CsvOptions::default()
            .with_merge(!self.no_merge)
            .with_strict(!self.lenient)
            .with_flag(if self.no_flag { None } else { Some(CSV_FLAG) })
            .with_second_line(self.second_line)
            .with_decimal_separator((!self.no_decimal).then_some(self.decimal))
            .with_encoding(self.encoding.clone());
        options.dialect.resolve_encoding()?;
        Ok(options)
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            log_level(self.verbose)
        }
    }
}

impl ShowArgs {
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose)
    }
}

fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
