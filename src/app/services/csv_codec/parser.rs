//! Core CSV parsing orchestration and file handling

use super::mapper::Mapper;
use super::merge::{merge, Mergeable};
use super::record_builder::{self, RowContext};
use super::{DataType, Parsed};
use crate::config::CsvOptions;
use crate::{Error, Result};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Header row and numbered data rows of a decoded file
struct RawTable {
    header: Vec<String>,
    header_line: u64,
    rows: Vec<(u64, Vec<String>)>,
}

/// Parser for the simplified CSV exchange format
#[derive(Debug, Clone)]
pub struct CsvParser {
    options: CsvOptions,
    mapper: Mapper,
}

impl CsvParser {
    /// Create a parser after validating the options
    pub fn new(options: CsvOptions) -> Result<Self> {
        options.validate()?;
        let mapper = options.mapper.clone().unwrap_or_default();
        Ok(Self { options, mapper })
    }

    pub fn options(&self) -> &CsvOptions {
        &self.options
    }

    /// Parse a CSV file
    pub fn parse_file(&self, dtype: DataType, path: &Path) -> Result<Parsed> {
        let file = std::fs::File::open(path)
            .map_err(|e| Error::io(format!("Failed to open file: {}", path.display()), e))?;
        let parsed = self.parse(dtype, file)?;
        info!(
            "Parsed {} {} record(s) from {}",
            parsed.len(),
            dtype,
            path.display()
        );
        Ok(parsed)
    }

    /// Parse CSV content from any reader
    pub fn parse<R: Read>(&self, dtype: DataType, reader: R) -> Result<Parsed> {
        let table = self.read_table(reader)?;
        self.check_columns(dtype, &table)?;

        Ok(match dtype {
            DataType::SiteHydro => {
                Parsed::SitesHydro(self.build(&table, record_builder::build_sitehydro)?)
            }
            DataType::SiteMeteo => {
                Parsed::SitesMeteo(self.build(&table, record_builder::build_sitemeteo)?)
            }
            DataType::SerieHydro => {
                Parsed::SeriesHydro(self.build(&table, record_builder::build_seriehydro)?)
            }
            DataType::SerieMeteo => {
                Parsed::SeriesMeteo(self.build(&table, record_builder::build_seriemeteo)?)
            }
        })
    }

    /// Decode the input and split it into flag-checked rows
    fn read_table<R: Read>(&self, mut reader: R) -> Result<RawTable> {
        let dialect = &self.options.dialect;
        let encoding = dialect.resolve_encoding()?;

        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| Error::io("Failed to read CSV input", e))?;
        let (text, _, had_errors) = encoding.decode(&bytes);
        if had_errors {
            return Err(Error::format(
                "input",
                format!("byte sequence not valid {}", encoding.name()),
            ));
        }

        let mut csv_reader = ReaderBuilder::new()
            .delimiter(dialect.delimiter)
            .has_headers(false)
            .quoting(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let row_flag = dialect.flag.as_deref();
        let header_flag = dialect.header_flag();
        let mut records = csv_reader.records();

        let (header_line, mut header) = match records.next() {
            Some(record) => {
                let record = record.map_err(|e| Error::csv("Failed to read header row", e))?;
                let line = record.position().map_or(1, |p| p.line());
                (line, trimmed(&record))
            }
            None => return Err(Error::format_at_line(1, "missing header row")),
        };
        if let Some(expected) = header_flag.as_deref() {
            strip_flag(&mut header, expected, header_line)?;
        }

        if dialect.second_line {
            if let Some(record) = records.next() {
                let record = record.map_err(|e| Error::csv("Failed to read second header row", e))?;
                debug!("Skipped second header line: {:?}", record);
            }
        }

        let mut rows = Vec::new();
        for (index, record) in records.enumerate() {
            let record = record.map_err(|e| Error::csv("Failed to read data row", e))?;
            let line = record
                .position()
                .map_or(header_line + 1 + index as u64, |p| p.line());
            let mut values = trimmed(&record);

            if let Some(expected) = row_flag {
                strip_flag(&mut values, expected, line)?;
            }
            if values.len() > header.len() {
                return Err(Error::format_at_line(
                    line,
                    format!(
                        "row has {} fields but the header has {}",
                        values.len(),
                        header.len()
                    ),
                ));
            }
            values.resize(header.len(), String::new());
            rows.push((line, values));
        }

        debug!("Read {} data row(s) with {} column(s)", rows.len(), header.len());
        Ok(RawTable {
            header,
            header_line,
            rows,
        })
    }

    /// Reject (strict) or drop (lenient) columns unknown to the tables in use
    fn check_columns(&self, dtype: DataType, table: &RawTable) -> Result<()> {
        let mut dropped = 0;
        for column in table.header.iter().filter(|c| !c.is_empty()) {
            if self.mapper.knows_column(dtype.kinds(), column) {
                continue;
            }
            if self.options.strict {
                return Err(Error::format_at_line(
                    table.header_line,
                    format!("unknown column {column} for {dtype}"),
                ));
            }
            debug!("Dropping unknown column {}", column);
            dropped += 1;
        }
        if dropped > 0 {
            warn!("Ignored {} unknown column(s) for {}", dropped, dtype);
        }
        Ok(())
    }

    /// Build one record per row, then merge when enabled
    fn build<T, F>(&self, table: &RawTable, builder: F) -> Result<Vec<T>>
    where
        T: Mergeable,
        F: Fn(&RowContext<'_>) -> Result<T>,
    {
        let mut records = Vec::with_capacity(table.rows.len());

        for (line, values) in &table.rows {
            let fields: Vec<(&str, &str)> = table
                .header
                .iter()
                .map(String::as_str)
                .zip(values.iter().map(String::as_str))
                .collect();
            let ctx = RowContext {
                mapper: &self.mapper,
                fields: &fields,
                decimal_separator: self.options.dialect.decimal_separator,
                line: *line,
            };

            let record = builder(&ctx).map_err(|e| {
                if e.is_format() {
                    e
                } else {
                    Error::construction_at_line(*line, e)
                }
            })?;
            records.push(record);
        }

        if self.options.merge {
            Ok(merge(records))
        } else {
            Ok(records)
        }
    }
}

fn trimmed(record: &csv::StringRecord) -> Vec<String> {
    record.iter().map(|field| field.trim().to_string()).collect()
}

/// Check and remove the trailing end-of-record token
fn strip_flag(values: &mut Vec<String>, expected: &str, line: u64) -> Result<()> {
    match values.last() {
        Some(last) if last == expected => {
            values.pop();
            Ok(())
        }
        Some(last) => Err(Error::format_at_line(
            line,
            format!("expected end-of-record flag {expected}, found '{last}'"),
        )),
        None => Err(Error::format_at_line(
            line,
            format!("missing end-of-record flag {expected}"),
        )),
    }
}
