//! Codec for the SANDRE simplified CSV exchange format
//!
//! Reads `;`-delimited exports whose header row names SANDRE fields between
//! angle brackets (`<CdSiteHydro>`, `<DtObsHydro>`, ...) into domain records.
//!
//! ## Architecture
//!
//! - [`mapper`] - Field-mapping tables, one per entity kind
//! - [`field_parsers`] - Date normalization, decimal substitution, typed getters
//! - [`record_builder`] - One domain record per row, dispatched on [`DataType`]
//! - [`merge`] - Folding of rows describing the same parent entity
//! - [`parser`] - Decoding, flag checks, column checks and orchestration
//!
//! ## Usage
//!
//! ```rust
//! use hydrometrie::app::services::csv_codec::parse_siteshydro;
//! use hydrometrie::CsvOptions;
//!
//! let csv = "<CdSiteHydro>;<CdStationHydro>;<FLG>\n\
//!            A1234567;A123456701;FLG\n\
//!            A1234567;A123456702;FLG\n";
//! let sites = parse_siteshydro(csv.as_bytes(), &CsvOptions::default())?;
//! assert_eq!(sites.len(), 1);
//! assert_eq!(sites[0].stations.len(), 2);
//! # Ok::<(), hydrometrie::Error>(())
//! ```

pub mod field_parsers;
pub mod mapper;
pub mod merge;
pub mod parser;
pub mod record_builder;

#[cfg(test)]
pub mod tests;

pub use mapper::{EntityKind, FieldMap, Mapper};
pub use merge::{merge, Mergeable};
pub use parser::CsvParser;

use crate::app::models::{SerieHydro, SerieMeteo, Sitehydro, Sitemeteo};
use crate::config::CsvOptions;
use crate::{Error, Result};
use std::fmt;
use std::io::Read;
use std::str::FromStr;

/// Kind of record a CSV file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    SiteHydro,
    SiteMeteo,
    SerieHydro,
    SerieMeteo,
}

impl DataType {
    pub const ALL: [DataType; 4] = [
        DataType::SiteHydro,
        DataType::SiteMeteo,
        DataType::SerieHydro,
        DataType::SerieMeteo,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DataType::SiteHydro => "sitehydro",
            DataType::SiteMeteo => "sitemeteo",
            DataType::SerieHydro => "seriehydro",
            DataType::SerieMeteo => "seriemeteo",
        }
    }

    /// Mapping tables a row of this type is read through
    pub fn kinds(&self) -> &'static [EntityKind] {
        match self {
            DataType::SiteHydro => &[
                EntityKind::Sitehydro,
                EntityKind::SitehydroCoord,
                EntityKind::Station,
                EntityKind::StationCoord,
            ],
            DataType::SiteMeteo => &[
                EntityKind::Sitemeteo,
                EntityKind::SitemeteoCoord,
                EntityKind::Grandeur,
            ],
            DataType::SerieHydro => &[
                EntityKind::Sitehydro,
                EntityKind::Station,
                EntityKind::Capteur,
                EntityKind::SerieHydro,
                EntityKind::ObservationHydro,
            ],
            DataType::SerieMeteo => &[
                EntityKind::Sitemeteo,
                EntityKind::Grandeur,
                EntityKind::SerieMeteo,
                EntityKind::ObservationMeteo,
            ],
        }
    }
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        DataType::ALL
            .iter()
            .copied()
            .find(|dtype| dtype.name() == name)
            .ok_or_else(|| {
                Error::invalid_argument(format!(
                    "unknown data type '{s}', expected one of \
                     sitehydro, sitemeteo, seriehydro, seriemeteo"
                ))
            })
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Records decoded from a CSV file
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    SitesHydro(Vec<Sitehydro>),
    SitesMeteo(Vec<Sitemeteo>),
    SeriesHydro(Vec<SerieHydro>),
    SeriesMeteo(Vec<SerieMeteo>),
}

impl Parsed {
    pub fn len(&self) -> usize {
        match self {
            Parsed::SitesHydro(v) => v.len(),
            Parsed::SitesMeteo(v) => v.len(),
            Parsed::SeriesHydro(v) => v.len(),
            Parsed::SeriesMeteo(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Parsed::SitesHydro(_) => DataType::SiteHydro,
            Parsed::SitesMeteo(_) => DataType::SiteMeteo,
            Parsed::SeriesHydro(_) => DataType::SerieHydro,
            Parsed::SeriesMeteo(_) => DataType::SerieMeteo,
        }
    }
}

/// Parse CSV content holding records of `dtype`
pub fn parse<R: Read>(dtype: DataType, reader: R, options: &CsvOptions) -> Result<Parsed> {
    CsvParser::new(options.clone())?.parse(dtype, reader)
}

pub fn parse_siteshydro<R: Read>(reader: R, options: &CsvOptions) -> Result<Vec<Sitehydro>> {
    match parse(DataType::SiteHydro, reader, options)? {
        Parsed::SitesHydro(sites) => Ok(sites),
        other => Err(unexpected(DataType::SiteHydro, &other)),
    }
}

pub fn parse_sitesmeteo<R: Read>(reader: R, options: &CsvOptions) -> Result<Vec<Sitemeteo>> {
    match parse(DataType::SiteMeteo, reader, options)? {
        Parsed::SitesMeteo(sites) => Ok(sites),
        other => Err(unexpected(DataType::SiteMeteo, &other)),
    }
}

pub fn parse_serieshydro<R: Read>(reader: R, options: &CsvOptions) -> Result<Vec<SerieHydro>> {
    match parse(DataType::SerieHydro, reader, options)? {
        Parsed::SeriesHydro(series) => Ok(series),
        other => Err(unexpected(DataType::SerieHydro, &other)),
    }
}

pub fn parse_seriesmeteo<R: Read>(reader: R, options: &CsvOptions) -> Result<Vec<SerieMeteo>> {
    match parse(DataType::SerieMeteo, reader, options)? {
        Parsed::SeriesMeteo(series) => Ok(series),
        other => Err(unexpected(DataType::SerieMeteo, &other)),
    }
}

fn unexpected(expected: DataType, found: &Parsed) -> Error {
    Error::invalid_argument(format!(
        "expected {expected} records, parser returned {}",
        found.data_type()
    ))
}
