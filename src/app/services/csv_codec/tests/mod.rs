//! Test utilities for CSV codec testing
//!
//! Helpers build small CSV exports in the default dialect (`;` delimiter,
//! `FLG` end-of-record flag) and write them to temporary files when a test
//! needs a path.

use std::io::Write;
use tempfile::NamedTempFile;

use crate::config::CsvOptions;

// Test modules
mod mapper_tests;
mod parser_tests;

/// Join a header and rows with the default delimiter, appending the flag column
pub fn flagged_csv(header: &[&str], rows: &[&[&str]]) -> String {
    let mut content = header.join(";");
    content.push_str(";<FLG>\n");
    for row in rows {
        content.push_str(&row.join(";"));
        content.push_str(";FLG\n");
    }
    content
}

/// Join a header and rows without any flag column
pub fn plain_csv(header: &[&str], rows: &[&[&str]]) -> String {
    let mut content = header.join(";");
    content.push('\n');
    for row in rows {
        content.push_str(&row.join(";"));
        content.push('\n');
    }
    content
}

/// Header of a hydrometric site export with stations
pub fn sitehydro_header() -> Vec<&'static str> {
    vec![
        "<CdSiteHydro>",
        "<LbSiteHydro>",
        "<TypSiteHydro>",
        "<CdStationHydro>",
        "<LbStationHydro>",
    ]
}

/// Header of a hydrometric series export
pub fn seriehydro_header() -> Vec<&'static str> {
    vec![
        "<CdSiteHydro>",
        "<CdStationHydro>",
        "<GrdSerie>",
        "<DtObsHydro>",
        "<ResObsHydro>",
        "<QualObsHydro>",
    ]
}

pub fn default_options() -> CsvOptions {
    CsvOptions::default()
}

/// Write content to a temporary CSV file
pub fn create_temp_csv(content: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content).unwrap();
    file.flush().unwrap();
    file
}
