//! Tests for the CSV parser

use super::*;
use crate::app::models::validation::parse_datetime;
use crate::app::models::EntiteKind;
use crate::app::services::csv_codec::{
    parse, parse_serieshydro, parse_seriesmeteo, parse_siteshydro, parse_sitesmeteo, CsvParser,
    DataType, Parsed,
};
use crate::Error;

fn location(error: &Error) -> Option<&str> {
    match error {
        Error::Format { location, .. } => Some(location.as_str()),
        _ => None,
    }
}

#[test]
fn test_data_type_from_str() {
    assert_eq!("sitehydro".parse::<DataType>().unwrap(), DataType::SiteHydro);
    assert_eq!("SerieMeteo".parse::<DataType>().unwrap(), DataType::SerieMeteo);

    let result = "stations".parse::<DataType>();
    assert!(matches!(result, Err(Error::InvalidArgument { .. })));
}

#[test]
fn test_parse_sites_with_stations() {
    let header = sitehydro_header();
    let csv = flagged_csv(
        &header,
        &[
            &["A1234567", "La Seine à Paris", "REEL", "A123456701", "Pont d'Austerlitz"],
            &["B7654321", "La Loire", "", "", ""],
        ],
    );

    let sites = parse_siteshydro(csv.as_bytes(), &default_options()).unwrap();

    assert_eq!(sites.len(), 2);
    assert_eq!(sites[0].code, "A1234567");
    assert_eq!(sites[0].stations.len(), 1);
    assert_eq!(sites[0].stations[0].libelle.as_deref(), Some("Pont d'Austerlitz"));
    assert!(sites[1].stations.is_empty());
    assert_eq!(sites[1].typesite, "REEL");
}

#[test]
fn test_merge_enabled_folds_stations() {
    let header = sitehydro_header();
    let csv = flagged_csv(
        &header,
        &[
            &["A1234567", "La Seine", "REEL", "A123456701", ""],
            &["A1234567", "La Seine", "REEL", "A123456702", ""],
            &["A1234567", "La Seine", "REEL", "A123456703", ""],
        ],
    );

    let merged = parse_siteshydro(csv.as_bytes(), &default_options()).unwrap();
    assert_eq!(merged.len(), 1);
    let codes: Vec<&str> = merged[0].stations.iter().map(|s| s.code.as_str()).collect();
    assert_eq!(codes, vec!["A123456701", "A123456702", "A123456703"]);

    let raw = parse_siteshydro(csv.as_bytes(), &default_options().with_merge(false)).unwrap();
    assert_eq!(raw.len(), 3);
    assert!(raw.iter().all(|site| site.stations.len() == 1));
}

#[test]
fn test_missing_header_flag_is_format_error() {
    let csv = plain_csv(&sitehydro_header(), &[&["A1234567", "", "", "", "", "FLG"]]);

    let error = parse_siteshydro(csv.as_bytes(), &default_options()).unwrap_err();
    assert_eq!(location(&error), Some("line 1"));
}

#[test]
fn test_row_flag_mismatch_names_line() {
    let header = sitehydro_header();
    let mut csv = flagged_csv(&header, &[&["A1234567", "", "", "", ""]]);
    csv.push_str("B7654321;;;;;XXX\n");

    let error = parse_siteshydro(csv.as_bytes(), &default_options()).unwrap_err();
    assert_eq!(location(&error), Some("line 3"));
}

#[test]
fn test_flag_disabled() {
    let csv = plain_csv(&["<CdSiteHydro>"], &[&["A1234567"]]);
    let sites = parse_siteshydro(csv.as_bytes(), &default_options().with_flag(None)).unwrap();
    assert_eq!(sites.len(), 1);
}

#[test]
fn test_decimal_separator_substitution() {
    let header = seriehydro_header();
    let csv = flagged_csv(&header, &[&["A1234567", "", "H", "2010-02-26 12:00:00", "55,8", ""]]);
    let series = parse_serieshydro(csv.as_bytes(), &default_options()).unwrap();
    assert_eq!(series[0].observations.get(0).unwrap().res, 55.8);

    let csv = flagged_csv(&header, &[&["A1234567", "", "H", "2010-02-26 12:00:00", "55.8", ""]]);
    let options = default_options().with_decimal_separator(None);
    let series = parse_serieshydro(csv.as_bytes(), &options).unwrap();
    assert_eq!(series[0].observations.get(0).unwrap().res, 55.8);
}

#[test]
fn test_french_dates_are_normalized() {
    let header = seriehydro_header();
    let csv = flagged_csv(
        &header,
        &[&["A1234567", "", "H", "26/02/2010 12:53:10", "1,5", "16"]],
    );

    let series = parse_serieshydro(csv.as_bytes(), &default_options()).unwrap();
    let observation = series[0].observations.get(0).unwrap();
    assert_eq!(observation.dte, parse_datetime("2010-02-26T12:53:10").unwrap());
    assert_eq!(observation.qal, Some(16));
}

#[test]
fn test_malformed_date_is_format_error() {
    let header = seriehydro_header();
    let csv = flagged_csv(&header, &[&["A1234567", "", "H", "2010/02/26", "1", ""]]);

    let error = parse_serieshydro(csv.as_bytes(), &default_options()).unwrap_err();
    assert_eq!(location(&error), Some("line 2"));
}

#[test]
fn test_series_merge_by_entity() {
    let header = seriehydro_header();
    let csv = flagged_csv(
        &header,
        &[
            &["A1234567", "A123456701", "H", "2010-02-26 12:00:00", "1,0", ""],
            &["A1234567", "A123456701", "H", "2010-02-26 13:00:00", "2,0", ""],
            &["A1234567", "A123456702", "H", "2010-02-26 12:00:00", "3,0", ""],
            &["A1234567", "A123456701", "H", "2010-02-26 12:00:00", "4,0", ""],
        ],
    );

    let series = parse_serieshydro(csv.as_bytes(), &default_options()).unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].entite.kind(), EntiteKind::Station);
    assert_eq!(series[0].entite.code(), "A123456701");
    let values: Vec<f64> = series[0].observations.iter().map(|o| o.res).collect();
    assert_eq!(values, vec![1.0, 2.0, 4.0]);
    assert_eq!(series[1].observations.len(), 1);
}

#[test]
fn test_strict_rejects_unknown_column() {
    let mut header = sitehydro_header();
    header.push("<ResObsHydro>");
    let csv = flagged_csv(&header, &[&["A1234567", "", "", "", "", "12"]]);

    let error = parse_siteshydro(csv.as_bytes(), &default_options()).unwrap_err();
    match error {
        Error::Format { location, message, .. } => {
            assert_eq!(location, "line 1");
            assert!(message.contains("<ResObsHydro>"));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let lenient = default_options().with_strict(false);
    let sites = parse_siteshydro(csv.as_bytes(), &lenient).unwrap();
    assert_eq!(sites.len(), 1);
}

#[test]
fn test_unsupported_column_is_dropped() {
    let csv = flagged_csv(
        &["<CdSiteHydro>", "<MnSiteHydro>"],
        &[&["A1234567", "SEINE-PARIS"]],
    );
    let sites = parse_siteshydro(csv.as_bytes(), &default_options()).unwrap();
    assert_eq!(sites[0].code, "A1234567");
    assert!(sites[0].libelle.is_none());
}

#[test]
fn test_second_line_is_skipped() {
    let mut csv = String::from("<CdSiteHydro>;<LbSiteHydro>;<FLG>\n");
    csv.push_str("Code du site;Libellé du site;FLG\n");
    csv.push_str("A1234567;La Seine;FLG\n");

    let options = default_options().with_second_line(true);
    let sites = parse_siteshydro(csv.as_bytes(), &options).unwrap();
    assert_eq!(sites.len(), 1);

    let error = parse_siteshydro(csv.as_bytes(), &default_options()).unwrap_err();
    assert!(error.is_format());
}

#[test]
fn test_row_length_checks() {
    let options = default_options().with_flag(None);

    let csv = "<CdSiteHydro>;<LbSiteHydro>\nA1234567;La Seine;extra\n";
    let error = parse_siteshydro(csv.as_bytes(), &options).unwrap_err();
    assert_eq!(location(&error), Some("line 2"));

    let csv = "<CdSiteHydro>;<LbSiteHydro>\nA1234567\n";
    let sites = parse_siteshydro(csv.as_bytes(), &options).unwrap();
    assert!(sites[0].libelle.is_none());
}

#[test]
fn test_construction_error_wraps_cause_with_line() {
    let csv = flagged_csv(&["<CdSiteHydro>"], &[&["A1234567"], &["bad"]]);

    let error = parse_siteshydro(csv.as_bytes(), &default_options()).unwrap_err();
    match error {
        Error::Format {
            location, source, ..
        } => {
            assert_eq!(location, "line 3");
            assert!(matches!(source.as_deref(), Some(Error::Validation { .. })));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_encoding_override() {
    let mut bytes = b"<CdSiteHydro>;<LbSiteHydro>;<FLG>\nA1234567;La R".to_vec();
    bytes.push(0xE9);
    bytes.extend_from_slice(b"union;FLG\n");

    let error = parse_siteshydro(bytes.as_slice(), &default_options()).unwrap_err();
    assert!(error.is_format());

    let options = default_options().with_encoding("latin1");
    let sites = parse_siteshydro(bytes.as_slice(), &options).unwrap();
    assert_eq!(sites[0].libelle.as_deref(), Some("La Réunion"));
}

#[test]
fn test_unknown_encoding_is_invalid_argument() {
    let options = default_options().with_encoding("klingon");
    let result = parse_siteshydro("<CdSiteHydro>;<FLG>\n".as_bytes(), &options);
    assert!(matches!(result, Err(Error::InvalidArgument { .. })));
}

#[test]
fn test_sites_meteo_with_grandeurs() {
    let csv = flagged_csv(
        &["<CdSiteMeteo>", "<LbSiteMeteo>", "<CdGrdMeteo>", "<DtMiseServiceGrdMeteo>"],
        &[
            &["001072001", "Brest", "RR", "01/01/2000 00:00:00"],
            &["001072001", "Brest", "TA", ""],
        ],
    );

    let sites = parse_sitesmeteo(csv.as_bytes(), &default_options()).unwrap();
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].grandeurs.len(), 2);
    assert_eq!(
        sites[0].grandeurs[0].dtmiseservice,
        Some(parse_datetime("2000-01-01T00:00:00").unwrap())
    );
}

#[test]
fn test_series_meteo() {
    let csv = flagged_csv(
        &[
            "<CdSiteMeteo>",
            "<CdGrdMeteo>",
            "<DureeSerieMeteo>",
            "<DtObsMeteo>",
            "<ResObsMeteo>",
            "<IndiceQualObsMeteo>",
        ],
        &[
            &["001072001", "RR", "60", "2010-02-26 12:00:00", "0,2", "90"],
            &["001072001", "RR", "60", "2010-02-26 13:00:00", "1,4", ""],
        ],
    );

    let series = parse_seriesmeteo(csv.as_bytes(), &default_options()).unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].duree, Some(60));
    assert_eq!(series[0].observations.len(), 2);
    assert_eq!(series[0].observations.get(0).unwrap().qua, Some(90.0));
    assert_eq!(series[0].observations.get(1).unwrap().res, 1.4);
}

#[test]
fn test_parse_file_dispatches_on_type() {
    let csv = flagged_csv(&["<CdSiteHydro>"], &[&["A1234567"]]);
    let file = create_temp_csv(csv.as_bytes());

    let parser = CsvParser::new(default_options()).unwrap();
    let parsed = parser.parse_file(DataType::SiteHydro, file.path()).unwrap();
    assert!(matches!(parsed, Parsed::SitesHydro(ref sites) if sites.len() == 1));

    let parsed = parse(DataType::SiteHydro, csv.as_bytes(), &default_options()).unwrap();
    assert_eq!(parsed.data_type(), DataType::SiteHydro);
}

#[test]
fn test_decimal_separator_equal_to_delimiter_rejected() {
    let options = default_options().with_decimal_separator(Some(';'));
    assert!(matches!(
        CsvParser::new(options),
        Err(Error::InvalidArgument { .. })
    ));
}
