//! Tests for the field-mapping tables

use super::*;
use crate::app::services::csv_codec::{parse_siteshydro, EntityKind, Mapper};
use crate::Error;

#[test]
fn test_default_tables_cover_every_kind() {
    let mapper = Mapper::default();
    for kind in EntityKind::ALL {
        let table = mapper.table(kind).unwrap();
        assert!(!table.is_empty(), "empty table for {kind}");
        for attr in table.values().flatten() {
            assert!(kind.attributes().contains(&attr.as_str()));
        }
    }
}

#[test]
fn test_entity_kind_keys() {
    assert_eq!("sitehydro.coord".parse::<EntityKind>().unwrap(), EntityKind::SitehydroCoord);
    assert_eq!(EntityKind::ObservationHydro.to_string(), "obshydro");
    assert!(matches!(
        "site".parse::<EntityKind>(),
        Err(Error::InvalidArgument { .. })
    ));
}

#[test]
fn test_from_tables_validates_attributes() {
    let result = Mapper::from_tables(vec![("sitehydro", vec![("<Code>", Some("identifiant"))])]);
    assert!(matches!(result, Err(Error::InvalidArgument { .. })));

    let result = Mapper::from_tables(vec![("riviere", vec![("<Code>", Some("code"))])]);
    assert!(matches!(result, Err(Error::InvalidArgument { .. })));
}

#[test]
fn test_custom_mapper_decodes_non_conforming_file() {
    let mapper = Mapper::from_tables(vec![
        (
            "sitehydro",
            vec![("code_site", Some("code")), ("nom", Some("libelle")), ("remarque", None)],
        ),
        ("station", vec![("code_station", Some("code"))]),
    ])
    .unwrap();
    let csv = plain_csv(
        &["code_site", "nom", "remarque", "code_station"],
        &[&["A1234567", "La Seine", "ignored", "A123456701"]],
    );

    let options = default_options().with_flag(None).with_mapper(mapper);
    let sites = parse_siteshydro(csv.as_bytes(), &options).unwrap();

    assert_eq!(sites[0].libelle.as_deref(), Some("La Seine"));
    assert_eq!(sites[0].stations[0].code, "A123456701");
    assert!(sites[0].coord.is_none());
}

#[test]
fn test_custom_mapper_strict_rejects_default_columns() {
    let mapper =
        Mapper::from_tables(vec![("sitehydro", vec![("code_site", Some("code"))])]).unwrap();
    let csv = plain_csv(&["code_site", "<LbSiteHydro>"], &[&["A1234567", "La Seine"]]);

    let options = default_options().with_flag(None).with_mapper(mapper);
    let error = parse_siteshydro(csv.as_bytes(), &options).unwrap_err();
    assert!(error.is_format());
}
