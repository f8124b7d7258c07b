//! Tests for the document builder

use roxmltree::{Document, Node};

use super::{dt, sample_document, sample_scenario, sample_serie, sample_seuil, sample_simulation};
use crate::app::models::{
    Actor, Capteur, Contact, ObservationHydro, Observations, Scenario, SerieHydro, Sitehydro,
    Station, ValeurSeuil,
};
use crate::app::services::xml_codec::{build_document, to_xml, Payload};
use crate::Error;

fn child_tags<'a>(node: Node<'a, '_>) -> Vec<&'a str> {
    node.children()
        .filter(Node::is_element)
        .map(|n| n.tag_name().name())
        .collect()
}

fn find<'a, 'input>(doc: &'a Document<'input>, tag: &str) -> Node<'a, 'input> {
    doc.descendants()
        .find(|n| n.has_tag_name(tag))
        .unwrap_or_else(|| panic!("no <{tag}> element"))
}

fn text_of(doc: &Document<'_>, tag: &str) -> String {
    find(doc, tag).text().unwrap_or_default().to_string()
}

#[test]
fn test_empty_payload_writes_bare_root() {
    let xml = to_xml(&Payload::default()).unwrap();
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));

    let doc = Document::parse(&xml).unwrap();
    assert_eq!(doc.root_element().tag_name().name(), "hydrometrie");
    assert!(child_tags(doc.root_element()).is_empty());
}

#[test]
fn test_scenario_child_order_and_actors() {
    let scenario = sample_scenario();
    let xml = to_xml(&Payload {
        scenario: Some(&scenario),
        ..Payload::default()
    })
    .unwrap();
    let doc = Document::parse(&xml).unwrap();

    assert_eq!(
        child_tags(find(&doc, "Scenario")),
        [
            "CodeScenario",
            "VersionScenario",
            "NomScenario",
            "DateHeureCreationFichier",
            "Emetteur",
            "Destinataire"
        ]
    );
    assert_eq!(text_of(&doc, "DateHeureCreationFichier"), "2010-02-26T12:53:10");

    let emetteur = find(&doc, "Emetteur");
    assert_eq!(
        child_tags(emetteur),
        ["CdIntervenant", "NomIntervenant", "CdContact", "NomContact", "PrenomContact"]
    );
    let destinataire = find(&doc, "Destinataire");
    assert_eq!(child_tags(destinataire), ["CdIntervenant", "MnIntervenant"]);

    let scheme = |actor: Node<'_, '_>| {
        actor
            .children()
            .find(|n| n.has_tag_name("CdIntervenant"))
            .and_then(|n| n.attribute("schemeAgencyID"))
            .map(str::to_string)
    };
    assert_eq!(scheme(emetteur).as_deref(), Some("SANDRE"));
    assert_eq!(scheme(destinataire).as_deref(), Some("SIRET"));
}

#[test]
fn test_contact_without_intervenant_is_rejected() {
    let scenario = Scenario {
        production_datetime: dt("2010-02-26T12:53:10"),
        emetteur: Actor::Contact(Contact::new("1").unwrap()),
        destinataire: sample_scenario().destinataire,
    };

    let result = to_xml(&Payload {
        scenario: Some(&scenario),
        ..Payload::default()
    });
    assert!(matches!(result, Err(Error::InvalidArgument { .. })));
}

#[test]
fn test_absent_sections_and_fields_are_omitted() {
    let sites = vec![Sitehydro::new("A1234567").unwrap()];
    let xml = to_xml(&Payload {
        siteshydro: &sites,
        ..Payload::default()
    })
    .unwrap();
    let doc = Document::parse(&xml).unwrap();

    assert_eq!(child_tags(doc.root_element()), ["RefHyd"]);
    assert_eq!(child_tags(find(&doc, "RefHyd")), ["SitesHydro"]);
    assert_eq!(child_tags(find(&doc, "SiteHydro")), ["CdSiteHydro", "TypSiteHydro"]);
}

#[test]
fn test_repeated_leaves_keep_order() {
    let document = sample_document();
    let xml = to_xml(&document.payload()).unwrap();
    let doc = Document::parse(&xml).unwrap();

    let site = find(&doc, "SiteHydro");
    let communes: Vec<&str> = site
        .children()
        .filter(|n| n.has_tag_name("CdCommune"))
        .filter_map(|n| n.text())
        .collect();
    assert_eq!(communes, ["75056", "94041"]);

    let stations: Vec<Node<'_, '_>> = find(&doc, "StationsHydro")
        .children()
        .filter(|n| n.has_tag_name("StationHydro"))
        .collect();
    assert_eq!(stations.len(), 2);
}

#[test]
fn test_site_threshold_with_two_site_values_is_rejected() {
    let mut seuil = sample_seuil();
    let site = Sitehydro::new("A1234567").unwrap();
    seuil.valeurs.push(ValeurSeuil::new(site.into(), Some(1500.0)).unwrap());

    let seuils = vec![seuil];
    let result = to_xml(&Payload {
        seuilshydro: &seuils,
        ..Payload::default()
    });
    assert!(matches!(result, Err(Error::InvalidArgument { .. })));
}

#[test]
fn test_threshold_on_wrong_entity_kind() {
    let mut seuil = sample_seuil();
    seuil.entite = Station::new("A123456701").unwrap().into();
    let seuils = vec![seuil];
    let result = to_xml(&Payload {
        seuilshydro: &seuils,
        ..Payload::default()
    });
    assert!(matches!(result, Err(Error::EntityKind { .. })));

    let mut seuil = sample_seuil();
    let capteur = Capteur::new("A12345670101").unwrap();
    seuil.valeurs = vec![ValeurSeuil::new(capteur.into(), None).unwrap()];
    let seuils = vec![seuil];
    let result = to_xml(&Payload {
        seuilshydro: &seuils,
        ..Payload::default()
    });
    assert!(matches!(result, Err(Error::EntityKind { .. })));
}

#[test]
fn test_threshold_values_split_by_entity() {
    let seuils = vec![sample_seuil()];
    let story = build_document(&Payload {
        seuilshydro: &seuils,
        ..Payload::default()
    })
    .unwrap();
    assert!(story.get("RefHyd").is_some());

    let xml = to_xml(&Payload {
        seuilshydro: &seuils,
        ..Payload::default()
    })
    .unwrap();
    let doc = Document::parse(&xml).unwrap();
    assert_eq!(text_of(&doc, "ValValeurSeuilSiteHydro"), "1200");
    assert_eq!(text_of(&doc, "ValValeurSeuilStationHydro"), "3.25");
    assert_eq!(text_of(&doc, "PublicationSeuilHydro"), "true");
    assert_eq!(
        child_tags(find(&doc, "ValeurSeuilStationHydro"))[0],
        "CdStationHydro"
    );
}

#[test]
fn test_simulation_layout() {
    let simulations = vec![sample_simulation()];
    let xml = to_xml(&Payload {
        simulations: &simulations,
        ..Payload::default()
    })
    .unwrap();
    let doc = Document::parse(&xml).unwrap();

    assert_eq!(
        child_tags(find(&doc, "Simul")),
        [
            "GrdSimul",
            "DtProdSimul",
            "IndiceQualiteSimul",
            "StatutSimul",
            "PubliSimul",
            "ComSimul",
            "CdStationHydro",
            "CdModelePrevision",
            "CdContact",
            "Prevs"
        ]
    );
    assert!(xml.contains("<ComSimul/>"));
    assert_eq!(text_of(&doc, "PubliSimul"), "true");

    let first = find(&doc, "Prev");
    assert_eq!(
        child_tags(first),
        ["DtPrev", "ResMoyPrev", "ResMinPrev", "ResMaxPrev", "ProbsPrev"]
    );
    assert_eq!(text_of(&doc, "ResMoyPrev"), "20");
    assert_eq!(text_of(&doc, "PProbPrev"), "20");
    assert_eq!(text_of(&doc, "ResProbPrev"), "15.5");

    let prevs: Vec<Node<'_, '_>> = find(&doc, "Prevs")
        .children()
        .filter(|n| n.has_tag_name("Prev"))
        .collect();
    assert_eq!(prevs.len(), 2);
    assert_eq!(child_tags(prevs[1]), ["DtPrev", "ResMoyPrev"]);
}

#[test]
fn test_serie_dates_fall_back_to_observations() {
    let observations = Observations::new(vec![
        ObservationHydro::new(dt("2020-05-01T06:00:00"), 1.0).unwrap(),
        ObservationHydro::new(dt("2020-05-01T07:00:00"), 1.1).unwrap(),
    ]);
    let serie = SerieHydro::new(Sitehydro::new("A1234567").unwrap().into(), "Q")
        .unwrap()
        .with_observations(observations);
    let series = vec![serie, sample_serie()];

    let xml = to_xml(&Payload {
        serieshydro: &series,
        ..Payload::default()
    })
    .unwrap();
    let doc = Document::parse(&xml).unwrap();

    let first = find(&doc, "Serie");
    assert_eq!(
        child_tags(first),
        ["CdSiteHydro", "GrdSerie", "DtDebSerie", "DtFinSerie", "ObssHydro"]
    );
    assert_eq!(text_of(&doc, "DtDebSerie"), "2020-05-01T06:00:00");
    assert_eq!(text_of(&doc, "DtFinSerie"), "2020-05-01T07:00:00");
}
