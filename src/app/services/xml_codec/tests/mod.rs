//! Test utilities for XML codec testing
//!
//! `sample_document` fills every section with records whose fields all
//! survive serialization, so a parsed copy compares equal to the original.

use chrono::NaiveDateTime;

use crate::app::models::validation::parse_datetime;
use crate::app::models::{
    Capteur, Contact, Coord, CourbeCorrection, CourbeTarage, Evenement, Grandeur,
    HauteurJaugeage, Intervenant, Jaugeage, ObservationHydro, ObservationMeteo, Observations,
    Origine, PeriodeCT, PivotCC, PivotCT, Scenario, SerieHydro, SerieMeteo, SeuilHydro,
    Simulation, Sitehydro, Sitemeteo, Station, ValeurSeuil,
};
use crate::app::services::xml_codec::XmlDocument;

// Test modules
mod builder_tests;

pub fn dt(text: &str) -> NaiveDateTime {
    parse_datetime(text).unwrap()
}

/// Contact sender and SIRET intervenant recipient
pub fn sample_scenario() -> Scenario {
    let schapi = Intervenant::new("1537", Origine::Sandre)
        .unwrap()
        .with_nom("SCHAPI");
    let emetteur = Contact::new("1")
        .unwrap()
        .with_nom("Dupont", Some("Jean".to_string()))
        .with_intervenant(schapi);
    let destinataire = Intervenant::new("12345678901234", Origine::Siret)
        .unwrap()
        .with_mnemo("DREAL");

    Scenario::new(emetteur, destinataire)
        .unwrap()
        .with_production_datetime("2010-02-26T12:53:10")
        .unwrap()
}

pub fn sample_sitehydro() -> Sitehydro {
    let mut capteur = Capteur::new("A12345670101").unwrap();
    capteur.libelle = Some("Radar".to_string());

    let mut station = Station::new("A123456701")
        .unwrap()
        .with_libelle("La Seine au pont d'Austerlitz")
        .with_typestation("LIMNIMERE")
        .unwrap();
    station.coord = Some(Coord::new(652_300.5, 6_861_000.0, 26).unwrap());
    station.commune = Some("75056".to_string());
    station.capteurs = vec![capteur];

    let mut site = Sitehydro::new("A1234567")
        .unwrap()
        .with_libelle("La Seine à Paris")
        .with_stations(vec![station, Station::new("A123456702").unwrap()]);
    site.libelleusuel = Some("Paris".to_string());
    site.coord = Some(Coord::new(652_000.0, 6_862_000.0, 26).unwrap());
    site.communes = vec!["75056".to_string(), "94041".to_string()];
    site
}

pub fn sample_sitemeteo() -> Sitemeteo {
    let mut grandeur = Grandeur::new("RR").unwrap();
    grandeur.dtmiseservice = Some(dt("1990-01-01T00:00:00"));

    let mut site = Sitemeteo::new("075056001").unwrap().with_libelle("Paris Montsouris");
    site.commune = Some("75056".to_string());
    site.grandeurs = vec![grandeur, Grandeur::new("TA").unwrap()];
    site
}

pub fn sample_seuil() -> SeuilHydro {
    let site = Sitehydro::new("A1234567").unwrap();
    let mut site_value = ValeurSeuil::new(site.clone().into(), Some(1200.0)).unwrap();
    site_value.tolerance = Some(5.0);
    site_value.dtactivation = Some(dt("2015-01-01T00:00:00"));
    let station_value =
        ValeurSeuil::new(Station::new("A123456701").unwrap().into(), Some(3.25)).unwrap();

    let mut seuil = SeuilHydro::new("1234", site.into())
        .unwrap()
        .with_valeurs(vec![site_value, station_value]);
    seuil.nature = Some(32);
    seuil.libelle = Some("Vigilance jaune".to_string());
    seuil.gravite = Some(40);
    seuil.publication = Some(true);
    seuil
}

pub fn sample_serie() -> SerieHydro {
    let mut first = ObservationHydro::new(dt("2010-02-26T12:00:00"), 3.2).unwrap();
    first.qal = Some(16);
    first.cnt = Some(0);
    let second = ObservationHydro::new(dt("2010-02-26T13:00:00"), 3.4).unwrap();

    let mut serie = SerieHydro::new(Station::new("A123456701").unwrap().into(), "H")
        .unwrap()
        .with_observations(Observations::new(vec![first, second]));
    serie.dtdeb = Some(dt("2010-02-26T12:00:00"));
    serie.dtfin = Some(dt("2010-02-26T13:00:00"));
    serie.statut = Some(4);
    serie.dtprod = Some(dt("2010-02-26T13:05:00"));
    serie
}

pub fn sample_simulation() -> Simulation {
    let mut simulation = Simulation::new(
        Station::new("A123456701").unwrap().into(),
        "13_08",
        "Q",
        dt("2010-02-26T14:45:00"),
    )
    .unwrap();
    simulation.qualite = Some(36);
    simulation.public = true;
    simulation.contact = Some(Contact::new("2").unwrap());
    let t = dt("2010-02-27T00:00:00");
    for (prob, res) in [(50, 20.0), (0, 10.0), (100, 30.0), (20, 15.5)] {
        simulation.previsions.insert(t, prob, res).unwrap();
    }
    simulation
        .previsions
        .insert(dt("2010-02-27T06:00:00"), 50, 22.0)
        .unwrap();
    simulation
}

/// Document with every section filled
pub fn sample_document() -> XmlDocument {
    let station = Station::new("A123456701").unwrap();

    let mut evenement = Evenement::new(
        station.clone().into(),
        Contact::new("1").unwrap(),
        dt("2010-02-26T09:00:00"),
        "Sonde remplacée",
    )
    .unwrap();
    evenement.publication = 12;

    let mut courbe = CourbeTarage::new("CT2010", "Courbe 2010", station.clone()).unwrap();
    courbe.limiteinf = Some(0.0);
    courbe.limitesup = Some(8.5);
    courbe.pivots = vec![
        PivotCT { hauteur: 0.5, debit: 12.0, qualite: Some(20) },
        PivotCT { hauteur: 2.5, debit: 150.75, qualite: None },
    ];
    courbe.periodes = vec![PeriodeCT {
        dtdeb: dt("2010-01-01T00:00:00"),
        dtfin: None,
        etat: 0,
    }];

    let mut jaugeage = Jaugeage::new(Sitehydro::new("A1234567").unwrap());
    jaugeage.code = Some("JG01".to_string());
    jaugeage.debit = Some(85.3);
    jaugeage.dtdeb = Some(dt("2010-02-20T10:00:00"));
    jaugeage.dtfin = Some(dt("2010-02-20T11:30:00"));
    jaugeage.hauteurs = vec![HauteurJaugeage {
        station: station.clone(),
        coteretenue: Some(1.85),
        cotedeb: Some(1.8),
        cotefin: Some(1.9),
    }];

    let mut correction = CourbeCorrection::new(station);
    correction.libelle = Some("Dérive capteur".to_string());
    correction.pivots = vec![PivotCC {
        dte: dt("2010-02-01T00:00:00"),
        deltah: -0.02,
        dtactivation: Some(dt("2010-02-02T00:00:00")),
        dtdesactivation: None,
    }];

    let mut meteo = SerieMeteo::new(
        Sitemeteo::new("075056001").unwrap(),
        Grandeur::new("RR").unwrap(),
    );
    meteo.duree = Some(60);
    meteo.dtdeb = Some(dt("2010-02-26T12:00:00"));
    meteo.dtfin = Some(dt("2010-02-26T12:00:00"));
    let mut obs = ObservationMeteo::new(dt("2010-02-26T12:00:00"), 2.4).unwrap();
    obs.qua = Some(88.5);
    meteo.observations = Observations::new(vec![obs]);

    XmlDocument {
        scenario: Some(sample_scenario()),
        siteshydro: Some(vec![sample_sitehydro(), Sitehydro::new("B7654321").unwrap()]),
        sitesmeteo: Some(vec![sample_sitemeteo()]),
        seuilshydro: Some(vec![sample_seuil()]),
        evenements: Some(vec![evenement]),
        courbestarage: Some(vec![courbe]),
        jaugeages: Some(vec![jaugeage]),
        courbescorrection: Some(vec![correction]),
        serieshydro: Some(vec![sample_serie()]),
        seriesmeteo: Some(vec![meteo]),
        simulations: Some(vec![sample_simulation()]),
    }
}

/// Wrap `RefHyd`/`Donnees` content in a minimal document
pub fn document(body: &str) -> String {
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<hydrometrie>{body}</hydrometrie>")
}
