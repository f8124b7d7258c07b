//! SANDRE Hydrometrie v1.1 document parser
//!
//! Walks a namespace-free `roxmltree` document depth first, mirroring the
//! builder's skeleton. Leaf text is coerced to the attribute's type at
//! extraction; failures carry the slash-separated tag path.

use super::tags;
use super::to_xml::{entite_tag, Payload};
use crate::app::models::entite::HYDRO_KINDS;
use crate::app::models::evenement::EVENEMENT_KINDS;
use crate::app::models::simulation::SIMULATION_KINDS;
use crate::app::models::validation::parse_datetime;
use crate::app::models::{
    Actor, Capteur, Contact, Coord, CourbeCorrection, CourbeTarage, Entite, EntiteKind,
    Evenement, Grandeur, HauteurJaugeage, Intervenant, Jaugeage, ObservationHydro,
    ObservationMeteo, Observations, Origine, PeriodeCT, PivotCC, PivotCT, Scenario, SerieHydro,
    SerieMeteo, SeuilHydro, Simulation, Sitehydro, Sitemeteo, Station, ValeurSeuil,
};
use crate::constants::{
    probabilite, SCENARIO_CODE, SCENARIO_NAME, SCENARIO_VERSION, XML_RESERVED_NAMESPACE, XML_ROOT,
};
use crate::{Error, Result};
use chrono::NaiveDateTime;
use regex::bytes::Regex;
use roxmltree::{Document, Node};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::{debug, info};

/// Content of a parsed document; `None` marks an absent section
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlDocument {
    pub scenario: Option<Scenario>,
    pub siteshydro: Option<Vec<Sitehydro>>,
    pub sitesmeteo: Option<Vec<Sitemeteo>>,
    pub seuilshydro: Option<Vec<SeuilHydro>>,
    pub evenements: Option<Vec<Evenement>>,
    pub courbestarage: Option<Vec<CourbeTarage>>,
    pub jaugeages: Option<Vec<Jaugeage>>,
    pub courbescorrection: Option<Vec<CourbeCorrection>>,
    pub serieshydro: Option<Vec<SerieHydro>>,
    pub seriesmeteo: Option<Vec<SerieMeteo>>,
    pub simulations: Option<Vec<Simulation>>,
}

impl XmlDocument {
    /// Borrow the content for serialization; absent sections are empty
    pub fn payload(&self) -> Payload<'_> {
        Payload {
            scenario: self.scenario.as_ref(),
            siteshydro: self.siteshydro.as_deref().unwrap_or_default(),
            sitesmeteo: self.sitesmeteo.as_deref().unwrap_or_default(),
            seuilshydro: self.seuilshydro.as_deref().unwrap_or_default(),
            evenements: self.evenements.as_deref().unwrap_or_default(),
            courbestarage: self.courbestarage.as_deref().unwrap_or_default(),
            jaugeages: self.jaugeages.as_deref().unwrap_or_default(),
            courbescorrection: self.courbescorrection.as_deref().unwrap_or_default(),
            serieshydro: self.serieshydro.as_deref().unwrap_or_default(),
            seriesmeteo: self.seriesmeteo.as_deref().unwrap_or_default(),
            simulations: self.simulations.as_deref().unwrap_or_default(),
        }
    }
}

/// Encoding declared in the XML prolog
static DECLARED_ENCODING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?-u:\xEF\xBB\xBF)?<\?xml[^>]*encoding\s*=\s*["']([A-Za-z0-9._:-]+)["']"#)
        .expect("valid encoding regex")
});

/// Parse a document from a file
pub fn parse_file(path: &Path) -> Result<XmlDocument> {
    let bytes = std::fs::read(path)
        .map_err(|e| Error::io(format!("Failed to read file: {}", path.display()), e))?;
    let document = parse_bytes(&bytes)?;
    info!("Parsed XML document {}", path.display());
    Ok(document)
}

/// Parse a document from any reader
pub fn parse_reader<R: Read>(mut reader: R) -> Result<XmlDocument> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| Error::io("Failed to read XML input", e))?;
    parse_bytes(&bytes)
}

/// Parse raw bytes, honouring a BOM or the declared encoding
pub fn parse_bytes(bytes: &[u8]) -> Result<XmlDocument> {
    let encoding = DECLARED_ENCODING
        .captures(bytes)
        .and_then(|caps| encoding_rs::Encoding::for_label(&caps[1]))
        .unwrap_or(encoding_rs::UTF_8);
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(Error::format(
            "document",
            format!("byte sequence not valid {}", used.name()),
        ));
    }
    parse_str(&text)
}

/// Parse a document held in a string
pub fn parse_str(content: &str) -> Result<XmlDocument> {
    let document = Document::parse(content.trim_start_matches('\u{feff}'))?;
    let root = document.root_element();

    reject_namespaces(root)?;
    if root.tag_name().name() != XML_ROOT {
        return Err(Error::format(
            format!("/{}", root.tag_name().name()),
            format!("unexpected root element, expected <{XML_ROOT}>"),
        ));
    }

    let root = Element::root(root);
    let scenario = root.child(tags::SCENARIO)?.map(|e| parse_scenario(&e)).transpose()?;

    let mut parsed = XmlDocument {
        scenario,
        ..XmlDocument::default()
    };

    if let Some(refhyd) = root.child(tags::REFHYD)? {
        parsed.siteshydro =
            refhyd.collection(tags::SITES_HYDRO, tags::SITE_HYDRO, parse_sitehydro)?;
        parsed.sitesmeteo =
            refhyd.collection(tags::SITES_METEO, tags::SITE_METEO, parse_sitemeteo)?;
        parsed.seuilshydro =
            refhyd.collection(tags::SEUILS_HYDRO, tags::SEUIL_HYDRO, parse_seuilhydro)?;
    }

    if let Some(donnees) = root.child(tags::DONNEES)? {
        parsed.evenements = donnees.collection(tags::EVENEMENTS, tags::EVENEMENT, parse_evenement)?;
        parsed.courbestarage =
            donnees.collection(tags::COURBES_TARAGE, tags::COURBE_TARAGE, parse_courbetarage)?;
        parsed.jaugeages = donnees.collection(tags::JAUGEAGES, tags::JAUGEAGE, parse_jaugeage)?;
        parsed.courbescorrection = donnees.collection(
            tags::COURBES_CORRECTION,
            tags::COURBE_CORRECTION,
            parse_courbecorrection,
        )?;
        parsed.serieshydro = donnees.collection(tags::SERIES, tags::SERIE, parse_seriehydro)?;
        parsed.seriesmeteo =
            donnees.collection(tags::SERIES_METEO, tags::SERIE_METEO, parse_seriemeteo)?;
        parsed.simulations =
            donnees.collection(tags::SIMULATIONS, tags::SIMULATION, parse_simulation)?;
    }

    debug!("Parsed document sections: {:?}", section_counts(&parsed));
    Ok(parsed)
}

fn section_counts(parsed: &XmlDocument) -> Vec<(&'static str, usize)> {
    let count = |len: Option<usize>| len.unwrap_or(0);
    vec![
        ("siteshydro", count(parsed.siteshydro.as_ref().map(Vec::len))),
        ("sitesmeteo", count(parsed.sitesmeteo.as_ref().map(Vec::len))),
        ("seuilshydro", count(parsed.seuilshydro.as_ref().map(Vec::len))),
        ("evenements", count(parsed.evenements.as_ref().map(Vec::len))),
        ("serieshydro", count(parsed.serieshydro.as_ref().map(Vec::len))),
        ("seriesmeteo", count(parsed.seriesmeteo.as_ref().map(Vec::len))),
        ("simulations", count(parsed.simulations.as_ref().map(Vec::len))),
    ]
}

/// Any namespace other than the implicit `xml` one is rejected
fn reject_namespaces(root: Node<'_, '_>) -> Result<()> {
    for node in root.descendants().filter(Node::is_element) {
        let declared = node
            .namespaces()
            .find(|ns| ns.uri() != XML_RESERVED_NAMESPACE)
            .map(|ns| ns.uri().to_string())
            .or_else(|| node.tag_name().namespace().map(str::to_string));
        if let Some(uri) = declared {
            return Err(Error::format(
                format!("/{}", node.tag_name().name()),
                format!("XML namespaces are not supported (found '{uri}')"),
            ));
        }
    }
    Ok(())
}

// =============================================================================
// Element navigation
// =============================================================================

/// Element node with its tag path, for error reporting
struct Element<'a, 'input> {
    node: Node<'a, 'input>,
    path: String,
}

impl<'a, 'input> Element<'a, 'input> {
    fn root(node: Node<'a, 'input>) -> Self {
        Self {
            path: format!("/{}", node.tag_name().name()),
            node,
        }
    }

    fn path_of(&self, tag: &str) -> String {
        format!("{}/{}", self.path, tag)
    }

    fn children(&self, tag: &str) -> Vec<Element<'a, 'input>> {
        self.node
            .children()
            .filter(|n| n.is_element() && n.tag_name().name() == tag)
            .map(|node| Element {
                node,
                path: self.path_of(tag),
            })
            .collect()
    }

    /// Single child; a repeated tag is a format error
    fn child(&self, tag: &str) -> Result<Option<Element<'a, 'input>>> {
        let mut children = self.children(tag);
        if children.len() > 1 {
            return Err(Error::format(self.path_of(tag), "duplicate element"));
        }
        Ok(children.pop())
    }

    fn required_child(&self, tag: &str) -> Result<Element<'a, 'input>> {
        self.child(tag)?
            .ok_or_else(|| Error::format(self.path_of(tag), "missing mandatory element"))
    }

    /// Trimmed text of a single child; empty text reads as absent
    fn text(&self, tag: &str) -> Result<Option<String>> {
        Ok(self
            .child(tag)?
            .and_then(|child| child.node.text().map(|t| t.trim().to_string()))
            .filter(|text| !text.is_empty()))
    }

    fn required_text(&self, tag: &str) -> Result<String> {
        self.text(tag)?
            .ok_or_else(|| Error::format(self.path_of(tag), "missing mandatory value"))
    }

    /// Texts of a repeated leaf
    fn texts(&self, tag: &str) -> Vec<String> {
        self.children(tag)
            .iter()
            .filter_map(|child| child.node.text())
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .collect()
    }

    fn parsed<T: FromStr>(&self, tag: &str) -> Result<Option<T>> {
        match self.text(tag)? {
            None => Ok(None),
            Some(text) => text.parse::<T>().map(Some).map_err(|_| {
                Error::format(self.path_of(tag), format!("invalid value '{text}'"))
            }),
        }
    }

    fn required_parsed<T: FromStr>(&self, tag: &str) -> Result<T> {
        self.parsed(tag)?
            .ok_or_else(|| Error::format(self.path_of(tag), "missing mandatory value"))
    }

    fn datetime(&self, tag: &str) -> Result<Option<NaiveDateTime>> {
        match self.text(tag)? {
            None => Ok(None),
            Some(text) => parse_datetime(&text).map(Some).map_err(|_| {
                Error::format(self.path_of(tag), format!("invalid datetime '{text}'"))
            }),
        }
    }

    fn required_datetime(&self, tag: &str) -> Result<NaiveDateTime> {
        self.datetime(tag)?
            .ok_or_else(|| Error::format(self.path_of(tag), "missing mandatory value"))
    }

    /// `true|false|1|0`, case-insensitive
    fn boolean(&self, tag: &str) -> Result<Option<bool>> {
        match self.text(tag)? {
            None => Ok(None),
            Some(text) => match text.to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(Some(true)),
                "false" | "0" => Ok(Some(false)),
                _ => Err(Error::format(
                    self.path_of(tag),
                    format!("invalid boolean '{text}'"),
                )),
            },
        }
    }

    /// Items of a container element; `None` when the container is absent
    fn collection<T>(
        &self,
        container: &str,
        item: &str,
        parse: fn(&Element<'a, 'input>) -> Result<T>,
    ) -> Result<Option<Vec<T>>> {
        match self.child(container)? {
            None => Ok(None),
            Some(container) => container
                .children(item)
                .iter()
                .map(parse)
                .collect::<Result<Vec<T>>>()
                .map(Some),
        }
    }

    /// Items of an optional container, empty when absent
    fn items<T>(
        &self,
        container: &str,
        item: &str,
        parse: fn(&Element<'a, 'input>) -> Result<T>,
    ) -> Result<Vec<T>> {
        Ok(self.collection(container, item, parse)?.unwrap_or_default())
    }

    /// Wrap a constructor failure with this element's path
    fn build<T>(&self, result: Result<T>) -> Result<T> {
        result.map_err(|e| {
            if e.is_format() {
                e
            } else {
                Error::construction_at_path(self.path.clone(), e)
            }
        })
    }

    /// Entity referenced by exactly one code tag among `kinds`
    fn entite(&self, kinds: &[EntiteKind]) -> Result<Entite> {
        let mut found = Vec::new();
        for kind in kinds {
            if let Some(code) = self.text(entite_tag(*kind))? {
                found.push((*kind, code));
            }
        }
        if found.len() > 1 {
            return Err(Error::format(
                self.path.clone(),
                "more than one entity reference",
            ));
        }
        let Some((kind, code)) = found.pop() else {
            let expected: Vec<&str> = kinds.iter().map(|k| entite_tag(*k)).collect();
            return Err(Error::format(
                self.path.clone(),
                format!("missing entity reference ({})", expected.join(" | ")),
            ));
        };
        self.build(match kind {
            EntiteKind::SiteHydro => Sitehydro::new(&code).map(Entite::from),
            EntiteKind::Station => Station::new(&code).map(Entite::from),
            EntiteKind::Capteur => Capteur::new(&code).map(Entite::from),
            EntiteKind::SiteMeteo => Sitemeteo::new(&code).map(Entite::from),
        })
    }

    fn contact(&self) -> Result<Option<Contact>> {
        match self.text(tags::CD_CONTACT)? {
            None => Ok(None),
            Some(code) => self.build(Contact::new(&code)).map(Some),
        }
    }

    fn coord(&self, tag: &str, [x, y, proj]: [&str; 3]) -> Result<Option<Coord>> {
        match self.child(tag)? {
            None => Ok(None),
            Some(coord) => {
                let value = Coord::new(
                    coord.required_parsed(x)?,
                    coord.required_parsed(y)?,
                    coord.required_parsed(proj)?,
                );
                coord.build(value).map(Some)
            }
        }
    }
}

// =============================================================================
// Scenario
// =============================================================================

fn parse_scenario(el: &Element<'_, '_>) -> Result<Scenario> {
    for (tag, expected, mandatory) in [
        ("CodeScenario", SCENARIO_CODE, true),
        ("VersionScenario", SCENARIO_VERSION, true),
        ("NomScenario", SCENARIO_NAME, false),
    ] {
        let value = if mandatory {
            Some(el.required_text(tag)?)
        } else {
            el.text(tag)?
        };
        if let Some(value) = value {
            if value != expected {
                return Err(Error::format(
                    el.path_of(tag),
                    format!("unsupported value '{value}', expected '{expected}'"),
                ));
            }
        }
    }

    let production = el.required_datetime("DateHeureCreationFichier")?;
    let emetteur = parse_actor(&el.required_child("Emetteur")?)?;
    let destinataire = parse_actor(&el.required_child("Destinataire")?)?;

    el.build(Scenario::from_parts(
        Some(emetteur),
        Some(destinataire),
        Some(production.into()),
    ))
}

/// Intervenant, or contact owned by the sibling intervenant
fn parse_actor(el: &Element<'_, '_>) -> Result<Actor> {
    let intervenant_el = el.required_child("CdIntervenant")?;
    let code = el.required_text("CdIntervenant")?;
    let origine = match intervenant_el.node.attribute("schemeAgencyID") {
        Some(scheme) => intervenant_el.build(scheme.parse::<Origine>())?,
        None => Origine::default(),
    };

    let mut intervenant = el.build(Intervenant::new(&code, origine))?;
    intervenant.nom = el.text("NomIntervenant")?;
    intervenant.mnemo = el.text("MnIntervenant")?;

    match el.contact()? {
        None => Ok(Actor::Intervenant(intervenant)),
        Some(mut contact) => {
            contact.nom = el.text("NomContact")?;
            contact.prenom = el.text("PrenomContact")?;
            contact.intervenant = Some(intervenant);
            Ok(Actor::Contact(contact))
        }
    }
}

// =============================================================================
// RefHyd
// =============================================================================

fn parse_sitehydro(el: &Element<'_, '_>) -> Result<Sitehydro> {
    let code = el.required_text(tags::CD_SITE_HYDRO)?;
    let mut site = el.build(Sitehydro::new(&code))?;
    if let Some(typesite) = el.text("TypSiteHydro")? {
        site = el.build(site.with_typesite(&typesite))?;
    }
    site.libelle = el.text("LbSiteHydro")?;
    site.libelleusuel = el.text("LbUsuelSiteHydro")?;
    site.coord = el.coord("CoordSiteHydro", tags::COORD_SITE_HYDRO)?;
    site.communes = el.texts(tags::CD_COMMUNE);
    site.stations = el.items("StationsHydro", "StationHydro", parse_station)?;

    el.build(site.validate())?;
    Ok(site)
}

fn parse_station(el: &Element<'_, '_>) -> Result<Station> {
    let code = el.required_text(tags::CD_STATION_HYDRO)?;
    let mut station = el.build(Station::new(&code))?;
    if let Some(typestation) = el.text("TypStationHydro")? {
        station = el.build(station.with_typestation(&typestation))?;
    }
    station.libelle = el.text("LbStationHydro")?;
    station.coord = el.coord("CoordStationHydro", tags::COORD_STATION_HYDRO)?;
    station.commune = el.text(tags::CD_COMMUNE)?;
    station.capteurs = el.items("Capteurs", "Capteur", parse_capteur)?;
    Ok(station)
}

fn parse_capteur(el: &Element<'_, '_>) -> Result<Capteur> {
    let code = el.required_text(tags::CD_CAPTEUR)?;
    let mut capteur = el.build(Capteur::new(&code))?;
    capteur.libelle = el.text("LbCapteur")?;
    if let Some(typemesure) = el.text("TypMesureCapteur")? {
        capteur.typemesure = typemesure;
    }
    el.build(capteur.validate())?;
    Ok(capteur)
}

fn parse_sitemeteo(el: &Element<'_, '_>) -> Result<Sitemeteo> {
    let code = el.required_text(tags::CD_SITE_METEO)?;
    let mut site = el.build(Sitemeteo::new(&code))?;
    site.libelle = el.text("LbSiteMeteo")?;
    site.libelleusuel = el.text("LbUsuelSiteMeteo")?;
    site.coord = el.coord("CoordSiteMeteo", tags::COORD_SITE_METEO)?;
    site.commune = el.text(tags::CD_COMMUNE)?;
    site.grandeurs = el.items("GrdsMeteo", "GrdMeteo", parse_grandeur)?;
    el.build(site.validate())?;
    Ok(site)
}

fn parse_grandeur(el: &Element<'_, '_>) -> Result<Grandeur> {
    let mut grandeur = el.build(Grandeur::new(&el.required_text(tags::CD_GRD_METEO)?))?;
    grandeur.dtmiseservice = el.datetime("DtMiseServiceGrdMeteo")?;
    grandeur.dtfermeture = el.datetime("DtFermetureServiceGrdMeteo")?;
    Ok(grandeur)
}

fn parse_seuilhydro(el: &Element<'_, '_>) -> Result<SeuilHydro> {
    let code = el.required_text(tags::CD_SEUIL_HYDRO)?;
    let site = el.build(Sitehydro::new(&el.required_text(tags::CD_SITE_HYDRO)?))?;

    let mut seuil = el.build(SeuilHydro::new(&code, site.clone().into()))?;
    if let Some(typeseuil) = el.parsed("TypSeuilHydro")? {
        seuil.typeseuil = typeseuil;
    }
    seuil.nature = el.parsed("NatureSeuilHydro")?;
    seuil.duree = el.parsed("DureeSeuilHydro")?;
    seuil.libelle = el.text("LbUsuelSeuilHydro")?;
    seuil.mnemo = el.text("MnSeuilHydro")?;
    seuil.gravite = el.parsed("IndiceGraviteSeuilHydro")?;
    seuil.commentaire = el.text("ComSeuilHydro")?;
    seuil.publication = el.boolean("PublicationSeuilHydro")?;

    let site_values = el
        .child(tags::VALEURS_SEUIL_SITE)?
        .map(|container| container.children(tags::VALEUR_SEUIL_SITE))
        .unwrap_or_default();
    for value in &site_values {
        let mut valeur = value.build(ValeurSeuil::new(
            site.clone().into(),
            value.parsed("ValValeurSeuilSiteHydro")?,
        ))?;
        valeur.tolerance = value.parsed("ToleranceValeurSeuilSiteHydro")?;
        valeur.dtactivation = value.datetime("DtActivationValeurSeuilSiteHydro")?;
        valeur.dtdesactivation = value.datetime("DtDesactivationValeurSeuilSiteHydro")?;
        seuil.valeurs.push(valeur);
    }

    let station_values = el
        .child("ValeursSeuilStationHydro")?
        .map(|container| container.children("ValeurSeuilStationHydro"))
        .unwrap_or_default();
    for value in &station_values {
        let station = value.build(Station::new(&value.required_text(tags::CD_STATION_HYDRO)?))?;
        let mut valeur = value.build(ValeurSeuil::new(
            station.into(),
            value.parsed("ValValeurSeuilStationHydro")?,
        ))?;
        valeur.tolerance = value.parsed("ToleranceValeurSeuilStationHydro")?;
        valeur.dtactivation = value.datetime("DtActivationValeurSeuilStationHydro")?;
        valeur.dtdesactivation = value.datetime("DtDesactivationValeurSeuilStationHydro")?;
        seuil.valeurs.push(valeur);
    }

    el.build(seuil.validate())?;
    Ok(seuil)
}

// =============================================================================
// Donnees
// =============================================================================

fn parse_evenement(el: &Element<'_, '_>) -> Result<Evenement> {
    let entite = el.entite(EVENEMENT_KINDS)?;
    let contact = el
        .contact()?
        .ok_or_else(|| Error::format(el.path_of(tags::CD_CONTACT), "missing mandatory value"))?;

    let mut evenement = el.build(Evenement::new(
        entite,
        contact,
        el.required_datetime("DtEvenement")?,
        &el.required_text("DescEvenement")?,
    ))?;
    if let Some(publication) = el.parsed("TypPubliEvenement")? {
        evenement.publication = publication;
    }
    evenement.dtmaj = el.datetime("DtMajEvenement")?;
    el.build(evenement.validate())?;
    Ok(evenement)
}

fn parse_courbetarage(el: &Element<'_, '_>) -> Result<CourbeTarage> {
    let station = el.build(Station::new(&el.required_text(tags::CD_STATION_HYDRO)?))?;
    let mut courbe = el.build(CourbeTarage::new(
        &el.required_text("CdCourbeTarage")?,
        &el.required_text("LbCourbeTarage")?,
        station,
    ))?;
    if let Some(typect) = el.parsed("TypCourbeTarage")? {
        courbe.typect = typect;
    }
    courbe.limiteinf = el.parsed("LimiteInfCourbeTarage")?;
    courbe.limitesup = el.parsed("LimiteSupCourbeTarage")?;
    courbe.commentaire = el.text("ComCourbeTarage")?;
    courbe.contact = el.contact()?;
    courbe.pivots = el.items("PivotsCourbeTarage", "PivotCourbeTarage", |pivot| {
        Ok(PivotCT {
            hauteur: pivot.required_parsed("HtPivotCourbeTarage")?,
            debit: pivot.required_parsed("QPivotCourbeTarage")?,
            qualite: pivot.parsed("QualifPivotCourbeTarage")?,
        })
    })?;
    courbe.periodes = el.items(
        "PeriodesUtilisationCourbeTarage",
        "PeriodeUtilisationCourbeTarage",
        |periode| {
            Ok(PeriodeCT {
                dtdeb: periode.required_datetime("DtDebPeriodeUtilisationCourbeTarage")?,
                dtfin: periode.datetime("DtFinPeriodeUtilisationCourbeTarage")?,
                etat: periode.required_parsed("EtatPeriodeUtilisationCourbeTarage")?,
            })
        },
    )?;
    courbe.dtmaj = el.datetime("DtMajCourbeTarage")?;
    el.build(courbe.validate())?;
    Ok(courbe)
}

fn parse_jaugeage(el: &Element<'_, '_>) -> Result<Jaugeage> {
    let site = el.build(Sitehydro::new(&el.required_text(tags::CD_SITE_HYDRO)?))?;
    let mut jaugeage = Jaugeage::new(site);
    jaugeage.code = el.text("CdJaugeage")?;
    jaugeage.debit = el.parsed("DebitJaugeage")?;
    jaugeage.dtdeb = el.datetime("DtDebJaugeage")?;
    jaugeage.dtfin = el.datetime("DtFinJaugeage")?;
    jaugeage.mode = el.parsed("ModeJaugeage")?;
    jaugeage.commentaire = el.text("ComJaugeage")?;
    jaugeage.hauteurs = el.items("HauteursJaugeage", "HauteurJaugeage", |hauteur| {
        Ok(HauteurJaugeage {
            station: hauteur.build(Station::new(&hauteur.required_text(tags::CD_STATION_HYDRO)?))?,
            coteretenue: hauteur.parsed("CoteRetenueHauteurJaugeage")?,
            cotedeb: hauteur.parsed("CoteDebHauteurJaugeage")?,
            cotefin: hauteur.parsed("CoteFinHauteurJaugeage")?,
        })
    })?;
    jaugeage.dtmaj = el.datetime("DtMajJaugeage")?;
    el.build(jaugeage.validate())?;
    Ok(jaugeage)
}

fn parse_courbecorrection(el: &Element<'_, '_>) -> Result<CourbeCorrection> {
    let station = el.build(Station::new(&el.required_text(tags::CD_STATION_HYDRO)?))?;
    let mut courbe = CourbeCorrection::new(station);
    courbe.libelle = el.text("LbCourbeCorrH")?;
    courbe.commentaire = el.text("ComCourbeCorrH")?;
    courbe.pivots = el.items("PivotsCourbeCorrH", "PivotCourbeCorrH", |pivot| {
        Ok(PivotCC {
            dte: pivot.required_datetime("DtPivotCourbeCorrH")?,
            deltah: pivot.required_parsed("DeltaHPivotCourbeCorrH")?,
            dtactivation: pivot.datetime("DtActivationPivotCourbeCorrH")?,
            dtdesactivation: pivot.datetime("DtDesactivationPivotCourbeCorrH")?,
        })
    })?;
    courbe.dtmaj = el.datetime("DtMajCourbeCorrH")?;
    el.build(courbe.validate())?;
    Ok(courbe)
}

fn parse_seriehydro(el: &Element<'_, '_>) -> Result<SerieHydro> {
    let entite = el.entite(HYDRO_KINDS)?;
    let mut serie = el.build(SerieHydro::new(entite, &el.required_text("GrdSerie")?))?;
    serie.dtdeb = el.datetime("DtDebSerie")?;
    serie.dtfin = el.datetime("DtFinSerie")?;
    serie.statut = el.parsed("StatutSerie")?;
    serie.dtprod = el.datetime("DtProdSerie")?;

    let rows = el.items("ObssHydro", "ObsHydro", |obs| {
        let mut observation = obs.build(ObservationHydro::new(
            obs.required_datetime("DtObsHydro")?,
            obs.required_parsed("ResObsHydro")?,
        ))?;
        observation.mth = obs.parsed("MethObsHydro")?;
        observation.qal = obs.parsed("QualObsHydro")?;
        observation.cnt = obs.parsed("ContObsHydro")?;
        Ok(observation)
    })?;
    serie.observations = Observations::new(rows);

    el.build(serie.validate())?;
    Ok(serie)
}

fn parse_seriemeteo(el: &Element<'_, '_>) -> Result<SerieMeteo> {
    let site = el.build(Sitemeteo::new(&el.required_text(tags::CD_SITE_METEO)?))?;
    let grandeur = el.build(Grandeur::new(&el.required_text(tags::CD_GRD_METEO)?))?;

    let mut serie = SerieMeteo::new(site, grandeur);
    serie.duree = el.parsed("DureeSerieMeteo")?;
    serie.dtdeb = el.datetime("DtDebSerieMeteo")?;
    serie.dtfin = el.datetime("DtFinSerieMeteo")?;
    serie.dtprod = el.datetime("DtProdSerieMeteo")?;
    serie.statut = el.parsed("StatutSerieMeteo")?;

    let rows = el.items("ObssMeteo", "ObsMeteo", |obs| {
        let mut observation = obs.build(ObservationMeteo::new(
            obs.required_datetime("DtObsMeteo")?,
            obs.required_parsed("ResObsMeteo")?,
        ))?;
        observation.mth = obs.parsed("MethObsMeteo")?;
        observation.qal = obs.parsed("QualObsMeteo")?;
        observation.qua = obs.parsed("IndiceQualObsMeteo")?;
        Ok(observation)
    })?;
    serie.observations = Observations::new(rows);

    el.build(serie.validate())?;
    Ok(serie)
}

fn parse_simulation(el: &Element<'_, '_>) -> Result<Simulation> {
    let entite = el.entite(SIMULATION_KINDS)?;
    let mut simulation = el.build(Simulation::new(
        entite,
        &el.required_text("CdModelePrevision")?,
        &el.required_text("GrdSimul")?,
        el.required_datetime("DtProdSimul")?,
    ))?;
    simulation.qualite = el.parsed("IndiceQualiteSimul")?;
    if let Some(statut) = el.parsed("StatutSimul")? {
        simulation.statut = statut;
    }
    if let Some(public) = el.boolean("PubliSimul")? {
        simulation.public = public;
    }
    simulation.commentaire = el.text("ComSimul")?;
    simulation.contact = el.contact()?;

    for prev in el.child("Prevs")?.map(|c| c.children("Prev")).unwrap_or_default() {
        let dte = prev.required_datetime("DtPrev")?;
        let mut values = Vec::new();
        for (tag, prob) in [
            ("ResMoyPrev", probabilite::MOY),
            ("ResMinPrev", probabilite::MIN),
            ("ResMaxPrev", probabilite::MAX),
        ] {
            if let Some(res) = prev.parsed::<f64>(tag)? {
                values.push((prob, res));
            }
        }
        for prob in prev.items("ProbsPrev", "ProbPrev", |p| {
            Ok((p.required_parsed::<u8>("PProbPrev")?, p.required_parsed::<f64>("ResProbPrev")?))
        })? {
            values.push(prob);
        }
        for (prob, res) in values {
            prev.build(simulation.previsions.insert(dte, prob, res))?;
        }
    }

    el.build(simulation.validate())?;
    Ok(simulation)
}
