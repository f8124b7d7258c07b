//! Exchange envelope: a scenario header plus named entity collections
//!
//! A [`Message`] reads and writes whole SANDRE documents through the XML
//! codec and accepts further collections with [`Message::add`]. A strict
//! message refuses to serialize without a scenario.

use crate::app::models::{
    Actor, CourbeCorrection, CourbeTarage, Evenement, Jaugeage, Scenario, SerieHydro, SerieMeteo,
    SeuilHydro, Simulation, Sitehydro, Sitemeteo,
};
use crate::app::services::csv_codec::Parsed;
use crate::app::services::xml_codec::{self, Payload, XmlDocument};
use crate::{Error, Result};
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// One named collection of entities
#[derive(Debug, Clone, PartialEq)]
pub enum Collection {
    SitesHydro(Vec<Sitehydro>),
    SitesMeteo(Vec<Sitemeteo>),
    SeuilsHydro(Vec<SeuilHydro>),
    Evenements(Vec<Evenement>),
    CourbesTarage(Vec<CourbeTarage>),
    Jaugeages(Vec<Jaugeage>),
    CourbesCorrection(Vec<CourbeCorrection>),
    SeriesHydro(Vec<SerieHydro>),
    SeriesMeteo(Vec<SerieMeteo>),
    Simulations(Vec<Simulation>),
}

impl Collection {
    /// Collection names, in document order
    pub const NAMES: [&'static str; 10] = [
        "siteshydro",
        "sitesmeteo",
        "seuilshydro",
        "evenements",
        "courbestarage",
        "jaugeages",
        "courbescorrection",
        "serieshydro",
        "seriesmeteo",
        "simulations",
    ];

    pub fn name(&self) -> &'static str {
        let index = match self {
            Collection::SitesHydro(_) => 0,
            Collection::SitesMeteo(_) => 1,
            Collection::SeuilsHydro(_) => 2,
            Collection::Evenements(_) => 3,
            Collection::CourbesTarage(_) => 4,
            Collection::Jaugeages(_) => 5,
            Collection::CourbesCorrection(_) => 6,
            Collection::SeriesHydro(_) => 7,
            Collection::SeriesMeteo(_) => 8,
            Collection::Simulations(_) => 9,
        };
        Self::NAMES[index]
    }

    pub fn len(&self) -> usize {
        match self {
            Collection::SitesHydro(v) => v.len(),
            Collection::SitesMeteo(v) => v.len(),
            Collection::SeuilsHydro(v) => v.len(),
            Collection::Evenements(v) => v.len(),
            Collection::CourbesTarage(v) => v.len(),
            Collection::Jaugeages(v) => v.len(),
            Collection::CourbesCorrection(v) => v.len(),
            Collection::SeriesHydro(v) => v.len(),
            Collection::SeriesMeteo(v) => v.len(),
            Collection::Simulations(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validate every entity of the collection
    pub fn validate(&self) -> Result<()> {
        match self {
            Collection::SitesHydro(v) => v.iter().try_for_each(Sitehydro::validate),
            Collection::SitesMeteo(v) => v.iter().try_for_each(Sitemeteo::validate),
            Collection::SeuilsHydro(v) => v.iter().try_for_each(SeuilHydro::validate),
            Collection::Evenements(v) => v.iter().try_for_each(Evenement::validate),
            Collection::CourbesTarage(v) => v.iter().try_for_each(CourbeTarage::validate),
            Collection::Jaugeages(v) => v.iter().try_for_each(Jaugeage::validate),
            Collection::CourbesCorrection(v) => v.iter().try_for_each(CourbeCorrection::validate),
            Collection::SeriesHydro(v) => v.iter().try_for_each(SerieHydro::validate),
            Collection::SeriesMeteo(v) => v.iter().try_for_each(SerieMeteo::validate),
            Collection::Simulations(v) => v.iter().try_for_each(Simulation::validate),
        }
    }
}

impl From<Parsed> for Collection {
    fn from(parsed: Parsed) -> Self {
        match parsed {
            Parsed::SitesHydro(v) => Collection::SitesHydro(v),
            Parsed::SitesMeteo(v) => Collection::SitesMeteo(v),
            Parsed::SeriesHydro(v) => Collection::SeriesHydro(v),
            Parsed::SeriesMeteo(v) => Collection::SeriesMeteo(v),
        }
    }
}

/// A SANDRE Hydrometrie message
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Message {
    pub scenario: Option<Scenario>,
    pub siteshydro: Vec<Sitehydro>,
    pub sitesmeteo: Vec<Sitemeteo>,
    pub seuilshydro: Vec<SeuilHydro>,
    pub evenements: Vec<Evenement>,
    pub courbestarage: Vec<CourbeTarage>,
    pub jaugeages: Vec<Jaugeage>,
    pub courbescorrection: Vec<CourbeCorrection>,
    pub serieshydro: Vec<SerieHydro>,
    pub seriesmeteo: Vec<SerieMeteo>,
    pub simulations: Vec<Simulation>,
    strict: bool,
}

impl Message {
    /// Create a strict message around a scenario
    pub fn new(scenario: Scenario) -> Self {
        Self {
            scenario: Some(scenario),
            strict: true,
            ..Self::default()
        }
    }

    /// Create a message that may be serialized without a scenario
    pub fn lenient() -> Self {
        Self::default()
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Build a message from a parsed document
    ///
    /// A strict message requires the document to carry a scenario.
    pub fn from_document(document: XmlDocument, strict: bool) -> Result<Self> {
        if strict && document.scenario.is_none() {
            return Err(Error::invalid_argument(
                "document has no scenario, required by a strict message",
            ));
        }
        Ok(Self {
            scenario: document.scenario,
            siteshydro: document.siteshydro.unwrap_or_default(),
            sitesmeteo: document.sitesmeteo.unwrap_or_default(),
            seuilshydro: document.seuilshydro.unwrap_or_default(),
            evenements: document.evenements.unwrap_or_default(),
            courbestarage: document.courbestarage.unwrap_or_default(),
            jaugeages: document.jaugeages.unwrap_or_default(),
            courbescorrection: document.courbescorrection.unwrap_or_default(),
            serieshydro: document.serieshydro.unwrap_or_default(),
            seriesmeteo: document.seriesmeteo.unwrap_or_default(),
            simulations: document.simulations.unwrap_or_default(),
            strict,
        })
    }

    /// Read a message from an XML file
    pub fn from_file(path: &Path, strict: bool) -> Result<Self> {
        let message = Self::from_document(xml_codec::parse_file(path)?, strict)?;
        info!(
            "Loaded message from {} ({} entities)",
            path.display(),
            message.entity_count()
        );
        Ok(message)
    }

    /// Read a message from XML text
    pub fn from_xml_str(content: &str, strict: bool) -> Result<Self> {
        Self::from_document(xml_codec::parse_str(content)?, strict)
    }

    /// Read a message from any reader
    pub fn from_reader<R: Read>(reader: R, strict: bool) -> Result<Self> {
        Self::from_document(xml_codec::parse_reader(reader)?, strict)
    }

    /// Append a collection after validating each of its entities
    pub fn add(&mut self, collection: Collection) -> Result<()> {
        collection.validate()?;
        debug!("Adding {} {}", collection.len(), collection.name());

        match collection {
            Collection::SitesHydro(v) => self.siteshydro.extend(v),
            Collection::SitesMeteo(v) => self.sitesmeteo.extend(v),
            Collection::SeuilsHydro(v) => self.seuilshydro.extend(v),
            Collection::Evenements(v) => self.evenements.extend(v),
            Collection::CourbesTarage(v) => self.courbestarage.extend(v),
            Collection::Jaugeages(v) => self.jaugeages.extend(v),
            Collection::CourbesCorrection(v) => self.courbescorrection.extend(v),
            Collection::SeriesHydro(v) => self.serieshydro.extend(v),
            Collection::SeriesMeteo(v) => self.seriesmeteo.extend(v),
            Collection::Simulations(v) => self.simulations.extend(v),
        }
        Ok(())
    }

    /// Append a collection supplied under a name, checking the pairing
    pub fn add_named(&mut self, name: &str, collection: Collection) -> Result<()> {
        if !Collection::NAMES.iter().any(|known| *known == name) {
            return Err(Error::invalid_argument(format!(
                "unknown collection '{name}', expected one of {}",
                Collection::NAMES.join(", ")
            )));
        }
        if collection.name() != name {
            return Err(Error::invalid_argument(format!(
                "collection '{name}' cannot hold {}",
                collection.name()
            )));
        }
        self.add(collection)
    }

    /// Borrow the content for serialization
    pub fn payload(&self) -> Payload<'_> {
        Payload {
            scenario: self.scenario.as_ref(),
            siteshydro: &self.siteshydro,
            sitesmeteo: &self.sitesmeteo,
            seuilshydro: &self.seuilshydro,
            evenements: &self.evenements,
            courbestarage: &self.courbestarage,
            jaugeages: &self.jaugeages,
            courbescorrection: &self.courbescorrection,
            serieshydro: &self.serieshydro,
            seriesmeteo: &self.seriesmeteo,
            simulations: &self.simulations,
        }
    }

    /// Serialize to an XML document
    pub fn to_xml(&self) -> Result<String> {
        if self.strict && self.scenario.is_none() {
            return Err(Error::invalid_argument(
                "a strict message needs a scenario to be serialized",
            ));
        }
        xml_codec::to_xml(&self.payload())
    }

    /// Write the XML document to `path`; an existing file needs `force`
    pub fn write(&self, path: &Path, force: bool) -> Result<()> {
        let xml = self.to_xml()?;
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .create_new(!force)
            .open(path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => Error::io_conflict(path.display().to_string()),
                _ => Error::io(format!("Failed to create {}", path.display()), e),
            })?;
        file.write_all(xml.as_bytes())
            .map_err(|e| Error::io(format!("Failed to write {}", path.display()), e))?;
        info!("Wrote message to {}", path.display());
        Ok(())
    }

    /// Entity count per collection, in document order
    pub fn summary(&self) -> Vec<(&'static str, usize)> {
        let counts = [
            self.siteshydro.len(),
            self.sitesmeteo.len(),
            self.seuilshydro.len(),
            self.evenements.len(),
            self.courbestarage.len(),
            self.jaugeages.len(),
            self.courbescorrection.len(),
            self.serieshydro.len(),
            self.seriesmeteo.len(),
            self.simulations.len(),
        ];
        Collection::NAMES.into_iter().zip(counts).collect()
    }

    pub fn entity_count(&self) -> usize {
        self.summary().iter().map(|(_, count)| count).sum()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scenario {
            Some(scenario) => {
                let code = |actor: &Actor| {
                    actor
                        .effective_intervenant()
                        .map_or("?".to_string(), |i| i.code.clone())
                };
                writeln!(
                    f,
                    "Scenario {} v{} produced {} ({} -> {})",
                    scenario.code(),
                    scenario.version(),
                    scenario.production_datetime,
                    code(&scenario.emetteur),
                    code(&scenario.destinataire),
                )?;
            }
            None => writeln!(f, "No scenario")?,
        }
        for (name, count) in self.summary() {
            if count > 0 {
                writeln!(f, "  {name:<18} {count:>6}")?;
            }
        }
        write!(f, "  {:<18} {:>6}", "total", self.entity_count())
    }
}
