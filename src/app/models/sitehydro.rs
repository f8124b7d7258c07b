//! Hydrometric sites, stations and sensors
//!
//! The three levels form a containment hierarchy: a site owns stations, a
//! station owns sensors. Codes nest the same way (8, 10 and 12 characters).

use super::validation;
use crate::constants::{GRANDEURS_HYDRO, TYPES_SITE_HYDRO, TYPES_STATION};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Projected coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
    /// SANDRE projection code (e.g. 26 for Lambert 93)
    pub proj: u16,
}

impl Coord {
    pub fn new(x: f64, y: f64, proj: u16) -> Result<Self> {
        Ok(Self {
            x: validation::finite("x coordinate", x)?,
            y: validation::finite("y coordinate", y)?,
            proj,
        })
    }
}

/// Hydrometric site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sitehydro {
    pub code: String,
    pub typesite: String,
    pub libelle: Option<String>,
    pub libelleusuel: Option<String>,
    pub coord: Option<Coord>,
    /// INSEE codes of the communes the site spans
    pub communes: Vec<String>,
    pub stations: Vec<Station>,
}

impl Sitehydro {
    /// Create a new site of type `REEL`
    pub fn new(code: &str) -> Result<Self> {
        Ok(Self {
            code: validation::code_sitehydro(code)?,
            typesite: TYPES_SITE_HYDRO[0].to_string(),
            libelle: None,
            libelleusuel: None,
            coord: None,
            communes: Vec::new(),
            stations: Vec::new(),
        })
    }

    pub fn with_libelle(mut self, libelle: impl Into<String>) -> Self {
        self.libelle = Some(libelle.into());
        self
    }

    pub fn with_typesite(mut self, typesite: &str) -> Result<Self> {
        self.typesite = validation::code_in("site type", typesite, TYPES_SITE_HYDRO)?;
        Ok(self)
    }

    pub fn with_stations(mut self, stations: Vec<Station>) -> Self {
        self.stations = stations;
        self
    }

    /// Validate the site and everything it contains
    pub fn validate(&self) -> Result<()> {
        validation::code_sitehydro(&self.code)?;
        validation::code_in("site type", &self.typesite, TYPES_SITE_HYDRO)?;
        for commune in &self.communes {
            validate_commune(commune)?;
        }
        for station in &self.stations {
            station.validate()?;
            if !station.code.starts_with(&self.code) {
                return Err(Error::validation(format!(
                    "station {} does not belong to site {}",
                    station.code, self.code
                )));
            }
        }
        Ok(())
    }
}

/// Hydrometric station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub code: String,
    pub typestation: String,
    pub libelle: Option<String>,
    pub coord: Option<Coord>,
    pub commune: Option<String>,
    pub capteurs: Vec<Capteur>,
}

impl Station {
    /// Create a new station of type `LIMNI`
    pub fn new(code: &str) -> Result<Self> {
        Ok(Self {
            code: validation::code_station(code)?,
            typestation: "LIMNI".to_string(),
            libelle: None,
            coord: None,
            commune: None,
            capteurs: Vec::new(),
        })
    }

    pub fn with_libelle(mut self, libelle: impl Into<String>) -> Self {
        self.libelle = Some(libelle.into());
        self
    }

    pub fn with_typestation(mut self, typestation: &str) -> Result<Self> {
        self.typestation = validation::code_in("station type", typestation, TYPES_STATION)?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        validation::code_station(&self.code)?;
        validation::code_in("station type", &self.typestation, TYPES_STATION)?;
        if let Some(commune) = &self.commune {
            validate_commune(commune)?;
        }
        for capteur in &self.capteurs {
            capteur.validate()?;
        }
        Ok(())
    }
}

/// Sensor attached to a station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capteur {
    pub code: String,
    /// Measured quantity, `H` or `Q`
    pub typemesure: String,
    pub libelle: Option<String>,
}

impl Capteur {
    /// Create a new water level sensor
    pub fn new(code: &str) -> Result<Self> {
        Ok(Self {
            code: validation::code_capteur(code)?,
            typemesure: GRANDEURS_HYDRO[0].to_string(),
            libelle: None,
        })
    }

    pub fn validate(&self) -> Result<()> {
        validation::code_capteur(&self.code)?;
        validation::code_in("sensor quantity", &self.typemesure, GRANDEURS_HYDRO)?;
        Ok(())
    }
}

/// INSEE commune codes are 5 characters (2A/2B for Corsica)
pub(crate) fn validate_commune(code: &str) -> Result<()> {
    let valid = code.len() == 5 && code.chars().all(|c| c.is_ascii_alphanumeric());
    if !valid {
        return Err(Error::validation(format!("invalid commune code '{code}'")));
    }
    Ok(())
}
