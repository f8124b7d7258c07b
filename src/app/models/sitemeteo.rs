//! Meteorological sites and the quantities they measure

use super::sitehydro::{Coord, validate_commune};
use super::validation;
use crate::constants::GRANDEURS_METEO;
use crate::Result;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Meteorological site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sitemeteo {
    pub code: String,
    pub libelle: Option<String>,
    pub libelleusuel: Option<String>,
    pub coord: Option<Coord>,
    pub commune: Option<String>,
    pub grandeurs: Vec<Grandeur>,
}

impl Sitemeteo {
    pub fn new(code: &str) -> Result<Self> {
        Ok(Self {
            code: validation::code_sitemeteo(code)?,
            libelle: None,
            libelleusuel: None,
            coord: None,
            commune: None,
            grandeurs: Vec::new(),
        })
    }

    pub fn with_libelle(mut self, libelle: impl Into<String>) -> Self {
        self.libelle = Some(libelle.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        validation::code_sitemeteo(&self.code)?;
        if let Some(commune) = &self.commune {
            validate_commune(commune)?;
        }
        for grandeur in &self.grandeurs {
            grandeur.validate()?;
        }
        Ok(())
    }
}

/// A quantity measured at a meteorological site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grandeur {
    /// Quantity code, e.g. `RR` (rainfall) or `TA` (air temperature)
    pub typemesure: String,
    pub dtmiseservice: Option<NaiveDateTime>,
    pub dtfermeture: Option<NaiveDateTime>,
}

impl Grandeur {
    pub fn new(typemesure: &str) -> Result<Self> {
        Ok(Self {
            typemesure: validation::code_in("meteo quantity", typemesure, GRANDEURS_METEO)?,
            dtmiseservice: None,
            dtfermeture: None,
        })
    }

    pub fn validate(&self) -> Result<()> {
        validation::code_in("meteo quantity", &self.typemesure, GRANDEURS_METEO)?;
        validation::period("grandeur service period", self.dtmiseservice, self.dtfermeture)
    }
}
