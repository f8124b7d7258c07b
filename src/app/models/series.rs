//! Observation series (hydrometric and meteorological)
//!
//! A series carries an ordered observation table keyed by timestamp. The
//! table keeps rows in insertion order and allows duplicate timestamps; rows
//! are addressed positionally.

use super::entite::{Entite, HYDRO_KINDS};
use super::sitemeteo::{Grandeur, Sitemeteo};
use super::validation;
use crate::constants::{CONTINUITES_OBS, GRANDEURS_HYDRO, METHODES_OBS, QUALITES_OBS, STATUTS_SERIE};
use crate::Result;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Row of an observation table
pub trait Timestamped {
    fn dte(&self) -> NaiveDateTime;
}

/// Ordered observation table; duplicates are kept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observations<T> {
    rows: Vec<T>,
}

impl<T> Default for Observations<T> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<T: Timestamped> Observations<T> {
    pub fn new(rows: Vec<T>) -> Self {
        Self { rows }
    }

    pub fn push(&mut self, row: T) {
        self.rows.push(row);
    }

    /// Append another table after this one
    pub fn extend(&mut self, other: Observations<T>) {
        self.rows.extend(other.rows);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.rows.iter()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.rows.get(index)
    }

    /// All rows observed at `dte`, in table order
    pub fn at(&self, dte: NaiveDateTime) -> impl Iterator<Item = &T> {
        self.rows.iter().filter(move |row| row.dte() == dte)
    }

    pub fn first_date(&self) -> Option<NaiveDateTime> {
        self.rows.iter().map(Timestamped::dte).min()
    }

    pub fn last_date(&self) -> Option<NaiveDateTime> {
        self.rows.iter().map(Timestamped::dte).max()
    }
}

impl<'a, T> IntoIterator for &'a Observations<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

// =============================================================================
// Hydrometric series
// =============================================================================

/// Water level or discharge observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationHydro {
    pub dte: NaiveDateTime,
    pub res: f64,
    /// Production method
    pub mth: Option<u8>,
    /// Quality
    pub qal: Option<u8>,
    /// Continuity
    pub cnt: Option<u8>,
}

impl ObservationHydro {
    pub fn new(dte: NaiveDateTime, res: f64) -> Result<Self> {
        Ok(Self {
            dte,
            res: validation::finite("observation result", res)?,
            mth: None,
            qal: None,
            cnt: None,
        })
    }

    pub fn validate(&self) -> Result<()> {
        validation::finite("observation result", self.res)?;
        if let Some(mth) = self.mth {
            validation::one_of("observation method", mth, METHODES_OBS)?;
        }
        if let Some(qal) = self.qal {
            validation::one_of("observation quality", qal, QUALITES_OBS)?;
        }
        if let Some(cnt) = self.cnt {
            validation::one_of("observation continuity", cnt, CONTINUITES_OBS)?;
        }
        Ok(())
    }
}

impl Timestamped for ObservationHydro {
    fn dte(&self) -> NaiveDateTime {
        self.dte
    }
}

/// Series of hydrometric observations for a site, station or sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerieHydro {
    pub entite: Entite,
    /// `H` (water level) or `Q` (discharge)
    pub grandeur: String,
    pub dtdeb: Option<NaiveDateTime>,
    pub dtfin: Option<NaiveDateTime>,
    pub dtprod: Option<NaiveDateTime>,
    pub statut: Option<u8>,
    pub observations: Observations<ObservationHydro>,
}

impl SerieHydro {
    pub fn new(entite: Entite, grandeur: &str) -> Result<Self> {
        entite.expect_kind(HYDRO_KINDS)?;
        Ok(Self {
            entite,
            grandeur: validation::code_in("series quantity", grandeur, GRANDEURS_HYDRO)?,
            dtdeb: None,
            dtfin: None,
            dtprod: None,
            statut: None,
            observations: Observations::default(),
        })
    }

    pub fn with_observations(mut self, observations: Observations<ObservationHydro>) -> Self {
        self.observations = observations;
        self
    }

    /// Declared start, or the first observation timestamp
    pub fn start(&self) -> Option<NaiveDateTime> {
        self.dtdeb.or_else(|| self.observations.first_date())
    }

    /// Declared end, or the last observation timestamp
    pub fn end(&self) -> Option<NaiveDateTime> {
        self.dtfin.or_else(|| self.observations.last_date())
    }

    pub fn validate(&self) -> Result<()> {
        self.entite.expect_kind(HYDRO_KINDS)?;
        self.entite.validate()?;
        validation::code_in("series quantity", &self.grandeur, GRANDEURS_HYDRO)?;
        validation::period("series period", self.dtdeb, self.dtfin)?;
        if let Some(statut) = self.statut {
            validation::one_of("series status", statut, STATUTS_SERIE)?;
        }
        for observation in &self.observations {
            observation.validate()?;
        }
        Ok(())
    }
}

// =============================================================================
// Meteorological series
// =============================================================================

/// Meteorological observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationMeteo {
    pub dte: NaiveDateTime,
    pub res: f64,
    pub mth: Option<u8>,
    pub qal: Option<u8>,
    /// Quality index, 0 to 100
    pub qua: Option<f64>,
}

impl ObservationMeteo {
    pub fn new(dte: NaiveDateTime, res: f64) -> Result<Self> {
        Ok(Self {
            dte,
            res: validation::finite("observation result", res)?,
            mth: None,
            qal: None,
            qua: None,
        })
    }

    pub fn validate(&self) -> Result<()> {
        validation::finite("observation result", self.res)?;
        if let Some(mth) = self.mth {
            validation::one_of("observation method", mth, METHODES_OBS)?;
        }
        if let Some(qal) = self.qal {
            validation::one_of("observation quality", qal, QUALITES_OBS)?;
        }
        if let Some(qua) = self.qua {
            validation::in_range("observation quality index", qua, 0.0, 100.0)?;
        }
        Ok(())
    }
}

impl Timestamped for ObservationMeteo {
    fn dte(&self) -> NaiveDateTime {
        self.dte
    }
}

/// Series of meteorological observations for a (site, quantity) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerieMeteo {
    pub site: Sitemeteo,
    pub grandeur: Grandeur,
    /// Time step in minutes
    pub duree: Option<u32>,
    pub dtdeb: Option<NaiveDateTime>,
    pub dtfin: Option<NaiveDateTime>,
    pub dtprod: Option<NaiveDateTime>,
    pub statut: Option<u8>,
    pub observations: Observations<ObservationMeteo>,
}

impl SerieMeteo {
    pub fn new(site: Sitemeteo, grandeur: Grandeur) -> Self {
        Self {
            site,
            grandeur,
            duree: None,
            dtdeb: None,
            dtfin: None,
            dtprod: None,
            statut: None,
            observations: Observations::default(),
        }
    }

    pub fn start(&self) -> Option<NaiveDateTime> {
        self.dtdeb.or_else(|| self.observations.first_date())
    }

    pub fn end(&self) -> Option<NaiveDateTime> {
        self.dtfin.or_else(|| self.observations.last_date())
    }

    pub fn validate(&self) -> Result<()> {
        self.site.validate()?;
        self.grandeur.validate()?;
        validation::period("series period", self.dtdeb, self.dtfin)?;
        if let Some(statut) = self.statut {
            validation::one_of("series status", statut, STATUTS_SERIE)?;
        }
        for observation in &self.observations {
            observation.validate()?;
        }
        Ok(())
    }
}
