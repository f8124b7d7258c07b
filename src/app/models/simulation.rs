//! Forecast simulations
//!
//! A simulation holds a forecast table indexed by the composite key
//! (timestamp, probability). Probability 50 is the central forecast, 0 and
//! 100 the low and high bounds.

use super::entite::{Entite, EntiteKind};
use super::intervenant::Contact;
use super::validation;
use crate::constants::{GRANDEURS_HYDRO, STATUTS_SIMULATION};
use crate::{Error, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Forecast table keyed by (timestamp, probability in percent)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Previsions {
    table: BTreeMap<(NaiveDateTime, u8), f64>,
}

impl Previsions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a forecast; a key already present is an error
    pub fn insert(&mut self, dte: NaiveDateTime, prob: u8, res: f64) -> Result<()> {
        validation::in_range("forecast probability", prob, 0, 100)?;
        validation::finite("forecast result", res)?;
        if self.table.contains_key(&(dte, prob)) {
            return Err(Error::validation(format!(
                "duplicate forecast for {dte} at probability {prob}"
            )));
        }
        self.table.insert((dte, prob), res);
        Ok(())
    }

    pub fn get(&self, dte: NaiveDateTime, prob: u8) -> Option<f64> {
        self.table.get(&(dte, prob)).copied()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Forecasts grouped by timestamp, probabilities ascending
    pub fn by_date(&self) -> Vec<(NaiveDateTime, Vec<(u8, f64)>)> {
        let mut grouped: Vec<(NaiveDateTime, Vec<(u8, f64)>)> = Vec::new();
        for (&(dte, prob), &res) in &self.table {
            match grouped.last_mut() {
                Some((last, values)) if *last == dte => values.push((prob, res)),
                _ => grouped.push((dte, vec![(prob, res)])),
            }
        }
        grouped
    }
}

/// Kinds of entity a simulation may target
pub const SIMULATION_KINDS: &[EntiteKind] = &[EntiteKind::SiteHydro, EntiteKind::Station];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    pub entite: Entite,
    pub modeleprevision: String,
    pub grandeur: String,
    pub statut: u8,
    /// Quality index, 0 to 100
    pub qualite: Option<u8>,
    pub public: bool,
    pub commentaire: Option<String>,
    pub dtprod: NaiveDateTime,
    pub contact: Option<Contact>,
    pub previsions: Previsions,
}

impl Simulation {
    pub fn new(
        entite: Entite,
        modeleprevision: &str,
        grandeur: &str,
        dtprod: NaiveDateTime,
    ) -> Result<Self> {
        let simulation = Self {
            entite,
            modeleprevision: validation::not_empty("forecast model", modeleprevision)?,
            grandeur: validation::code_in("simulation quantity", grandeur, GRANDEURS_HYDRO)?,
            statut: STATUTS_SIMULATION[0],
            qualite: None,
            public: false,
            commentaire: None,
            dtprod,
            contact: None,
            previsions: Previsions::new(),
        };
        simulation.validate()?;
        Ok(simulation)
    }

    pub fn validate(&self) -> Result<()> {
        self.entite.expect_kind(SIMULATION_KINDS)?;
        self.entite.validate()?;
        validation::not_empty("forecast model", &self.modeleprevision)?;
        validation::code_in("simulation quantity", &self.grandeur, GRANDEURS_HYDRO)?;
        validation::one_of("simulation status", self.statut, STATUTS_SIMULATION)?;
        if let Some(qualite) = self.qualite {
            validation::in_range("simulation quality", qualite, 0, 100)?;
        }
        if let Some(contact) = &self.contact {
            contact.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::validation::parse_datetime;

    #[test]
    fn test_previsions_composite_key() {
        let t1 = parse_datetime("2020-01-01T00:00:00").unwrap();
        let t2 = parse_datetime("2020-01-01T01:00:00").unwrap();
        let mut previsions = Previsions::new();
        previsions.insert(t2, 50, 12.0).unwrap();
        previsions.insert(t1, 100, 15.0).unwrap();
        previsions.insert(t1, 0, 8.0).unwrap();

        assert_eq!(previsions.get(t1, 0), Some(8.0));
        assert!(previsions.insert(t1, 0, 9.0).is_err());

        let grouped = previsions.by_date();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0], (t1, vec![(0, 8.0), (100, 15.0)]));
        assert_eq!(grouped[1], (t2, vec![(50, 12.0)]));
    }

    #[test]
    fn test_probability_range() {
        let mut previsions = Previsions::new();
        let t = parse_datetime("2020-01-01T00:00:00").unwrap();
        assert!(previsions.insert(t, 101, 1.0).is_err());
    }
}
