//! Thresholds (alert levels) attached to hydrometric sites

use super::entite::Entite;
use super::validation;
use crate::constants::TYPES_SEUIL;
use crate::Result;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Threshold of a hydrometric site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeuilHydro {
    pub code: String,
    /// Target site; the XML branch only accepts hydrometric sites
    pub entite: Entite,
    /// 1 = instantaneous threshold, 2 = gradient threshold
    pub typeseuil: u8,
    pub nature: Option<u16>,
    /// Duration of a gradient threshold, in minutes
    pub duree: Option<u32>,
    pub libelle: Option<String>,
    pub mnemo: Option<String>,
    pub gravite: Option<u8>,
    pub commentaire: Option<String>,
    pub publication: Option<bool>,
    pub valeurs: Vec<ValeurSeuil>,
}

impl SeuilHydro {
    pub fn new(code: &str, entite: Entite) -> Result<Self> {
        Ok(Self {
            code: validation::not_empty("threshold code", code)?,
            entite,
            typeseuil: TYPES_SEUIL[0],
            nature: None,
            duree: None,
            libelle: None,
            mnemo: None,
            gravite: None,
            commentaire: None,
            publication: None,
            valeurs: Vec::new(),
        })
    }

    pub fn with_valeurs(mut self, valeurs: Vec<ValeurSeuil>) -> Self {
        self.valeurs = valeurs;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validation::not_empty("threshold code", &self.code)?;
        self.entite.validate()?;
        validation::one_of("threshold type", self.typeseuil, TYPES_SEUIL)?;
        if let Some(gravite) = self.gravite {
            validation::in_range("threshold severity", gravite, 0, 100)?;
        }
        for valeur in &self.valeurs {
            valeur.validate()?;
        }
        Ok(())
    }
}

/// Value of a threshold for one entity and activation period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValeurSeuil {
    pub entite: Entite,
    pub valeur: Option<f64>,
    pub tolerance: Option<f64>,
    pub dtactivation: Option<NaiveDateTime>,
    pub dtdesactivation: Option<NaiveDateTime>,
}

impl ValeurSeuil {
    pub fn new(entite: Entite, valeur: Option<f64>) -> Result<Self> {
        let valeur_seuil = Self {
            entite,
            valeur,
            tolerance: None,
            dtactivation: None,
            dtdesactivation: None,
        };
        valeur_seuil.validate()?;
        Ok(valeur_seuil)
    }

    pub fn validate(&self) -> Result<()> {
        self.entite.validate()?;
        if let Some(valeur) = self.valeur {
            validation::finite("threshold value", valeur)?;
        }
        if let Some(tolerance) = self.tolerance {
            validation::finite("threshold tolerance", tolerance)?;
        }
        validation::period("threshold activation", self.dtactivation, self.dtdesactivation)
    }
}
