//! Gaugings (discharge measurements) on hydrometric sites

use super::sitehydro::{Sitehydro, Station};
use super::validation;
use crate::Result;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jaugeage {
    pub code: Option<String>,
    pub site: Sitehydro,
    pub debit: Option<f64>,
    pub dtdeb: Option<NaiveDateTime>,
    pub dtfin: Option<NaiveDateTime>,
    pub mode: Option<u8>,
    pub commentaire: Option<String>,
    pub hauteurs: Vec<HauteurJaugeage>,
    pub dtmaj: Option<NaiveDateTime>,
}

impl Jaugeage {
    pub fn new(site: Sitehydro) -> Self {
        Self {
            code: None,
            site,
            debit: None,
            dtdeb: None,
            dtfin: None,
            mode: None,
            commentaire: None,
            hauteurs: Vec::new(),
            dtmaj: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.site.validate()?;
        if let Some(debit) = self.debit {
            validation::finite("gauging discharge", debit)?;
        }
        validation::period("gauging period", self.dtdeb, self.dtfin)?;
        for hauteur in &self.hauteurs {
            hauteur.station.validate()?;
        }
        Ok(())
    }
}

/// Water levels read at a station during a gauging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HauteurJaugeage {
    pub station: Station,
    pub coteretenue: Option<f64>,
    pub cotedeb: Option<f64>,
    pub cotefin: Option<f64>,
}
