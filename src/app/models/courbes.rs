//! Rating curves (height to discharge) and height correction curves

use super::intervenant::Contact;
use super::sitehydro::Station;
use super::validation;
use crate::constants::TYPES_COURBE_TARAGE;
use crate::{Error, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Rating curve of a station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourbeTarage {
    pub code: String,
    pub libelle: String,
    /// 0 = polynomial, 4 = power law
    pub typect: u8,
    pub station: Station,
    pub limiteinf: Option<f64>,
    pub limitesup: Option<f64>,
    pub commentaire: Option<String>,
    pub contact: Option<Contact>,
    pub pivots: Vec<PivotCT>,
    pub periodes: Vec<PeriodeCT>,
    pub dtmaj: Option<NaiveDateTime>,
}

impl CourbeTarage {
    pub fn new(code: &str, libelle: &str, station: Station) -> Result<Self> {
        Ok(Self {
            code: validation::not_empty("rating curve code", code)?,
            libelle: validation::not_empty("rating curve label", libelle)?,
            typect: TYPES_COURBE_TARAGE[0],
            station,
            limiteinf: None,
            limitesup: None,
            commentaire: None,
            contact: None,
            pivots: Vec::new(),
            periodes: Vec::new(),
            dtmaj: None,
        })
    }

    pub fn validate(&self) -> Result<()> {
        validation::not_empty("rating curve code", &self.code)?;
        validation::not_empty("rating curve label", &self.libelle)?;
        validation::one_of("rating curve type", self.typect, TYPES_COURBE_TARAGE)?;
        self.station.validate()?;
        if let (Some(inf), Some(sup)) = (self.limiteinf, self.limitesup) {
            if inf > sup {
                return Err(Error::validation(format!(
                    "rating curve lower limit {inf} above upper limit {sup}"
                )));
            }
        }
        if let Some(contact) = &self.contact {
            contact.validate()?;
        }
        for pivot in &self.pivots {
            validation::finite("pivot height", pivot.hauteur)?;
            validation::finite("pivot discharge", pivot.debit)?;
        }
        for periode in &self.periodes {
            validation::period("rating curve period", Some(periode.dtdeb), periode.dtfin)?;
        }
        Ok(())
    }
}

/// Point of a rating curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotCT {
    pub hauteur: f64,
    pub debit: f64,
    pub qualite: Option<u8>,
}

/// Period during which a rating curve applies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodeCT {
    pub dtdeb: NaiveDateTime,
    pub dtfin: Option<NaiveDateTime>,
    pub etat: u8,
}

/// Height correction curve of a station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourbeCorrection {
    pub station: Station,
    pub libelle: Option<String>,
    pub commentaire: Option<String>,
    pub pivots: Vec<PivotCC>,
    pub dtmaj: Option<NaiveDateTime>,
}

impl CourbeCorrection {
    pub fn new(station: Station) -> Self {
        Self {
            station,
            libelle: None,
            commentaire: None,
            pivots: Vec::new(),
            dtmaj: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.station.validate()?;
        for pivot in &self.pivots {
            validation::finite("correction delta", pivot.deltah)?;
            validation::period(
                "correction activation",
                pivot.dtactivation,
                pivot.dtdesactivation,
            )?;
        }
        Ok(())
    }
}

/// Point of a correction curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotCC {
    pub dte: NaiveDateTime,
    pub deltah: f64,
    pub dtactivation: Option<NaiveDateTime>,
    pub dtdesactivation: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_curve_limits() {
        let station = Station::new("A123456701").unwrap();
        let mut courbe = CourbeTarage::new("CT1", "Courbe 2020", station).unwrap();
        courbe.limiteinf = Some(10.0);
        courbe.limitesup = Some(5.0);
        assert!(courbe.validate().is_err());

        courbe.limitesup = Some(500.0);
        assert!(courbe.validate().is_ok());
    }
}
