//! Events logged on sites and stations

use super::entite::{Entite, EntiteKind};
use super::intervenant::Contact;
use super::validation;
use crate::constants::PUBLICATIONS_EVENEMENT;
use crate::Result;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Kinds of entity an event may be logged on
pub const EVENEMENT_KINDS: &[EntiteKind] =
    &[EntiteKind::SiteHydro, EntiteKind::Station, EntiteKind::SiteMeteo];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evenement {
    pub entite: Entite,
    pub contact: Contact,
    pub dt: NaiveDateTime,
    pub descriptif: String,
    /// Publication type code
    pub publication: u8,
    pub dtmaj: Option<NaiveDateTime>,
}

impl Evenement {
    pub fn new(
        entite: Entite,
        contact: Contact,
        dt: NaiveDateTime,
        descriptif: &str,
    ) -> Result<Self> {
        let evenement = Self {
            entite,
            contact,
            dt,
            descriptif: validation::not_empty("event description", descriptif)?,
            publication: PUBLICATIONS_EVENEMENT[0],
            dtmaj: None,
        };
        evenement.validate()?;
        Ok(evenement)
    }

    pub fn validate(&self) -> Result<()> {
        self.entite.expect_kind(EVENEMENT_KINDS)?;
        self.entite.validate()?;
        self.contact.validate()?;
        validation::not_empty("event description", &self.descriptif)?;
        validation::one_of("event publication", self.publication, PUBLICATIONS_EVENEMENT)?;
        Ok(())
    }
}
