//! Intervenants (organizations), contacts and the scenario actor sum type

use super::validation;
use crate::constants::origine;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Code referential of an intervenant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Origine {
    #[default]
    Sandre,
    Siret,
}

impl Origine {
    /// Value of the `schemeAgencyID` attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            Origine::Sandre => origine::SANDRE,
            Origine::Siret => origine::SIRET,
        }
    }
}

impl FromStr for Origine {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            origine::SANDRE => Ok(Origine::Sandre),
            origine::SIRET => Ok(Origine::Siret),
            other => Err(Error::validation(format!(
                "invalid intervenant origin '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Origine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An organization taking part in data exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intervenant {
    pub code: String,
    pub origine: Origine,
    pub nom: Option<String>,
    pub mnemo: Option<String>,
}

impl Intervenant {
    /// Create a new intervenant; SANDRE codes are digits, SIRET codes 14 digits
    pub fn new(code: &str, origine: Origine) -> Result<Self> {
        let intervenant = Self {
            code: code.trim().to_string(),
            origine,
            nom: None,
            mnemo: None,
        };
        intervenant.validate()?;
        Ok(intervenant)
    }

    pub fn with_nom(mut self, nom: impl Into<String>) -> Self {
        self.nom = Some(nom.into());
        self
    }

    pub fn with_mnemo(mut self, mnemo: impl Into<String>) -> Self {
        self.mnemo = Some(mnemo.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        validation::not_empty("intervenant code", &self.code)?;
        if !self.code.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::validation(format!(
                "invalid intervenant code '{}': digits expected",
                self.code
            )));
        }
        if self.origine == Origine::Siret && self.code.len() != 14 {
            return Err(Error::validation(format!(
                "invalid SIRET code '{}': 14 digits expected",
                self.code
            )));
        }
        Ok(())
    }
}

/// A person working for an intervenant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub code: String,
    pub nom: Option<String>,
    pub prenom: Option<String>,
    /// Owning organization
    pub intervenant: Option<Intervenant>,
}

impl Contact {
    pub fn new(code: &str) -> Result<Self> {
        let contact = Self {
            code: code.trim().to_string(),
            nom: None,
            prenom: None,
            intervenant: None,
        };
        contact.validate()?;
        Ok(contact)
    }

    pub fn with_intervenant(mut self, intervenant: Intervenant) -> Self {
        self.intervenant = Some(intervenant);
        self
    }

    pub fn with_nom(mut self, nom: impl Into<String>, prenom: Option<String>) -> Self {
        self.nom = Some(nom.into());
        self.prenom = prenom;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validation::not_empty("contact code", &self.code)?;
        if self.code.len() > 5 || !self.code.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::validation(format!(
                "invalid contact code '{}': up to 5 digits expected",
                self.code
            )));
        }
        if let Some(intervenant) = &self.intervenant {
            intervenant.validate()?;
        }
        Ok(())
    }
}

/// Sender or recipient of a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Actor {
    Intervenant(Intervenant),
    Contact(Contact),
}

impl Actor {
    /// Organization responsible for the actor
    pub fn effective_intervenant(&self) -> Option<&Intervenant> {
        match self {
            Actor::Intervenant(intervenant) => Some(intervenant),
            Actor::Contact(contact) => contact.intervenant.as_ref(),
        }
    }

    /// Contact person, if the actor is one
    pub fn contact(&self) -> Option<&Contact> {
        match self {
            Actor::Intervenant(_) => None,
            Actor::Contact(contact) => Some(contact),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Actor::Intervenant(intervenant) => intervenant.validate(),
            Actor::Contact(contact) => contact.validate(),
        }
    }
}

impl From<Intervenant> for Actor {
    fn from(intervenant: Intervenant) -> Self {
        Actor::Intervenant(intervenant)
    }
}

impl From<Contact> for Actor {
    fn from(contact: Contact) -> Self {
        Actor::Contact(contact)
    }
}
