//! Reference to the entity a series, threshold, event or simulation is attached to

use super::sitehydro::{Capteur, Sitehydro, Station};
use super::sitemeteo::Sitemeteo;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of an attachable entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntiteKind {
    SiteHydro,
    Station,
    Capteur,
    SiteMeteo,
}

impl fmt::Display for EntiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntiteKind::SiteHydro => "sitehydro",
            EntiteKind::Station => "station",
            EntiteKind::Capteur => "capteur",
            EntiteKind::SiteMeteo => "sitemeteo",
        };
        f.write_str(label)
    }
}

/// Hydrometric entities a hydro series or simulation may target
pub const HYDRO_KINDS: &[EntiteKind] =
    &[EntiteKind::SiteHydro, EntiteKind::Station, EntiteKind::Capteur];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Entite {
    SiteHydro(Sitehydro),
    Station(Station),
    Capteur(Capteur),
    SiteMeteo(Sitemeteo),
}

impl Entite {
    pub fn code(&self) -> &str {
        match self {
            Entite::SiteHydro(site) => &site.code,
            Entite::Station(station) => &station.code,
            Entite::Capteur(capteur) => &capteur.code,
            Entite::SiteMeteo(site) => &site.code,
        }
    }

    pub fn kind(&self) -> EntiteKind {
        match self {
            Entite::SiteHydro(_) => EntiteKind::SiteHydro,
            Entite::Station(_) => EntiteKind::Station,
            Entite::Capteur(_) => EntiteKind::Capteur,
            Entite::SiteMeteo(_) => EntiteKind::SiteMeteo,
        }
    }

    /// Fail unless the entity is one of the allowed kinds
    pub fn expect_kind(&self, allowed: &[EntiteKind]) -> Result<()> {
        let kind = self.kind();
        if allowed.contains(&kind) {
            return Ok(());
        }
        let expected: Vec<String> = allowed.iter().map(ToString::to_string).collect();
        Err(Error::entity_kind(expected.join(" or "), kind.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Entite::SiteHydro(site) => site.validate(),
            Entite::Station(station) => station.validate(),
            Entite::Capteur(capteur) => capteur.validate(),
            Entite::SiteMeteo(site) => site.validate(),
        }
    }
}

impl From<Sitehydro> for Entite {
    fn from(site: Sitehydro) -> Self {
        Entite::SiteHydro(site)
    }
}

impl From<Station> for Entite {
    fn from(station: Station) -> Self {
        Entite::Station(station)
    }
}

impl From<Capteur> for Entite {
    fn from(capteur: Capteur) -> Self {
        Entite::Capteur(capteur)
    }
}

impl From<Sitemeteo> for Entite {
    fn from(site: Sitemeteo) -> Self {
        Entite::SiteMeteo(site)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expect_kind() {
        let entite = Entite::from(Station::new("A123456701").unwrap());
        assert_eq!(entite.code(), "A123456701");
        assert!(entite.expect_kind(HYDRO_KINDS).is_ok());

        let err = entite.expect_kind(&[EntiteKind::SiteHydro]).unwrap_err();
        assert!(matches!(err, Error::EntityKind { ref found, .. } if found == "station"));
    }
}
