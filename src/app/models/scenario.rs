//! Exchange envelope header

use super::intervenant::Actor;
use super::validation::{self, DateTimeInput};
use crate::constants::{SCENARIO_CODE, SCENARIO_NAME, SCENARIO_VERSION};
use crate::{Error, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Scenario header of a Hydrometrie message
///
/// Code, version and name are constants of the exchange format. Both actors
/// are mandatory and must resolve to an intervenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub production_datetime: NaiveDateTime,
    pub emetteur: Actor,
    pub destinataire: Actor,
}

impl Scenario {
    /// Create a scenario produced now
    pub fn new(emetteur: impl Into<Actor>, destinataire: impl Into<Actor>) -> Result<Self> {
        Self::from_parts(Some(emetteur.into()), Some(destinataire.into()), None)
    }

    /// Create a scenario from optional parts, failing on a missing actor
    pub fn from_parts(
        emetteur: Option<Actor>,
        destinataire: Option<Actor>,
        production_datetime: Option<DateTimeInput>,
    ) -> Result<Self> {
        let emetteur =
            emetteur.ok_or_else(|| Error::invalid_argument("scenario sender is mandatory"))?;
        let destinataire = destinataire
            .ok_or_else(|| Error::invalid_argument("scenario recipient is mandatory"))?;
        let production_datetime = match production_datetime {
            Some(input) => input.resolve()?,
            None => validation::now(),
        };

        let scenario = Self {
            production_datetime,
            emetteur,
            destinataire,
        };
        scenario.validate()?;
        Ok(scenario)
    }

    /// Replace the production timestamp
    pub fn with_production_datetime(mut self, input: impl Into<DateTimeInput>) -> Result<Self> {
        self.production_datetime = input.into().resolve()?;
        Ok(self)
    }

    pub fn code(&self) -> &'static str {
        SCENARIO_CODE
    }

    pub fn version(&self) -> &'static str {
        SCENARIO_VERSION
    }

    pub fn name(&self) -> &'static str {
        SCENARIO_NAME
    }

    pub fn validate(&self) -> Result<()> {
        for (role, actor) in [("sender", &self.emetteur), ("recipient", &self.destinataire)] {
            actor.validate()?;
            if actor.effective_intervenant().is_none() {
                return Err(Error::invalid_argument(format!(
                    "scenario {role} contact has no intervenant"
                )));
            }
        }
        Ok(())
    }
}
