//! Data models for hydrometric data exchange
//!
//! This module contains the entities exchanged in SANDRE Hydrometrie
//! messages: the scenario header and its actors, hydrometric and
//! meteorological sites, observation series, thresholds, events, simulations,
//! rating curves, gaugings and correction curves.
//!
//! Constructors and `validate()` methods delegate to the pure functions of
//! [`validation`] and return [`crate::Error::Validation`] on bad values.

pub mod courbes;
pub mod entite;
pub mod evenement;
pub mod intervenant;
pub mod jaugeage;
pub mod scenario;
pub mod series;
pub mod seuil;
pub mod simulation;
pub mod sitehydro;
pub mod sitemeteo;
pub mod validation;

pub use courbes::{CourbeCorrection, CourbeTarage, PeriodeCT, PivotCC, PivotCT};
pub use entite::{Entite, EntiteKind};
pub use evenement::Evenement;
pub use intervenant::{Actor, Contact, Intervenant, Origine};
pub use jaugeage::{HauteurJaugeage, Jaugeage};
pub use scenario::Scenario;
pub use series::{ObservationHydro, ObservationMeteo, Observations, SerieHydro, SerieMeteo};
pub use seuil::{SeuilHydro, ValeurSeuil};
pub use simulation::{Previsions, Simulation};
pub use sitehydro::{Capteur, Coord, Sitehydro, Station};
pub use sitemeteo::{Grandeur, Sitemeteo};
pub use validation::DateTimeInput;
