//! Application constants for the hydrometrie library
//!
//! This module contains the SANDRE exchange constants, default CSV dialect
//! values and the controlled code lists used for validation.

// =============================================================================
// Scenario
// =============================================================================

/// Scenario code of every Hydrometrie message
pub const SCENARIO_CODE: &str = "hydrometrie";

/// Supported schema version
pub const SCENARIO_VERSION: &str = "1.1";

/// Scenario label
pub const SCENARIO_NAME: &str = "Echange de données hydrométriques";

/// Root element of an XML message
pub const XML_ROOT: &str = "hydrometrie";

/// Reserved namespace bound to the `xml` prefix, always in scope
pub const XML_RESERVED_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

// =============================================================================
// CSV dialect defaults
// =============================================================================

/// Field delimiter of the simplified exchange format
pub const CSV_DELIMITER: u8 = b';';

/// Default end-of-record flag value (the header carries `<FLG>`)
pub const CSV_FLAG: &str = "FLG";

/// Default decimal separator of numeric fields
pub const CSV_DECIMAL_SEPARATOR: char = ',';

/// Default text encoding
pub const CSV_ENCODING: &str = "utf-8";

// =============================================================================
// Date/time formats
// =============================================================================

/// Canonical XML datetime format
pub const XML_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Accepted datetime input formats, tried in order
pub const DATETIME_INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Accepted date-only input formats (midnight is assumed)
pub const DATE_INPUT_FORMATS: &[&str] = &["%Y-%m-%d"];

// =============================================================================
// Intervenant origins (schemeAgencyID)
// =============================================================================

pub mod origine {
    pub const SANDRE: &str = "SANDRE";
    pub const SIRET: &str = "SIRET";
}

// =============================================================================
// Code lists
// =============================================================================

/// Hydrometric site types
pub const TYPES_SITE_HYDRO: &[&str] = &["REEL", "VIRTUEL", "MAREGRAPHE", "PONCTUEL"];

/// Hydrometric station types
pub const TYPES_STATION: &[&str] = &["DEB", "HC", "LIMNI", "LIMNIMERE", "LIMNIFILLE"];

/// Hydrometric quantities (water level, discharge)
pub const GRANDEURS_HYDRO: &[&str] = &["H", "Q"];

/// Meteorological quantities
pub const GRANDEURS_METEO: &[&str] = &[
    "EP", "ETPJ", "ETPR", "RR", "TA", "TS", "TT", "VV", "DV", "HNV", "HNT", "GLOT",
];

/// Series status values
pub const STATUTS_SERIE: &[u8] = &[0, 4, 8, 12, 16];

/// Observation quality values
pub const QUALITES_OBS: &[u8] = &[0, 4, 8, 12, 16, 20];

/// Observation method values
pub const METHODES_OBS: &[u8] = &[0, 4, 8, 12];

/// Observation continuity values
pub const CONTINUITES_OBS: &[u8] = &[0, 5];

/// Threshold types
pub const TYPES_SEUIL: &[u8] = &[1, 2];

/// Event publication types
pub const PUBLICATIONS_EVENEMENT: &[u8] = &[1, 10, 12, 20, 22, 30, 32, 100];

/// Rating curve types (polynomial, power law)
pub const TYPES_COURBE_TARAGE: &[u8] = &[0, 4];

/// Simulation status values
pub const STATUTS_SIMULATION: &[u8] = &[4, 8, 12, 16];

/// Probability keys mapped to dedicated forecast elements
pub mod probabilite {
    pub const MIN: u8 = 0;
    pub const MOY: u8 = 50;
    pub const MAX: u8 = 100;
}
