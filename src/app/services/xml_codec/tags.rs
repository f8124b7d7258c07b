//! Element names shared by the builder and the parser
//!
//! Leaf tags used by a single entity stay inline in the story functions.

// Skeleton
pub const SCENARIO: &str = "Scenario";
pub const REFHYD: &str = "RefHyd";
pub const DONNEES: &str = "Donnees";

// Collections and their items
pub const SITES_HYDRO: &str = "SitesHydro";
pub const SITE_HYDRO: &str = "SiteHydro";
pub const SITES_METEO: &str = "SitesMeteo";
pub const SITE_METEO: &str = "SiteMeteo";
pub const SEUILS_HYDRO: &str = "SeuilsHydro";
pub const SEUIL_HYDRO: &str = "SeuilHydro";
pub const EVENEMENTS: &str = "Evenements";
pub const EVENEMENT: &str = "Evenement";
pub const COURBES_TARAGE: &str = "CourbesTarage";
pub const COURBE_TARAGE: &str = "CourbeTarage";
pub const JAUGEAGES: &str = "Jaugeages";
pub const JAUGEAGE: &str = "Jaugeage";
pub const COURBES_CORRECTION: &str = "CourbesCorrH";
pub const COURBE_CORRECTION: &str = "CourbeCorrH";
pub const SERIES: &str = "Series";
pub const SERIE: &str = "Serie";
pub const SERIES_METEO: &str = "SeriesMeteo";
pub const SERIE_METEO: &str = "SerieMeteo";
pub const SIMULATIONS: &str = "Simuls";
pub const SIMULATION: &str = "Simul";

// Entity codes
pub const CD_SITE_HYDRO: &str = "CdSiteHydro";
pub const CD_STATION_HYDRO: &str = "CdStationHydro";
pub const CD_CAPTEUR: &str = "CdCapteur";
pub const CD_SITE_METEO: &str = "CdSiteMeteo";
pub const CD_GRD_METEO: &str = "CdGrdMeteo";
pub const CD_SEUIL_HYDRO: &str = "CdSeuilHydro";
pub const CD_CONTACT: &str = "CdContact";
pub const CD_COMMUNE: &str = "CdCommune";

pub const VALEURS_SEUIL_SITE: &str = "ValeursSeuilSiteHydro";
pub const VALEUR_SEUIL_SITE: &str = "ValeurSeuilSiteHydro";

/// Coordinate leaves: x, y, projection
pub const COORD_SITE_HYDRO: [&str; 3] =
    ["CoordXSiteHydro", "CoordYSiteHydro", "ProjCoordSiteHydro"];
pub const COORD_STATION_HYDRO: [&str; 3] =
    ["CoordXStationHydro", "CoordYStationHydro", "ProjCoordStationHydro"];
pub const COORD_SITE_METEO: [&str; 3] =
    ["CoordXSiteMeteo", "CoordYSiteMeteo", "ProjCoordSiteMeteo"];
