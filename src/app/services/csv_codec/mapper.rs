//! Field-mapping tables for the simplified CSV exchange format
//!
//! A [`Mapper`] holds one table per [`EntityKind`]. Each table maps a CSV
//! header token (e.g. `<CdSiteHydro>`) to an entity attribute name, or to
//! `None` for fields the codec knows but does not support: such columns are
//! dropped even when they hold a value.
//!
//! Tables are read-only during conversion; callers decoding non-conforming
//! files pass their own [`Mapper`] through [`crate::CsvOptions::with_mapper`].

use crate::{Error, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Header token to attribute name (`None` = known but unsupported)
pub type FieldMap = BTreeMap<String, Option<String>>;

/// Entity (or entity sub-object) a mapping table applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Sitehydro,
    SitehydroCoord,
    Station,
    StationCoord,
    Capteur,
    Sitemeteo,
    SitemeteoCoord,
    Grandeur,
    SerieHydro,
    ObservationHydro,
    SerieMeteo,
    ObservationMeteo,
}

impl EntityKind {
    pub const ALL: [EntityKind; 12] = [
        EntityKind::Sitehydro,
        EntityKind::SitehydroCoord,
        EntityKind::Station,
        EntityKind::StationCoord,
        EntityKind::Capteur,
        EntityKind::Sitemeteo,
        EntityKind::SitemeteoCoord,
        EntityKind::Grandeur,
        EntityKind::SerieHydro,
        EntityKind::ObservationHydro,
        EntityKind::SerieMeteo,
        EntityKind::ObservationMeteo,
    ];

    /// Outer key of the table
    pub fn key(&self) -> &'static str {
        match self {
            EntityKind::Sitehydro => "sitehydro",
            EntityKind::SitehydroCoord => "sitehydro.coord",
            EntityKind::Station => "station",
            EntityKind::StationCoord => "station.coord",
            EntityKind::Capteur => "capteur",
            EntityKind::Sitemeteo => "sitemeteo",
            EntityKind::SitemeteoCoord => "sitemeteo.coord",
            EntityKind::Grandeur => "grandeur",
            EntityKind::SerieHydro => "seriehydro",
            EntityKind::ObservationHydro => "obshydro",
            EntityKind::SerieMeteo => "seriemeteo",
            EntityKind::ObservationMeteo => "obsmeteo",
        }
    }

    /// Attribute names a table of this kind may target
    pub fn attributes(&self) -> &'static [&'static str] {
        match self {
            EntityKind::Sitehydro => &["code", "typesite", "libelle", "libelleusuel", "communes"],
            EntityKind::SitehydroCoord | EntityKind::StationCoord | EntityKind::SitemeteoCoord => {
                &["x", "y", "proj"]
            }
            EntityKind::Station => &["code", "typestation", "libelle", "commune"],
            EntityKind::Capteur => &["code", "typemesure", "libelle"],
            EntityKind::Sitemeteo => &["code", "libelle", "libelleusuel", "commune"],
            EntityKind::Grandeur => &["typemesure", "dtmiseservice", "dtfermeture"],
            EntityKind::SerieHydro => &["grandeur", "dtdeb", "dtfin", "dtprod", "statut"],
            EntityKind::ObservationHydro => &["dte", "res", "mth", "qal", "cnt"],
            EntityKind::SerieMeteo => &["duree", "dtdeb", "dtfin", "dtprod", "statut"],
            EntityKind::ObservationMeteo => &["dte", "res", "mth", "qal", "qua"],
        }
    }

    /// Numeric attributes subject to decimal separator substitution
    pub fn decimal_fields(&self) -> &'static [&'static str] {
        match self {
            EntityKind::SitehydroCoord | EntityKind::StationCoord | EntityKind::SitemeteoCoord => {
                &["x", "y"]
            }
            EntityKind::ObservationHydro => &["res"],
            EntityKind::ObservationMeteo => &["res", "qua"],
            _ => &[],
        }
    }

    /// Datetime attributes subject to `DD/MM/YYYY` normalization
    pub fn date_fields(&self) -> &'static [&'static str] {
        match self {
            EntityKind::Grandeur => &["dtmiseservice", "dtfermeture"],
            EntityKind::SerieHydro | EntityKind::SerieMeteo => &["dtdeb", "dtfin", "dtprod"],
            EntityKind::ObservationHydro | EntityKind::ObservationMeteo => &["dte"],
            _ => &[],
        }
    }

    /// Default SANDRE table
    fn default_table(&self) -> &'static [(&'static str, Option<&'static str>)] {
        match self {
            EntityKind::Sitehydro => &[
                ("<CdSiteHydro>", Some("code")),
                ("<LbSiteHydro>", Some("libelle")),
                ("<LbUsuelSiteHydro>", Some("libelleusuel")),
                ("<TypSiteHydro>", Some("typesite")),
                ("<CdCommune>", Some("communes")),
                ("<MnSiteHydro>", None),
                ("<ComSiteHydro>", None),
            ],
            EntityKind::SitehydroCoord => &[
                ("<CoordXSiteHydro>", Some("x")),
                ("<CoordYSiteHydro>", Some("y")),
                ("<ProjCoordSiteHydro>", Some("proj")),
            ],
            EntityKind::Station => &[
                ("<CdStationHydro>", Some("code")),
                ("<LbStationHydro>", Some("libelle")),
                ("<TypStationHydro>", Some("typestation")),
                ("<CdCommuneStationHydro>", Some("commune")),
                ("<ComStationHydro>", None),
            ],
            EntityKind::StationCoord => &[
                ("<CoordXStationHydro>", Some("x")),
                ("<CoordYStationHydro>", Some("y")),
                ("<ProjCoordStationHydro>", Some("proj")),
            ],
            EntityKind::Capteur => &[
                ("<CdCapteur>", Some("code")),
                ("<LbCapteur>", Some("libelle")),
                ("<TypMesureCapteur>", Some("typemesure")),
            ],
            EntityKind::Sitemeteo => &[
                ("<CdSiteMeteo>", Some("code")),
                ("<LbSiteMeteo>", Some("libelle")),
                ("<LbUsuelSiteMeteo>", Some("libelleusuel")),
                ("<CdCommune>", Some("commune")),
                ("<AltitudeSiteMeteo>", None),
            ],
            EntityKind::SitemeteoCoord => &[
                ("<CoordXSiteMeteo>", Some("x")),
                ("<CoordYSiteMeteo>", Some("y")),
                ("<ProjCoordSiteMeteo>", Some("proj")),
            ],
            EntityKind::Grandeur => &[
                ("<CdGrdMeteo>", Some("typemesure")),
                ("<DtMiseServiceGrdMeteo>", Some("dtmiseservice")),
                ("<DtFermetureServiceGrdMeteo>", Some("dtfermeture")),
            ],
            EntityKind::SerieHydro => &[
                ("<GrdSerie>", Some("grandeur")),
                ("<DtDebSerie>", Some("dtdeb")),
                ("<DtFinSerie>", Some("dtfin")),
                ("<DtProdSerie>", Some("dtprod")),
                ("<StatutSerie>", Some("statut")),
            ],
            EntityKind::ObservationHydro => &[
                ("<DtObsHydro>", Some("dte")),
                ("<ResObsHydro>", Some("res")),
                ("<MethObsHydro>", Some("mth")),
                ("<QualObsHydro>", Some("qal")),
                ("<ContObsHydro>", Some("cnt")),
            ],
            EntityKind::SerieMeteo => &[
                ("<DureeSerieMeteo>", Some("duree")),
                ("<DtDebSerieMeteo>", Some("dtdeb")),
                ("<DtFinSerieMeteo>", Some("dtfin")),
                ("<DtProdSerieMeteo>", Some("dtprod")),
                ("<StatutSerieMeteo>", Some("statut")),
            ],
            EntityKind::ObservationMeteo => &[
                ("<DtObsMeteo>", Some("dte")),
                ("<ResObsMeteo>", Some("res")),
                ("<MethObsMeteo>", Some("mth")),
                ("<QualObsMeteo>", Some("qal")),
                ("<IndiceQualObsMeteo>", Some("qua")),
                ("<StatutObsMeteo>", None),
            ],
        }
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        EntityKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.key() == s.trim())
            .ok_or_else(|| Error::invalid_argument(format!("unknown mapper key '{s}'")))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Set of mapping tables, one per entity kind
#[derive(Debug, Clone, PartialEq)]
pub struct Mapper {
    tables: BTreeMap<EntityKind, FieldMap>,
}

impl Default for Mapper {
    fn default() -> Self {
        let tables = EntityKind::ALL
            .iter()
            .map(|kind| {
                let table = kind
                    .default_table()
                    .iter()
                    .map(|(field, attr)| (field.to_string(), attr.map(str::to_string)))
                    .collect();
                (*kind, table)
            })
            .collect();
        Self { tables }
    }
}

impl Mapper {
    /// Build a mapper from string-keyed tables, validating outer keys and
    /// attribute names
    pub fn from_tables<K, F, A>(
        tables: impl IntoIterator<Item = (K, Vec<(F, Option<A>)>)>,
    ) -> Result<Self>
    where
        K: AsRef<str>,
        F: Into<String>,
        A: Into<String>,
    {
        let mut mapper = Self {
            tables: BTreeMap::new(),
        };
        for (key, fields) in tables {
            let kind: EntityKind = key.as_ref().parse()?;
            let mut table = FieldMap::new();
            for (field, attr) in fields {
                let attr = attr.map(Into::into);
                if let Some(name) = &attr {
                    if !kind.attributes().contains(&name.as_str()) {
                        return Err(Error::invalid_argument(format!(
                            "'{name}' is not an attribute of {kind}"
                        )));
                    }
                }
                table.insert(field.into(), attr);
            }
            mapper.tables.insert(kind, table);
        }
        Ok(mapper)
    }

    pub fn table(&self, kind: EntityKind) -> Option<&FieldMap> {
        self.tables.get(&kind)
    }

    /// Whether any of the given tables declares the column
    pub fn knows_column(&self, kinds: &[EntityKind], column: &str) -> bool {
        kinds
            .iter()
            .filter_map(|kind| self.tables.get(kind))
            .any(|table| table.contains_key(column))
    }
}
