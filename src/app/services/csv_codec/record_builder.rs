//! Construction of domain records from one CSV row
//!
//! Each builder reads the attribute bags of its parent entity kind and of its
//! optional child kind, then hands the values to the entity constructors.
//! Errors bubble up unwrapped; the parser adds the line number.

use super::field_parsers::Attrs;
use super::mapper::{EntityKind, FieldMap, Mapper};
use crate::app::models::{
    Capteur, Coord, Entite, Grandeur, ObservationHydro, ObservationMeteo, Observations, SerieHydro,
    SerieMeteo, Sitehydro, Sitemeteo, Station,
};
use crate::Result;

/// One data row zipped with the header, plus the conversion context
pub struct RowContext<'a> {
    pub mapper: &'a Mapper,
    pub fields: &'a [(&'a str, &'a str)],
    pub decimal_separator: Option<char>,
    pub line: u64,
}

impl RowContext<'_> {
    /// Attribute bag of `kind`; empty when the mapper has no such table
    pub fn attrs(&self, kind: EntityKind) -> Result<Attrs> {
        let empty = FieldMap::new();
        let table = self.mapper.table(kind).unwrap_or(&empty);
        Attrs::extract(kind, table, self.fields, self.decimal_separator, self.line)
    }

    /// Coordinates, attached only when the sub-table yields a value
    fn coord(&self, kind: EntityKind) -> Result<Option<Coord>> {
        let attrs = self.attrs(kind)?;
        if attrs.is_empty() {
            return Ok(None);
        }
        Coord::new(
            attrs.required_parsed("x")?,
            attrs.required_parsed("y")?,
            attrs.required_parsed("proj")?,
        )
        .map(Some)
    }
}

/// Hydrometric site with at most one station
pub fn build_sitehydro(ctx: &RowContext<'_>) -> Result<Sitehydro> {
    let attrs = ctx.attrs(EntityKind::Sitehydro)?;
    let mut site = Sitehydro::new(attrs.required("code")?)?;
    if let Some(typesite) = attrs.text("typesite") {
        site = site.with_typesite(typesite)?;
    }
    site.libelle = attrs.owned("libelle");
    site.libelleusuel = attrs.owned("libelleusuel");
    site.communes = attrs.texts("communes");
    site.coord = ctx.coord(EntityKind::SitehydroCoord)?;

    let station_attrs = ctx.attrs(EntityKind::Station)?;
    if !station_attrs.is_empty() {
        let mut station = Station::new(station_attrs.required("code")?)?;
        if let Some(typestation) = station_attrs.text("typestation") {
            station = station.with_typestation(typestation)?;
        }
        station.libelle = station_attrs.owned("libelle");
        station.commune = station_attrs.owned("commune");
        station.coord = ctx.coord(EntityKind::StationCoord)?;
        site.stations.push(station);
    }

    site.validate()?;
    Ok(site)
}

/// Meteorological site with at most one grandeur
pub fn build_sitemeteo(ctx: &RowContext<'_>) -> Result<Sitemeteo> {
    let attrs = ctx.attrs(EntityKind::Sitemeteo)?;
    let mut site = Sitemeteo::new(attrs.required("code")?)?;
    site.libelle = attrs.owned("libelle");
    site.libelleusuel = attrs.owned("libelleusuel");
    site.commune = attrs.owned("commune");
    site.coord = ctx.coord(EntityKind::SitemeteoCoord)?;

    let grandeur_attrs = ctx.attrs(EntityKind::Grandeur)?;
    if !grandeur_attrs.is_empty() {
        site.grandeurs.push(build_grandeur(&grandeur_attrs)?);
    }

    site.validate()?;
    Ok(site)
}

fn build_grandeur(attrs: &Attrs) -> Result<Grandeur> {
    let mut grandeur = Grandeur::new(attrs.required("typemesure")?)?;
    grandeur.dtmiseservice = attrs.datetime("dtmiseservice")?;
    grandeur.dtfermeture = attrs.datetime("dtfermeture")?;
    Ok(grandeur)
}

/// Most specific hydrometric entity named on the row (capteur > station > site)
fn resolve_hydro_entite(ctx: &RowContext<'_>) -> Result<Entite> {
    if let Some(code) = ctx.attrs(EntityKind::Capteur)?.text("code") {
        return Ok(Capteur::new(code)?.into());
    }
    if let Some(code) = ctx.attrs(EntityKind::Station)?.text("code") {
        return Ok(Station::new(code)?.into());
    }
    let code = ctx.attrs(EntityKind::Sitehydro)?.required("code")?.to_string();
    Ok(Sitehydro::new(&code)?.into())
}

/// Hydrometric series holding the row's single observation
pub fn build_seriehydro(ctx: &RowContext<'_>) -> Result<SerieHydro> {
    let entite = resolve_hydro_entite(ctx)?;

    let attrs = ctx.attrs(EntityKind::SerieHydro)?;
    let mut serie = SerieHydro::new(entite, attrs.required("grandeur")?)?;
    serie.dtdeb = attrs.datetime("dtdeb")?;
    serie.dtfin = attrs.datetime("dtfin")?;
    serie.dtprod = attrs.datetime("dtprod")?;
    serie.statut = attrs.parsed("statut")?;

    let obs = ctx.attrs(EntityKind::ObservationHydro)?;
    let mut observation =
        ObservationHydro::new(obs.required_datetime("dte")?, obs.required_parsed("res")?)?;
    observation.mth = obs.parsed("mth")?;
    observation.qal = obs.parsed("qal")?;
    observation.cnt = obs.parsed("cnt")?;
    serie.observations = Observations::new(vec![observation]);

    serie.validate()?;
    Ok(serie)
}

/// Meteorological series holding the row's single observation
pub fn build_seriemeteo(ctx: &RowContext<'_>) -> Result<SerieMeteo> {
    let site_attrs = ctx.attrs(EntityKind::Sitemeteo)?;
    let site = Sitemeteo::new(site_attrs.required("code")?)?;
    let grandeur = build_grandeur(&ctx.attrs(EntityKind::Grandeur)?)?;

    let attrs = ctx.attrs(EntityKind::SerieMeteo)?;
    let mut serie = SerieMeteo::new(site, grandeur);
    serie.duree = attrs.parsed("duree")?;
    serie.dtdeb = attrs.datetime("dtdeb")?;
    serie.dtfin = attrs.datetime("dtfin")?;
    serie.dtprod = attrs.datetime("dtprod")?;
    serie.statut = attrs.parsed("statut")?;

    let obs = ctx.attrs(EntityKind::ObservationMeteo)?;
    let mut observation =
        ObservationMeteo::new(obs.required_datetime("dte")?, obs.required_parsed("res")?)?;
    observation.mth = obs.parsed("mth")?;
    observation.qal = obs.parsed("qal")?;
    observation.qua = obs.parsed("qua")?;
    serie.observations = Observations::new(vec![observation]);

    serie.validate()?;
    Ok(serie)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::EntiteKind;
    use crate::Error;

    fn context<'a>(mapper: &'a Mapper, fields: &'a [(&'a str, &'a str)]) -> RowContext<'a> {
        RowContext {
            mapper,
            fields,
            decimal_separator: Some(','),
            line: 2,
        }
    }

    #[test]
    fn test_site_without_station_fields_has_no_station() {
        let mapper = Mapper::default();
        let fields = [
            ("<CdSiteHydro>", "A1234567"),
            ("<LbSiteHydro>", "La Seine à Paris"),
            ("<CdStationHydro>", ""),
        ];
        let site = build_sitehydro(&context(&mapper, &fields)).unwrap();
        assert_eq!(site.libelle.as_deref(), Some("La Seine à Paris"));
        assert!(site.stations.is_empty());
        assert!(site.coord.is_none());
    }

    #[test]
    fn test_coord_attached_when_present() {
        let mapper = Mapper::default();
        let fields = [
            ("<CdSiteHydro>", "A1234567"),
            ("<CoordXSiteHydro>", "620000,5"),
            ("<CoordYSiteHydro>", "6800000"),
            ("<ProjCoordSiteHydro>", "26"),
        ];
        let site = build_sitehydro(&context(&mapper, &fields)).unwrap();
        let coord = site.coord.unwrap();
        assert_eq!(coord.x, 620_000.5);
        assert_eq!(coord.proj, 26);
    }

    #[test]
    fn test_most_specific_entity_wins() {
        let mapper = Mapper::default();
        let fields = [
            ("<CdSiteHydro>", "A1234567"),
            ("<CdStationHydro>", "A123456701"),
            ("<CdCapteur>", ""),
            ("<GrdSerie>", "H"),
            ("<DtObsHydro>", "2010-02-26 12:00:00"),
            ("<ResObsHydro>", "12,5"),
        ];
        let serie = build_seriehydro(&context(&mapper, &fields)).unwrap();
        assert_eq!(serie.entite.kind(), EntiteKind::Station);
        assert_eq!(serie.observations.len(), 1);
    }

    #[test]
    fn test_missing_observation_value() {
        let mapper = Mapper::default();
        let fields = [
            ("<CdSiteHydro>", "A1234567"),
            ("<GrdSerie>", "Q"),
            ("<DtObsHydro>", "2010-02-26 12:00:00"),
        ];
        let result = build_seriehydro(&context(&mapper, &fields));
        assert!(matches!(result, Err(Error::Validation { .. })));
    }
}
