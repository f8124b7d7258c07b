//! SANDRE Hydrometrie v1.1 document builder
//!
//! Composes the fixed document skeleton (`Scenario`, `RefHyd`, `Donnees`)
//! from a [`Payload`] and writes it with the story writer. Child order follows
//! the schema; re-serializing a parsed document reproduces it exactly.

use super::story::{write_event, write_story, Content, Descriptor, Story};
use super::tags;
use crate::app::models::{
    Actor, Contact, Coord, CourbeCorrection, CourbeTarage, Entite, EntiteKind, Evenement,
    Jaugeage, Scenario, SerieHydro, SerieMeteo, SeuilHydro, Simulation, Sitehydro, Sitemeteo,
    Station,
};
use crate::app::models::evenement::EVENEMENT_KINDS;
use crate::app::models::simulation::SIMULATION_KINDS;
use crate::app::models::entite::HYDRO_KINDS;
use crate::constants::{probabilite, XML_ROOT};
use crate::{Error, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use tracing::debug;

/// Borrowed content of one document
#[derive(Debug, Clone, Copy, Default)]
pub struct Payload<'a> {
    pub scenario: Option<&'a Scenario>,
    pub siteshydro: &'a [Sitehydro],
    pub sitesmeteo: &'a [Sitemeteo],
    pub seuilshydro: &'a [SeuilHydro],
    pub evenements: &'a [Evenement],
    pub courbestarage: &'a [CourbeTarage],
    pub jaugeages: &'a [Jaugeage],
    pub courbescorrection: &'a [CourbeCorrection],
    pub serieshydro: &'a [SerieHydro],
    pub seriesmeteo: &'a [SerieMeteo],
    pub simulations: &'a [Simulation],
}

/// Serialize a payload to an indented UTF-8 XML document
pub fn to_xml(payload: &Payload<'_>) -> Result<String> {
    let story = build_document(payload)?;

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_event(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    write_event(&mut writer, Event::Start(BytesStart::new(XML_ROOT)))?;
    write_story(&mut writer, &story)?;
    write_event(&mut writer, Event::End(BytesEnd::new(XML_ROOT)))?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).map_err(|e| Error::xml_writing(e.to_string()))
}

/// Story of the root element
pub fn build_document(payload: &Payload<'_>) -> Result<Story> {
    let scenario = payload.scenario.map(scenario_story).transpose()?;

    let refhyd = Story::new()
        .node(
            tags::SITES_HYDRO,
            Story::new().nodes(tags::SITE_HYDRO, each(payload.siteshydro, sitehydro_story)?),
        )
        .node(
            tags::SITES_METEO,
            Story::new().nodes(tags::SITE_METEO, each(payload.sitesmeteo, sitemeteo_story)?),
        )
        .node(
            tags::SEUILS_HYDRO,
            Story::new().nodes(tags::SEUIL_HYDRO, each(payload.seuilshydro, seuilhydro_story)?),
        );

    let donnees = Story::new()
        .node(
            tags::EVENEMENTS,
            Story::new().nodes(tags::EVENEMENT, each(payload.evenements, evenement_story)?),
        )
        .node(
            tags::COURBES_TARAGE,
            Story::new().nodes(
                tags::COURBE_TARAGE,
                each(payload.courbestarage, courbetarage_story)?,
            ),
        )
        .node(
            tags::JAUGEAGES,
            Story::new().nodes(tags::JAUGEAGE, each(payload.jaugeages, jaugeage_story)?),
        )
        .node(
            tags::COURBES_CORRECTION,
            Story::new().nodes(
                tags::COURBE_CORRECTION,
                each(payload.courbescorrection, courbecorrection_story)?,
            ),
        )
        .node(
            tags::SERIES,
            Story::new().nodes(tags::SERIE, each(payload.serieshydro, seriehydro_story)?),
        )
        .node(
            tags::SERIES_METEO,
            Story::new().nodes(tags::SERIE_METEO, each(payload.seriesmeteo, seriemeteo_story)?),
        )
        .node(
            tags::SIMULATIONS,
            Story::new().nodes(tags::SIMULATION, each(payload.simulations, simulation_story)?),
        );

    debug!(
        "Built document story: scenario={}, refhyd={}, donnees={}",
        scenario.is_some(),
        !refhyd.is_empty(),
        !donnees.is_empty()
    );

    Ok(Story::new()
        .node_opt(tags::SCENARIO, scenario)
        .node(tags::REFHYD, refhyd)
        .node(tags::DONNEES, donnees))
}

fn each<T>(items: &[T], build: fn(&T) -> Result<Story>) -> Result<Vec<Story>> {
    items.iter().map(build).collect()
}

/// Tag carrying the code of an attached entity
pub(crate) fn entite_tag(kind: EntiteKind) -> &'static str {
    match kind {
        EntiteKind::SiteHydro => tags::CD_SITE_HYDRO,
        EntiteKind::Station => tags::CD_STATION_HYDRO,
        EntiteKind::Capteur => tags::CD_CAPTEUR,
        EntiteKind::SiteMeteo => tags::CD_SITE_METEO,
    }
}

fn entite_ref(story: Story, entite: &Entite) -> Story {
    story.leaf(entite_tag(entite.kind()), Some(entite.code()))
}

fn contact_ref(story: Story, contact: Option<&Contact>) -> Story {
    story.leaf(tags::CD_CONTACT, contact.map(|c| c.code.as_str()))
}

// =============================================================================
// Scenario
// =============================================================================

fn scenario_story(scenario: &Scenario) -> Result<Story> {
    Ok(Story::new()
        .leaf("CodeScenario", Some(scenario.code()))
        .leaf("VersionScenario", Some(scenario.version()))
        .leaf("NomScenario", Some(scenario.name()))
        .leaf("DateHeureCreationFichier", Some(scenario.production_datetime))
        .node("Emetteur", actor_story(&scenario.emetteur)?)
        .node("Destinataire", actor_story(&scenario.destinataire)?))
}

/// Sender or recipient: the effective intervenant, then the contact if any
fn actor_story(actor: &Actor) -> Result<Story> {
    let intervenant = actor.effective_intervenant().ok_or_else(|| {
        Error::invalid_argument("scenario actor contact has no intervenant")
    })?;
    let contact = actor.contact();

    Ok(Story::new()
        .push(
            Descriptor::new("CdIntervenant", Content::Scalar(intervenant.code.clone()))
                .with_attribute("schemeAgencyID", intervenant.origine.as_str()),
        )
        .leaf("NomIntervenant", intervenant.nom.as_deref())
        .leaf("MnIntervenant", intervenant.mnemo.as_deref())
        .leaf(tags::CD_CONTACT, contact.map(|c| c.code.as_str()))
        .leaf("NomContact", contact.and_then(|c| c.nom.as_deref()))
        .leaf("PrenomContact", contact.and_then(|c| c.prenom.as_deref())))
}

// =============================================================================
// RefHyd
// =============================================================================

fn coord_story(coord: &Coord, [x, y, proj]: [&'static str; 3]) -> Story {
    Story::new()
        .leaf(x, Some(coord.x))
        .leaf(y, Some(coord.y))
        .leaf(proj, Some(coord.proj))
}

fn sitehydro_story(site: &Sitehydro) -> Result<Story> {
    let stations = each(&site.stations, station_story)?;
    Ok(Story::new()
        .leaf(tags::CD_SITE_HYDRO, Some(&site.code))
        .leaf("LbSiteHydro", site.libelle.as_deref())
        .leaf("LbUsuelSiteHydro", site.libelleusuel.as_deref())
        .leaf("TypSiteHydro", Some(&site.typesite))
        .node_opt(
            "CoordSiteHydro",
            site.coord.as_ref().map(|c| coord_story(c, tags::COORD_SITE_HYDRO)),
        )
        .leaves(tags::CD_COMMUNE, &site.communes)
        .node(
            "StationsHydro",
            Story::new().nodes("StationHydro", stations),
        ))
}

fn station_story(station: &Station) -> Result<Story> {
    let capteurs = station
        .capteurs
        .iter()
        .map(|capteur| {
            Story::new()
                .leaf(tags::CD_CAPTEUR, Some(&capteur.code))
                .leaf("LbCapteur", capteur.libelle.as_deref())
                .leaf("TypMesureCapteur", Some(&capteur.typemesure))
        })
        .collect();

    Ok(Story::new()
        .leaf(tags::CD_STATION_HYDRO, Some(&station.code))
        .leaf("LbStationHydro", station.libelle.as_deref())
        .leaf("TypStationHydro", Some(&station.typestation))
        .node_opt(
            "CoordStationHydro",
            station.coord.as_ref().map(|c| coord_story(c, tags::COORD_STATION_HYDRO)),
        )
        .leaf(tags::CD_COMMUNE, station.commune.as_deref())
        .node("Capteurs", Story::new().nodes("Capteur", capteurs)))
}

fn sitemeteo_story(site: &Sitemeteo) -> Result<Story> {
    let grandeurs = site
        .grandeurs
        .iter()
        .map(|grandeur| {
            Story::new()
                .leaf(tags::CD_GRD_METEO, Some(&grandeur.typemesure))
                .leaf("DtMiseServiceGrdMeteo", grandeur.dtmiseservice)
                .leaf("DtFermetureServiceGrdMeteo", grandeur.dtfermeture)
        })
        .collect();

    Ok(Story::new()
        .leaf(tags::CD_SITE_METEO, Some(&site.code))
        .leaf("LbSiteMeteo", site.libelle.as_deref())
        .leaf("LbUsuelSiteMeteo", site.libelleusuel.as_deref())
        .node_opt(
            "CoordSiteMeteo",
            site.coord.as_ref().map(|c| coord_story(c, tags::COORD_SITE_METEO)),
        )
        .leaf(tags::CD_COMMUNE, site.commune.as_deref())
        .node("GrdsMeteo", Story::new().nodes("GrdMeteo", grandeurs)))
}

/// Threshold of a hydrometric site, with at most one site-level value
fn seuilhydro_story(seuil: &SeuilHydro) -> Result<Story> {
    seuil.entite.expect_kind(&[EntiteKind::SiteHydro])?;

    let mut site_values = Vec::new();
    let mut station_values = Vec::new();
    for valeur in &seuil.valeurs {
        match valeur.entite.kind() {
            EntiteKind::SiteHydro => site_values.push(
                Story::new()
                    .leaf("ValValeurSeuilSiteHydro", valeur.valeur)
                    .leaf("ToleranceValeurSeuilSiteHydro", valeur.tolerance)
                    .leaf("DtActivationValeurSeuilSiteHydro", valeur.dtactivation)
                    .leaf("DtDesactivationValeurSeuilSiteHydro", valeur.dtdesactivation),
            ),
            EntiteKind::Station => station_values.push(
                Story::new()
                    .leaf(tags::CD_STATION_HYDRO, Some(valeur.entite.code()))
                    .leaf("ValValeurSeuilStationHydro", valeur.valeur)
                    .leaf("ToleranceValeurSeuilStationHydro", valeur.tolerance)
                    .leaf("DtActivationValeurSeuilStationHydro", valeur.dtactivation)
                    .leaf("DtDesactivationValeurSeuilStationHydro", valeur.dtdesactivation),
            ),
            other => {
                return Err(Error::entity_kind("sitehydro or station", other.to_string()));
            }
        }
    }

    let story = Story::new()
        .leaf(tags::CD_SEUIL_HYDRO, Some(&seuil.code))
        .leaf(tags::CD_SITE_HYDRO, Some(seuil.entite.code()))
        .leaf("TypSeuilHydro", Some(seuil.typeseuil))
        .leaf("NatureSeuilHydro", seuil.nature)
        .leaf("DureeSeuilHydro", seuil.duree)
        .leaf("LbUsuelSeuilHydro", seuil.libelle.as_deref())
        .leaf("MnSeuilHydro", seuil.mnemo.as_deref())
        .leaf("IndiceGraviteSeuilHydro", seuil.gravite)
        .leaf("ComSeuilHydro", seuil.commentaire.as_deref())
        .leaf("PublicationSeuilHydro", seuil.publication)
        .node(
            tags::VALEURS_SEUIL_SITE,
            Story::new().nodes(tags::VALEUR_SEUIL_SITE, site_values),
        )
        .node(
            "ValeursSeuilStationHydro",
            Story::new().nodes("ValeurSeuilStationHydro", station_values),
        );

    check_single_site_value(&story, &seuil.code)?;
    Ok(story)
}

/// The schema allows one value per site threshold
fn check_single_site_value(story: &Story, code: &str) -> Result<()> {
    let count = match story.get(tags::VALEURS_SEUIL_SITE).map(|d| &d.content) {
        Some(Content::Nested(values)) => values
            .get(tags::VALEUR_SEUIL_SITE)
            .map_or(0, Descriptor::multiplicity),
        _ => 0,
    };
    if count > 1 {
        return Err(Error::invalid_argument(format!(
            "threshold {code} has {count} site values, at most one is allowed"
        )));
    }
    Ok(())
}

// =============================================================================
// Donnees
// =============================================================================

fn evenement_story(evenement: &Evenement) -> Result<Story> {
    evenement.entite.expect_kind(EVENEMENT_KINDS)?;
    let story = entite_ref(Story::new(), &evenement.entite);
    Ok(contact_ref(story, Some(&evenement.contact))
        .leaf("DtEvenement", Some(evenement.dt))
        .leaf("DescEvenement", Some(&evenement.descriptif))
        .leaf("TypPubliEvenement", Some(evenement.publication))
        .leaf("DtMajEvenement", evenement.dtmaj))
}

fn courbetarage_story(courbe: &CourbeTarage) -> Result<Story> {
    let pivots = courbe
        .pivots
        .iter()
        .map(|pivot| {
            Story::new()
                .leaf("HtPivotCourbeTarage", Some(pivot.hauteur))
                .leaf("QPivotCourbeTarage", Some(pivot.debit))
                .leaf("QualifPivotCourbeTarage", pivot.qualite)
        })
        .collect();
    let periodes = courbe
        .periodes
        .iter()
        .map(|periode| {
            Story::new()
                .leaf("DtDebPeriodeUtilisationCourbeTarage", Some(periode.dtdeb))
                .leaf("DtFinPeriodeUtilisationCourbeTarage", periode.dtfin)
                .leaf("EtatPeriodeUtilisationCourbeTarage", Some(periode.etat))
        })
        .collect();

    let story = Story::new()
        .leaf("CdCourbeTarage", Some(&courbe.code))
        .leaf("LbCourbeTarage", Some(&courbe.libelle))
        .leaf("TypCourbeTarage", Some(courbe.typect))
        .leaf("LimiteInfCourbeTarage", courbe.limiteinf)
        .leaf("LimiteSupCourbeTarage", courbe.limitesup)
        .leaf("ComCourbeTarage", courbe.commentaire.as_deref())
        .leaf(tags::CD_STATION_HYDRO, Some(&courbe.station.code));
    Ok(contact_ref(story, courbe.contact.as_ref())
        .node(
            "PivotsCourbeTarage",
            Story::new().nodes("PivotCourbeTarage", pivots),
        )
        .node(
            "PeriodesUtilisationCourbeTarage",
            Story::new().nodes("PeriodeUtilisationCourbeTarage", periodes),
        )
        .leaf("DtMajCourbeTarage", courbe.dtmaj))
}

fn jaugeage_story(jaugeage: &Jaugeage) -> Result<Story> {
    let hauteurs = jaugeage
        .hauteurs
        .iter()
        .map(|hauteur| {
            Story::new()
                .leaf(tags::CD_STATION_HYDRO, Some(&hauteur.station.code))
                .leaf("CoteRetenueHauteurJaugeage", hauteur.coteretenue)
                .leaf("CoteDebHauteurJaugeage", hauteur.cotedeb)
                .leaf("CoteFinHauteurJaugeage", hauteur.cotefin)
        })
        .collect();

    Ok(Story::new()
        .leaf("CdJaugeage", jaugeage.code.as_deref())
        .leaf("DebitJaugeage", jaugeage.debit)
        .leaf("DtDebJaugeage", jaugeage.dtdeb)
        .leaf("DtFinJaugeage", jaugeage.dtfin)
        .leaf("ModeJaugeage", jaugeage.mode)
        .leaf("ComJaugeage", jaugeage.commentaire.as_deref())
        .leaf(tags::CD_SITE_HYDRO, Some(&jaugeage.site.code))
        .node("HauteursJaugeage", Story::new().nodes("HauteurJaugeage", hauteurs))
        .leaf("DtMajJaugeage", jaugeage.dtmaj))
}

fn courbecorrection_story(courbe: &CourbeCorrection) -> Result<Story> {
    let pivots = courbe
        .pivots
        .iter()
        .map(|pivot| {
            Story::new()
                .leaf("DtPivotCourbeCorrH", Some(pivot.dte))
                .leaf("DeltaHPivotCourbeCorrH", Some(pivot.deltah))
                .leaf("DtActivationPivotCourbeCorrH", pivot.dtactivation)
                .leaf("DtDesactivationPivotCourbeCorrH", pivot.dtdesactivation)
        })
        .collect();

    Ok(Story::new()
        .leaf(tags::CD_STATION_HYDRO, Some(&courbe.station.code))
        .leaf("LbCourbeCorrH", courbe.libelle.as_deref())
        .leaf("ComCourbeCorrH", courbe.commentaire.as_deref())
        .node("PivotsCourbeCorrH", Story::new().nodes("PivotCourbeCorrH", pivots))
        .leaf("DtMajCourbeCorrH", courbe.dtmaj))
}

fn seriehydro_story(serie: &SerieHydro) -> Result<Story> {
    serie.entite.expect_kind(HYDRO_KINDS)?;
    let observations = serie
        .observations
        .iter()
        .map(|obs| {
            Story::new()
                .leaf("DtObsHydro", Some(obs.dte))
                .leaf("ResObsHydro", Some(obs.res))
                .leaf("MethObsHydro", obs.mth)
                .leaf("QualObsHydro", obs.qal)
                .leaf("ContObsHydro", obs.cnt)
        })
        .collect();

    Ok(entite_ref(Story::new(), &serie.entite)
        .leaf("GrdSerie", Some(&serie.grandeur))
        .leaf("DtDebSerie", serie.start())
        .leaf("DtFinSerie", serie.end())
        .leaf("StatutSerie", serie.statut)
        .leaf("DtProdSerie", serie.dtprod)
        .node("ObssHydro", Story::new().nodes("ObsHydro", observations)))
}

fn seriemeteo_story(serie: &SerieMeteo) -> Result<Story> {
    let observations = serie
        .observations
        .iter()
        .map(|obs| {
            Story::new()
                .leaf("DtObsMeteo", Some(obs.dte))
                .leaf("ResObsMeteo", Some(obs.res))
                .leaf("MethObsMeteo", obs.mth)
                .leaf("QualObsMeteo", obs.qal)
                .leaf("IndiceQualObsMeteo", obs.qua)
        })
        .collect();

    Ok(Story::new()
        .leaf(tags::CD_SITE_METEO, Some(&serie.site.code))
        .leaf(tags::CD_GRD_METEO, Some(&serie.grandeur.typemesure))
        .leaf("DureeSerieMeteo", serie.duree)
        .leaf("DtDebSerieMeteo", serie.start())
        .leaf("DtFinSerieMeteo", serie.end())
        .leaf("DtProdSerieMeteo", serie.dtprod)
        .leaf("StatutSerieMeteo", serie.statut)
        .node("ObssMeteo", Story::new().nodes("ObsMeteo", observations)))
}

fn simulation_story(simulation: &Simulation) -> Result<Story> {
    simulation.entite.expect_kind(SIMULATION_KINDS)?;

    let previsions = simulation
        .previsions
        .by_date()
        .into_iter()
        .map(|(dte, values)| {
            let pick = |prob: u8| values.iter().find(|(p, _)| *p == prob).map(|(_, res)| *res);
            let others = values
                .iter()
                .filter(|(p, _)| {
                    ![probabilite::MOY, probabilite::MIN, probabilite::MAX].contains(p)
                })
                .map(|(prob, res)| {
                    Story::new()
                        .leaf("PProbPrev", Some(*prob))
                        .leaf("ResProbPrev", Some(*res))
                })
                .collect();
            Story::new()
                .leaf("DtPrev", Some(dte))
                .leaf("ResMoyPrev", pick(probabilite::MOY))
                .leaf("ResMinPrev", pick(probabilite::MIN))
                .leaf("ResMaxPrev", pick(probabilite::MAX))
                .node("ProbsPrev", Story::new().nodes("ProbPrev", others))
        })
        .collect();

    let story = Story::new()
        .leaf("GrdSimul", Some(&simulation.grandeur))
        .leaf("DtProdSimul", Some(simulation.dtprod))
        .leaf("IndiceQualiteSimul", simulation.qualite)
        .leaf("StatutSimul", Some(simulation.statut))
        .leaf("PubliSimul", Some(simulation.public))
        .forced_leaf("ComSimul", simulation.commentaire.as_deref());
    let story = entite_ref(story, &simulation.entite)
        .leaf("CdModelePrevision", Some(&simulation.modeleprevision));
    Ok(contact_ref(story, simulation.contact.as_ref())
        .node("Prevs", Story::new().nodes("Prev", previsions)))
}
