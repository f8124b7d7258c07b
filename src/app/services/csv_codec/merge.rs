//! Merging of per-row records describing the same parent entity
//!
//! Every CSV row yields one record carrying at most one child (a station, a
//! grandeur or a single observation). Merging folds rows whose parent fields
//! are all equal into the first-seen record, concatenating their children.
//!
//! The scan is quadratic in the number of rows: each record is compared with
//! every record accepted so far. Files are reference exports of a few hundred
//! rows at most; `benches/merge.rs` measures the cost.

use crate::app::models::{SerieHydro, SerieMeteo, Sitehydro, Sitemeteo};
use tracing::debug;

/// A record that can absorb the children of an equal record
pub trait Mergeable: Sized {
    /// Equal on every field except the child container
    fn same_identity(&self, other: &Self) -> bool;

    /// Append the children of `other` to this record
    fn absorb(&mut self, other: Self);
}

/// Merge records in place order, keeping the first-seen position of each
pub fn merge<T: Mergeable>(records: Vec<T>) -> Vec<T> {
    let total = records.len();
    let mut merged: Vec<T> = Vec::with_capacity(total);

    for record in records {
        match merged.iter_mut().find(|kept| kept.same_identity(&record)) {
            Some(kept) => kept.absorb(record),
            None => merged.push(record),
        }
    }

    debug!("Merged {} records into {}", total, merged.len());
    merged
}

impl Mergeable for Sitehydro {
    fn same_identity(&self, other: &Self) -> bool {
        let Sitehydro {
            code,
            typesite,
            libelle,
            libelleusuel,
            coord,
            communes,
            stations: _,
        } = self;
        *code == other.code
            && *typesite == other.typesite
            && *libelle == other.libelle
            && *libelleusuel == other.libelleusuel
            && *coord == other.coord
            && *communes == other.communes
    }

    fn absorb(&mut self, other: Self) {
        self.stations.extend(other.stations);
    }
}

impl Mergeable for Sitemeteo {
    fn same_identity(&self, other: &Self) -> bool {
        let Sitemeteo {
            code,
            libelle,
            libelleusuel,
            coord,
            commune,
            grandeurs: _,
        } = self;
        *code == other.code
            && *libelle == other.libelle
            && *libelleusuel == other.libelleusuel
            && *coord == other.coord
            && *commune == other.commune
    }

    fn absorb(&mut self, other: Self) {
        self.grandeurs.extend(other.grandeurs);
    }
}

impl Mergeable for SerieHydro {
    fn same_identity(&self, other: &Self) -> bool {
        let SerieHydro {
            entite,
            grandeur,
            dtdeb,
            dtfin,
            dtprod,
            statut,
            observations: _,
        } = self;
        *entite == other.entite
            && *grandeur == other.grandeur
            && *dtdeb == other.dtdeb
            && *dtfin == other.dtfin
            && *dtprod == other.dtprod
            && *statut == other.statut
    }

    fn absorb(&mut self, other: Self) {
        self.observations.extend(other.observations);
    }
}

impl Mergeable for SerieMeteo {
    fn same_identity(&self, other: &Self) -> bool {
        let SerieMeteo {
            site,
            grandeur,
            duree,
            dtdeb,
            dtfin,
            dtprod,
            statut,
            observations: _,
        } = self;
        *site == other.site
            && *grandeur == other.grandeur
            && *duree == other.duree
            && *dtdeb == other.dtdeb
            && *dtfin == other.dtfin
            && *dtprod == other.dtprod
            && *statut == other.statut
    }

    fn absorb(&mut self, other: Self) {
        self.observations.extend(other.observations);
    }
}
