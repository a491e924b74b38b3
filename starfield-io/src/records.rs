//! Offline point records
//!
//! A JSON file holding the detail records of the searchable catalogs, keyed
//! by service name:
//!
//! ```json
//! { "2mrs": [ { "_2MASS_ID": "...", "galaxyName": "NGC_0224", ... } ],
//!   "simbad": [ { "id": "M 31", "otype": "G" } ] }
//! ```
//!
//! Record `i` of a list describes point `i` of the matching dataset. The
//! catalog answers both identifier searches and detail lookups without a
//! network.

use serde::{Deserialize, Serialize};
use starfield_core::{
    DatasetKind, DetailService, Error, LookupFuture, PointRecord, Result, SearchService,
    SimbadRecord, TwoMrsRecord,
};
use std::path::Path;

/// Detail records for the catalogs that have them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfflineCatalog {
    #[serde(rename = "2mrs", default)]
    pub two_mrs: Vec<TwoMrsRecord>,
    #[serde(default)]
    pub simbad: Vec<SimbadRecord>,
}

impl OfflineCatalog {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Lookup(format!("bad record file: {}", e)))
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let catalog = Self::from_json_str(&json)?;
        log::info!(
            "Loaded {} 2MRS and {} SIMBAD records from {}",
            catalog.two_mrs.len(),
            catalog.simbad.len(),
            path.as_ref().display()
        );
        Ok(catalog)
    }

    /// SIMBAD point indices whose id matches, ignoring case and spacing
    pub fn find(&self, ident: &str) -> Vec<usize> {
        let wanted = normalize_ident(ident);
        if wanted.is_empty() {
            return Vec::new();
        }
        self.simbad
            .iter()
            .enumerate()
            .filter(|(_, r)| normalize_ident(&r.id) == wanted)
            .map(|(index, _)| index)
            .collect()
    }

    pub fn describe(&self, kind: DatasetKind, index: usize) -> Result<PointRecord> {
        let record = match kind {
            DatasetKind::TwoMrs => self.two_mrs.get(index).cloned().map(PointRecord::TwoMrs),
            DatasetKind::Simbad => self.simbad.get(index).cloned().map(PointRecord::Simbad),
            _ => None,
        };
        record.ok_or_else(|| Error::Lookup(format!("no record for point {} of {:?}", index, kind)))
    }
}

fn normalize_ident(ident: &str) -> String {
    ident
        .split_whitespace()
        .collect::<String>()
        .to_lowercase()
}

impl SearchService for OfflineCatalog {
    fn find_by_identifier<'a>(&'a self, ident: &'a str) -> LookupFuture<'a, Vec<usize>> {
        Box::pin(async move { Ok(self.find(ident)) })
    }
}

impl DetailService for OfflineCatalog {
    fn describe_point(&self, kind: DatasetKind, index: usize) -> LookupFuture<'_, PointRecord> {
        Box::pin(async move { self.describe(kind, index) })
    }
}
