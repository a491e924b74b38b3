//! Known catalog sources

use serde::{Deserialize, Serialize};
use starfield_core::DatasetKind;

/// Where a dataset comes from and where its buffer lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSource {
    pub title: String,
    /// Point buffer file name, relative to the data directory
    pub file: String,
    /// Survey home page
    pub source_url: String,
}

impl DatasetSource {
    pub fn new(title: &str, file: &str, source_url: &str) -> Self {
        Self {
            title: title.to_string(),
            file: file.to_string(),
            source_url: source_url.to_string(),
        }
    }

    pub fn kind(&self) -> DatasetKind {
        DatasetKind::from_title(&self.title)
    }
}

/// The surveys the viewer ships with, in download order
pub fn default_catalog() -> Vec<DatasetSource> {
    vec![
        DatasetSource::new("2MRS", "2mrs.f32", "http://tdc-www.cfa.harvard.edu/2mrs/"),
        DatasetSource::new("6dF GS", "6dfgs.f32", "http://www.aao.gov.au/6dFGS/"),
        DatasetSource::new("SDSS3-DR14", "sdss3-dr14.f32", "http://www.sdss3.org/dr14/"),
        DatasetSource::new("SIMBAD", "simbad.f32", "http://simbad.u-strasbg.fr/simbad/"),
        DatasetSource::new("Gaia stars", "gaia.f32", "http://sci.esa.int/gaia/"),
    ]
}

/// Find a source by title
pub fn find_source<'a>(catalog: &'a [DatasetSource], title: &str) -> Option<&'a DatasetSource> {
    catalog.iter().find(|s| s.title == title)
}
