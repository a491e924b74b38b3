//! Records returned by the catalog detail and article services

use crate::dataset::DatasetKind;
use serde::{Deserialize, Serialize};

/// Detail record for a 2MASS Redshift Survey galaxy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoMrsRecord {
    #[serde(rename = "_2MASS_ID")]
    pub two_mass_id: String,
    #[serde(rename = "bibliographicCode")]
    pub bibliographic_code: String,
    #[serde(rename = "galaxyName")]
    pub galaxy_name: String,
    #[serde(rename = "galaxyType")]
    pub galaxy_type: String,
    #[serde(rename = "sourceOfType")]
    pub source_of_type: String,
}

/// Detail record for a SIMBAD object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimbadRecord {
    pub id: String,
    pub otype: String,
}

/// A point description, tagged by the catalog it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointRecord {
    TwoMrs(TwoMrsRecord),
    Simbad(SimbadRecord),
}

impl PointRecord {
    /// The catalog this record describes a point of
    pub fn kind(&self) -> DatasetKind {
        match self {
            PointRecord::TwoMrs(_) => DatasetKind::TwoMrs,
            PointRecord::Simbad(_) => DatasetKind::Simbad,
        }
    }

    /// Labelled fields in display order
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        match self {
            PointRecord::TwoMrs(r) => vec![
                ("_2MASS_ID", r.two_mass_id.as_str()),
                ("bibliographicCode", r.bibliographic_code.as_str()),
                ("galaxyName", r.galaxy_name.as_str()),
                ("galaxyType", r.galaxy_type.as_str()),
                ("sourceOfType", r.source_of_type.as_str()),
            ],
            PointRecord::Simbad(r) => vec![("id", r.id.as_str()), ("otype", r.otype.as_str())],
        }
    }

    /// Title to search the encyclopedia for
    ///
    /// 2MRS galaxy names come as `NGC_0224`; numeric parts are normalized so
    /// the search becomes `NGC 224`.
    pub fn article_title(&self) -> String {
        match self {
            PointRecord::TwoMrs(r) => r
                .galaxy_name
                .split('_')
                .map(|part| match part.parse::<f64>() {
                    Ok(v) if v.is_finite() => v.to_string(),
                    _ => part.to_string(),
                })
                .collect::<Vec<_>>()
                .join(" "),
            PointRecord::Simbad(r) => r.id.clone(),
        }
    }
}

/// An encyclopedia article fetched for a selected point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub html: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn galaxy(name: &str) -> PointRecord {
        PointRecord::TwoMrs(TwoMrsRecord {
            two_mass_id: "00424433+4116074".to_string(),
            bibliographic_code: "1991RC3.9.C...0000d".to_string(),
            galaxy_name: name.to_string(),
            galaxy_type: "3".to_string(),
            source_of_type: "R".to_string(),
        })
    }

    #[test]
    fn test_article_title_normalizes_numbers() {
        assert_eq!(galaxy("NGC_0224").article_title(), "NGC 224");
        assert_eq!(galaxy("UGC_12_1.50").article_title(), "UGC 12 1.5");
        assert_eq!(galaxy("Andromeda").article_title(), "Andromeda");
    }

    #[test]
    fn test_simbad_title_is_id() {
        let record = PointRecord::Simbad(SimbadRecord {
            id: "M 31".to_string(),
            otype: "G".to_string(),
        });
        assert_eq!(record.article_title(), "M 31");
        assert_eq!(record.kind(), DatasetKind::Simbad);
        assert_eq!(record.fields(), vec![("id", "M 31"), ("otype", "G")]);
    }

    #[test]
    fn test_deserialize_service_json() {
        let json = r#"{"_2MASS_ID":"x","bibliographicCode":"b","galaxyName":"NGC_0001","galaxyType":"t","sourceOfType":"s"}"#;
        let record: PointRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.kind(), DatasetKind::TwoMrs);
        assert_eq!(record.article_title(), "NGC 1");

        let record: PointRecord = serde_json::from_str(r#"{"id":"Vega","otype":"*"}"#).unwrap();
        assert_eq!(record.kind(), DatasetKind::Simbad);
    }
}
