//! Named point datasets

use crate::point::Point3f;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

/// The catalog a dataset was loaded from, resolved once from its title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatasetKind {
    /// 2MASS Redshift Survey
    TwoMrs,
    /// 6dF Galaxy Survey
    SixDfGs,
    /// SDSS-III data release 14
    Sdss3,
    /// SIMBAD astronomical database
    Simbad,
    /// Gaia star catalog
    Gaia,
    /// Anything we have no special handling for
    Other,
}

impl DatasetKind {
    /// Resolve the kind from a dataset title
    pub fn from_title(title: &str) -> Self {
        match title {
            "2MRS" => DatasetKind::TwoMrs,
            "6dF GS" => DatasetKind::SixDfGs,
            "SDSS3-DR14" => DatasetKind::Sdss3,
            "SIMBAD" => DatasetKind::Simbad,
            "Gaia stars" => DatasetKind::Gaia,
            _ => DatasetKind::Other,
        }
    }

    /// Whether the detail service can describe points of this kind
    pub fn has_lookup(&self) -> bool {
        matches!(self, DatasetKind::TwoMrs | DatasetKind::Simbad)
    }
}

/// A named, immutable collection of catalog points
#[derive(Debug)]
pub struct PointDataset {
    title: String,
    kind: DatasetKind,
    points: Vec<Point3f>,
    visible: AtomicBool,
}

impl PointDataset {
    /// Create a dataset from already decoded points. Datasets start visible.
    pub fn new(title: impl Into<String>, points: Vec<Point3f>) -> Self {
        let title = title.into();
        Self {
            kind: DatasetKind::from_title(&title),
            title,
            points,
            visible: AtomicBool::new(true),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    /// Get the points in buffer order
    pub fn points(&self) -> &[Point3f] {
        &self.points
    }

    /// Get a single point by index
    pub fn point(&self, index: usize) -> Option<Point3f> {
        self.points.get(index).copied()
    }

    /// Get the number of points in the dataset
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the dataset has no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The packed float view handed to renderers for upload
    pub fn as_flat_slice(&self) -> &[f32] {
        bytemuck::cast_slice(&self.points)
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Relaxed)
    }

    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_title() {
        assert_eq!(DatasetKind::from_title("2MRS"), DatasetKind::TwoMrs);
        assert_eq!(DatasetKind::from_title("SIMBAD"), DatasetKind::Simbad);
        assert_eq!(DatasetKind::from_title("Gaia stars"), DatasetKind::Gaia);
        assert_eq!(DatasetKind::from_title("Simbad"), DatasetKind::Other);
        assert!(DatasetKind::TwoMrs.has_lookup());
        assert!(!DatasetKind::Sdss3.has_lookup());
    }

    #[test]
    fn test_new_dataset() {
        let dataset = PointDataset::new(
            "2MRS",
            vec![Point3f::new(1.0, 2.0, 3.0), Point3f::new(4.0, 5.0, 6.0)],
        );
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.point(1), Some(Point3f::new(4.0, 5.0, 6.0)));
        assert_eq!(dataset.point(2), None);
        assert_eq!(dataset.kind(), DatasetKind::TwoMrs);
        assert!(dataset.is_visible());
    }

    #[test]
    fn test_flat_slice_matches_points() {
        let dataset = PointDataset::new(
            "flat",
            vec![Point3f::new(0.5, -1.0, 2.0), Point3f::new(3.0, 4.0, -5.5)],
        );
        assert_eq!(dataset.as_flat_slice(), &[0.5, -1.0, 2.0, 3.0, 4.0, -5.5]);
    }

    #[test]
    fn test_visibility_toggle() {
        let dataset = PointDataset::new("toggle", vec![Point3f::origin()]);
        dataset.set_visible(false);
        assert!(!dataset.is_visible());
        dataset.set_visible(true);
        assert!(dataset.is_visible());
    }
}
