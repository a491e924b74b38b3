//! R*-tree index for cone picking on large catalogs
//!
//! The tree only prunes subtrees whose bounding sphere cannot reach the pick
//! cone. Every surviving point goes through the same cone test as the
//! brute-force scan, and the candidates are folded in the same
//! (dataset, index) order, so both pickers always agree.

use crate::picking::{fold_candidates, Candidate, PickHit, PickRay, PointPicker};
use rstar::primitives::GeomWithData;
use rstar::{RTree, SelectionFunction, AABB};
use starfield_core::{DatasetRegistry, Point3d, Point3f, PointDataset};
use std::sync::{Arc, Weak};

type IndexedPoint = GeomWithData<[f32; 3], usize>;

/// Spatial index over one dataset's points
pub struct ConeIndex {
    tree: RTree<IndexedPoint>,
}

impl ConeIndex {
    /// Bulk-load an index over the points, keyed by buffer index
    pub fn build(points: &[Point3f]) -> Self {
        let items: Vec<IndexedPoint> = points
            .iter()
            .enumerate()
            .map(|(index, p)| GeomWithData::new([p.x, p.y, p.z], index))
            .collect();

        Self {
            tree: RTree::bulk_load(items),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Cone candidates, sorted by buffer index
    pub fn candidates(&self, ray: &PickRay, order: usize) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = self
            .tree
            .locate_with_selection_function(ConeSelection { ray })
            .filter_map(|item| {
                let [x, y, z] = *item.geom();
                ray.evaluate(&Point3f::new(x, y, z))
                    .map(|(distance, cos_angle)| Candidate {
                        dataset_order: order,
                        index: item.data,
                        distance,
                        cos_angle,
                    })
            })
            .collect();

        candidates.sort_unstable_by_key(|c| c.index);
        candidates
    }
}

struct ConeSelection<'a> {
    ray: &'a PickRay,
}

impl SelectionFunction<IndexedPoint> for ConeSelection<'_> {
    fn should_unpack_parent(&self, envelope: &AABB<[f32; 3]>) -> bool {
        let lower = envelope.lower();
        let upper = envelope.upper();
        let center = Point3d::new(
            (lower[0] as f64 + upper[0] as f64) * 0.5,
            (lower[1] as f64 + upper[1] as f64) * 0.5,
            (lower[2] as f64 + upper[2] as f64) * 0.5,
        );
        let half_diagonal = Point3d::new(upper[0] as f64, upper[1] as f64, upper[2] as f64) - center;
        self.ray.may_reach_sphere(&center, half_diagonal.norm())
    }
}

/// Picker that keeps one [`ConeIndex`] per dataset
///
/// Indices are built lazily the first time a dataset is picked against.
#[derive(Default)]
pub struct IndexedPicker {
    indices: Vec<(Weak<PointDataset>, ConeIndex)>,
}

impl IndexedPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build indices for every registered dataset up front
    pub fn prepare(&mut self, registry: &DatasetRegistry) {
        for dataset in registry {
            self.index_for(dataset);
        }
    }

    fn index_for(&mut self, dataset: &Arc<PointDataset>) -> &ConeIndex {
        let weak = Arc::downgrade(dataset);
        let position = match self.indices.iter().position(|(w, _)| w.ptr_eq(&weak)) {
            Some(position) => position,
            None => {
                log::debug!(
                    "Building cone index for '{}' ({} points)",
                    dataset.title(),
                    dataset.len()
                );
                self.indices.push((weak, ConeIndex::build(dataset.points())));
                self.indices.len() - 1
            }
        };
        &self.indices[position].1
    }
}

impl PointPicker for IndexedPicker {
    fn pick(&mut self, ray: &PickRay, registry: &DatasetRegistry) -> Option<PickHit> {
        let visible: Vec<&Arc<PointDataset>> = registry.visible().collect();
        let mut candidates = Vec::new();
        for (order, dataset) in visible.iter().enumerate() {
            candidates.extend(self.index_for(dataset).candidates(ray, order));
        }

        let best = fold_candidates(candidates)?;
        PickHit::from_candidate(visible[best.dataset_order], best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picking::{looking_down_negative_z, pick_nearest, BruteForcePicker};
    use rand::{Rng, SeedableRng};
    use rand::rngs::StdRng;

    fn random_cloud(rng: &mut StdRng, n: usize, spread: f32) -> Vec<Point3f> {
        (0..n)
            .map(|_| {
                Point3f::new(
                    rng.gen_range(-spread..spread),
                    rng.gen_range(-spread..spread),
                    rng.gen_range(-spread..spread),
                )
            })
            .collect()
    }

    #[test]
    fn test_index_size() {
        let index = ConeIndex::build(&[Point3f::origin(), Point3f::new(1.0, 1.0, 1.0)]);
        assert_eq!(index.len(), 2);
        assert!(ConeIndex::build(&[]).is_empty());
    }

    #[test]
    fn test_candidates_match_brute_force() {
        let mut rng = StdRng::seed_from_u64(7);
        let points = random_cloud(&mut rng, 5_000, 50.0);
        let dataset = PointDataset::new("random", points);
        let index = ConeIndex::build(dataset.points());

        for _ in 0..20 {
            let ndc = (rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
            let eye = Point3d::new(
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
                rng.gen_range(20.0..60.0),
            );
            let ray = looking_down_negative_z(eye, 60f64.to_radians(), 1.5, ndc);
            let expected = BruteForcePicker::candidates(&ray, &dataset, 0);
            assert_eq!(index.candidates(&ray, 0), expected);
        }
    }

    #[test]
    fn test_indexed_picker_agrees_with_scan() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut registry = DatasetRegistry::new();
        registry
            .insert(PointDataset::new("near", random_cloud(&mut rng, 2_000, 20.0)))
            .unwrap();
        registry
            .insert(PointDataset::new("far", random_cloud(&mut rng, 2_000, 80.0)))
            .unwrap();

        let mut picker = IndexedPicker::new();
        picker.prepare(&registry);

        for _ in 0..50 {
            let ndc = (rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
            let ray = looking_down_negative_z(Point3d::new(0.0, 0.0, 100.0), 45f64.to_radians(), 1.0, ndc);
            let expected = pick_nearest(&ray, registry.iter()).map(|h| (h.dataset.title().to_string(), h.index));
            let picked = picker.pick(&ray, &registry).map(|h| (h.dataset.title().to_string(), h.index));
            assert_eq!(picked, expected);
        }
    }

    #[test]
    fn test_indexed_picker_respects_visibility() {
        let mut registry = DatasetRegistry::new();
        registry
            .insert(PointDataset::new("only", vec![Point3f::new(0.0, 0.0, -5.0)]))
            .unwrap();
        let ray = looking_down_negative_z(Point3d::origin(), 30f64.to_radians(), 1.0, (0.0, 0.0));

        let mut picker = IndexedPicker::new();
        assert_eq!(picker.pick(&ray, &registry).map(|h| h.index), Some(0));

        registry.set_visible("only", false).unwrap();
        assert!(picker.pick(&ray, &registry).is_none());
    }
}
