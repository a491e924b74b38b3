//! Nearest-point picking along the cursor ray
//!
//! A point is a pick candidate when the angle between the cursor ray and the
//! eye-to-point vector is inside a narrow cone (`cos > 0.99`, about 8
//! degrees). Candidates are folded in dataset order, then buffer order, and
//! a candidate replaces the current best only if it is both strictly closer
//! and strictly better aligned. That double condition prefers points that
//! are close *and* on the ray over points that are merely close.

use nalgebra::Vector3;
use rayon::prelude::*;
use starfield_core::{widen, DatasetRegistry, Point3d, Point3f, PointDataset, Vector3d};
use std::sync::Arc;

/// Minimum cosine between cursor ray and eye-to-point vector
pub const DEFAULT_CONE_THRESHOLD: f64 = 0.99;

/// A cursor ray from the eye through the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickRay {
    pub origin: Point3d,
    pub direction: Vector3d,
    pub cone_threshold: f64,
    direction_len: f64,
}

impl PickRay {
    /// Create a ray from an eye position and an (unnormalized) direction
    pub fn new(origin: Point3d, direction: Vector3d) -> Self {
        Self {
            origin,
            direction,
            cone_threshold: DEFAULT_CONE_THRESHOLD,
            direction_len: direction.norm(),
        }
    }

    /// Build the ray through a cursor position given in normalized device
    /// coordinates (`-1..1`, y up)
    ///
    /// `dir = forward + tan(fov_y / 2) * (right * aspect * ndc_x + up * ndc_y)`
    #[allow(clippy::too_many_arguments)]
    pub fn from_camera(
        origin: Point3d,
        forward: Vector3d,
        right: Vector3d,
        up: Vector3d,
        fov_y: f64,
        aspect: f64,
        ndc_x: f64,
        ndc_y: f64,
    ) -> Self {
        let tan_half_fov = (fov_y * 0.5).tan();
        let direction = forward + (right * (aspect * ndc_x) + up * ndc_y) * tan_half_fov;
        Self::new(origin, direction)
    }

    /// Override the cone threshold
    pub fn with_cone_threshold(mut self, cone_threshold: f64) -> Self {
        self.cone_threshold = cone_threshold;
        self
    }

    /// Distance and alignment of a point, or `None` if it is outside the cone
    #[inline]
    pub fn evaluate(&self, point: &Point3f) -> Option<(f64, f64)> {
        let to_point = widen(point) - self.origin;
        let distance = to_point.norm();
        let cos_angle = to_point.dot(&self.direction) / (self.direction_len * distance);
        // NaN (point at the eye, zero direction) never passes
        if cos_angle > self.cone_threshold {
            Some((distance, cos_angle))
        } else {
            None
        }
    }

    /// Whether any part of a sphere can fall inside the cone
    ///
    /// Conservative: may answer `true` for spheres that only graze the
    /// boundary, never `false` for a sphere containing a candidate.
    pub fn may_reach_sphere(&self, center: &Point3d, radius: f64) -> bool {
        let to_center = *center - self.origin;
        let distance = to_center.norm();
        if distance <= radius * (1.0 + 1e-9) + 1e-12 {
            return true;
        }
        if self.direction_len == 0.0 {
            return false;
        }

        let half_angle = self.cone_threshold.clamp(-1.0, 1.0).acos();
        let axis_angle = (to_center.dot(&self.direction) / (distance * self.direction_len))
            .clamp(-1.0, 1.0)
            .acos();
        let angular_radius = (radius / distance).clamp(0.0, 1.0).asin();
        axis_angle - angular_radius <= half_angle + 1e-9
    }
}

/// A point that passed the cone test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Load-order position of the owning dataset
    pub dataset_order: usize,
    /// Index of the point in its dataset
    pub index: usize,
    pub distance: f64,
    pub cos_angle: f64,
}

/// Run the double-condition fold over candidates in scan order
pub fn fold_candidates<I>(candidates: I) -> Option<Candidate>
where
    I: IntoIterator<Item = Candidate>,
{
    let mut best: Option<Candidate> = None;
    let mut best_distance = f64::INFINITY;
    let mut best_cos = 0.0;

    for candidate in candidates {
        if candidate.distance < best_distance && candidate.cos_angle > best_cos {
            best_distance = candidate.distance;
            best_cos = candidate.cos_angle;
            best = Some(candidate);
        }
    }

    best
}

/// The point picked under the cursor
#[derive(Debug, Clone)]
pub struct PickHit {
    pub dataset: Arc<PointDataset>,
    pub index: usize,
    pub position: Point3f,
    pub distance: f64,
    pub cos_angle: f64,
}

impl PickHit {
    pub(crate) fn from_candidate(dataset: &Arc<PointDataset>, candidate: Candidate) -> Option<Self> {
        Some(Self {
            dataset: Arc::clone(dataset),
            index: candidate.index,
            position: dataset.point(candidate.index)?,
            distance: candidate.distance,
            cos_angle: candidate.cos_angle,
        })
    }
}

/// Brute-force pick over the visible datasets, in the order given
///
/// Hidden datasets are skipped. Returns `None` when nothing is in the cone.
pub fn pick_nearest<'a, I>(ray: &PickRay, datasets: I) -> Option<PickHit>
where
    I: IntoIterator<Item = &'a Arc<PointDataset>>,
{
    let visible: Vec<&Arc<PointDataset>> = datasets.into_iter().filter(|d| d.is_visible()).collect();

    let candidates = visible.iter().enumerate().flat_map(|(order, dataset)| {
        dataset
            .points()
            .iter()
            .enumerate()
            .filter_map(move |(index, point)| {
                ray.evaluate(point).map(|(distance, cos_angle)| Candidate {
                    dataset_order: order,
                    index,
                    distance,
                    cos_angle,
                })
            })
    });

    let best = fold_candidates(candidates)?;
    PickHit::from_candidate(visible[best.dataset_order], best)
}

/// Trait for anything that can answer "which point is under this ray"
pub trait PointPicker {
    /// Pick over the visible datasets of a registry
    fn pick(&mut self, ray: &PickRay, registry: &DatasetRegistry) -> Option<PickHit>;
}

/// Scans every visible point, testing the cone in parallel
#[derive(Debug, Default, Clone, Copy)]
pub struct BruteForcePicker;

impl BruteForcePicker {
    pub fn new() -> Self {
        Self
    }

    /// Cone candidates of one dataset, in buffer order
    pub fn candidates(ray: &PickRay, dataset: &PointDataset, order: usize) -> Vec<Candidate> {
        // collect() on a rayon iterator keeps the sequential order
        dataset
            .points()
            .par_iter()
            .enumerate()
            .filter_map(|(index, point)| {
                ray.evaluate(point).map(|(distance, cos_angle)| Candidate {
                    dataset_order: order,
                    index,
                    distance,
                    cos_angle,
                })
            })
            .collect()
    }
}

impl PointPicker for BruteForcePicker {
    fn pick(&mut self, ray: &PickRay, registry: &DatasetRegistry) -> Option<PickHit> {
        let visible: Vec<&Arc<PointDataset>> = registry.visible().collect();
        let candidates = visible
            .iter()
            .enumerate()
            .flat_map(|(order, dataset)| Self::candidates(ray, dataset, order));

        let best = fold_candidates(candidates)?;
        PickHit::from_candidate(visible[best.dataset_order], best)
    }
}

/// Convert a viewport fraction (`0..1`, origin top-left) to NDC
pub fn viewport_to_ndc(x_frac: f64, y_frac: f64) -> (f64, f64) {
    (x_frac * 2.0 - 1.0, 1.0 - y_frac * 2.0)
}

/// Axis-aligned basis used by tests and benchmarks: looking down -Z, Y up
pub fn looking_down_negative_z(origin: Point3d, fov_y: f64, aspect: f64, ndc: (f64, f64)) -> PickRay {
    PickRay::from_camera(
        origin,
        -Vector3::z(),
        Vector3::x(),
        Vector3::y(),
        fov_y,
        aspect,
        ndc.0,
        ndc.1,
    )
}
