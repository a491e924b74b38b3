//! Orbit camera
//!
//! The camera keeps a world position and an orientation quaternion that maps
//! camera-local axes to world axes (the camera looks down its local -Z).
//! Drags only record a *pending* rotation; the frame loop applies it once per
//! tick around the current pivot.

use crate::config::ViewerConfig;
use nalgebra::{Isometry3, Matrix4, Perspective3, Translation3, Unit, UnitQuaternion};
use starfield_algorithms::PickRay;
use starfield_core::{Point3d, Vector3d};

/// Camera that orbits a pivot point
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub position: Point3d,
    orientation: UnitQuaternion<f64>,
    pending_rotation: UnitQuaternion<f64>,
    /// Vertical field of view in radians
    pub fov_y: f64,
    pub near: f64,
    pub far: f64,
    pub aspect: f64,

    rotate_rate: f64,
    zoom_rate: f64,
    min_distance: f64,
    max_distance: f64,
    aim_fraction: f64,
    aim_epsilon: f64,
    cone_threshold: f64,
    inertial_spin: bool,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_config(&ViewerConfig::default())
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ViewerConfig) -> Self {
        let [x, y, z] = config.camera.position;
        Self {
            position: Point3d::new(x, y, z),
            orientation: UnitQuaternion::identity(),
            pending_rotation: UnitQuaternion::identity(),
            fov_y: config.camera.fov_y_degrees.to_radians(),
            near: config.camera.near,
            far: config.camera.far,
            aspect: 1.0,
            rotate_rate: config.rotate_radians_per_pixel(),
            zoom_rate: config.zoom_rate,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            aim_fraction: config.aim_fraction,
            aim_epsilon: config.aim_epsilon,
            cone_threshold: config.cone_threshold,
            inertial_spin: config.inertial_spin,
        }
    }

    pub fn orientation(&self) -> &UnitQuaternion<f64> {
        &self.orientation
    }

    /// Replace the orientation, renormalizing it
    pub fn set_orientation(&mut self, orientation: UnitQuaternion<f64>) {
        self.orientation = UnitQuaternion::new_normalize(orientation.into_inner());
    }

    pub fn pending_rotation(&self) -> &UnitQuaternion<f64> {
        &self.pending_rotation
    }

    /// Pointer went down: forget the previous gesture's rotation
    pub fn begin_interaction(&mut self) {
        self.pending_rotation = UnitQuaternion::identity();
    }

    /// Turn a drag delta in pixels into the pending world-space rotation
    ///
    /// Overwrites any rotation not yet applied this frame.
    pub fn rotate(&mut self, dx: f64, dy: f64) {
        let angle = self.rotate_rate * (dx * dx + dy * dy).sqrt();
        let local = match Unit::try_new(Vector3d::new(-dy, -dx, 0.0), 1e-12) {
            Some(axis) => UnitQuaternion::from_axis_angle(&axis, angle),
            None => UnitQuaternion::identity(),
        };
        self.pending_rotation = self.orientation * local * self.orientation.inverse();
    }

    /// Scale the distance to the pivot by `exp(-zoom_rate * delta)`
    ///
    /// The new distance is clamped to `[min_distance, max_distance]`.
    pub fn zoom(&mut self, delta: f64, pivot: Option<&Point3d>) {
        let center = pivot.copied().unwrap_or_else(Point3d::origin);
        let offset = self.position - center;
        let distance = offset.norm();
        if distance == 0.0 || !delta.is_finite() {
            return;
        }

        let scale = (-self.zoom_rate * delta).exp();
        let new_distance = (distance * scale).clamp(self.min_distance, self.max_distance);
        self.position = center + offset * (new_distance / distance);
    }

    /// Apply the pending rotation around the pivot (or the origin)
    ///
    /// Keeps the distance to the pivot. The rotation is consumed unless
    /// inertial spin is on.
    pub fn apply_pending_rotation(&mut self, pivot: Option<&Point3d>) {
        let center = pivot.copied().unwrap_or_else(Point3d::origin);
        let offset = self.position - center;
        let distance = offset.norm();
        let rotated = self.pending_rotation * offset;
        let rotated = match rotated.try_normalize(0.0) {
            Some(direction) => direction * distance,
            None => rotated,
        };
        self.position = center + rotated;

        self.orientation =
            UnitQuaternion::new_normalize((self.pending_rotation * self.orientation).into_inner());

        if !self.inertial_spin {
            self.pending_rotation = UnitQuaternion::identity();
        }
    }

    /// Turn a fraction of the way toward the pivot
    ///
    /// Returns `false` when already aimed (or exactly opposite), in which
    /// case nothing changes.
    pub fn smooth_aim_at(&mut self, pivot: &Point3d) -> bool {
        let direction = match (pivot - self.position).try_normalize(0.0) {
            Some(direction) => direction,
            None => return false,
        };
        let forward = self.forward();
        let axis = forward.cross(&direction);
        let axis_len = axis.norm();
        if axis_len < self.aim_epsilon {
            return false;
        }

        let angle = forward.dot(&direction).clamp(-1.0, 1.0).acos();
        let step = UnitQuaternion::from_axis_angle(
            &Unit::new_unchecked(axis / axis_len),
            self.aim_fraction * angle,
        );
        self.orientation = UnitQuaternion::new_normalize((step * self.orientation).into_inner());
        true
    }

    /// Viewing direction, the negated local Z axis in world space
    pub fn forward(&self) -> Vector3d {
        let q = self.orientation.quaternion();
        let (w, x, y, z) = (q.w, q.i, q.j, q.k);
        Vector3d::new(
            -2.0 * (x * z + w * y),
            -2.0 * (y * z - w * x),
            -(1.0 - 2.0 * (x * x + y * y)),
        )
    }

    pub fn right(&self) -> Vector3d {
        let q = self.orientation.quaternion();
        let (w, x, y, z) = (q.w, q.i, q.j, q.k);
        Vector3d::new(
            1.0 - 2.0 * (y * y + z * z),
            2.0 * (x * y + z * w),
            2.0 * (x * z - w * y),
        )
    }

    pub fn up(&self) -> Vector3d {
        let q = self.orientation.quaternion();
        let (w, x, y, z) = (q.w, q.i, q.j, q.k);
        Vector3d::new(
            2.0 * (x * y - w * z),
            1.0 - 2.0 * (x * x + z * z),
            2.0 * (y * z + w * x),
        )
    }

    /// Viewport resized; a zero height keeps the previous aspect
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f64 / height as f64;
        }
    }

    pub fn distance_to(&self, pivot: &Point3d) -> f64 {
        (self.position - pivot).norm()
    }

    /// Cursor ray through a point in normalized device coordinates
    pub fn pick_ray(&self, ndc_x: f64, ndc_y: f64) -> PickRay {
        PickRay::from_camera(
            self.position,
            self.forward(),
            self.right(),
            self.up(),
            self.fov_y,
            self.aspect,
            ndc_x,
            ndc_y,
        )
        .with_cone_threshold(self.cone_threshold)
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        let camera_to_world =
            Isometry3::from_parts(Translation3::from(self.position.coords), self.orientation);
        camera_to_world.inverse().to_homogeneous().cast::<f32>()
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Perspective3::new(self.aspect, self.fov_y, self.near, self.far)
            .to_homogeneous()
            .cast::<f32>()
    }
}
