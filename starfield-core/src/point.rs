//! Point and vector types

use nalgebra::{Point3, Vector3};

/// A catalog point, stored as three packed 32-bit floats
pub type Point3f = Point3<f32>;

/// A 3D point with double precision coordinates, used for camera state
pub type Point3d = Point3<f64>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// A 3D vector with double precision components
pub type Vector3d = Vector3<f64>;

/// Widen a stored catalog point to the precision the camera works in
#[inline]
pub fn widen(point: &Point3f) -> Point3d {
    Point3d::new(point.x as f64, point.y as f64, point.z as f64)
}

/// Narrow a camera-space point back to catalog precision
#[inline]
pub fn narrow(point: &Point3d) -> Point3f {
    Point3f::new(point.x as f32, point.y as f32, point.z as f32)
}
