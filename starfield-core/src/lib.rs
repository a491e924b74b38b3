//! Core data structures and traits for starfield
//!
//! This crate provides the fundamental types shared by the navigation and
//! picking engine: points, named point datasets and their registry, the
//! records returned by catalog lookups, and the traits through which the
//! engine talks to its renderer and lookup services.

pub mod point;
pub mod dataset;
pub mod registry;
pub mod record;
pub mod traits;
pub mod error;

pub use point::*;
pub use dataset::*;
pub use registry::*;
pub use record::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3, UnitQuaternion, Unit};
