//! Picking algorithms for point datasets
//!
//! This crate finds the catalog point under the cursor:
//! - Cursor rays built from the camera basis and field of view
//! - Brute-force nearest-point picking with the cone tie-break
//! - An R*-tree cone index that returns the same picks on large catalogs

pub mod picking;
pub mod cone_index;

pub use picking::*;
pub use cone_index::*;
