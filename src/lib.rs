//! # Starfield
//!
//! Navigation and picking for interactive 3D views of astronomical point
//! catalogs.
//!
//! This is the umbrella crate that provides convenient access to all Starfield functionality.
//! You can use this crate to get everything in one place, or use individual crates for
//! more granular control over dependencies.
//!
//! ## Features
//!
//! - **Core**: Point datasets, the dataset registry, catalog records and the renderer seams
//! - **Algorithms**: Cursor rays, cone picking and the R*-tree cone index
//! - **I/O**: Float32 catalog buffers, background loading and offline point records
//! - **Viewer**: Orbit camera, selection, frame scheduling, lookups and the session
//!
//! ## Quick Start
//!
//! ```rust
//! use starfield::prelude::*;
//!
//! let mut registry = DatasetRegistry::new();
//! registry
//!     .insert(PointDataset::new("2MRS", vec![Point3f::new(0.0, 0.0, -5.0)]))
//!     .unwrap();
//!
//! let camera = OrbitCamera::default();
//! let ray = camera.pick_ray(0.0, 0.0);
//! let hit = BruteForcePicker::new().pick(&ray, &registry).unwrap();
//! assert_eq!(hit.dataset.title(), "2MRS");
//! assert_eq!(hit.index, 0);
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Enables algorithms, io and viewer
//! - `algorithms`: Picking
//! - `io`: Catalog loading and offline records
//! - `viewer`: The interactive session (pulls in algorithms and io)

// Re-export core functionality
pub use starfield_core::*;

// Re-export sub-crates
#[cfg(feature = "algorithms")]
pub use starfield_algorithms as algorithms;

#[cfg(feature = "io")]
pub use starfield_io as io;

#[cfg(feature = "viewer")]
pub use starfield_viewer as viewer;

/// Convenient imports for common use cases
pub mod prelude {
    pub use starfield_core::*;

    #[cfg(feature = "algorithms")]
    pub use starfield_algorithms::*;

    #[cfg(feature = "io")]
    pub use starfield_io::{DatasetLoader, DatasetSource, OfflineCatalog};

    #[cfg(feature = "viewer")]
    pub use starfield_viewer::*;
}
