//! I/O operations for starfield datasets
//!
//! This crate reads the flat float32 point buffers the catalogs are
//! distributed as and lists the known catalog sources. Datasets load in the
//! background so the frame loop never waits on disk, and point records can
//! be served from a local JSON file when no lookup server is available.

pub mod binary;
pub mod catalog;
pub mod loader;
pub mod records;
pub mod error;

pub use error::*;
pub use binary::{decode_dataset, decode_points, encode_points, read_dataset, write_points};
pub use catalog::{default_catalog, find_source, DatasetSource};
pub use loader::{DatasetInbox, DatasetLoader, LoadOutcome};
pub use records::OfflineCatalog;
