//! Navigation and picking for the starfield viewer
//!
//! This crate holds the interactive part of the viewer: the orbit camera, the
//! hover/selection markers, the per-frame scheduler that scales sprites and
//! crossfades the reference grid, and the session tying them to input
//! events, dataset loading and catalog lookups. Rendering goes through the
//! [`starfield_core::Renderer`] trait.

pub mod camera;
pub mod config;
pub mod grid;
pub mod input;
pub mod lookup;
pub mod readout;
pub mod scheduler;
pub mod selection;
pub mod session;

pub use camera::OrbitCamera;
pub use config::{CameraConfig, ViewerConfig};
pub use grid::PolarChart;
pub use input::{translate_window_event, InputEvent, PointerTracker};
pub use lookup::{LookupCoordinator, LookupServices, LookupStatus};
pub use readout::ReadoutThrottle;
pub use scheduler::{grid_scale_for, sprite_width_for, FrameScheduler, GridFade, GridLayer};
pub use selection::{ClickOutcome, Marker, SelectionState};
pub use session::Session;
