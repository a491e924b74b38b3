//! Viewer tuning constants
//!
//! Every number the navigation engine depends on lives here so a host can
//! override it from a JSON file. Missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};
use starfield_core::{Error, Result};
use std::path::Path;
use std::time::Duration;

/// Camera placement and projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f64; 3],
    /// Vertical field of view in degrees
    pub fov_y_degrees: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 60.0],
            fov_y_degrees: 90.0,
            near: 1e-5,
            far: 5000.0,
        }
    }
}

/// All viewer tuning in one place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Drag rotation, degrees per pixel
    pub rotate_degrees_per_pixel: f64,
    /// Zoom exponent per wheel unit
    pub zoom_rate: f64,
    pub min_distance: f64,
    pub max_distance: f64,
    /// Minimum cosine between cursor ray and point
    pub cone_threshold: f64,
    /// Fraction of the remaining angle turned toward the pivot each frame
    pub aim_fraction: f64,
    /// Below this cross product length the camera counts as aimed
    pub aim_epsilon: f64,
    /// Sprite width is `sprite_factor * sqrt(distance)`
    pub sprite_factor: f64,
    pub grid_alpha: f64,
    pub grid_fade_ms: u64,
    pub readout_period_ms: u64,
    pub error_display_ms: u64,
    pub camera: CameraConfig,
    /// Keep applying the last drag rotation every frame until the next press
    pub inertial_spin: bool,
    pub show_grid: bool,
    /// Pick through an R*-tree instead of scanning every point
    pub use_spatial_index: bool,
    /// Only this dataset starts visible; `None` shows everything
    pub initial_dataset: Option<String>,
    /// Identifier searched once the first searchable dataset arrives
    pub initial_search: Option<String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            rotate_degrees_per_pixel: 0.01,
            zoom_rate: 0.0003,
            min_distance: 1e-5,
            max_distance: 4100.0,
            cone_threshold: 0.99,
            aim_fraction: 0.05,
            aim_epsilon: 2e-5,
            sprite_factor: 0.02,
            grid_alpha: 0.25,
            grid_fade_ms: 1000,
            readout_period_ms: 500,
            error_display_ms: 3000,
            camera: CameraConfig::default(),
            inertial_spin: false,
            show_grid: false,
            use_spatial_index: true,
            initial_dataset: Some("2MRS".to_string()),
            initial_search: None,
        }
    }
}

impl ViewerConfig {
    /// Parse a JSON config; absent fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Reject values the camera and scheduler cannot work with
    pub fn validate(&self) -> Result<()> {
        if !(self.min_distance > 0.0 && self.min_distance <= self.max_distance) {
            return Err(Error::Config(format!(
                "distance range [{}, {}] is empty or not positive",
                self.min_distance, self.max_distance
            )));
        }
        if !(-1.0..1.0).contains(&self.cone_threshold) {
            return Err(Error::Config(format!(
                "cone threshold {} must be a cosine below 1",
                self.cone_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.aim_fraction) {
            return Err(Error::Config(format!(
                "aim fraction {} must be within [0, 1]",
                self.aim_fraction
            )));
        }
        if !(self.camera.fov_y_degrees > 0.0 && self.camera.fov_y_degrees < 180.0) {
            return Err(Error::Config(format!(
                "field of view {} degrees is out of range",
                self.camera.fov_y_degrees
            )));
        }
        if self.grid_fade_ms == 0 {
            return Err(Error::Config("grid fade duration must be positive".to_string()));
        }
        Ok(())
    }

    /// Drag rotation in radians per pixel
    pub fn rotate_radians_per_pixel(&self) -> f64 {
        self.rotate_degrees_per_pixel.to_radians()
    }

    pub fn grid_fade(&self) -> Duration {
        Duration::from_millis(self.grid_fade_ms)
    }

    pub fn readout_period(&self) -> Duration {
        Duration::from_millis(self.readout_period_ms)
    }

    pub fn error_display(&self) -> Duration {
        Duration::from_millis(self.error_display_ms)
    }
}
