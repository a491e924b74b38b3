//! Shared fixtures for the viewer integration tests

#![allow(dead_code)]

use nalgebra::Matrix4;
use starfield_core::{MarkerStyle, Point3f, PointDataset, Readout, ReadoutSink, Renderer, SpriteStyle};
use starfield_viewer::{LookupServices, Session, ViewerConfig};
use tokio::runtime::Runtime;

/// Renderer that keeps every request of the last frame
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub viewport: Option<(u32, u32)>,
    pub sprite_widths: Vec<(SpriteStyle, f32)>,
    pub datasets: Vec<String>,
    pub markers: Vec<(MarkerStyle, Point3f)>,
    pub grids: Vec<(Point3f, f64, f64)>,
    pub frames: u32,
}

impl RecordingRenderer {
    /// Forget the previous frame's draws
    pub fn begin_frame(&mut self) {
        self.sprite_widths.clear();
        self.datasets.clear();
        self.markers.clear();
        self.grids.clear();
    }
}

impl Renderer for RecordingRenderer {
    fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Some((width, height));
    }

    fn set_camera(&mut self, _view: &Matrix4<f32>, _projection: &Matrix4<f32>) {}

    fn set_sprite_width(&mut self, style: SpriteStyle, width: f32) {
        self.sprite_widths.push((style, width));
    }

    fn draw_dataset(&mut self, dataset: &PointDataset) {
        self.datasets.push(dataset.title().to_string());
    }

    fn draw_marker(&mut self, style: MarkerStyle, position: &Point3f) {
        self.markers.push((style, *position));
    }

    fn draw_grid(&mut self, center: &Point3f, scale: f64, alpha: f64) {
        self.grids.push((*center, scale, alpha));
    }

    fn request_next_frame(&mut self) {
        self.frames += 1;
    }
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub readouts: Vec<Readout>,
}

impl ReadoutSink for RecordingSink {
    fn show_readout(&mut self, readout: &Readout) {
        self.readouts.push(*readout);
    }
}

/// Camera at the origin looking down -Z with a 30 degree field of view
pub fn close_up_config() -> ViewerConfig {
    let mut config = ViewerConfig {
        initial_dataset: None,
        ..ViewerConfig::default()
    };
    config.camera.position = [0.0, 0.0, 0.0];
    config.camera.fov_y_degrees = 30.0;
    config
}

pub fn session_with(runtime: &Runtime, config: ViewerConfig, services: LookupServices) -> Session {
    Session::new(config, runtime.handle().clone(), services)
}

pub fn three_points() -> PointDataset {
    PointDataset::new(
        "scene",
        vec![
            Point3f::new(0.0, 0.0, -5.0),
            Point3f::new(0.0, 0.0, -10.0),
            Point3f::new(5.0, 5.0, -5.0),
        ],
    )
}
