//! Traits for the collaborators the engine drives
//!
//! The engine never owns GPU resources or network clients. It issues draw
//! requests against a [`Renderer`], pushes throttled text updates to a
//! [`ReadoutSink`], and calls the lookup services through boxed futures so
//! they can be spawned onto any runtime.

use crate::dataset::{DatasetKind, PointDataset};
use crate::error::Result;
use crate::point::Point3f;
use crate::record::{Article, PointRecord};
use nalgebra::Matrix4;
use std::future::Future;
use std::pin::Pin;

/// Point sprite styles whose width tracks the camera distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteStyle {
    /// Regular catalog points
    Point,
    /// Selection and hover highlight boxes
    Highlight,
}

/// Highlight markers drawn on top of the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerStyle {
    Selected,
    Hovered,
}

/// Draw/update requests issued once per frame
pub trait Renderer {
    /// Viewport size changed, in physical pixels
    fn set_viewport(&mut self, width: u32, height: u32);

    /// Camera matrices for the coming frame
    fn set_camera(&mut self, view: &Matrix4<f32>, projection: &Matrix4<f32>);

    /// Set the world-space sprite width for a style
    fn set_sprite_width(&mut self, style: SpriteStyle, width: f32);

    /// Draw every point of a dataset
    fn draw_dataset(&mut self, dataset: &PointDataset);

    /// Draw a single highlight marker
    fn draw_marker(&mut self, style: MarkerStyle, position: &Point3f);

    /// Draw the reference grid centered on `center`, scaled by `scale`
    fn draw_grid(&mut self, center: &Point3f, scale: f64, alpha: f64);

    /// Ask the host to schedule another frame
    fn request_next_frame(&mut self);
}

/// Snapshot of the navigation readout shown next to the view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Readout {
    /// Camera distance to the orbit center
    pub distance: f64,
    /// The point being orbited
    pub orbit_center: Point3f,
    /// Current grid scale, if one has been chosen yet
    pub grid_scale: Option<f64>,
}

impl Readout {
    pub fn distance_text(&self) -> String {
        format!("{:.4}", self.distance)
    }

    pub fn orbit_text(&self) -> String {
        format!(
            "{}, {}, {}",
            self.orbit_center.x, self.orbit_center.y, self.orbit_center.z
        )
    }

    /// Grid spacing label, empty while the grid is below one unit
    pub fn grid_label(&self) -> String {
        match self.grid_scale {
            Some(scale) if scale >= 1.0 => format!("{} Mpc", scale),
            _ => String::new(),
        }
    }
}

/// External display for the navigation readout
pub trait ReadoutSink {
    fn show_readout(&mut self, readout: &Readout);
}

/// Boxed future returned by the lookup services
pub type LookupFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Identifier search over the SIMBAD catalog
pub trait SearchService: Send + Sync {
    /// Point indices matching an identifier, best match first
    fn find_by_identifier<'a>(&'a self, ident: &'a str) -> LookupFuture<'a, Vec<usize>>;
}

/// Per-point detail lookup
pub trait DetailService: Send + Sync {
    fn describe_point(&self, kind: DatasetKind, index: usize) -> LookupFuture<'_, PointRecord>;
}

/// Encyclopedia article lookup
pub trait ArticleService: Send + Sync {
    fn fetch_article<'a>(&'a self, title: &'a str) -> LookupFuture<'a, Article>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readout_formatting() {
        let readout = Readout {
            distance: 60.0,
            orbit_center: Point3f::new(1.5, -2.0, 0.0),
            grid_scale: Some(32.0),
        };
        assert_eq!(readout.distance_text(), "60.0000");
        assert_eq!(readout.orbit_text(), "1.5, -2, 0");
        assert_eq!(readout.grid_label(), "32 Mpc");
    }

    #[test]
    fn test_grid_label_hidden_below_one() {
        let readout = Readout {
            distance: 0.3,
            orbit_center: Point3f::origin(),
            grid_scale: Some(0.25),
        };
        assert_eq!(readout.grid_label(), "");

        let readout = Readout { grid_scale: None, ..readout };
        assert_eq!(readout.grid_label(), "");
    }
}
