//! Distance-driven frame effects
//!
//! Point sprites grow with the square root of the camera distance, and the
//! reference grid snaps to power-of-two scales, crossfading between the old
//! and the new scale whenever the quantized scale changes.

use crate::config::ViewerConfig;
use starfield_core::{Point3f, Renderer, SpriteStyle};
use std::time::{Duration, Instant};

/// Quantize a camera distance to a grid scale
///
/// The largest `2^n / 1024` not above `distance`, and 0 for non-positive or
/// non-finite distances.
pub fn grid_scale_for(distance: f64) -> f64 {
    if !(distance > 0.0 && distance.is_finite()) {
        return 0.0;
    }
    let scale = (distance * 1024.0).log2().floor().exp2() / 1024.0;
    // log2 rounds up just below a power of two
    if scale > distance {
        scale * 0.5
    } else {
        scale
    }
}

/// World-space sprite width at a camera distance
pub fn sprite_width_for(distance: f64, factor: f64) -> f64 {
    factor * distance.max(0.0).sqrt()
}

/// A grid scale fading in or out since `start`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadingGrid {
    pub scale: f64,
    pub start: Instant,
}

/// One grid draw for the current frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayer {
    pub scale: f64,
    pub alpha: f64,
}

/// Crossfade between the previous and the current grid scale
#[derive(Debug, Clone)]
pub struct GridFade {
    current: Option<f64>,
    outgoing: Option<FadingGrid>,
    incoming: Option<FadingGrid>,
    base_alpha: f64,
    duration: Duration,
}

impl GridFade {
    pub fn new(base_alpha: f64, duration: Duration) -> Self {
        Self {
            current: None,
            outgoing: None,
            incoming: None,
            base_alpha,
            duration,
        }
    }

    pub fn current(&self) -> Option<f64> {
        self.current
    }

    pub fn outgoing(&self) -> Option<FadingGrid> {
        self.outgoing
    }

    pub fn incoming(&self) -> Option<FadingGrid> {
        self.incoming
    }

    /// Switch to `scale`, starting both fades at `now`. Returns whether the
    /// scale changed.
    pub fn update(&mut self, scale: f64, now: Instant) -> bool {
        if self.current == Some(scale) {
            return false;
        }

        self.outgoing = self.current.map(|previous| FadingGrid {
            scale: previous,
            start: now,
        });
        self.incoming = Some(FadingGrid { scale, start: now });
        self.current = Some(scale);
        true
    }

    /// Grids to draw at `now`
    ///
    /// Nothing is drawn while the current scale is below one unit. The
    /// outgoing grid is dropped once its alpha reaches zero.
    pub fn layers(&self, now: Instant) -> Vec<GridLayer> {
        let mut layers = Vec::with_capacity(2);
        if !matches!(self.current, Some(scale) if scale >= 1.0) {
            return layers;
        }

        if let Some(outgoing) = self.outgoing {
            let alpha = self.base_alpha * (1.0 - self.progress(outgoing.start, now));
            if alpha > 0.0 {
                layers.push(GridLayer {
                    scale: outgoing.scale,
                    alpha,
                });
            }
        }
        if let Some(incoming) = self.incoming {
            layers.push(GridLayer {
                scale: incoming.scale,
                alpha: self.base_alpha * self.progress(incoming.start, now).min(1.0),
            });
        }
        layers
    }

    fn progress(&self, start: Instant, now: Instant) -> f64 {
        now.saturating_duration_since(start).as_secs_f64() / self.duration.as_secs_f64()
    }
}

/// Per-frame scale state: last distance, sprite width and grid fade
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    last_distance: Option<f64>,
    sprite_factor: f64,
    show_grid: bool,
    grid: GridFade,
}

impl FrameScheduler {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            last_distance: None,
            sprite_factor: config.sprite_factor,
            show_grid: config.show_grid,
            grid: GridFade::new(config.grid_alpha, config.grid_fade()),
        }
    }

    pub fn last_distance(&self) -> Option<f64> {
        self.last_distance
    }

    pub fn grid(&self) -> &GridFade {
        &self.grid
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    pub fn set_show_grid(&mut self, show: bool) {
        self.show_grid = show;
    }

    /// Record the camera distance; pushes new sprite widths when it changed
    ///
    /// Returns whether the distance changed since the previous frame.
    pub fn update_distance(&mut self, distance: f64, renderer: &mut dyn Renderer) -> bool {
        if self.last_distance == Some(distance) {
            return false;
        }
        self.last_distance = Some(distance);

        let width = sprite_width_for(distance, self.sprite_factor) as f32;
        renderer.set_sprite_width(SpriteStyle::Point, width);
        renderer.set_sprite_width(SpriteStyle::Highlight, width);
        true
    }

    /// Requantize the grid and draw its fading layers around `center`
    pub fn update_grid(&mut self, center: &Point3f, now: Instant, renderer: &mut dyn Renderer) {
        let distance = self.last_distance.unwrap_or(0.0);
        if self.grid.update(grid_scale_for(distance), now) {
            log::debug!("Grid scale now {:?}", self.grid.current());
        }

        if !self.show_grid {
            return;
        }
        for layer in self.grid.layers(now) {
            renderer.draw_grid(center, layer.scale, layer.alpha);
        }
    }
}
