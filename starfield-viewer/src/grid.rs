//! Polar reference chart geometry
//!
//! The chart is a unit-radius polar grid on two parallel planes, emitted as
//! a line list. Renderers upload it once and scale it per draw.

use starfield_core::Point3f;
use std::f32::consts::TAU;

/// Shape of the polar chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarChart {
    /// Segments per ring
    pub theta_divs: usize,
    /// Concentric rings per plane
    pub radius_divs: usize,
    /// Radial spokes, drawn between the planes
    pub spoke_divs: usize,
    pub max_radius: f32,
    pub z_min: f32,
    pub z_max: f32,
    pub z_divs: usize,
}

impl Default for PolarChart {
    fn default() -> Self {
        Self {
            theta_divs: 100,
            radius_divs: 2,
            spoke_divs: 6,
            max_radius: 1.0,
            z_min: -0.5,
            z_max: 0.5,
            z_divs: 2,
        }
    }
}

impl PolarChart {
    /// Line-list vertices: every pair of points is one segment
    pub fn line_vertices(&self) -> Vec<Point3f> {
        let mut vertices = Vec::new();
        let z_step = if self.z_divs > 1 {
            (self.z_max - self.z_min) / (self.z_divs - 1) as f32
        } else {
            0.0
        };
        let polar = |radius: f32, theta: f32, z: f32| {
            Point3f::new(radius * theta.cos(), radius * theta.sin(), z)
        };

        for z_index in 0..self.z_divs {
            let z = self.z_min + z_index as f32 * z_step;

            for theta_index in 0..self.theta_divs {
                let th1 = TAU * theta_index as f32 / self.theta_divs as f32;
                let th2 = TAU * (theta_index + 1) as f32 / self.theta_divs as f32;
                for radius_index in 1..=self.radius_divs {
                    let radius = self.max_radius * radius_index as f32 / self.radius_divs as f32;
                    vertices.push(polar(radius, th1, z));
                    vertices.push(polar(radius, th2, z));
                }
            }

            if z_index + 1 < self.z_divs {
                let z2 = z + z_step;
                for spoke in 0..self.spoke_divs {
                    let theta = TAU * spoke as f32 / self.spoke_divs as f32;
                    let rim = polar(self.max_radius, theta, z);
                    let rim2 = polar(self.max_radius, theta, z2);
                    vertices.extend_from_slice(&[
                        rim,
                        Point3f::new(0.0, 0.0, z),
                        rim2,
                        Point3f::new(0.0, 0.0, z2),
                        rim,
                        rim2,
                    ]);
                }
            }
        }

        vertices
    }

    /// Number of line segments in the chart
    pub fn segment_count(&self) -> usize {
        let rings = self.z_divs * self.theta_divs * self.radius_divs;
        let spokes = self.z_divs.saturating_sub(1) * self.spoke_divs * 3;
        rings + spokes
    }
}
