//! Scan line reveal
//!
//! A threshold sweeps through depth once per cycle; pixels whose depth is
//! within a narrow band of the threshold light up while the pointer hovers.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::params::ParamBlock;
use super::primitives::{falling_edge, fract};
use super::{OverlayStage, ShadeContext};

/// Uniform slots read by `shaders/scan_line.wgsl`
pub mod slot {
    pub const SPEED: usize = 0;
    pub const BAND_WIDTH: usize = 1;
    pub const BAND_FEATHER: usize = 2;
    pub const INTENSITY: usize = 3;
    pub const COLOR: usize = 4;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanLine {
    /// Sweeps per second
    pub speed: f32,
    /// Depth distance that is fully lit
    pub band_width: f32,
    pub band_feather: f32,
    pub intensity: f32,
    pub color: [f32; 3],
}

impl Default for ScanLine {
    fn default() -> Self {
        Self {
            speed: 0.25,
            band_width: 0.02,
            band_feather: 0.02,
            intensity: 1.0,
            color: [0.3, 0.9, 1.0],
        }
    }
}

impl ScanLine {
    /// Depth currently being scanned
    pub fn threshold(&self, time: f32) -> f32 {
        fract(time * self.speed)
    }

    /// Band coverage for a depth value at `time`.
    pub fn band(&self, depth: f32, time: f32) -> f32 {
        let diff = (depth - self.threshold(time)).abs();
        falling_edge(self.band_width + self.band_feather, self.band_width, diff)
    }
}

impl OverlayStage for ScanLine {
    fn overlay(&self, ctx: &ShadeContext<'_>, uv: Vec2) -> Vec3 {
        if !ctx.pointer.active {
            return Vec3::ZERO;
        }
        let band = self.band(ctx.depth(uv), ctx.time);
        Vec3::from(self.color) * (band * self.intensity)
    }

    fn pack(&self, block: &mut ParamBlock) {
        block.set_float(slot::SPEED, self.speed);
        block.set_float(slot::BAND_WIDTH, self.band_width);
        block.set_float(slot::BAND_FEATHER, self.band_feather);
        block.set_float(slot::INTENSITY, self.intensity);
        block.set_vec3(slot::COLOR, self.color);
    }

    fn wgsl(&self) -> &'static str {
        include_str!("../shaders/scan_line.wgsl")
    }
}
