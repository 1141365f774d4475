//! Lens zoom distortion
//!
//! Inside a circle around the pointer the photo is re-sampled closer to the
//! pointer (magnified) and a faint glass ring is added.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::params::ParamBlock;
use super::primitives::{falling_edge, mix_color, mix_vec2};
use super::{DistortionStage, ShadeContext};

/// Uniform slots read by `shaders/lens.wgsl`
pub mod slot {
    pub const RADIUS: usize = 0;
    pub const FEATHER: usize = 1;
    pub const ZOOM: usize = 2;
    pub const RING_RADIUS: usize = 3;
    pub const RING_WIDTH: usize = 4;
    pub const RING_FEATHER: usize = 5;
    pub const RING_INTENSITY: usize = 6;
    pub const REQUIRE_HOVER: usize = 7;
    pub const RING_COLOR: usize = 8;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LensZoom {
    /// Lens radius in UV units
    pub radius: f32,
    /// Soft edge width inside the radius
    pub feather: f32,
    /// Scale of the offset from the pointer (< 1 magnifies)
    pub zoom: f32,
    pub ring_radius: f32,
    pub ring_width: f32,
    pub ring_feather: f32,
    pub ring_intensity: f32,
    /// Hide the lens while the pointer is off the surface
    pub require_hover: bool,
    pub ring_color: [f32; 3],
}

impl Default for LensZoom {
    fn default() -> Self {
        Self {
            radius: 0.25,
            feather: 0.1,
            zoom: 0.9,
            ring_radius: 0.15,
            ring_width: 0.05,
            ring_feather: 0.005,
            ring_intensity: 0.1,
            require_hover: true,
            ring_color: [1.0, 1.0, 1.0],
        }
    }
}

impl LensZoom {
    /// Lens coverage at `uv`: 1 inside, 0 outside.
    pub fn lens_mask(&self, ctx: &ShadeContext<'_>, uv: Vec2) -> f32 {
        if self.require_hover && !ctx.pointer.active {
            return 0.0;
        }
        let dist = uv.distance(ctx.pointer.position());
        falling_edge(self.radius, self.radius - self.feather, dist)
    }
}

impl DistortionStage for LensZoom {
    fn base_color(&self, ctx: &ShadeContext<'_>, uv: Vec2) -> Vec3 {
        let pointer = ctx.pointer.position();
        let in_lens = self.lens_mask(ctx, uv);

        let zoom_uv = mix_vec2(uv, pointer + (uv - pointer) * self.zoom, in_lens);
        let base = ctx.color(uv);
        let zoomed = ctx.color(zoom_uv);

        let dist = uv.distance(pointer);
        let ring = falling_edge(
            self.ring_width,
            self.ring_width - self.ring_feather,
            (dist - self.ring_radius).abs(),
        );
        let glow = Vec3::from(self.ring_color) * (ring * in_lens * self.ring_intensity);

        mix_color(base, zoomed, in_lens) + glow
    }

    fn pack(&self, block: &mut ParamBlock) {
        block.set_float(slot::RADIUS, self.radius);
        block.set_float(slot::FEATHER, self.feather);
        block.set_float(slot::ZOOM, self.zoom);
        block.set_float(slot::RING_RADIUS, self.ring_radius);
        block.set_float(slot::RING_WIDTH, self.ring_width);
        block.set_float(slot::RING_FEATHER, self.ring_feather);
        block.set_float(slot::RING_INTENSITY, self.ring_intensity);
        block.set_bool(slot::REQUIRE_HOVER, self.require_hover);
        block.set_vec3(slot::RING_COLOR, self.ring_color);
    }

    fn wgsl(&self) -> &'static str {
        include_str!("../shaders/lens.wgsl")
    }
}
