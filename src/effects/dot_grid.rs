//! Dot grid overlay
//!
//! Splits UV space into `density` x `density` cells and draws one dot per
//! cell. A per-cell hash varies dot size and shimmer phase; the depth map
//! and the pointer decide where dots show up.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::params::ParamBlock;
use super::primitives::{falling_edge, fract, hash, mix, radial_falloff, smoothstep};
use super::{OverlayStage, ShadeContext};

/// Uniform slots read by `shaders/dot_grid.wgsl`
pub mod slot {
    pub const DENSITY: usize = 0;
    pub const DOT_RADIUS: usize = 1;
    pub const DOT_FEATHER: usize = 2;
    pub const SIZE_JITTER: usize = 3;
    pub const GLOW_RADIUS: usize = 4;
    pub const GLOW_INTENSITY: usize = 5;
    pub const SHIMMER_SPEED: usize = 6;
    pub const SHIMMER_SPEED_JITTER: usize = 7;
    pub const SHIMMER_AMOUNT: usize = 8;
    pub const DEPTH_GATE: usize = 9;
    pub const DEPTH_LOW: usize = 10;
    pub const DEPTH_HIGH: usize = 11;
    pub const POINTER_RADIUS: usize = 12;
    pub const POINTER_FEATHER: usize = 13;
    pub const IDLE_VISIBILITY: usize = 14;
    pub const INTENSITY: usize = 15;
    pub const COLOR: usize = 16;
}

/// Which depth range the dots prefer.
///
/// Both conventions ship in different demos, so neither is the default
/// "correct" one; pick per effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthGate {
    /// Dots on near (bright) regions
    Bright,
    /// Dots on far (dark) regions
    #[default]
    Dark,
}

impl DepthGate {
    fn as_f32(self) -> f32 {
        match self {
            DepthGate::Bright => 0.0,
            DepthGate::Dark => 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DotGrid {
    /// Cells per axis
    pub density: f32,
    /// Dot radius in cell units (0.5 touches the cell edge)
    pub dot_radius: f32,
    /// Soft edge half-width around `dot_radius`
    pub dot_feather: f32,
    /// Fraction of the radius removed for the largest hash value
    pub size_jitter: f32,
    /// Radius of the bright core
    pub glow_radius: f32,
    pub glow_intensity: f32,
    /// Base shimmer angular speed
    pub shimmer_speed: f32,
    /// Extra speed scaled by the cell hash
    pub shimmer_speed_jitter: f32,
    /// 0 = steady dots, 1 = full shimmer
    pub shimmer_amount: f32,
    pub depth_gate: DepthGate,
    pub depth_low: f32,
    pub depth_high: f32,
    /// Reveal radius around the pointer
    pub pointer_radius: f32,
    pub pointer_feather: f32,
    /// Visibility away from the pointer (1 = dots everywhere)
    pub idle_visibility: f32,
    pub intensity: f32,
    pub color: [f32; 3],
}

impl Default for DotGrid {
    fn default() -> Self {
        Self {
            density: 200.0,
            dot_radius: 0.3,
            dot_feather: 0.05,
            size_jitter: 0.4,
            glow_radius: 0.01,
            glow_intensity: 0.0,
            shimmer_speed: 1.5,
            shimmer_speed_jitter: 3.5,
            shimmer_amount: 1.0,
            depth_gate: DepthGate::Bright,
            depth_low: 0.2,
            depth_high: 0.8,
            pointer_radius: 0.3,
            pointer_feather: 0.2,
            idle_visibility: 0.0,
            intensity: 1.0,
            color: [1.0, 0.85, 0.4],
        }
    }
}

impl DotGrid {
    /// Dense gold dots over the whole frame, strongest on far regions.
    pub fn projection() -> Self {
        Self {
            density: 400.0,
            dot_radius: 0.175,
            dot_feather: 0.025,
            size_jitter: 0.0,
            glow_radius: 0.01,
            glow_intensity: 0.25,
            depth_gate: DepthGate::Dark,
            depth_low: 0.0,
            depth_high: 1.0,
            idle_visibility: 1.0,
            ..Self::default()
        }
    }

    /// Cell coordinate, per-cell hash and distance to the cell center.
    fn cell(&self, uv: Vec2) -> (f32, f32) {
        let grid = uv * self.density;
        let rand = hash(grid.floor());
        let local = Vec2::new(fract(grid.x), fract(grid.y));
        (rand, local.distance(Vec2::splat(0.5)))
    }

    /// Soft dot coverage at `uv`, before shimmer, depth and pointer.
    pub fn dot_mask(&self, uv: Vec2) -> f32 {
        let (rand, dist) = self.cell(uv);
        let radius = self.dot_radius * (1.0 - self.size_jitter * rand);
        falling_edge(radius + self.dot_feather, radius - self.dot_feather, dist)
    }

    /// Depth preference in [0, 1].
    pub fn depth_weight(&self, depth: f32) -> f32 {
        match self.depth_gate {
            DepthGate::Bright => smoothstep(self.depth_low, self.depth_high, depth),
            DepthGate::Dark => falling_edge(self.depth_high, self.depth_low, depth),
        }
    }

    /// Pointer-driven visibility; `idle_visibility` when the pointer is away.
    pub fn pointer_visibility(&self, ctx: &ShadeContext<'_>, uv: Vec2) -> f32 {
        let proximity = if ctx.pointer.active {
            radial_falloff(
                uv,
                ctx.pointer.position(),
                self.pointer_radius,
                self.pointer_feather,
            )
        } else {
            0.0
        };
        mix(self.idle_visibility, 1.0, proximity)
    }
}

impl OverlayStage for DotGrid {
    fn overlay(&self, ctx: &ShadeContext<'_>, uv: Vec2) -> Vec3 {
        let visibility = self.pointer_visibility(ctx, uv);
        if visibility <= 0.0 {
            return Vec3::ZERO;
        }

        let (rand, dist) = self.cell(uv);
        let mask = self.dot_mask(uv);
        let shimmer =
            0.5 + 0.5 * (ctx.time * (self.shimmer_speed + rand * self.shimmer_speed_jitter)).sin();
        let brightness = mix(1.0, shimmer, self.shimmer_amount);
        let glow = falling_edge(self.glow_radius, 0.0, dist) * self.glow_intensity;
        let gate = self.depth_weight(ctx.depth(uv));

        Vec3::from(self.color) * ((mask * brightness + glow) * gate * visibility * self.intensity)
    }

    fn pack(&self, block: &mut ParamBlock) {
        block.set_float(slot::DENSITY, self.density);
        block.set_float(slot::DOT_RADIUS, self.dot_radius);
        block.set_float(slot::DOT_FEATHER, self.dot_feather);
        block.set_float(slot::SIZE_JITTER, self.size_jitter);
        block.set_float(slot::GLOW_RADIUS, self.glow_radius);
        block.set_float(slot::GLOW_INTENSITY, self.glow_intensity);
        block.set_float(slot::SHIMMER_SPEED, self.shimmer_speed);
        block.set_float(slot::SHIMMER_SPEED_JITTER, self.shimmer_speed_jitter);
        block.set_float(slot::SHIMMER_AMOUNT, self.shimmer_amount);
        block.set_float(slot::DEPTH_GATE, self.depth_gate.as_f32());
        block.set_float(slot::DEPTH_LOW, self.depth_low);
        block.set_float(slot::DEPTH_HIGH, self.depth_high);
        block.set_float(slot::POINTER_RADIUS, self.pointer_radius);
        block.set_float(slot::POINTER_FEATHER, self.pointer_feather);
        block.set_float(slot::IDLE_VISIBILITY, self.idle_visibility);
        block.set_float(slot::INTENSITY, self.intensity);
        block.set_vec3(slot::COLOR, self.color);
    }

    fn wgsl(&self) -> &'static str {
        include_str!("../shaders/dot_grid.wgsl")
    }
}
