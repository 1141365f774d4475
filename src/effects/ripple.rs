//! Liquid ripple distortion
//!
//! Offsets the sampling UV with travelling sine/cosine waves. The offset is
//! scaled by a gate that, for pointer-gated ripples, is zero while the
//! pointer is away and falls off with distance from it.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::params::ParamBlock;
use super::primitives::{exponential_falloff, falling_edge};
use super::{DistortionStage, ShadeContext};

/// Uniform slots read by `shaders/ripple.wgsl`
pub mod slot {
    pub const AMPLITUDE: usize = 0;
    pub const FREQUENCY: usize = 1;
    pub const SPEED: usize = 2;
    pub const RADIUS: usize = 3;
    pub const FEATHER: usize = 4;
    pub const FALLOFF: usize = 5;
    pub const SHARPNESS: usize = 6;
    pub const DEPTH_STRENGTH: usize = 7;
    pub const POINTER_GATED: usize = 8;
}

/// Shape of the pointer falloff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Falloff {
    #[default]
    Smoothstep,
    Exponential,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ripple {
    /// Peak UV offset
    pub amplitude: f32,
    /// Wave count across one UV unit (in radians)
    pub frequency: f32,
    /// Phase speed in radians per second
    pub speed: f32,
    /// Influence radius around the pointer
    pub radius: f32,
    /// Soft edge width for `Falloff::Smoothstep`
    pub feather: f32,
    pub falloff: Falloff,
    /// Decay rate for `Falloff::Exponential`
    pub sharpness: f32,
    /// Extra offset per unit of depth away from 0.5
    pub depth_strength: f32,
    /// Only ripple around a hovering pointer
    pub pointer_gated: bool,
}

impl Default for Ripple {
    fn default() -> Self {
        Self {
            amplitude: 0.01,
            frequency: 30.0,
            speed: 2.0,
            radius: 0.35,
            feather: 0.2,
            falloff: Falloff::Smoothstep,
            sharpness: 4.0,
            depth_strength: 0.005,
            pointer_gated: true,
        }
    }
}

impl Ripple {
    /// Strength of the distortion at `uv`, in [0, 1].
    pub fn gate(&self, ctx: &ShadeContext<'_>, uv: Vec2) -> f32 {
        if !self.pointer_gated {
            return 1.0;
        }
        if !ctx.pointer.active {
            return 0.0;
        }
        let dist = uv.distance(ctx.pointer.position());
        match self.falloff {
            Falloff::Smoothstep => falling_edge(self.radius, self.radius - self.feather, dist),
            Falloff::Exponential => exponential_falloff(dist, self.radius, self.sharpness),
        }
    }

    /// Ungated UV offset at `uv`.
    pub fn offset(&self, ctx: &ShadeContext<'_>, uv: Vec2) -> Vec2 {
        let phase = ctx.time * self.speed;
        let waves = Vec2::new(
            (uv.y * self.frequency + phase).sin(),
            (uv.x * self.frequency + phase).cos(),
        ) * self.amplitude;
        let depth = Vec2::splat((ctx.depth(uv) - 0.5) * self.depth_strength);
        waves + depth
    }
}

impl DistortionStage for Ripple {
    fn base_color(&self, ctx: &ShadeContext<'_>, uv: Vec2) -> Vec3 {
        let gate = self.gate(ctx, uv);
        if gate <= 0.0 {
            return ctx.color(uv);
        }
        ctx.color(uv + self.offset(ctx, uv) * gate)
    }

    fn pack(&self, block: &mut ParamBlock) {
        block.set_float(slot::AMPLITUDE, self.amplitude);
        block.set_float(slot::FREQUENCY, self.frequency);
        block.set_float(slot::SPEED, self.speed);
        block.set_float(slot::RADIUS, self.radius);
        block.set_float(slot::FEATHER, self.feather);
        block.set_float(
            slot::FALLOFF,
            match self.falloff {
                Falloff::Smoothstep => 0.0,
                Falloff::Exponential => 1.0,
            },
        );
        block.set_float(slot::SHARPNESS, self.sharpness);
        block.set_float(slot::DEPTH_STRENGTH, self.depth_strength);
        block.set_bool(slot::POINTER_GATED, self.pointer_gated);
    }

    fn wgsl(&self) -> &'static str {
        include_str!("../shaders/ripple.wgsl")
    }
}
