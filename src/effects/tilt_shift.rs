//! Tilt-shift blur
//!
//! Fakes a shallow depth of field: pixels whose depth is far from the focus
//! depth are replaced by the average of two samples taken on either side
//! along one axis.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::params::ParamBlock;
use super::primitives::{mix_color, smoothstep};
use super::{DistortionStage, ShadeContext};

/// Uniform slots read by `shaders/tilt_shift.wgsl`
pub mod slot {
    pub const FOCUS_DEPTH: usize = 0;
    pub const FOCUS_RANGE: usize = 1;
    pub const FOCUS_FEATHER: usize = 2;
    pub const MAX_OFFSET: usize = 3;
    pub const AXIS: usize = 4;
    pub const FOLLOW_POINTER: usize = 5;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlurAxis {
    #[default]
    Horizontal,
    Vertical,
}

impl BlurAxis {
    fn direction(self) -> Vec2 {
        match self {
            BlurAxis::Horizontal => Vec2::X,
            BlurAxis::Vertical => Vec2::Y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TiltShift {
    /// Depth that stays sharp
    pub focus_depth: f32,
    /// Depth distance from focus that is still fully sharp
    pub focus_range: f32,
    /// Depth distance over which blur ramps in
    pub focus_feather: f32,
    /// Sample offset in UV units at full blur
    pub max_offset: f32,
    pub axis: BlurAxis,
    /// Focus on the depth under a hovering pointer
    pub focus_follows_pointer: bool,
}

impl Default for TiltShift {
    fn default() -> Self {
        Self {
            focus_depth: 0.5,
            focus_range: 0.1,
            focus_feather: 0.2,
            max_offset: 0.004,
            axis: BlurAxis::Horizontal,
            focus_follows_pointer: false,
        }
    }
}

impl TiltShift {
    fn focus(&self, ctx: &ShadeContext<'_>) -> f32 {
        if self.focus_follows_pointer && ctx.pointer.active {
            ctx.depth(ctx.pointer.position())
        } else {
            self.focus_depth
        }
    }

    /// Blur amount at `uv`: 0 in focus, 1 fully blurred.
    pub fn blur_mask(&self, ctx: &ShadeContext<'_>, uv: Vec2) -> f32 {
        let distance = (ctx.depth(uv) - self.focus(ctx)).abs();
        smoothstep(
            self.focus_range,
            self.focus_range + self.focus_feather,
            distance,
        )
    }
}

impl DistortionStage for TiltShift {
    fn base_color(&self, ctx: &ShadeContext<'_>, uv: Vec2) -> Vec3 {
        let mask = self.blur_mask(ctx, uv);
        let offset = self.axis.direction() * (self.max_offset * mask);
        let sharp = ctx.color(uv);
        let blurred = (ctx.color(uv + offset) + ctx.color(uv - offset)) * 0.5;
        mix_color(sharp, blurred, mask)
    }

    fn pack(&self, block: &mut ParamBlock) {
        block.set_float(slot::FOCUS_DEPTH, self.focus_depth);
        block.set_float(slot::FOCUS_RANGE, self.focus_range);
        block.set_float(slot::FOCUS_FEATHER, self.focus_feather);
        block.set_float(slot::MAX_OFFSET, self.max_offset);
        block.set_float(
            slot::AXIS,
            match self.axis {
                BlurAxis::Horizontal => 0.0,
                BlurAxis::Vertical => 1.0,
            },
        );
        block.set_bool(slot::FOLLOW_POINTER, self.focus_follows_pointer);
    }

    fn wgsl(&self) -> &'static str {
        include_str!("../shaders/tilt_shift.wgsl")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{DepthImage, Image};
    use crate::pointer::PointerState;

    fn stripes() -> Image {
        let mut data = Vec::new();
        for _y in 0..16 {
            for x in 0..16 {
                let v = if x % 2 == 0 { 255 } else { 0 };
                data.extend_from_slice(&[v, v, v, 255]);
            }
        }
        Image::from_rgba8(16, 16, data).unwrap()
    }

    #[test]
    fn test_in_focus_is_sharp() {
        let image = stripes();
        let depth = DepthImage::uniform(16, 16, 0.5);
        let ctx = ShadeContext {
            image: &image,
            depth: &depth,
            pointer: PointerState::default(),
            time: 0.0,
        };
        let tilt = TiltShift::default();
        let uv = Vec2::new(0.53, 0.5);
        assert_eq!(tilt.blur_mask(&ctx, uv), 0.0);
        assert_eq!(tilt.base_color(&ctx, uv), ctx.color(uv));
    }

    #[test]
    fn test_out_of_focus_averages_neighbours() {
        let image = stripes();
        let depth = DepthImage::uniform(16, 16, 1.0);
        let ctx = ShadeContext {
            image: &image,
            depth: &depth,
            pointer: PointerState::default(),
            time: 0.0,
        };
        let tilt = TiltShift {
            max_offset: 1.0 / 16.0,
            ..TiltShift::default()
        };
        // Texel center of a white stripe; neighbours one texel away are black
        let uv = Vec2::new(0.5 / 16.0 + 2.0 / 16.0, 0.5);
        assert_eq!(tilt.blur_mask(&ctx, uv), 1.0);
        let color = tilt.base_color(&ctx, uv);
        assert!(color.x < 0.01, "expected blurred black, got {color:?}");
    }

    #[test]
    fn test_focus_follows_pointer() {
        let image = stripes();
        // Left half near, right half far
        let depth = DepthImage::from_fn(16, 16, |x, _| if x < 8 { 1.0 } else { 0.0 });
        let tilt = TiltShift {
            focus_follows_pointer: true,
            ..TiltShift::default()
        };
        let ctx = ShadeContext {
            image: &image,
            depth: &depth,
            pointer: PointerState::at(0.1, 0.5),
            time: 0.0,
        };
        assert_eq!(tilt.blur_mask(&ctx, Vec2::new(0.2, 0.5)), 0.0);
        assert_eq!(tilt.blur_mask(&ctx, Vec2::new(0.8, 0.5)), 1.0);
    }
}
