//! Effects module
//!
//! Every effect is a pure per-pixel function of (uv, image, depth, pointer,
//! time). Effects are built from at most two stages:
//!
//! - a *distortion* stage that decides where the photo is sampled
//!   (ripple, lens zoom, tilt-shift) and returns the base color
//! - an *overlay* stage that adds color on top (dot grid, scan line)
//!
//! The CPU implementations here are the reference; each stage also ships a
//! WGSL snippet (see `shaders`) that computes the same thing on the GPU.

pub mod dot_grid;
pub mod lens;
pub mod params;
pub mod primitives;
pub mod ripple;
pub mod scan_line;
pub mod tilt_shift;

use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::assets::{DepthImage, Image};
use crate::pointer::PointerState;

pub use dot_grid::{DepthGate, DotGrid};
pub use lens::LensZoom;
pub use params::ParamBlock;
pub use ripple::{Falloff, Ripple};
pub use scan_line::ScanLine;
pub use tilt_shift::{BlurAxis, TiltShift};

/// Inputs visible to a stage while shading one pixel.
#[derive(Clone, Copy)]
pub struct ShadeContext<'a> {
    pub image: &'a Image,
    pub depth: &'a DepthImage,
    pub pointer: PointerState,
    /// Elapsed seconds
    pub time: f32,
}

impl ShadeContext<'_> {
    /// Photo color at `uv`
    #[inline]
    pub fn color(&self, uv: Vec2) -> Vec3 {
        self.image.sample(uv).truncate()
    }

    /// Depth at `uv`
    #[inline]
    pub fn depth(&self, uv: Vec2) -> f32 {
        self.depth.sample(uv)
    }
}

/// Stage that chooses where and how the photo is sampled.
pub trait DistortionStage {
    fn base_color(&self, ctx: &ShadeContext<'_>, uv: Vec2) -> Vec3;

    /// Write parameters at the slots read by `wgsl()`
    fn pack(&self, block: &mut ParamBlock);

    /// WGSL source defining `fn base_color(uv: vec2<f32>) -> vec3<f32>`
    fn wgsl(&self) -> &'static str;
}

/// Stage that adds color on top of the base color.
pub trait OverlayStage {
    fn overlay(&self, ctx: &ShadeContext<'_>, uv: Vec2) -> Vec3;

    /// Write parameters at the slots read by `wgsl()`
    fn pack(&self, block: &mut ParamBlock);

    /// WGSL source defining `fn overlay_color(uv: vec2<f32>) -> vec3<f32>`
    fn wgsl(&self) -> &'static str;
}

/// Distortion stages usable as the base of a layered effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Distortion {
    Ripple(Ripple),
    Lens(LensZoom),
    TiltShift(TiltShift),
}

/// Overlay stages usable on top of a layered effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Overlay {
    DotGrid(DotGrid),
    ScanLine(ScanLine),
}

impl Distortion {
    fn stage(&self) -> &dyn DistortionStage {
        match self {
            Distortion::Ripple(s) => s,
            Distortion::Lens(s) => s,
            Distortion::TiltShift(s) => s,
        }
    }
}

impl Overlay {
    fn stage(&self) -> &dyn OverlayStage {
        match self {
            Overlay::DotGrid(s) => s,
            Overlay::ScanLine(s) => s,
        }
    }
}

/// Effect variant, chosen once when the compositor is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    DotGrid(DotGrid),
    Ripple(Ripple),
    Lens(LensZoom),
    TiltShift(TiltShift),
    ScanLine(ScanLine),
    /// A distortion with an overlay drawn on top
    Layered { base: Distortion, overlay: Overlay },
}

impl Default for Effect {
    fn default() -> Self {
        Self::depth_dot_lens()
    }
}

impl Effect {
    /// Shimmering depth-gated gold dots under a subtle glass lens.
    pub fn depth_dot_lens() -> Self {
        Effect::Layered {
            base: Distortion::Lens(LensZoom {
                require_hover: false,
                ..LensZoom::default()
            }),
            overlay: Overlay::DotGrid(DotGrid::projection()),
        }
    }

    /// Identifier used in configs and logs
    pub fn effect_type(&self) -> &'static str {
        match self {
            Effect::DotGrid(_) => "dot_grid",
            Effect::Ripple(_) => "ripple",
            Effect::Lens(_) => "lens",
            Effect::TiltShift(_) => "tilt_shift",
            Effect::ScanLine(_) => "scan_line",
            Effect::Layered { .. } => "layered",
        }
    }

    /// Human-readable name, e.g. for the window title
    pub fn display_name(&self) -> String {
        match self {
            Effect::DotGrid(_) => "Dot Grid".to_string(),
            Effect::Ripple(_) => "Liquid Ripple".to_string(),
            Effect::Lens(_) => "Lens Zoom".to_string(),
            Effect::TiltShift(_) => "Tilt-Shift".to_string(),
            Effect::ScanLine(_) => "Scan Line".to_string(),
            Effect::Layered { base, overlay } => {
                let base = match base {
                    Distortion::Ripple(_) => "Liquid Ripple",
                    Distortion::Lens(_) => "Lens Zoom",
                    Distortion::TiltShift(_) => "Tilt-Shift",
                };
                let overlay = match overlay {
                    Overlay::DotGrid(_) => "Dot Grid",
                    Overlay::ScanLine(_) => "Scan Line",
                };
                format!("{overlay} + {base}")
            }
        }
    }

    pub fn distortion(&self) -> Option<&dyn DistortionStage> {
        match self {
            Effect::Ripple(s) => Some(s),
            Effect::Lens(s) => Some(s),
            Effect::TiltShift(s) => Some(s),
            Effect::Layered { base, .. } => Some(base.stage()),
            Effect::DotGrid(_) | Effect::ScanLine(_) => None,
        }
    }

    pub fn overlay(&self) -> Option<&dyn OverlayStage> {
        match self {
            Effect::DotGrid(s) => Some(s),
            Effect::ScanLine(s) => Some(s),
            Effect::Layered { overlay, .. } => Some(overlay.stage()),
            Effect::Ripple(_) | Effect::Lens(_) | Effect::TiltShift(_) => None,
        }
    }

    /// Shade one pixel. Alpha is always 1.
    pub fn shade(&self, ctx: &ShadeContext<'_>, uv: Vec2) -> Vec4 {
        let base = match self.distortion() {
            Some(stage) => stage.base_color(ctx, uv),
            None => ctx.color(uv),
        };
        let overlay = self
            .overlay()
            .map(|stage| stage.overlay(ctx, uv))
            .unwrap_or(Vec3::ZERO);
        (base + overlay).extend(1.0)
    }

    /// Pack (distortion, overlay) parameter blocks for the GPU.
    pub fn pack(&self) -> (ParamBlock, ParamBlock) {
        let mut base = ParamBlock::default();
        let mut overlay = ParamBlock::default();
        if let Some(stage) = self.distortion() {
            stage.pack(&mut base);
        }
        if let Some(stage) = self.overlay() {
            stage.pack(&mut overlay);
        }
        (base, overlay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_selection() {
        assert!(Effect::DotGrid(DotGrid::default()).distortion().is_none());
        assert!(Effect::DotGrid(DotGrid::default()).overlay().is_some());
        assert!(Effect::Ripple(Ripple::default()).overlay().is_none());

        let layered = Effect::depth_dot_lens();
        assert!(layered.distortion().is_some());
        assert!(layered.overlay().is_some());
        assert_eq!(layered.effect_type(), "layered");
        assert_eq!(layered.display_name(), "Dot Grid + Lens Zoom");
    }

    #[test]
    fn test_pack_fills_both_blocks() {
        let (base, overlay) = Effect::depth_dot_lens().pack();
        assert_eq!(base.get(lens::slot::RADIUS), 0.25);
        assert_eq!(overlay.get(dot_grid::slot::DENSITY), 400.0);
    }

    #[test]
    fn test_pack_single_stage_leaves_other_block_empty() {
        let (base, overlay) = Effect::ScanLine(ScanLine::default()).pack();
        assert_eq!(base, ParamBlock::default());
        assert_ne!(overlay, ParamBlock::default());
    }

    #[test]
    fn test_effect_json_round_trip() {
        let effect = Effect::depth_dot_lens();
        let json = serde_json::to_string(&effect).unwrap();
        let parsed: Effect = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, effect);
    }

    #[test]
    fn test_effect_json_uses_defaults_for_missing_fields() {
        let parsed: Effect = serde_json::from_str(r#"{"kind": "ripple", "amplitude": 0.02}"#).unwrap();
        match parsed {
            Effect::Ripple(r) => {
                assert_eq!(r.amplitude, 0.02);
                assert_eq!(r.frequency, Ripple::default().frequency);
            }
            other => panic!("unexpected effect {other:?}"),
        }
    }

    #[test]
    fn test_layered_json() {
        let json = r#"{
            "kind": "layered",
            "base": { "kind": "tilt_shift", "axis": "vertical" },
            "overlay": { "kind": "scan_line", "speed": 0.5 }
        }"#;
        let parsed: Effect = serde_json::from_str(json).unwrap();
        let Effect::Layered { base: Distortion::TiltShift(t), overlay: Overlay::ScanLine(s) } = parsed
        else {
            panic!("unexpected effect");
        };
        assert_eq!(t.axis, BlurAxis::Vertical);
        assert_eq!(s.speed, 0.5);
    }
}
