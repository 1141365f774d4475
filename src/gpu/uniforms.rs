//! Per-frame uniform block

use bytemuck::{Pod, Zeroable};

use crate::effects::params::PARAM_SLOTS;
use crate::effects::Effect;
use crate::pointer::PointerState;

/// Mirrors `FrameUniforms` in `shaders/prelude.wgsl`.
///
/// Layout: pointer xy, hover flag, time, then one 24-float block per stage.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub pointer: [f32; 2],
    pub hover: f32,
    pub time: f32,
    pub base: [f32; PARAM_SLOTS],
    pub overlay: [f32; PARAM_SLOTS],
}

impl Default for FrameUniforms {
    fn default() -> Self {
        Self {
            pointer: [0.5, 0.5],
            hover: 0.0,
            time: 0.0,
            base: [0.0; PARAM_SLOTS],
            overlay: [0.0; PARAM_SLOTS],
        }
    }
}

impl FrameUniforms {
    /// Uniforms carrying an effect's packed parameters.
    pub fn for_effect(effect: &Effect) -> Self {
        let (base, overlay) = effect.pack();
        Self {
            base: base.values,
            overlay: overlay.values,
            ..Self::default()
        }
    }

    /// Refresh the per-tick fields; parameters stay as packed.
    pub fn update(&mut self, pointer: PointerState, time: f32) {
        self.pointer = [pointer.x, pointer.y];
        self.hover = pointer.active_f32();
        self.time = time;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{lens, scan_line, ScanLine};

    #[test]
    fn test_uniform_size_matches_wgsl() {
        // vec2 + f32 + f32 + 2 * array<vec4<f32>, 6>
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 16 + 2 * 6 * 16);
        assert_eq!(std::mem::size_of::<FrameUniforms>() % 16, 0);
    }

    #[test]
    fn test_for_effect_packs_stage_blocks() {
        let uniforms = FrameUniforms::for_effect(&Effect::depth_dot_lens());
        assert_eq!(uniforms.base[lens::slot::ZOOM], 0.9);
        assert_eq!(uniforms.base[lens::slot::REQUIRE_HOVER], 0.0);

        let scan = ScanLine::default();
        let uniforms = FrameUniforms::for_effect(&Effect::ScanLine(scan.clone()));
        assert_eq!(
            &uniforms.overlay[scan_line::slot::COLOR..scan_line::slot::COLOR + 3],
            &scan.color
        );
    }

    #[test]
    fn test_update_keeps_parameters() {
        let mut uniforms = FrameUniforms::for_effect(&Effect::depth_dot_lens());
        let before = uniforms;
        uniforms.update(PointerState::at(0.25, 0.75), 3.5);
        assert_eq!(uniforms.pointer, [0.25, 0.75]);
        assert_eq!(uniforms.hover, 1.0);
        assert_eq!(uniforms.time, 3.5);
        assert_eq!(uniforms.base, before.base);
        assert_eq!(uniforms.overlay, before.overlay);
    }
}
