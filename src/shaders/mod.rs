//! WGSL assembly
//!
//! One pipeline per demo: the shared prelude, the effect's distortion
//! snippet (or the identity sampler), its overlay snippet (or nothing) and
//! a fragment entry point that adds the two.

use crate::effects::Effect;

/// Bindings, uniforms, primitives and the full-screen quad vertex stage
pub const PRELUDE: &str = include_str!("prelude.wgsl");

/// Base stage used when an effect has no distortion
pub const IDENTITY_BASE: &str = "\
fn base_color(uv: vec2<f32>) -> vec3<f32> {
    return sample_image(uv);
}
";

/// Overlay stage used when an effect has no overlay
pub const NO_OVERLAY: &str = "\
fn overlay_color(uv: vec2<f32>) -> vec3<f32> {
    return vec3<f32>(0.0);
}
";

pub const FRAGMENT_MAIN: &str = "\
@fragment
fn fs_main(vertex_out: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(base_color(vertex_out.uv) + overlay_color(vertex_out.uv), 1.0);
}
";

/// Build the complete WGSL module for an effect.
pub fn assemble(effect: &Effect) -> String {
    let base = effect.distortion().map_or(IDENTITY_BASE, |stage| stage.wgsl());
    let overlay = effect.overlay().map_or(NO_OVERLAY, |stage| stage.wgsl());

    let mut source =
        String::with_capacity(PRELUDE.len() + base.len() + overlay.len() + FRAGMENT_MAIN.len() + 4);
    for part in [PRELUDE, base, overlay, FRAGMENT_MAIN] {
        source.push_str(part);
        source.push('\n');
    }
    source
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{Distortion, DotGrid, LensZoom, Overlay, Ripple, ScanLine, TiltShift};

    fn all_effects() -> Vec<Effect> {
        vec![
            Effect::DotGrid(DotGrid::default()),
            Effect::Ripple(Ripple::default()),
            Effect::Lens(LensZoom::default()),
            Effect::TiltShift(TiltShift::default()),
            Effect::ScanLine(ScanLine::default()),
            Effect::depth_dot_lens(),
            Effect::Layered {
                base: Distortion::Ripple(Ripple::default()),
                overlay: Overlay::ScanLine(ScanLine::default()),
            },
        ]
    }

    #[test]
    fn test_each_stage_defined_once() {
        for effect in all_effects() {
            let source = assemble(&effect);
            assert_eq!(source.matches("fn base_color(").count(), 1, "{}", effect.effect_type());
            assert_eq!(source.matches("fn overlay_color(").count(), 1, "{}", effect.effect_type());
            assert_eq!(source.matches("@fragment").count(), 1);
            assert_eq!(source.matches("@vertex").count(), 1);
        }
    }

    #[test]
    fn test_single_stage_effects_use_fallbacks() {
        let dots = assemble(&Effect::DotGrid(DotGrid::default()));
        assert!(dots.contains(IDENTITY_BASE));
        let ripple = assemble(&Effect::Ripple(Ripple::default()));
        assert!(ripple.contains(NO_OVERLAY));
    }

    #[test]
    fn test_assembled_shaders_validate() {
        for effect in all_effects() {
            let source = assemble(&effect);
            let module = naga::front::wgsl::parse_str(&source).unwrap_or_else(|e| {
                panic!("{}: {}", effect.effect_type(), e.emit_to_string(&source))
            });
            naga::valid::Validator::new(
                naga::valid::ValidationFlags::all(),
                naga::valid::Capabilities::empty(),
            )
            .validate(&module)
            .unwrap_or_else(|e| panic!("{}: {:?}", effect.effect_type(), e));
        }
    }
}
