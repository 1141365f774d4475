//! Shared shading primitives
//!
//! Scalar helpers with the same semantics as their WGSL counterparts in
//! `shaders/prelude.wgsl`. Keep the two in sync.

use glam::{Vec2, Vec3};

const HASH_DOT: Vec2 = Vec2::new(12.9898, 78.233);
const HASH_SCALE: f32 = 43758.5453;

/// GPU-style fractional part, always in [0, 1) for finite input.
#[inline]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// Pseudo-random value in [0, 1] for a cell coordinate.
#[inline]
pub fn hash(p: Vec2) -> f32 {
    fract(p.dot(HASH_DOT).sin() * HASH_SCALE)
}

/// Cubic Hermite step between two edges.
///
/// Edges may be given in either order; reversed edges produce a falling
/// mask. Equal edges degrade to a rising step at `edge0`, so falling masks
/// whose width may reach zero go through `falling_edge` instead.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge0 == edge1 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Linear interpolation, `a` at `t = 0` and `b` at `t = 1`.
#[inline]
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

#[inline]
pub fn mix_vec2(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    a * (1.0 - t) + b * t
}

#[inline]
pub fn mix_color(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a * (1.0 - t) + b * t
}

/// Falling edge: 1 up to `inner`, exactly 0 at or beyond `outer`.
///
/// A zero or negative width (`inner >= outer`) is a hard cut at `outer`.
#[inline]
pub fn falling_edge(outer: f32, inner: f32, x: f32) -> f32 {
    1.0 - smoothstep(inner.min(outer), outer, x)
}

/// 1 near `center`, falling to exactly 0 at `radius`.
///
/// `feather` is the width of the soft edge inside the radius.
#[inline]
pub fn radial_falloff(p: Vec2, center: Vec2, radius: f32, feather: f32) -> f32 {
    falling_edge(radius, radius - feather, p.distance(center))
}

/// Normalized exponential decay: 1 at distance 0, exactly 0 at `radius`.
#[inline]
pub fn exponential_falloff(distance: f32, radius: f32, sharpness: f32) -> f32 {
    if radius <= 0.0 || distance >= radius {
        return 0.0;
    }
    let x = distance / radius;
    if sharpness <= 1e-4 {
        return 1.0 - x;
    }
    let floor = (-sharpness).exp();
    (((-sharpness * x).exp() - floor) / (1.0 - floor)).clamp(0.0, 1.0)
}
