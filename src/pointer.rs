//! Pointer tracking
//!
//! Input events update a `PointerTracker` owned by the application driver.
//! The compositor only ever sees `PointerState` snapshots taken once per tick.

use glam::Vec2;
use winit::dpi::PhysicalSize;

/// Snapshot of the pointer in normalized surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    /// Horizontal position, 0 at the left edge
    pub x: f32,
    /// Vertical position, 0 at the top edge
    pub y: f32,
    /// Whether the pointer is over the surface
    pub active: bool,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            x: 0.5,
            y: 0.5,
            active: false,
        }
    }
}

impl PointerState {
    /// Active pointer at a normalized position (clamped to [0, 1]).
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x: clamp_unit(x),
            y: clamp_unit(y),
            active: true,
        }
    }

    /// Inactive pointer at a normalized position (clamped to [0, 1]).
    pub fn idle(x: f32, y: f32) -> Self {
        Self {
            active: false,
            ..Self::at(x, y)
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Hover flag as the 0/1 float the shaders expect
    pub fn active_f32(&self) -> f32 {
        if self.active {
            1.0
        } else {
            0.0
        }
    }
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.5
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Keeps the latest pointer sample; later events overwrite earlier ones.
#[derive(Debug, Default, Clone)]
pub struct PointerTracker {
    state: PointerState,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer moved to a normalized position.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.state.x = clamp_unit(x);
        self.state.y = clamp_unit(y);
    }

    /// Pointer moved to a physical pixel position on a surface of `size`.
    pub fn pointer_move_px(&mut self, x: f32, y: f32, size: PhysicalSize<u32>) {
        let w = size.width.max(1) as f32;
        let h = size.height.max(1) as f32;
        self.pointer_move(x / w, y / h);
    }

    pub fn pointer_enter(&mut self) {
        self.state.active = true;
    }

    pub fn pointer_leave(&mut self) {
        self.state.active = false;
    }

    /// Current sample
    pub fn state(&self) -> PointerState {
        self.state
    }
}
