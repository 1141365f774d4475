//! Parameter packing for the GPU uniform buffer
//!
//! Each stage owns one block of 24 floats (6 vec4s). Stages write their
//! parameters at fixed slots; the matching WGSL snippet reads the same slots
//! through `base_param` / `overlay_param`.

use bytemuck::{Pod, Zeroable};

/// Number of float slots per stage block
pub const PARAM_SLOTS: usize = 24;

/// One stage's packed parameters.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ParamBlock {
    pub values: [f32; PARAM_SLOTS],
}

impl Default for ParamBlock {
    fn default() -> Self {
        Self {
            values: [0.0; PARAM_SLOTS],
        }
    }
}

impl ParamBlock {
    /// Set a float parameter at the given slot
    pub fn set_float(&mut self, index: usize, value: f32) {
        if index < PARAM_SLOTS {
            self.values[index] = value;
        }
    }

    /// Set a bool parameter at the given slot (as 0.0 or 1.0)
    pub fn set_bool(&mut self, index: usize, value: bool) {
        self.set_float(index, if value { 1.0 } else { 0.0 });
    }

    /// Set a vec3 parameter starting at the given slot
    pub fn set_vec3(&mut self, index: usize, value: [f32; 3]) {
        if index + 2 < PARAM_SLOTS {
            self.values[index..index + 3].copy_from_slice(&value);
        }
    }

    pub fn get(&self, index: usize) -> f32 {
        self.values.get(index).copied().unwrap_or(0.0)
    }
}
