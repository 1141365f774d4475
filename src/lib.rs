//! Depth Effects - depth-map driven image effects
//!
//! Combines a photo, a grayscale depth map and the pointer position into a
//! real-time effect drawn on a full-screen quad. Every effect exists twice:
//! as a pure CPU reference (`effects`) and as a WGSL snippet assembled into
//! one GPU pipeline (`shaders`, `gpu`).

pub mod app;
pub mod assets;
pub mod clock;
pub mod compositor;
pub mod config;
pub mod effects;
pub mod error;
pub mod gpu;
pub mod pointer;
pub mod shaders;
pub mod surface;

pub use app::App;
pub use compositor::{Compositor, Frame};
pub use config::DemoConfig;
pub use effects::Effect;
pub use error::{CompositorError, Result};
pub use pointer::{PointerState, PointerTracker};
