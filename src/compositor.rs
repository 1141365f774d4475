//! Frame compositor
//!
//! CPU rendition of the per-pixel effect. `render` is pure: the pointer and
//! time are passed in each call, nothing is read from shared state.

use glam::{Vec2, Vec4};

use crate::assets::{DepthImage, Image};
use crate::effects::{Effect, ShadeContext};
use crate::pointer::PointerState;

/// Loaded photo, depth map and the effect drawn over them.
///
/// Built only after both images have loaded, so `render` has no error path.
#[derive(Debug, Clone)]
pub struct Compositor {
    image: Image,
    depth: DepthImage,
    effect: Effect,
}

impl Compositor {
    pub fn new(image: Image, depth: DepthImage, effect: Effect) -> Self {
        if (image.width(), image.height()) != (depth.width(), depth.height()) {
            log::warn!(
                "Image is {}x{} but depth map is {}x{}; sampling by UV",
                image.width(),
                image.height(),
                depth.width(),
                depth.height()
            );
        }
        log::info!("Compositor ready: {}", effect.display_name());
        Self { image, depth, effect }
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn depth(&self) -> &DepthImage {
        &self.depth
    }

    pub fn effect(&self) -> &Effect {
        &self.effect
    }

    /// Color at one normalized coordinate. Alpha is always 1.
    pub fn render(&self, uv: Vec2, pointer: PointerState, time: f32) -> Vec4 {
        let ctx = ShadeContext {
            image: &self.image,
            depth: &self.depth,
            pointer,
            time,
        };
        self.effect.shade(&ctx, uv)
    }

    /// Render a whole frame, sampling each pixel at its center.
    pub fn render_frame(&self, width: u32, height: u32, pointer: PointerState, time: f32) -> Frame {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                let uv = Vec2::new(
                    (x as f32 + 0.5) / width as f32,
                    (y as f32 + 0.5) / height as f32,
                );
                pixels.push(self.render(uv, pointer, time));
            }
        }
        log::trace!("Rendered {}x{} frame at t={:.3}", width, height, time);
        Frame {
            width,
            height,
            pixels,
        }
    }
}

/// A rendered frame of linear RGBA values, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<Vec4>,
}

impl Frame {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Vec4 {
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn pixels(&self) -> &[Vec4] {
        &self.pixels
    }

    /// Quantize to RGBA8, saturating out-of-range channels.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|p| p.to_array())
            .map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
            .collect()
    }
}
