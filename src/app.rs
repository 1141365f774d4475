//! Application state
//!
//! Owns the GPU context, the effect pipeline and the per-frame inputs
//! (pointer tracker, clock). The winit handler in `main.rs` forwards window
//! events here.

use std::sync::Arc;

use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::assets::{self, DepthImage, Image};
use crate::clock::FrameClock;
use crate::config::DemoConfig;
use crate::effects::Effect;
use crate::error::Result;
use crate::gpu::{EffectPipeline, FrameUniforms, GpuContext};
use crate::pointer::{PointerState, PointerTracker};

/// Main application state
pub struct App {
    gpu: GpuContext,
    pipeline: EffectPipeline,
    effect: Effect,
    pointer: PointerTracker,
    clock: FrameClock,
    uniforms: FrameUniforms,
}

impl App {
    /// Load the demo's assets, then bring up the GPU.
    ///
    /// Both images are decoded before any GPU work so the first frame never
    /// sees a missing texture.
    pub async fn new(window: Arc<Window>, config: &DemoConfig) -> Result<Self> {
        let image = assets::load_image(&config.image_path)?;
        let depth = assets::load_depth(&config.depth_path)?;
        Self::with_assets(window, config, image, depth).await
    }

    /// Bring up the GPU with already-decoded assets.
    pub async fn with_assets(
        window: Arc<Window>,
        config: &DemoConfig,
        image: Image,
        depth: DepthImage,
    ) -> Result<Self> {
        if (image.width(), image.height()) != (depth.width(), depth.height()) {
            log::warn!(
                "Image is {}x{} but depth map is {}x{}; sampling by UV",
                image.width(),
                image.height(),
                depth.width(),
                depth.height()
            );
        }

        let gpu = GpuContext::new(window, config.vsync).await?;
        let effect = config.effect.clone();
        let pipeline = EffectPipeline::new(&gpu, &image, &depth, &effect)?;
        let uniforms = FrameUniforms::for_effect(&effect);

        Ok(Self {
            gpu,
            pipeline,
            effect,
            pointer: PointerTracker::new(),
            clock: FrameClock::new(),
            uniforms,
        })
    }

    pub fn effect(&self) -> &Effect {
        &self.effect
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer.state()
    }

    /// Handle window resize
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.gpu.resize(new_size);
        }
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.gpu.size()
    }

    /// Cursor position in physical pixels
    pub fn on_cursor_moved(&mut self, x: f32, y: f32) {
        self.pointer.pointer_move_px(x, y, self.gpu.size());
    }

    pub fn on_cursor_entered(&mut self) {
        self.pointer.pointer_enter();
    }

    pub fn on_cursor_left(&mut self) {
        self.pointer.pointer_leave();
    }

    /// Sample pointer and clock once, then draw one frame.
    pub fn render(&mut self) -> std::result::Result<(), wgpu::SurfaceError> {
        let time = self.clock.tick();
        self.uniforms.update(self.pointer.state(), time);

        let output = self.gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.pipeline.render(&self.gpu, &view, &self.uniforms);
        output.present();

        if self.clock.frame() % 600 == 0 {
            log::trace!("Frame {} at {:.1}s", self.clock.frame(), time);
        }
        Ok(())
    }
}
