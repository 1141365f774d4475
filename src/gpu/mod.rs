//! GPU presentation
//!
//! `GpuContext` owns the device, queue and window surface. `EffectPipeline`
//! owns the textures, uniform buffer and the single render pipeline that
//! draws one full-screen quad per frame.

mod pipeline;
pub mod uniforms;

pub use pipeline::{check_texture_size, EffectPipeline};
pub use uniforms::FrameUniforms;

use std::sync::Arc;

use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::error::{CompositorError, Result};

/// Device, queue and the configured window surface.
pub struct GpuContext {
    /// The wgpu surface for presenting rendered frames
    pub surface: wgpu::Surface<'static>,
    /// The GPU device for creating resources
    pub device: wgpu::Device,
    /// The command queue for submitting GPU work
    pub queue: wgpu::Queue,
    /// Surface configuration, updated on resize
    pub config: wgpu::SurfaceConfiguration,
}

impl GpuContext {
    /// Create a context presenting to `window`.
    ///
    /// Fails with `UnsupportedPlatform` when no adapter or device is
    /// available and with `SurfaceConfiguration` when the window surface
    /// cannot be created.
    pub async fn new(window: Arc<Window>, vsync: bool) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| CompositorError::SurfaceConfiguration(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| {
                CompositorError::UnsupportedPlatform("no suitable GPU adapter".to_string())
            })?;

        log::info!("Using GPU: {}", adapter.get_info().name);
        log::info!("Backend: {:?}", adapter.get_info().backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Depth Effects Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: adapter.limits(),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await
            .map_err(|e| CompositorError::UnsupportedPlatform(e.to_string()))?;

        let surface_caps = surface.get_capabilities(&adapter);

        let surface_format = choose_surface_format(&surface_caps.formats).ok_or_else(|| {
            CompositorError::SurfaceConfiguration("surface reports no formats".to_string())
        })?;

        log::info!("Surface format: {:?}", surface_format);
        if surface_format.is_srgb() {
            log::warn!(
                "No linear surface format available; {:?} will gamma-encode output, \
                 so colors differ from CPU snapshots",
                surface_format
            );
        }

        let present_mode = if vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        log::info!("Present mode: {:?}", present_mode);

        let alpha_mode = if surface_caps
            .alpha_modes
            .contains(&wgpu::CompositeAlphaMode::Opaque)
        {
            wgpu::CompositeAlphaMode::Opaque
        } else {
            wgpu::CompositeAlphaMode::Auto
        };

        let max_dimension = device.limits().max_texture_dimension_2d;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.clamp(1, max_dimension),
            height: size.height.clamp(1, max_dimension),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 1,
        };

        surface.configure(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
        })
    }

    /// Reconfigure the surface for a new window size.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let max_dimension = self.device.limits().max_texture_dimension_2d;
        self.config.width = new_size.width.clamp(1, max_dimension);
        self.config.height = new_size.height.clamp(1, max_dimension);
        self.surface.configure(&self.device, &self.config);
        log::debug!("Surface resized to {}x{}", self.config.width, self.config.height);
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.config.width, self.config.height)
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }
}

/// Pick the surface format, preferring a non-sRGB one.
///
/// Textures are uploaded as plain unorm, so a non-sRGB target keeps photo
/// colors unchanged on the way out. Falls back to the first format.
pub fn choose_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .find(|f| !f.is_srgb())
        .or_else(|| formats.first())
        .copied()
}
