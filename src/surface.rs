//! Presentation surfaces
//!
//! The window path presents through wgpu (see `gpu`). `CpuSurface` receives
//! frames from the CPU compositor, for snapshots and tests.

use std::path::Path;

use crate::compositor::Frame;
use crate::error::{CompositorError, Result};

/// Receives rendered frames for display.
///
/// Resizes are driven from outside: the owner calls `configure` with the new
/// size before the next `present`.
pub trait PresentationSurface {
    fn configure(&mut self, width: u32, height: u32) -> Result<()>;

    fn present(&mut self, frame: &Frame) -> Result<()>;

    /// Configured size, `None` before the first `configure`
    fn size(&self) -> Option<(u32, u32)>;
}

/// In-memory surface holding the last presented frame as RGBA8.
#[derive(Debug, Default)]
pub struct CpuSurface {
    size: Option<(u32, u32)>,
    pixels: Vec<u8>,
    presented: u64,
}

impl CpuSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// RGBA8 bytes of the last presented frame
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Number of frames presented since creation
    pub fn presented(&self) -> u64 {
        self.presented
    }

    /// Write the last presented frame to a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let (width, height) = self.size.ok_or_else(|| {
            CompositorError::SurfaceConfiguration("surface was never configured".to_string())
        })?;
        if self.presented == 0 {
            return Err(CompositorError::SurfaceConfiguration(
                "no frame has been presented".to_string(),
            ));
        }

        image::save_buffer(
            path,
            &self.pixels,
            width,
            height,
            image::ExtendedColorType::Rgba8,
        )
        .map_err(CompositorError::Snapshot)?;

        log::info!("Saved {}x{} snapshot to {}", width, height, path.display());
        Ok(())
    }
}

impl PresentationSurface for CpuSurface {
    fn configure(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(CompositorError::SurfaceConfiguration(format!(
                "invalid surface size {}x{}",
                width, height
            )));
        }
        if self.size != Some((width, height)) {
            log::debug!("CPU surface configured to {}x{}", width, height);
        }
        self.size = Some((width, height));
        self.pixels.clear();
        self.presented = 0;
        Ok(())
    }

    fn present(&mut self, frame: &Frame) -> Result<()> {
        let (width, height) = self.size.ok_or_else(|| {
            CompositorError::SurfaceConfiguration("present before configure".to_string())
        })?;
        if (frame.width(), frame.height()) != (width, height) {
            return Err(CompositorError::SurfaceConfiguration(format!(
                "frame is {}x{} but surface is {}x{}",
                frame.width(),
                frame.height(),
                width,
                height
            )));
        }

        self.pixels = frame.to_rgba8();
        self.presented += 1;
        Ok(())
    }

    fn size(&self) -> Option<(u32, u32)> {
        self.size
    }
}
