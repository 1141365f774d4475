//! Image and depth map loading
//!
//! Both buffers are decoded once at startup and never mutated. Sampling uses
//! bilinear filtering with clamp-to-edge addressing so the CPU path matches
//! a `Linear` wgpu sampler over `Rgba8Unorm` / `R8Unorm` textures.

use std::path::Path;

use glam::{Vec2, Vec4};

use crate::error::{CompositorError, Result};

/// RGBA8 photo sampled by normalized UV.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    /// Tightly packed RGBA8 rows, top row first
    data: Vec<u8>,
}

/// Single-channel depth map sampled by normalized UV.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthImage {
    width: u32,
    height: u32,
    /// One byte per texel, brighter is nearer
    data: Vec<u8>,
}

/// Decode an image file into an RGBA8 buffer.
pub fn load_image(path: impl AsRef<Path>) -> Result<Image> {
    let path = path.as_ref();
    let decoded = image::open(path)
        .map_err(|source| CompositorError::AssetLoad {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();

    log::info!(
        "Loaded image {}: {}x{}",
        path.display(),
        decoded.width(),
        decoded.height()
    );

    Ok(Image {
        width: decoded.width(),
        height: decoded.height(),
        data: decoded.into_raw(),
    })
}

/// Decode a depth map file, keeping the red channel.
pub fn load_depth(path: impl AsRef<Path>) -> Result<DepthImage> {
    let path = path.as_ref();
    let decoded = image::open(path)
        .map_err(|source| CompositorError::AssetLoad {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();

    log::info!(
        "Loaded depth map {}: {}x{}",
        path.display(),
        decoded.width(),
        decoded.height()
    );

    let data = decoded.pixels().map(|p| p.0[0]).collect();
    Ok(DepthImage {
        width: decoded.width(),
        height: decoded.height(),
        data,
    })
}

/// Texel indices and weights for one bilinear lookup.
struct Bilinear {
    x0: usize,
    x1: usize,
    y0: usize,
    y1: usize,
    fx: f32,
    fy: f32,
}

impl Bilinear {
    fn new(uv: Vec2, width: u32, height: u32) -> Self {
        let x = uv.x * width as f32 - 0.5;
        let y = uv.y * height as f32 - 0.5;
        let xf = x.floor();
        let yf = y.floor();
        let max_x = width as i64 - 1;
        let max_y = height as i64 - 1;
        let clamp_x = |v: i64| v.clamp(0, max_x) as usize;
        let clamp_y = |v: i64| v.clamp(0, max_y) as usize;

        Self {
            x0: clamp_x(xf as i64),
            x1: clamp_x(xf as i64 + 1),
            y0: clamp_y(yf as i64),
            y1: clamp_y(yf as i64 + 1),
            fx: x - xf,
            fy: y - yf,
        }
    }

    fn blend<T>(&self, fetch: impl Fn(usize, usize) -> T) -> T
    where
        T: std::ops::Mul<f32, Output = T> + std::ops::Add<Output = T>,
    {
        let top = fetch(self.x0, self.y0) * (1.0 - self.fx) + fetch(self.x1, self.y0) * self.fx;
        let bottom = fetch(self.x0, self.y1) * (1.0 - self.fx) + fetch(self.x1, self.y1) * self.fx;
        top * (1.0 - self.fy) + bottom * self.fy
    }
}

impl Image {
    /// Wrap an RGBA8 buffer. Returns `None` if the length does not match.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 || data.len() != (width * height * 4) as usize {
            return None;
        }
        Some(Self { width, height, data })
    }

    /// Image filled with one color
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let data = rgba.repeat((width * height) as usize);
        Self { width, height, data }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes for texture upload
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Normalized color of one texel.
    pub fn texel(&self, x: usize, y: usize) -> Vec4 {
        let i = (y * self.width as usize + x) * 4;
        let p = &self.data[i..i + 4];
        Vec4::new(p[0] as f32, p[1] as f32, p[2] as f32, p[3] as f32) / 255.0
    }

    /// Bilinear sample at a normalized UV (clamped to edge).
    pub fn sample(&self, uv: Vec2) -> Vec4 {
        Bilinear::new(uv, self.width, self.height).blend(|x, y| self.texel(x, y))
    }
}

impl DepthImage {
    /// Wrap a single-channel buffer. Returns `None` if the length does not match.
    pub fn from_luma8(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 || data.len() != (width * height) as usize {
            return None;
        }
        Some(Self { width, height, data })
    }

    /// Depth map built from a per-texel function returning values in [0, 1].
    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> f32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mut data = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                data.push((f(x, y).clamp(0.0, 1.0) * 255.0).round() as u8);
            }
        }
        Self { width, height, data }
    }

    /// Depth map with the same value everywhere
    pub fn uniform(width: u32, height: u32, value: f32) -> Self {
        Self::from_fn(width, height, |_, _| value)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn texel(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width as usize + x] as f32 / 255.0
    }

    /// Bilinear sample at a normalized UV (clamped to edge).
    pub fn sample(&self, uv: Vec2) -> f32 {
        Bilinear::new(uv, self.width, self.height).blend(|x, y| self.texel(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Image {
        // black, white / white, black
        let data = vec![
            0, 0, 0, 255, 255, 255, 255, 255, //
            255, 255, 255, 255, 0, 0, 0, 255,
        ];
        Image::from_rgba8(2, 2, data).unwrap()
    }

    #[test]
    fn test_sample_texel_centers() {
        let img = checker();
        assert_eq!(img.sample(Vec2::new(0.25, 0.25)), Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(img.sample(Vec2::new(0.75, 0.25)), Vec4::ONE);
    }

    #[test]
    fn test_sample_interpolates_between_texels() {
        let img = checker();
        let mid = img.sample(Vec2::new(0.5, 0.5));
        assert!((mid.x - 0.5).abs() < 1e-6);
        assert_eq!(mid.w, 1.0);
    }

    #[test]
    fn test_sample_clamps_to_edge() {
        let img = checker();
        assert_eq!(img.sample(Vec2::new(-3.0, -3.0)), img.texel(0, 0));
        assert_eq!(img.sample(Vec2::new(4.0, 4.0)), img.texel(1, 1));
    }

    #[test]
    fn test_from_rgba8_rejects_bad_length() {
        assert!(Image::from_rgba8(2, 2, vec![0; 15]).is_none());
        assert!(Image::from_rgba8(0, 2, vec![]).is_none());
    }

    #[test]
    fn test_depth_uniform() {
        let depth = DepthImage::uniform(3, 3, 1.0);
        assert_eq!(depth.sample(Vec2::new(0.1, 0.9)), 1.0);
        assert_eq!(depth.as_bytes().len(), 9);
    }

    #[test]
    fn test_load_missing_file_is_asset_error() {
        let err = load_image("does/not/exist.png").unwrap_err();
        assert!(matches!(err, CompositorError::AssetLoad { .. }));
        let err = load_depth("does/not/exist.png").unwrap_err();
        assert!(matches!(err, CompositorError::AssetLoad { .. }));
    }
}
