//! Error types for startup and presentation.
//!
//! Every variant is fatal: nothing is retried, errors propagate to `main`
//! which logs them and exits.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors that abort startup of a demo.
#[derive(Error, Debug)]
pub enum CompositorError {
    #[error("GPU acceleration unavailable: {0}")]
    UnsupportedPlatform(String),
    #[error("failed to load asset {}: {source}", path.display())]
    AssetLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("surface configuration failed: {0}")]
    SurfaceConfiguration(String),
    #[error("{label} is {width}x{height}, larger than the GPU texture limit of {max}")]
    TextureTooLarge {
        label: &'static str,
        width: u32,
        height: u32,
        max: u32,
    },
    #[error("config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
    #[error("failed to write snapshot: {0}")]
    Snapshot(#[source] image::ImageError),
}

pub type Result<T> = std::result::Result<T, CompositorError>;
