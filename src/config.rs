//! Demo configuration
//!
//! One JSON file describes a demo: window, assets and the effect. Every
//! field is optional; missing fields take their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::effects::Effect;
use crate::error::{CompositorError, ConfigError, Result};

/// Settings for one demo instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Window title; the effect name is appended
    pub title: String,
    pub window_width: u32,
    pub window_height: u32,
    /// Redraw rate when vsync does not pace the loop
    pub target_fps: u32,
    pub vsync: bool,
    /// Photo drawn under the effect
    pub image_path: PathBuf,
    /// Grayscale depth map; only the red channel is read
    pub depth_path: PathBuf,
    pub effect: Effect,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: "Depth Effects".to_string(),
            window_width: 1280,
            window_height: 720,
            target_fps: 60,
            vsync: true,
            image_path: PathBuf::from("demos/image.png"),
            depth_path: PathBuf::from("demos/depth.png"),
            effect: Effect::default(),
        }
    }
}

impl DemoConfig {
    /// Load a config file. Relative asset paths resolve against the file's
    /// directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let wrap = |source: ConfigError| CompositorError::Config {
            path: path.to_path_buf(),
            source,
        };

        let contents = fs::read_to_string(path).map_err(|e| wrap(e.into()))?;
        let mut config = Self::from_json(&contents).map_err(|e| wrap(e.into()))?;

        if let Some(dir) = path.parent() {
            config.image_path = dir.join(&config.image_path);
            config.depth_path = dir.join(&config.depth_path);
        }

        log::info!("Loaded config {}: {}", path.display(), config.effect.display_name());
        Ok(config)
    }

    /// Parse a config from JSON text, clamping values to sane ranges.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut config: Self = serde_json::from_str(json)?;
        config.sanitize();
        Ok(config)
    }

    pub fn sanitize(&mut self) {
        self.target_fps = self.target_fps.clamp(1, 240);
        self.window_width = self.window_width.max(1);
        self.window_height = self.window_height.max(1);
    }

    /// Title shown on the window
    pub fn window_title(&self) -> String {
        format!("{} - {}", self.title, self.effect.display_name())
    }
}
