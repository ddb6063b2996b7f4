//! Runtime configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! triple-buffered 1280x720 setup.
//!
//! ```
//! use castle_core::RenderConfig;
//!
//! let config = RenderConfig::from_toml_str("frame_resources = 2\nframes = 10").unwrap();
//! assert_eq!(config.frame_resources, 2);
//! assert_eq!(config.width, 1280);
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::DEFAULT_FRAME_RESOURCES;
use crate::error::{Error, Result};

/// Renderer and headless-run settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Depth of the frame resource ring (2 = double, 3 = triple buffering).
    pub frame_resources: usize,
    /// Render target width in pixels.
    pub width: u32,
    /// Render target height in pixels.
    pub height: u32,
    /// Number of frames the headless application runs before exiting.
    pub frames: u64,
    /// Simulated GPU time spent on each submitted frame, in milliseconds.
    pub gpu_latency_ms: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            frame_resources: DEFAULT_FRAME_RESOURCES,
            width: 1280,
            height: 720,
            frames: 240,
            gpu_latency_ms: 4,
        }
    }
}

impl RenderConfig {
    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        debug!("Loaded config from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Check the invariants the frame loop relies on.
    pub fn validate(&self) -> Result<()> {
        if self.frame_resources < 2 {
            return Err(Error::Config(format!(
                "frame_resources must be at least 2, got {}",
                self.frame_resources
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(Error::Config(format!(
                "viewport must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}
