//! Capture and application configuration.
//!
//! The resolution constraint caps the stream's long edge so captures
//! never exceed raster surface limits; aspect ratio is always preserved
//! downstream.

use super::Facing;
use crate::assets::AssetVariant;
use crate::export::RetakePolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for camera acquisition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Facing mode requested at startup.
    pub facing: Facing,
    /// Upper bound on the longer stream edge, in pixels.
    pub max_long_edge: u32,
    /// Target frames per second for the preview loop.
    pub fps: u32,
    /// Debounce applied to orientation flips and duplicate start
    /// requests, in milliseconds.
    pub settle_delay_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            facing: Facing::Front,
            max_long_edge: 1920,
            fps: 30,
            settle_delay_ms: 300,
        }
    }
}

impl CaptureConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_long_edge == 0 || self.max_long_edge > 4096 {
            return Err(ConfigError::InvalidMaxEdge);
        }
        if self.fps == 0 || self.fps > 120 {
            return Err(ConfigError::InvalidFrameRate);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid max long edge (must be 1-4096 pixels)")]
    InvalidMaxEdge,
    #[error("invalid frame rate (must be 1-120 fps)")]
    InvalidFrameRate,
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Overlay asset configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Which source set to load: vector (SVG) or raster (PNG).
    pub variant: AssetVariant,
    /// Directory holding the overlay source files.
    pub assets_dir: PathBuf,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            variant: AssetVariant::Vector,
            assets_dir: PathBuf::from("assets"),
        }
    }
}

/// Export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory where captures are saved.
    pub output_dir: PathBuf,
    /// Filename prefix for saved captures.
    pub file_prefix: String,
    /// Whether retake keeps the hardware stream warm or restarts it.
    pub retake: RetakePolicy,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("captures"),
            file_prefix: "snapbooth".to_string(),
            retake: RetakePolicy::KeepWarm,
        }
    }
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub overlay: OverlayConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        let config: FileConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.capture.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = CaptureConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_max_edge_invalid() {
        let mut config = CaptureConfig::default();
        config.max_long_edge = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidMaxEdge)));
    }

    #[test]
    fn test_file_config_roundtrip() {
        let toml = r#"
            [capture]
            facing = "rear"
            max_long_edge = 1280
            fps = 24
            settle_delay_ms = 250

            [overlay]
            variant = "raster"
            assets_dir = "branding"

            [export]
            output_dir = "out"
            file_prefix = "event"
            retake = "restart"
        "#;
        let config: FileConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.capture.facing, Facing::Rear);
        assert_eq!(config.capture.max_long_edge, 1280);
        assert_eq!(config.overlay.variant, AssetVariant::Raster);
        assert_eq!(config.export.retake, RetakePolicy::Restart);
    }
}
