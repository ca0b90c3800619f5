//! Branding overlay assets.
//!
//! A fixed set of four named overlays is loaded once per process, from
//! either a vector (SVG) or raster (PNG) source set chosen upfront.
//! Failures are non-fatal: a missing overlay is simply skipped at render
//! time.

mod cache;
mod decode;

pub use cache::{LoadReport, OverlayCache};
pub use decode::{decode_raster, render_vector};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The fixed set of overlay names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayName {
    /// Brand logo, centered near the top.
    Logo,
    /// Event text, anchored bottom-left.
    EventText,
    /// Decorative box, anchored bottom-right.
    DecorBox,
    /// Gradient wash over the full frame.
    Gradient,
}

impl OverlayName {
    /// All overlay names, in paint order after the frame.
    pub const ALL: [OverlayName; 4] = [
        OverlayName::Gradient,
        OverlayName::Logo,
        OverlayName::EventText,
        OverlayName::DecorBox,
    ];

    /// File stem of the overlay's source file.
    pub fn file_stem(self) -> &'static str {
        match self {
            OverlayName::Logo => "logo",
            OverlayName::EventText => "event-text",
            OverlayName::DecorBox => "decor-box",
            OverlayName::Gradient => "gradient",
        }
    }
}

impl std::fmt::Display for OverlayName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_stem())
    }
}

/// Which source set the cache loads. A static upfront toggle; no
/// per-asset cross-variant fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetVariant {
    /// SVG primary sources, rasterized at intrinsic size.
    Vector,
    /// Pre-rendered PNG sources.
    Raster,
}

impl AssetVariant {
    /// File extension for this variant's sources.
    pub fn extension(self) -> &'static str {
        match self {
            AssetVariant::Vector => "svg",
            AssetVariant::Raster => "png",
        }
    }
}

/// Asset loading errors. Diagnostic only; never surfaced to end users.
#[derive(Debug, Clone, Error)]
pub enum AssetError {
    #[error("failed to read asset: {0}")]
    Io(String),
    #[error("failed to decode raster asset: {0}")]
    Decode(String),
    #[error("failed to render vector asset: {0}")]
    Svg(String),
}
