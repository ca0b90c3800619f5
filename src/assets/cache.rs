//! Load-once overlay cache.
//!
//! All named overlays are loaded upfront from the configured variant set.
//! Loading always settles: each name ends up loaded or definitively absent,
//! and individual failures degrade rendering rather than aborting it. A
//! completely empty cache is valid.

use super::{decode, AssetError, AssetVariant, OverlayName};
use image::RgbaImage;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Per-load diagnostics: which names resolved and which failed.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Names that decoded successfully.
    pub loaded: Vec<OverlayName>,
    /// Names that failed, with the cause (diagnostic only).
    pub failed: Vec<(OverlayName, AssetError)>,
}

/// In-memory mapping of overlay name to decoded image.
///
/// The variant set (vector or raster) is a static upfront choice; there is
/// no per-asset cross-variant fallback. Images are cached for the process
/// lifetime and never invalidated.
pub struct OverlayCache {
    variant: AssetVariant,
    images: HashMap<OverlayName, RgbaImage>,
    settled: bool,
}

impl OverlayCache {
    /// Creates an empty, unsettled cache for the given variant set.
    pub fn new(variant: AssetVariant) -> Self {
        Self {
            variant,
            images: HashMap::new(),
            settled: false,
        }
    }

    /// Loads every named overlay from `root`. Never a hard failure; the
    /// cache is settled afterwards regardless of individual outcomes.
    /// Subsequent calls are no-ops (assets load exactly once).
    pub fn load_all(&mut self, root: &Path) -> LoadReport {
        let mut report = LoadReport::default();
        if self.settled {
            tracing::debug!("overlay cache already settled, skipping reload");
            return report;
        }

        for name in OverlayName::ALL {
            let path = self.source_path(root, name);
            match load_one(self.variant, &path) {
                Ok(image) => {
                    tracing::debug!(%name, path = %path.display(), "overlay loaded");
                    self.images.insert(name, image);
                    report.loaded.push(name);
                }
                Err(e) => {
                    tracing::warn!(%name, path = %path.display(), error = %e, "overlay unavailable");
                    report.failed.push((name, e));
                }
            }
        }

        self.settled = true;
        tracing::info!(
            loaded = report.loaded.len(),
            failed = report.failed.len(),
            "overlay cache settled"
        );
        report
    }

    /// Returns the decoded image for `name`, if it loaded.
    pub fn get(&self, name: OverlayName) -> Option<&RgbaImage> {
        self.images.get(&name)
    }

    /// True once every name has resolved (loaded or failed).
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// The variant set this cache was configured for.
    pub fn variant(&self) -> AssetVariant {
        self.variant
    }

    /// Number of overlays currently loaded.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// True when no overlay loaded; rendering degrades to frame-only.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    fn source_path(&self, root: &Path, name: OverlayName) -> PathBuf {
        root.join(format!("{}.{}", name.file_stem(), self.variant.extension()))
    }

    /// Builds an already-settled cache from decoded images. Test seam.
    pub(crate) fn preloaded(variant: AssetVariant, images: HashMap<OverlayName, RgbaImage>) -> Self {
        Self {
            variant,
            images,
            settled: true,
        }
    }
}

fn load_one(variant: AssetVariant, path: &Path) -> Result<RgbaImage, AssetError> {
    let bytes = std::fs::read(path).map_err(|e| AssetError::Io(e.to_string()))?;
    match variant {
        AssetVariant::Vector => decode::render_vector(&bytes),
        AssetVariant::Raster => decode::decode_raster(&bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_svg(dir: &Path, stem: &str, w: u32, h: u32) {
        let svg = format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}">
                <rect width="{w}" height="{h}" fill="#3366cc"/>
            </svg>"##
        );
        std::fs::write(dir.join(format!("{stem}.svg")), svg).unwrap();
    }

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("snapbooth-cache-{tag}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_settles_despite_missing_asset() {
        let dir = temp_dir("partial");
        // Three of four present; logo is unreachable.
        write_svg(&dir, "event-text", 340, 120);
        write_svg(&dir, "decor-box", 280, 280);
        write_svg(&dir, "gradient", 108, 192);

        let mut cache = OverlayCache::new(AssetVariant::Vector);
        let report = cache.load_all(&dir);

        assert!(cache.is_settled());
        assert_eq!(report.loaded.len(), 3);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, OverlayName::Logo);
        assert!(cache.get(OverlayName::Logo).is_none());
        assert!(cache.get(OverlayName::Gradient).is_some());
    }

    #[test]
    fn test_empty_cache_is_valid_and_settled() {
        let dir = temp_dir("empty");
        let mut cache = OverlayCache::new(AssetVariant::Raster);
        let report = cache.load_all(&dir);

        assert!(cache.is_settled());
        assert!(cache.is_empty());
        assert_eq!(report.failed.len(), OverlayName::ALL.len());
    }

    #[test]
    fn test_loads_exactly_once() {
        let dir = temp_dir("once");
        write_svg(&dir, "logo", 420, 140);

        let mut cache = OverlayCache::new(AssetVariant::Vector);
        let first = cache.load_all(&dir);
        assert_eq!(first.loaded.len(), 1);

        // A second call must not refetch anything.
        let second = cache.load_all(&dir);
        assert!(second.loaded.is_empty());
        assert!(second.failed.is_empty());
        assert_eq!(cache.len(), 1);
    }
}
