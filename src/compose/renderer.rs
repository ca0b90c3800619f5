//! Layered composite: frame plus overlays in painter's order.

use super::{layout, Surface};
use crate::assets::{OverlayCache, OverlayName};
use crate::capture::Frame;

/// Whether a render feeds the live preview or a one-shot capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    /// Display-sized, repeated continuously.
    Preview,
    /// Native (capped) stream resolution, once per snap.
    Capture,
}

/// Renders the composite onto `surface`. Painter's order: frame (mirrored
/// when requested), gradient wash, logo, event text, decorative box.
///
/// Overlays are only painted once the cache has settled; before that the
/// frame renders alone. An overlay absent from the cache is skipped, so
/// compositing never fails on missing assets.
pub fn render(
    surface: &mut Surface,
    frame: &Frame,
    mirror: bool,
    overlays: &OverlayCache,
    mode: DrawMode,
) {
    surface.clear();
    surface.draw_frame(frame, mirror);

    if !overlays.is_settled() {
        tracing::trace!(?mode, "overlay cache not settled, frame-only render");
        return;
    }

    let (w, h) = (surface.width(), surface.height());

    if let Some(img) = overlays.get(OverlayName::Gradient) {
        surface.blit(img, &layout::full_extent(w, h), layout::GRADIENT_ALPHA);
    }
    if let Some(img) = overlays.get(OverlayName::Logo) {
        let placement = layout::logo_placement(w, h, img.width(), img.height());
        surface.blit(img, &placement, 1.0);
    }
    if let Some(img) = overlays.get(OverlayName::EventText) {
        let placement = layout::event_text_placement(w, h, img.width(), img.height());
        surface.blit(img, &placement, 1.0);
    }
    if let Some(img) = overlays.get(OverlayName::DecorBox) {
        let placement = layout::decor_box_placement(w, h, img.width(), img.height());
        surface.blit(img, &placement, 1.0);
    }

    tracing::trace!(?mode, width = w, height = h, mirror, "composite rendered");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetVariant;
    use image::RgbaImage;
    use std::collections::HashMap;

    fn solid_frame(w: u32, h: u32, rgba: [u8; 4]) -> Frame {
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take((w * h * 4) as usize)
            .collect();
        Frame::new(pixels, w, h, 1)
    }

    fn cache_with(names: &[(OverlayName, [u8; 4])]) -> OverlayCache {
        let mut images = HashMap::new();
        for (name, rgba) in names {
            images.insert(*name, RgbaImage::from_pixel(54, 54, image::Rgba(*rgba)));
        }
        OverlayCache::preloaded(AssetVariant::Raster, images)
    }

    #[test]
    fn test_overlay_name_order_matches_paint_order() {
        assert_eq!(
            OverlayName::ALL,
            [
                OverlayName::Gradient,
                OverlayName::Logo,
                OverlayName::EventText,
                OverlayName::DecorBox,
            ]
        );
    }

    #[test]
    fn test_missing_overlays_are_skipped() {
        // Only three of four overlays available.
        let overlays = cache_with(&[
            (OverlayName::EventText, [0, 255, 0, 255]),
            (OverlayName::DecorBox, [0, 0, 255, 255]),
            (OverlayName::Gradient, [255, 255, 255, 64]),
        ]);

        let mut surface = Surface::new(108, 192);
        let frame = solid_frame(108, 192, [40, 40, 40, 255]);
        render(&mut surface, &frame, false, &overlays, DrawMode::Capture);

        // Frame still covers the surface; nothing panicked.
        assert_eq!(surface.pixel(54, 10)[3], 255);
    }

    #[test]
    fn test_unsettled_cache_renders_frame_only() {
        let overlays = OverlayCache::new(AssetVariant::Raster);
        assert!(!overlays.is_settled());

        let mut surface = Surface::new(16, 16);
        let frame = solid_frame(16, 16, [10, 20, 30, 255]);
        render(&mut surface, &frame, false, &overlays, DrawMode::Preview);

        assert_eq!(surface.pixel(8, 8), [10, 20, 30, 255]);
    }

    #[test]
    fn test_overlays_occlude_frame_in_order() {
        let overlays = cache_with(&[(OverlayName::DecorBox, [0, 0, 255, 255])]);

        let mut surface = Surface::new(1080, 1920);
        let frame = solid_frame(108, 192, [200, 0, 0, 255]);
        render(&mut surface, &frame, false, &overlays, DrawMode::Capture);

        // Bottom-right corner region holds the decor box, not the frame.
        let p = layout::decor_box_placement(1080, 1920, 54, 54);
        let cx = (p.x + p.width / 2.0) as u32;
        let cy = (p.y + p.height / 2.0) as u32;
        assert_eq!(surface.pixel(cx, cy)[2], 255);
        // Far from any overlay the frame shows through.
        assert_eq!(surface.pixel(540, 960)[0], 200);
    }
}
