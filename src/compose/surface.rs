//! Raster target: clear, frame draw with optional mirror, alpha blit.

use crate::capture::Frame;
use crate::compose::layout::Placement;
use image::RgbaImage;

/// An addressable RGBA8 drawing surface.
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Surface {
    /// Creates a cleared surface of the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; (width as usize) * (height as usize) * 4],
        }
    }

    /// Surface width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Surface height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 pixel data, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Resets every pixel to transparent black.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Reads the RGBA pixel at (x, y).
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Draws the video frame across the full surface extent, horizontally
    /// flipped when `mirror` is set. Dimensions are chosen upstream to
    /// match the frame's aspect ratio, so this is a plain scale with no
    /// letterboxing.
    pub fn draw_frame(&mut self, frame: &Frame, mirror: bool) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let (fw, fh) = (frame.width(), frame.height());
        for y in 0..self.height {
            let sy = (y as u64 * fh as u64 / self.height as u64) as u32;
            for x in 0..self.width {
                let mut sx = (x as u64 * fw as u64 / self.width as u64) as u32;
                if mirror {
                    sx = fw.saturating_sub(1) - sx.min(fw.saturating_sub(1));
                }
                let px = frame.pixel(sx, sy);
                let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
                self.pixels[idx..idx + 4].copy_from_slice(&px);
            }
        }
    }

    /// Blits `image` scaled into `placement`, blending src-over with the
    /// given opacity. The placement is clipped to the surface.
    pub fn blit(&mut self, image: &RgbaImage, placement: &Placement, opacity: f32) {
        let (iw, ih) = image.dimensions();
        if iw == 0 || ih == 0 || placement.width <= 0.0 || placement.height <= 0.0 {
            return;
        }
        let opacity = opacity.clamp(0.0, 1.0);

        let x0 = placement.x.round().max(0.0) as u32;
        let y0 = placement.y.round().max(0.0) as u32;
        let x1 = ((placement.x + placement.width).round() as i64).clamp(0, self.width as i64) as u32;
        let y1 = ((placement.y + placement.height).round() as i64).clamp(0, self.height as i64) as u32;
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        let dst_w = (x1 - x0) as u64;
        let dst_h = (y1 - y0) as u64;

        for y in y0..y1 {
            let sy = ((y - y0) as u64 * ih as u64 / dst_h) as u32;
            for x in x0..x1 {
                let sx = ((x - x0) as u64 * iw as u64 / dst_w) as u32;
                let src = image.get_pixel(sx.min(iw - 1), sy.min(ih - 1)).0;
                let alpha = (src[3] as f32 / 255.0) * opacity;
                if alpha <= 0.0 {
                    continue;
                }

                let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
                for c in 0..3 {
                    let dst = self.pixels[idx + c] as f32;
                    let out = src[c] as f32 * alpha + dst * (1.0 - alpha);
                    self.pixels[idx + c] = out.round().clamp(0.0, 255.0) as u8;
                }
                let dst_a = self.pixels[idx + 3] as f32 / 255.0;
                let out_a = alpha + dst_a * (1.0 - alpha);
                self.pixels[idx + 3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    /// Copies the surface into an owned image for encoding.
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::layout;

    fn gradient_frame(w: u32, h: u32) -> Frame {
        // Red ramps left to right; makes flips observable.
        let mut pixels = Vec::with_capacity((w * h * 4) as usize);
        for _y in 0..h {
            for x in 0..w {
                pixels.extend_from_slice(&[(x * 255 / w.max(1)) as u8, 0, 0, 255]);
            }
        }
        Frame::new(pixels, w, h, 1)
    }

    #[test]
    fn test_draw_frame_fills_extent() {
        let mut surface = Surface::new(8, 8);
        surface.draw_frame(&gradient_frame(8, 8), false);
        assert_eq!(surface.pixel(0, 0)[3], 255);
        assert_eq!(surface.pixel(7, 7)[3], 255);
    }

    #[test]
    fn test_mirror_flips_horizontally() {
        let mut plain = Surface::new(8, 8);
        let mut mirrored = Surface::new(8, 8);
        let frame = gradient_frame(8, 8);

        plain.draw_frame(&frame, false);
        mirrored.draw_frame(&frame, true);

        for x in 0..8 {
            assert_eq!(plain.pixel(x, 3)[0], mirrored.pixel(7 - x, 3)[0]);
        }
    }

    #[test]
    fn test_blit_respects_opacity() {
        let mut surface = Surface::new(4, 4);
        // Opaque black base.
        let black = RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 0, 255]));
        surface.blit(&black, &layout::full_extent(4, 4), 1.0);

        // White over black at 80%: channels land near 204.
        let white = RgbaImage::from_pixel(4, 4, image::Rgba([255, 255, 255, 255]));
        surface.blit(&white, &layout::full_extent(4, 4), 0.8);

        let px = surface.pixel(2, 2);
        assert!((px[0] as i32 - 204).abs() <= 1, "got {}", px[0]);
    }

    #[test]
    fn test_blit_clips_to_surface() {
        let mut surface = Surface::new(4, 4);
        let img = RgbaImage::from_pixel(8, 8, image::Rgba([255, 0, 0, 255]));
        let placement = Placement {
            x: 2.0,
            y: 2.0,
            width: 8.0,
            height: 8.0,
        };
        surface.blit(&img, &placement, 1.0);

        assert_eq!(surface.pixel(3, 3)[0], 255);
        assert_eq!(surface.pixel(0, 0)[0], 0);
    }

    #[test]
    fn test_transparent_source_pixels_skip_blend() {
        let mut surface = Surface::new(2, 2);
        let img = RgbaImage::from_pixel(2, 2, image::Rgba([255, 255, 255, 0]));
        surface.blit(&img, &layout::full_extent(2, 2), 1.0);
        assert_eq!(surface.pixel(0, 0), [0, 0, 0, 0]);
    }
}
