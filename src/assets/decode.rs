//! Overlay source decoding: raster via `image`, vector via usvg/resvg.

use super::AssetError;
use image::RgbaImage;

/// Decodes encoded raster bytes (PNG and friends) into RGBA8.
pub fn decode_raster(bytes: &[u8]) -> Result<RgbaImage, AssetError> {
    let img = image::load_from_memory(bytes).map_err(|e| AssetError::Decode(e.to_string()))?;
    Ok(img.to_rgba8())
}

/// Parses SVG bytes and rasterizes the tree at its intrinsic size.
pub fn render_vector(bytes: &[u8]) -> Result<RgbaImage, AssetError> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).map_err(|e| AssetError::Svg(e.to_string()))?;

    let size = tree.size();
    let width = size.width().ceil() as u32;
    let height = size.height().ceil() as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width.max(1), height.max(1))
        .ok_or_else(|| AssetError::Svg("zero-sized svg".to_string()))?;

    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::default(),
        &mut pixmap.as_mut(),
    );

    // tiny-skia pixels are premultiplied; the compositor blends
    // straight-alpha, so demultiply here.
    let mut rgba = Vec::with_capacity((pixmap.width() * pixmap.height() * 4) as usize);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }

    RgbaImage::from_raw(pixmap.width(), pixmap.height(), rgba)
        .ok_or_else(|| AssetError::Svg("pixmap size mismatch".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="8" height="4">
        <rect width="8" height="4" fill="#ff0000"/>
    </svg>"##;

    #[test]
    fn test_render_vector_at_intrinsic_size() {
        let img = render_vector(TINY_SVG.as_bytes()).unwrap();
        assert_eq!(img.dimensions(), (8, 4));
        let px = img.get_pixel(0, 0);
        assert_eq!(px[0], 255);
        assert_eq!(px[3], 255);
    }

    #[test]
    fn test_decode_raster_roundtrip() {
        let mut png = Vec::new();
        let src = RgbaImage::from_pixel(3, 5, image::Rgba([10, 20, 30, 255]));
        image::DynamicImage::ImageRgba8(src)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let img = decode_raster(&png).unwrap();
        assert_eq!(img.dimensions(), (3, 5));
        assert_eq!(img.get_pixel(1, 1)[2], 30);
    }

    #[test]
    fn test_invalid_bytes_fail_cleanly() {
        assert!(decode_raster(b"not an image").is_err());
        assert!(render_vector(b"<not-svg").is_err());
    }
}
