//! Overlay placement geometry.
//!
//! All geometry constants are logical units against a 1080-wide reference
//! design and scale linearly with the actual target width. Heights always
//! come from the asset's own aspect ratio, so overlays never distort.

/// Reference design width in logical units.
pub const REFERENCE_WIDTH: f32 = 1080.0;

/// Fixed alpha applied to the gradient wash.
pub const GRADIENT_ALPHA: f32 = 0.8;

/// Logical logo width.
pub const LOGO_WIDTH: f32 = 420.0;
/// Logical logo offset from the top edge.
pub const LOGO_TOP: f32 = 48.0;

/// Logical event-text width.
pub const EVENT_TEXT_WIDTH: f32 = 340.0;
/// Logical decorative-box width.
pub const DECOR_BOX_WIDTH: f32 = 280.0;
/// Logical margin used by the bottom-anchored overlays.
pub const CORNER_MARGIN: f32 = 40.0;

/// A placement rectangle on the target surface, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Linear scale factor from reference units to target pixels.
#[inline]
pub fn scale_factor(target_width: u32) -> f32 {
    target_width as f32 / REFERENCE_WIDTH
}

/// The full target extent (used by the gradient wash and the frame).
pub fn full_extent(target_width: u32, target_height: u32) -> Placement {
    Placement {
        x: 0.0,
        y: 0.0,
        width: target_width as f32,
        height: target_height as f32,
    }
}

fn scaled_size(logical_width: f32, target_width: u32, asset_w: u32, asset_h: u32) -> (f32, f32) {
    let width = logical_width * scale_factor(target_width);
    let height = width * (asset_h as f32 / asset_w as f32);
    (width, height)
}

/// Logo: fixed logical width, horizontally centered, fixed offset from top.
pub fn logo_placement(target_width: u32, _target_height: u32, asset_w: u32, asset_h: u32) -> Placement {
    let (width, height) = scaled_size(LOGO_WIDTH, target_width, asset_w, asset_h);
    Placement {
        x: (target_width as f32 - width) / 2.0,
        y: LOGO_TOP * scale_factor(target_width),
        width,
        height,
    }
}

/// Event text: fixed logical width, anchored bottom-left.
pub fn event_text_placement(target_width: u32, target_height: u32, asset_w: u32, asset_h: u32) -> Placement {
    let (width, height) = scaled_size(EVENT_TEXT_WIDTH, target_width, asset_w, asset_h);
    let margin = CORNER_MARGIN * scale_factor(target_width);
    Placement {
        x: margin,
        y: target_height as f32 - margin - height,
        width,
        height,
    }
}

/// Decorative box: fixed logical width, anchored bottom-right.
pub fn decor_box_placement(target_width: u32, target_height: u32, asset_w: u32, asset_h: u32) -> Placement {
    let (width, height) = scaled_size(DECOR_BOX_WIDTH, target_width, asset_w, asset_h);
    let margin = CORNER_MARGIN * scale_factor(target_width);
    Placement {
        x: target_width as f32 - margin - width,
        y: target_height as f32 - margin - height,
        width,
        height,
    }
}
