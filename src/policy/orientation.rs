//! Orientation handling and working raster dimensions.
//!
//! Two concerns live here: deriving bounded target dimensions from native
//! stream metadata, and debouncing device rotation so a burst of angle
//! events collapses into a single portrait⇄landscape reaction.

use std::time::{Duration, Instant};

/// Coarse orientation category. Only category changes matter; angle
/// deltas within a category are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrientationCategory {
    Portrait,
    Landscape,
}

impl OrientationCategory {
    /// Classifies a device orientation angle in degrees.
    pub fn from_angle(angle: i32) -> Self {
        match angle.rem_euclid(360) {
            90 | 270 => OrientationCategory::Landscape,
            _ => OrientationCategory::Portrait,
        }
    }

    /// Classifies a width/height pair.
    pub fn of_dimensions(width: u32, height: u32) -> Self {
        if width > height {
            OrientationCategory::Landscape
        } else {
            OrientationCategory::Portrait
        }
    }
}

/// Caps the longer edge at `max_long_edge` while preserving the source
/// aspect ratio. No stretching, no cropping; dimensions at or under the
/// cap pass through unchanged.
pub fn capped_dimensions(width: u32, height: u32, max_long_edge: u32) -> (u32, u32) {
    let long = width.max(height);
    if long <= max_long_edge || long == 0 {
        return (width, height);
    }
    let scale = max_long_edge as f64 / long as f64;
    let w = ((width as f64 * scale).round() as u32).max(1);
    let h = ((height as f64 * scale).round() as u32).max(1);
    (w, h)
}

/// Reconciles reported stream dimensions with the device orientation.
///
/// Some capture backends report width/height swapped relative to the true
/// device orientation. When the reported category contradicts the current
/// device category, the pair is swapped before use. Best-effort heuristic;
/// devices that genuinely deliver cross-orientation streams will be
/// swapped incorrectly.
pub fn reconcile_orientation(width: u32, height: u32, device: OrientationCategory) -> (u32, u32) {
    if width == 0 || height == 0 || width == height {
        return (width, height);
    }
    if OrientationCategory::of_dimensions(width, height) != device {
        tracing::debug!(width, height, ?device, "swapping reported dimensions");
        (height, width)
    } else {
        (width, height)
    }
}

/// Debounces rotation events into single settled category changes.
///
/// `observe` records angle events; `poll` reports a category change once
/// the settle delay has elapsed since the last event. Rotating back to
/// the original category within the delay cancels the pending change.
#[derive(Debug)]
pub struct OrientationDebouncer {
    settle: Duration,
    current: OrientationCategory,
    pending: Option<(OrientationCategory, Instant)>,
}

impl OrientationDebouncer {
    /// Creates a debouncer with the given settle delay and initial category.
    pub fn new(settle: Duration, initial: OrientationCategory) -> Self {
        Self {
            settle,
            current: initial,
            pending: None,
        }
    }

    /// Records an orientation angle event.
    pub fn observe(&mut self, angle: i32, now: Instant) {
        let category = OrientationCategory::from_angle(angle);
        if category == self.current {
            // Rotated back before settling: nothing to react to.
            self.pending = None;
            return;
        }
        // Each event inside a burst pushes the settle deadline out.
        self.pending = Some((category, now));
    }

    /// Returns a settled category change, at most once per change.
    pub fn poll(&mut self, now: Instant) -> Option<OrientationCategory> {
        let (category, since) = self.pending?;
        if now.duration_since(since) < self.settle {
            return None;
        }
        self.pending = None;
        self.current = category;
        tracing::debug!(?category, "orientation settled");
        Some(category)
    }

    /// The current settled category.
    pub fn current(&self) -> OrientationCategory {
        self.current
    }
}
