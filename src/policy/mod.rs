//! Orientation and mirroring policy.
//!
//! Pure decision logic consumed by the compositor and controller: whether
//! to mirror the frame, what raster dimensions to work at, and when a
//! rotation has settled enough to react to.

mod mirror;
mod orientation;

pub use mirror::{infer_facing, resolve_mirror};
pub use orientation::{
    capped_dimensions, reconcile_orientation, OrientationCategory, OrientationDebouncer,
};
