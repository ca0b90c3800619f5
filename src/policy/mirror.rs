//! Mirroring decision for the live preview and capture.
//!
//! Front-facing streams are mirrored so the preview reads like a mirror;
//! confirmed rear-facing streams are not. Detection is an explicit ordered
//! fallback chain: reported facing, then label keywords, then device count,
//! then the documented default of mirrored. The single-camera default can
//! mis-mirror a rare rear-only single-camera device; there is no reliable
//! signal to distinguish that case.

use crate::capture::Facing;

/// Label fragments that indicate a rear-facing camera.
const REAR_HINTS: &[&str] = &["back", "rear", "environment"];
/// Label fragments that indicate a front-facing camera.
const FRONT_HINTS: &[&str] = &["front", "user", "face", "selfie"];

/// Infers the facing mode from available evidence, if any is conclusive.
pub fn infer_facing(reported: Option<Facing>, label: &str) -> Option<Facing> {
    if reported.is_some() {
        return reported;
    }
    let label = label.to_ascii_lowercase();
    if REAR_HINTS.iter().any(|hint| label.contains(hint)) {
        return Some(Facing::Rear);
    }
    if FRONT_HINTS.iter().any(|hint| label.contains(hint)) {
        return Some(Facing::Front);
    }
    None
}

/// Decides whether the stream should be mirrored.
///
/// Fallback chain: reported facing, label keywords, device count
/// (a single camera is assumed front-facing), default mirrored.
pub fn resolve_mirror(reported: Option<Facing>, label: &str, camera_count: usize) -> bool {
    match infer_facing(reported, label) {
        Some(Facing::Front) => true,
        Some(Facing::Rear) => false,
        None => {
            if camera_count <= 1 {
                tracing::debug!(label, "single camera, defaulting to mirrored");
            } else {
                tracing::debug!(label, camera_count, "facing ambiguous, defaulting to mirrored");
            }
            true
        }
    }
}
