//! Capture result handle discipline.
//!
//! At most one result may be live at a time. The slot releases the prior
//! handle before assigning a new one, and on teardown, so N consecutive
//! snaps never accumulate handles.

use chrono::{DateTime, Local};

/// An encoded still capture, held until retake or replacement.
pub struct CaptureResult {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
    created: DateTime<Local>,
    revoked: bool,
}

impl CaptureResult {
    /// Wraps encoded PNG bytes with their pixel dimensions.
    pub fn new(bytes: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            bytes,
            width,
            height,
            created: Local::now(),
            revoked: false,
        }
    }

    /// Encoded image bytes. Empty once revoked.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Capture width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Capture height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Creation timestamp, used for export file naming.
    pub fn created(&self) -> DateTime<Local> {
        self.created
    }

    /// Whether the handle has been revoked.
    pub fn is_revoked(&self) -> bool {
        self.revoked
    }

    /// Releases the backing bytes. Further export attempts see an empty
    /// payload and fail cleanly.
    pub fn revoke(&mut self) {
        if !self.revoked {
            self.bytes = Vec::new();
            self.revoked = true;
            tracing::debug!(width = self.width, height = self.height, "capture result revoked");
        }
    }
}

impl std::fmt::Debug for CaptureResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureResult")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.bytes.len())
            .field("revoked", &self.revoked)
            .finish()
    }
}

/// Holder enforcing the single-live-handle invariant.
#[derive(Debug, Default)]
pub struct ResultSlot {
    current: Option<CaptureResult>,
    released: u64,
}

impl ResultSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Releases any prior handle, then assigns the new one.
    pub fn publish(&mut self, result: CaptureResult) {
        self.release();
        self.current = Some(result);
    }

    /// The live result, if any.
    pub fn current(&self) -> Option<&CaptureResult> {
        self.current.as_ref()
    }

    /// Revokes and drops the live result. Idempotent.
    pub fn release(&mut self) {
        if let Some(mut prior) = self.current.take() {
            prior.revoke();
            self.released += 1;
        }
    }

    /// Number of handles released over the slot's lifetime.
    pub fn released_count(&self) -> u64 {
        self.released
    }
}

impl Drop for ResultSlot {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_releases_prior_handle() {
        let mut slot = ResultSlot::new();
        for i in 0..5u32 {
            slot.publish(CaptureResult::new(vec![i as u8; 8], 2, 2));
            assert!(slot.current().is_some());
        }
        // Five publishes, four prior handles released.
        assert_eq!(slot.released_count(), 4);
        assert_eq!(slot.current().unwrap().bytes()[0], 4);
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut slot = ResultSlot::new();
        slot.publish(CaptureResult::new(vec![1, 2, 3], 1, 1));
        slot.release();
        slot.release();
        assert_eq!(slot.released_count(), 1);
        assert!(slot.current().is_none());
    }

    #[test]
    fn test_revoked_result_has_empty_payload() {
        let mut result = CaptureResult::new(vec![9; 100], 10, 10);
        result.revoke();
        assert!(result.is_revoked());
        assert!(result.bytes().is_empty());
        assert_eq!(result.width(), 10);
    }
}
