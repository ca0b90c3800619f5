//! The booth controller: owns the session, cache, and result slot, and
//! drives the Live → Capturing → Result flow.
//!
//! All formerly-global state (active session, cached assets, result
//! handle) lives as fields of this one aggregate, constructed once and
//! passed by reference.

use super::{export_via, CaptureResult, ExportError, ExportOutcome, ExportSink, ResultSlot, RetakePolicy};
use crate::assets::OverlayCache;
use crate::capture::{CameraDevice, CameraError, Facing, SessionManager, StartOutcome};
use crate::compose::{self, DrawMode, Surface};
use crate::policy::{self, OrientationCategory, OrientationDebouncer};
use crate::signals::DeviceSignal;
use std::io::Cursor;
use std::time::{Duration, Instant};

/// Controller flow states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoothState {
    /// Preview compositing active; snap available once ready.
    Live,
    /// A snap is in progress; the snap control is disabled.
    Capturing,
    /// A capture is displayed, awaiting export or retake.
    Result,
}

/// User-facing notices. Persistent notices stick until the next
/// successful start; transient ones are read once and dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Device-access problem, recoverable by explicit retry.
    Persistent(String),
    /// Capture/export hiccup; the operation was abandoned.
    Transient(String),
}

/// Errors surfaced by booth operations. Everything is recoverable: the
/// booth always returns to an interactive state.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BoothError {
    #[error(transparent)]
    Camera(#[from] CameraError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("not ready: {0}")]
    NotReady(&'static str),
}

/// Owning aggregate for a capture session.
pub struct Booth<D: CameraDevice> {
    session: SessionManager<D>,
    overlays: OverlayCache,
    slot: ResultSlot,
    state: BoothState,
    mirror: bool,
    camera_count: usize,
    capture_dims: (u32, u32),
    preview_dims: (u32, u32),
    /// Last display size reported by a resize signal.
    display_size: Option<(u32, u32)>,
    /// Last known device orientation category. `None` until the first
    /// orientation signal arrives; the dimension-swap heuristic stays
    /// off while the device orientation is unknown.
    last_orientation: Option<OrientationCategory>,
    debouncer: OrientationDebouncer,
    retake_policy: RetakePolicy,
    notice: Option<Notice>,
    restarts: u64,
}

impl<D: CameraDevice> Booth<D> {
    /// Assembles a booth from its collaborators. `camera_count` feeds the
    /// mirror heuristic's device-count fallback.
    pub fn new(
        session: SessionManager<D>,
        overlays: OverlayCache,
        retake_policy: RetakePolicy,
        camera_count: usize,
    ) -> Self {
        let settle = Duration::from_millis(session.config().settle_delay_ms);
        Self {
            session,
            overlays,
            slot: ResultSlot::new(),
            state: BoothState::Live,
            mirror: true,
            camera_count,
            capture_dims: (0, 0),
            preview_dims: (0, 0),
            display_size: None,
            last_orientation: None,
            debouncer: OrientationDebouncer::new(settle, OrientationCategory::Portrait),
            retake_policy,
            notice: None,
            restarts: 0,
        }
    }

    /// Starts (or restarts) the camera session with the given facing.
    pub fn start(&mut self, facing: Facing, now: Instant) -> Result<StartOutcome, BoothError> {
        match self.session.start(facing, now) {
            Ok(StartOutcome::Applied) => {
                self.notice = None;
                self.refresh_policy();
                self.state = BoothState::Live;
                Ok(StartOutcome::Applied)
            }
            Ok(StartOutcome::Dropped) => Ok(StartOutcome::Dropped),
            Err(e) => {
                tracing::error!(error = %e, "camera start failed");
                self.notice = Some(Notice::Persistent(e.user_message().to_string()));
                Err(e.into())
            }
        }
    }

    /// Switches the camera facing mode and recomputes the mirror policy.
    pub fn switch_facing(&mut self, now: Instant) -> Result<StartOutcome, BoothError> {
        match self.session.switch_facing(now) {
            Ok(StartOutcome::Applied) => {
                self.refresh_policy();
                Ok(StartOutcome::Applied)
            }
            Ok(StartOutcome::Dropped) => Ok(StartOutcome::Dropped),
            Err(e) => {
                self.notice = Some(Notice::Persistent(e.user_message().to_string()));
                Err(e.into())
            }
        }
    }

    /// Snap is enabled only in `Live`, with a started session and a
    /// settled overlay cache.
    pub fn can_snap(&self) -> bool {
        self.state == BoothState::Live && self.session.is_started() && self.overlays.is_settled()
    }

    /// Renders one preview composite at the current preview dimensions.
    pub fn render_preview(&mut self) -> Result<Surface, BoothError> {
        if !self.session.is_started() {
            return Err(BoothError::NotReady("camera session not started"));
        }
        let frame = self.session.read_frame()?;
        let (w, h) = if self.preview_dims.0 > 0 {
            self.preview_dims
        } else {
            self.capture_dims
        };
        let mut surface = Surface::new(w, h);
        compose::render(&mut surface, &frame, self.mirror, &self.overlays, DrawMode::Preview);
        Ok(surface)
    }

    /// Captures a still: renders once at native (capped) resolution,
    /// encodes it, and publishes the result handle, releasing any prior
    /// one. Failures post a transient notice and return to `Live`.
    pub fn snap(&mut self) -> Result<(), BoothError> {
        if !self.can_snap() {
            return Err(BoothError::NotReady("snap unavailable"));
        }
        self.state = BoothState::Capturing;

        match self.do_snap() {
            Ok(result) => {
                self.slot.publish(result);
                self.state = BoothState::Result;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "capture failed");
                self.notice = Some(Notice::Transient("Capture failed. Try again.".to_string()));
                self.state = BoothState::Live;
                Err(e)
            }
        }
    }

    fn do_snap(&mut self) -> Result<CaptureResult, BoothError> {
        // Dimensions can be momentarily unavailable right after a switch.
        if self.capture_dims.0 == 0 || self.capture_dims.1 == 0 {
            self.refresh_policy();
        }
        let (w, h) = self.capture_dims;
        if w == 0 || h == 0 {
            return Err(BoothError::NotReady("stream dimensions unavailable"));
        }

        let frame = self.session.read_frame()?;
        let mut surface = Surface::new(w, h);
        compose::render(&mut surface, &frame, self.mirror, &self.overlays, DrawMode::Capture);

        let mut png = Vec::new();
        image::DynamicImage::ImageRgba8(surface.to_image())
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .map_err(|e| ExportError::Encode(e.to_string()))?;

        Ok(CaptureResult::new(png, w, h))
    }

    /// Exports the displayed capture through the share-then-save chain.
    /// The result handle stays valid until retake, whatever the outcome.
    pub fn export(
        &mut self,
        sink: &mut dyn ExportSink,
        title: &str,
    ) -> Result<ExportOutcome, BoothError> {
        if self.state != BoothState::Result {
            return Err(BoothError::NotReady("no capture to export"));
        }
        let result = self.slot.current().ok_or(ExportError::NoResult)?;
        match export_via(sink, result, title) {
            Ok(outcome) => {
                tracing::info!(?outcome, "capture exported");
                Ok(outcome)
            }
            Err(e) => {
                self.notice = Some(Notice::Transient("Export failed. Try again.".to_string()));
                Err(e.into())
            }
        }
    }

    /// Releases the result handle and returns to `Live`. The hardware
    /// stream stays warm or restarts per the configured retake policy.
    pub fn retake(&mut self, now: Instant) -> Result<(), BoothError> {
        self.slot.release();
        self.state = BoothState::Live;
        if self.retake_policy == RetakePolicy::Restart {
            let facing = self.session.facing();
            self.start(facing, now)?;
        }
        Ok(())
    }

    /// Feeds a device signal into the booth.
    pub fn handle_signal(&mut self, signal: DeviceSignal, now: Instant) {
        match signal {
            DeviceSignal::OrientationChanged { angle } => {
                self.last_orientation = Some(OrientationCategory::from_angle(angle));
                self.debouncer.observe(angle, now);
            }
            DeviceSignal::VisibilityChanged { visible } => {
                if visible {
                    self.session.resume();
                } else {
                    self.session.pause();
                }
            }
            DeviceSignal::Resized { width, height } => {
                self.display_size = Some((width, height));
                self.preview_dims = self.fit_preview(width, height);
            }
        }
    }

    /// Drives debounced reactions. An orientation flip that has settled
    /// restarts the session exactly once and re-derives the policy.
    pub fn tick(&mut self, now: Instant) {
        let Some(category) = self.debouncer.poll(now) else {
            return;
        };
        if self.state != BoothState::Live || !self.session.is_started() {
            return;
        }
        tracing::info!(?category, "orientation settled, restarting session");
        let facing = self.session.facing();
        match self.session.start(facing, now) {
            Ok(StartOutcome::Applied) => {
                self.restarts += 1;
                self.refresh_policy();
            }
            Ok(StartOutcome::Dropped) => {}
            Err(e) => {
                self.notice = Some(Notice::Persistent(e.user_message().to_string()));
            }
        }
    }

    /// Releases every owned resource: result handle and camera hardware.
    pub fn teardown(&mut self) {
        self.slot.release();
        self.session.stop();
        self.state = BoothState::Live;
    }

    /// Re-derives mirror flag and working dimensions from the active
    /// stream. Called on every session change.
    fn refresh_policy(&mut self) {
        let Ok(settings) = self.session.settings() else {
            return;
        };
        self.mirror = policy::resolve_mirror(settings.facing, &settings.label, self.camera_count);

        let capped = policy::capped_dimensions(
            settings.width,
            settings.height,
            self.session.config().max_long_edge,
        );
        // The swap heuristic targets backends that misreport relative to
        // the actual device orientation; without an observed orientation
        // there is nothing to contradict, so reported dimensions stand.
        self.capture_dims = match self.last_orientation {
            Some(_) => policy::reconcile_orientation(capped.0, capped.1, self.debouncer.current()),
            None => capped,
        };
        if let Some((dw, dh)) = self.display_size {
            self.preview_dims = self.fit_preview(dw, dh);
        }
        tracing::debug!(
            mirror = self.mirror,
            width = self.capture_dims.0,
            height = self.capture_dims.1,
            "policy refreshed"
        );
    }

    /// Largest rectangle with the capture aspect ratio fitting the display.
    fn fit_preview(&self, display_w: u32, display_h: u32) -> (u32, u32) {
        let (cw, ch) = self.capture_dims;
        if cw == 0 || ch == 0 || display_w == 0 || display_h == 0 {
            return (display_w, display_h);
        }
        let scale_w = display_w as f64 / cw as f64;
        let scale_h = display_h as f64 / ch as f64;
        let scale = scale_w.min(scale_h);
        (
            ((cw as f64 * scale).round() as u32).max(1),
            ((ch as f64 * scale).round() as u32).max(1),
        )
    }

    /// Current flow state.
    pub fn state(&self) -> BoothState {
        self.state
    }

    /// Current mirror decision.
    pub fn mirror(&self) -> bool {
        self.mirror
    }

    /// Working capture dimensions (native, capped, reconciled).
    pub fn capture_dims(&self) -> (u32, u32) {
        self.capture_dims
    }

    /// Current preview dimensions.
    pub fn preview_dims(&self) -> (u32, u32) {
        self.preview_dims
    }

    /// The displayed capture, if any.
    pub fn result(&self) -> Option<&CaptureResult> {
        self.slot.current()
    }

    /// Handles released over the booth's lifetime.
    pub fn released_results(&self) -> u64 {
        self.slot.released_count()
    }

    /// Orientation-triggered restarts performed.
    pub fn restart_count(&self) -> u64 {
        self.restarts
    }

    /// Pending notice, if any.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Takes a transient notice for display; persistent notices stay.
    pub fn take_transient_notice(&mut self) -> Option<Notice> {
        if matches!(self.notice, Some(Notice::Transient(_))) {
            self.notice.take()
        } else {
            None
        }
    }

    /// The underlying session manager.
    pub fn session(&self) -> &SessionManager<D> {
        &self.session
    }

    /// Mutable access to the session manager.
    pub fn session_mut(&mut self) -> &mut SessionManager<D> {
        &mut self.session
    }

    /// The overlay cache.
    pub fn overlays(&self) -> &OverlayCache {
        &self.overlays
    }
}

impl<D: CameraDevice> Drop for Booth<D> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetVariant, OverlayName};
    use crate::capture::{CaptureConfig, MockCamera};
    use crate::export::ShareOutcome;
    use image::RgbaImage;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn settled_overlays() -> OverlayCache {
        let mut images = HashMap::new();
        images.insert(
            OverlayName::Logo,
            RgbaImage::from_pixel(42, 14, image::Rgba([255, 255, 255, 255])),
        );
        images.insert(
            OverlayName::Gradient,
            RgbaImage::from_pixel(10, 10, image::Rgba([0, 0, 0, 128])),
        );
        OverlayCache::preloaded(AssetVariant::Raster, images)
    }

    fn booth_with(camera: MockCamera, retake: RetakePolicy) -> Booth<MockCamera> {
        let session = SessionManager::new(camera, CaptureConfig::default());
        Booth::new(session, settled_overlays(), retake, 2)
    }

    fn booth() -> Booth<MockCamera> {
        booth_with(MockCamera::new().with_dims((108, 192), (192, 108)), RetakePolicy::KeepWarm)
    }

    #[test]
    fn test_snap_requires_started_session() {
        let mut b = booth();
        assert!(!b.can_snap());
        assert!(matches!(b.snap(), Err(BoothError::NotReady(_))));
    }

    #[test]
    fn test_snap_captures_at_native_resolution_mirrored() {
        let mut b = booth();
        b.start(Facing::Front, Instant::now()).unwrap();
        assert!(b.mirror());

        b.snap().unwrap();
        assert_eq!(b.state(), BoothState::Result);
        let result = b.result().unwrap();
        assert_eq!((result.width(), result.height()), (108, 192));
        assert!(!result.bytes().is_empty());
    }

    #[test]
    fn test_one_live_handle_across_consecutive_snaps() {
        let mut b = booth();
        let t0 = Instant::now();
        b.start(Facing::Front, t0).unwrap();

        for i in 0..4u64 {
            b.snap().unwrap();
            assert_eq!(b.released_results(), i);
            b.retake(t0).unwrap();
        }
        // Every snap's handle was released by the following retake.
        assert_eq!(b.released_results(), 4);
        assert!(b.result().is_none());
    }

    #[test]
    fn test_switch_facing_flips_mirror_once() {
        let mut b = booth();
        let t0 = Instant::now();
        b.start(Facing::Front, t0).unwrap();
        assert!(b.mirror());

        b.switch_facing(t0 + Duration::from_secs(1)).unwrap();
        assert!(!b.mirror());
        assert_eq!(b.capture_dims(), (192, 108));

        // Dropped request must not flip anything.
        let out = b.switch_facing(t0 + Duration::from_millis(1010)).unwrap();
        assert_eq!(out, StartOutcome::Dropped);
        assert!(!b.mirror());
    }

    #[test]
    fn test_orientation_flip_restarts_exactly_once() {
        let mut b = booth();
        let t0 = Instant::now();
        b.start(Facing::Front, t0).unwrap();
        assert_eq!(b.capture_dims(), (108, 192));

        // Rotation burst well after the start transition window.
        let t1 = t0 + Duration::from_secs(2);
        b.handle_signal(DeviceSignal::OrientationChanged { angle: 90 }, t1);
        b.handle_signal(
            DeviceSignal::OrientationChanged { angle: 270 },
            t1 + Duration::from_millis(80),
        );

        b.tick(t1 + Duration::from_millis(100)); // not settled yet
        assert_eq!(b.restart_count(), 0);

        b.tick(t1 + Duration::from_millis(600));
        assert_eq!(b.restart_count(), 1);
        // Reported portrait dims contradict landscape orientation: swapped.
        assert_eq!(b.capture_dims(), (192, 108));

        b.tick(t1 + Duration::from_millis(700)); // no second restart
        assert_eq!(b.restart_count(), 1);
    }

    #[test]
    fn test_switch_to_landscape_rear_captures_native() {
        let mut b = booth();
        let t0 = Instant::now();
        b.start(Facing::Front, t0).unwrap();
        assert_eq!(b.capture_dims(), (108, 192));

        // No orientation signal has been seen: a rear camera that truly
        // delivers landscape must keep its reported dimensions.
        b.switch_facing(t0 + Duration::from_secs(1)).unwrap();
        assert_eq!(b.capture_dims(), (192, 108));

        b.snap().unwrap();
        let result = b.result().unwrap();
        assert_eq!((result.width(), result.height()), (192, 108));
    }

    #[test]
    fn test_preview_refits_after_orientation_settle() {
        let mut b = booth();
        let t0 = Instant::now();
        b.start(Facing::Front, t0).unwrap(); // capture 108x192

        b.handle_signal(DeviceSignal::Resized { width: 400, height: 400 }, t0);
        assert_eq!(b.preview_dims(), (225, 400));

        let t1 = t0 + Duration::from_secs(2);
        b.handle_signal(DeviceSignal::OrientationChanged { angle: 90 }, t1);
        b.tick(t1 + Duration::from_millis(600));
        assert_eq!(b.capture_dims(), (192, 108));

        // Preview refit to the new aspect without waiting for a resize.
        let (pw, ph) = b.preview_dims();
        assert_eq!((pw, ph), (400, 225));
        let (cw, ch) = b.capture_dims();
        let preview_ratio = pw as f64 / ph as f64;
        let capture_ratio = cw as f64 / ch as f64;
        assert!((preview_ratio - capture_ratio).abs() < 0.02);
    }

    #[test]
    fn test_visibility_toggles_pause_without_teardown() {
        let mut b = booth();
        let t0 = Instant::now();
        b.start(Facing::Front, t0).unwrap();

        b.handle_signal(DeviceSignal::VisibilityChanged { visible: false }, t0);
        assert!(b.session().is_paused());
        assert!(b.session().is_started());

        b.handle_signal(DeviceSignal::VisibilityChanged { visible: true }, t0);
        assert!(!b.session().is_paused());
    }

    #[test]
    fn test_resize_fits_preview_to_capture_aspect() {
        let mut b = booth();
        let t0 = Instant::now();
        b.start(Facing::Front, t0).unwrap(); // capture 108x192 (9:16)

        b.handle_signal(DeviceSignal::Resized { width: 400, height: 400 }, t0);
        let (pw, ph) = b.preview_dims();
        assert_eq!((pw, ph), (225, 400));
    }

    struct NoShareSink {
        saved: u32,
    }

    impl ExportSink for NoShareSink {
        fn share(&mut self, _: &CaptureResult, _: &str) -> Result<ShareOutcome, ExportError> {
            Ok(ShareOutcome::Unsupported)
        }

        fn supports_save(&self) -> bool {
            true
        }

        fn save(&mut self, _: &CaptureResult) -> Result<PathBuf, ExportError> {
            self.saved += 1;
            Ok(PathBuf::from("saved.png"))
        }
    }

    #[test]
    fn test_export_falls_back_and_handle_survives_until_retake() {
        let mut b = booth();
        let t0 = Instant::now();
        b.start(Facing::Front, t0).unwrap();
        b.snap().unwrap();

        let mut sink = NoShareSink { saved: 0 };
        let outcome = b.export(&mut sink, "Event Capture").unwrap();
        assert_eq!(outcome, ExportOutcome::Saved(PathBuf::from("saved.png")));
        assert!(b.result().is_some());

        b.retake(t0).unwrap();
        assert!(b.result().is_none());
        assert_eq!(b.state(), BoothState::Live);
    }

    #[test]
    fn test_retake_restart_policy_reacquires_stream() {
        let camera = MockCamera::new().with_dims((108, 192), (192, 108));
        let mut b = booth_with(camera, RetakePolicy::Restart);
        let t0 = Instant::now();
        b.start(Facing::Front, t0).unwrap();
        assert_eq!(b.session().device().open_count(), 1);

        b.snap().unwrap();
        b.retake(t0 + Duration::from_secs(1)).unwrap();
        assert_eq!(b.session().device().open_count(), 2);
    }

    #[test]
    fn test_failed_start_posts_persistent_notice() {
        let mut camera = MockCamera::new();
        camera.fail_next_open(CameraError::PermissionDenied);
        let mut b = booth_with(camera, RetakePolicy::KeepWarm);

        assert!(b.start(Facing::Front, Instant::now()).is_err());
        assert!(matches!(b.notice(), Some(Notice::Persistent(_))));

        // Retry succeeds and clears the notice.
        b.start(Facing::Front, Instant::now()).unwrap();
        assert!(b.notice().is_none());
    }

    #[test]
    fn test_teardown_releases_everything() {
        let mut b = booth();
        b.start(Facing::Front, Instant::now()).unwrap();
        b.snap().unwrap();

        b.teardown();
        assert!(b.result().is_none());
        assert!(!b.session().is_started());
    }
}
