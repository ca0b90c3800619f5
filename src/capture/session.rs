//! Camera session lifecycle: acquisition, facing switch, teardown.
//!
//! Start and switch requests are serialized: a request arriving while a
//! transition window is open is dropped rather than interleaved. Requests
//! are idempotent with respect to final state, so a dropped request loses
//! nothing (last applied state wins).

use super::{CameraDevice, CameraError, CaptureConfig, DeviceSettings, Facing, Frame};
use std::time::{Duration, Instant};

/// Attempts made waiting for stream metadata (native dimensions) after open.
const METADATA_ATTEMPTS: u32 = 3;

/// Result of a start or switch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// The transition was performed.
    Applied,
    /// The request arrived inside an open transition window and was dropped.
    Dropped,
}

/// Owns the active camera device and serializes lifecycle transitions.
pub struct SessionManager<D: CameraDevice> {
    device: D,
    config: CaptureConfig,
    facing: Facing,
    native: Option<(u32, u32)>,
    paused: bool,
    /// Transition window: requests before this instant are dropped.
    busy_until: Option<Instant>,
    transitions: u64,
}

impl<D: CameraDevice> SessionManager<D> {
    /// Creates a manager around an unopened device.
    pub fn new(device: D, config: CaptureConfig) -> Self {
        let facing = config.facing;
        Self {
            device,
            config,
            facing,
            native: None,
            paused: false,
            busy_until: None,
            transitions: 0,
        }
    }

    /// Tears down any existing session and acquires a new stream with the
    /// requested facing mode, waiting for native dimensions to become
    /// available.
    pub fn start(&mut self, facing: Facing, now: Instant) -> Result<StartOutcome, CameraError> {
        if self.is_busy(now) {
            tracing::debug!(%facing, "start request dropped: transition in flight");
            return Ok(StartOutcome::Dropped);
        }
        self.begin_transition(now);
        self.do_start(facing)
            .inspect_err(|_| self.busy_until = None)?;
        Ok(StartOutcome::Applied)
    }

    /// Switches to the opposite facing mode.
    ///
    /// Fast path: an in-place constraint update on the live device. On
    /// failure, falls back to a full teardown-and-reopen with the new
    /// facing mode.
    pub fn switch_facing(&mut self, now: Instant) -> Result<StartOutcome, CameraError> {
        if self.is_busy(now) {
            tracing::debug!("switch request dropped: transition in flight");
            return Ok(StartOutcome::Dropped);
        }
        let target = self.facing.opposite();
        if !self.device.is_open() {
            return self.start(target, now);
        }

        self.begin_transition(now);
        match self.device.apply_facing(target) {
            Ok(()) => {
                self.facing = target;
                let dims = self
                    .await_dimensions()
                    .inspect_err(|_| self.busy_until = None)?;
                self.native = Some(dims);
                self.transitions += 1;
                tracing::info!(facing = %target, "facing switched in place");
                Ok(StartOutcome::Applied)
            }
            Err(e) => {
                tracing::warn!(error = %e, "in-place switch failed, reopening");
                self.do_start(target)
                    .inspect_err(|_| self.busy_until = None)?;
                Ok(StartOutcome::Applied)
            }
        }
    }

    /// Releases the device and clears session state. Idempotent.
    pub fn stop(&mut self) {
        self.device.close();
        self.native = None;
        self.paused = false;
    }

    /// Disables frame delivery without releasing hardware.
    pub fn pause(&mut self) {
        if self.device.is_open() && !self.paused {
            self.device.set_enabled(false);
            self.paused = true;
            tracing::debug!("session paused");
        }
    }

    /// Re-enables frame delivery after a pause.
    pub fn resume(&mut self) {
        if self.device.is_open() && self.paused {
            self.device.set_enabled(true);
            self.paused = false;
            tracing::debug!("session resumed");
        }
    }

    /// Reads the next frame from the active stream.
    pub fn read_frame(&mut self) -> Result<Frame, CameraError> {
        self.device.read_frame()
    }

    /// Returns the active stream settings.
    pub fn settings(&self) -> Result<DeviceSettings, CameraError> {
        self.device.settings()
    }

    /// Current facing mode.
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Native (uncapped) stream dimensions, once metadata has arrived.
    pub fn native_dimensions(&self) -> Option<(u32, u32)> {
        self.native
    }

    /// Whether a stream is currently acquired.
    pub fn is_started(&self) -> bool {
        self.device.is_open()
    }

    /// Whether frame delivery is paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Number of applied transitions (starts and switches).
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Capture configuration in force.
    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Access to the underlying device.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Mutable access to the underlying device.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    fn is_busy(&self, now: Instant) -> bool {
        self.busy_until.is_some_and(|until| now < until)
    }

    fn begin_transition(&mut self, now: Instant) {
        self.busy_until = Some(now + Duration::from_millis(self.config.settle_delay_ms));
    }

    fn do_start(&mut self, facing: Facing) -> Result<(), CameraError> {
        self.stop();
        self.device.open(&self.config, facing)?;
        self.facing = facing;
        self.native = Some(self.await_dimensions()?);
        self.paused = false;
        self.transitions += 1;
        let (w, h) = self.native.unwrap_or_default();
        tracing::info!(%facing, width = w, height = h, "camera session started");
        Ok(())
    }

    /// Polls device settings until native dimensions are reported.
    fn await_dimensions(&mut self) -> Result<(u32, u32), CameraError> {
        for _ in 0..METADATA_ATTEMPTS {
            let s = self.device.settings()?;
            if s.width > 0 && s.height > 0 {
                return Ok((s.width, s.height));
            }
        }
        Err(CameraError::Other("stream metadata unavailable".into()))
    }
}

impl<D: CameraDevice> Drop for SessionManager<D> {
    fn drop(&mut self) {
        self.stop();
    }
}
