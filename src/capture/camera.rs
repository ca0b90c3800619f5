//! Camera abstraction for stream acquisition.
//!
//! This module provides a trait-based abstraction over camera hardware,
//! allowing for both real camera input and mock implementations for testing.

use super::{CaptureConfig, Frame};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which physical camera supplies the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    /// User-facing camera (selfie view).
    Front,
    /// Environment-facing camera.
    Rear,
}

impl Facing {
    /// Returns the opposite facing mode.
    pub fn opposite(self) -> Self {
        match self {
            Facing::Front => Facing::Rear,
            Facing::Rear => Facing::Front,
        }
    }
}

impl std::fmt::Display for Facing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Facing::Front => write!(f, "front"),
            Facing::Rear => write!(f, "rear"),
        }
    }
}

/// Per-device stream settings reported after acquisition.
///
/// `facing` is `None` when the backend does not report it; callers must
/// fall back to label heuristics (see [`crate::policy::resolve_mirror`]).
#[derive(Debug, Clone)]
pub struct DeviceSettings {
    /// Native stream width in pixels.
    pub width: u32,
    /// Native stream height in pixels.
    pub height: u32,
    /// Facing mode as reported by the backend, if any.
    pub facing: Option<Facing>,
    /// Human-readable device label.
    pub label: String,
}

/// Classified errors surfaced by camera operations.
///
/// Every variant is non-fatal: the caller stays interactive and may retry.
#[derive(Debug, Clone, Error)]
pub enum CameraError {
    #[error("no camera device available")]
    NoDevice,
    #[error("camera device is held by another consumer")]
    DeviceBusy,
    #[error("camera permission denied")]
    PermissionDenied,
    #[error("camera capture not supported on this platform")]
    Unsupported,
    #[error("camera not initialized")]
    NotInitialized,
    #[error("camera error: {0}")]
    Other(String),
}

impl CameraError {
    /// Short actionable text for end users.
    ///
    /// Raw platform diagnostics never reach the user; they go to the
    /// tracing log instead.
    pub fn user_message(&self) -> &'static str {
        match self {
            CameraError::NoDevice => "No camera found. Connect a camera and retry.",
            CameraError::DeviceBusy => "Camera is in use by another app. Close it and retry.",
            CameraError::PermissionDenied => "Camera access was denied. Allow access and retry.",
            CameraError::Unsupported => "Camera capture is not supported here.",
            CameraError::NotInitialized | CameraError::Other(_) => {
                "Could not start the camera. Please retry."
            }
        }
    }
}

/// Trait for camera device implementations.
///
/// This abstraction allows swapping between real camera hardware
/// and mock implementations for testing.
pub trait CameraDevice {
    /// Opens the device constrained by `config` and the desired facing mode.
    fn open(&mut self, config: &CaptureConfig, facing: Facing) -> Result<(), CameraError>;

    /// Applies a new facing mode to the open device in place, without
    /// releasing hardware (fast path). Backends that cannot reconfigure a
    /// live stream return an error and the caller falls back to a full
    /// reopen.
    fn apply_facing(&mut self, facing: Facing) -> Result<(), CameraError>;

    /// Reads the next frame.
    fn read_frame(&mut self) -> Result<Frame, CameraError>;

    /// Returns the active stream settings (native dimensions, label,
    /// facing if reported).
    fn settings(&self) -> Result<DeviceSettings, CameraError>;

    /// Toggles frame delivery without releasing hardware. Used on
    /// visibility changes to conserve power while keeping resume cheap.
    fn set_enabled(&mut self, enabled: bool);

    /// Checks if the device is currently open.
    fn is_open(&self) -> bool;

    /// Closes the device and releases hardware. Idempotent.
    fn close(&mut self);
}

/// Mock camera for testing that generates synthetic frames.
#[derive(Debug)]
pub struct MockCamera {
    config: Option<CaptureConfig>,
    facing: Facing,
    enabled: bool,
    sequence: u64,
    open_count: u64,
    /// Native dimensions reported per facing (width, height).
    front_dims: (u32, u32),
    rear_dims: (u32, u32),
    /// Whether `settings()` reports the facing mode, or leaves it to
    /// label heuristics.
    report_facing: bool,
    /// Error injected into the next `open` call.
    fail_next_open: Option<CameraError>,
    /// When set, in-place facing changes fail and force the slow path.
    fail_apply_facing: bool,
}

impl Default for MockCamera {
    fn default() -> Self {
        Self {
            config: None,
            facing: Facing::Front,
            enabled: true,
            sequence: 0,
            open_count: 0,
            front_dims: (1080, 1920),
            rear_dims: (1920, 1080),
            report_facing: true,
            fail_next_open: None,
            fail_apply_facing: false,
        }
    }
}

impl MockCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the native dimensions reported for each facing mode.
    pub fn with_dims(mut self, front: (u32, u32), rear: (u32, u32)) -> Self {
        self.front_dims = front;
        self.rear_dims = rear;
        self
    }

    /// Hides the facing mode from `settings()`, forcing label heuristics.
    pub fn without_reported_facing(mut self) -> Self {
        self.report_facing = false;
        self
    }

    /// Injects an error into the next `open` call.
    pub fn fail_next_open(&mut self, err: CameraError) {
        self.fail_next_open = Some(err);
    }

    /// Forces `apply_facing` to fail, exercising the slow switch path.
    pub fn fail_apply_facing(&mut self, fail: bool) {
        self.fail_apply_facing = fail;
    }

    /// Number of successful `open` calls (full acquisitions).
    pub fn open_count(&self) -> u64 {
        self.open_count
    }

    fn dims(&self) -> (u32, u32) {
        match self.facing {
            Facing::Front => self.front_dims,
            Facing::Rear => self.rear_dims,
        }
    }
}

impl CameraDevice for MockCamera {
    fn open(&mut self, config: &CaptureConfig, facing: Facing) -> Result<(), CameraError> {
        if let Some(err) = self.fail_next_open.take() {
            return Err(err);
        }
        config
            .validate()
            .map_err(|e| CameraError::Other(e.to_string()))?;
        self.config = Some(config.clone());
        self.facing = facing;
        self.enabled = true;
        self.sequence = 0;
        self.open_count += 1;
        tracing::info!(%facing, "MockCamera opened");
        Ok(())
    }

    fn apply_facing(&mut self, facing: Facing) -> Result<(), CameraError> {
        if self.config.is_none() {
            return Err(CameraError::NotInitialized);
        }
        if self.fail_apply_facing {
            return Err(CameraError::Other("in-place constraint update rejected".into()));
        }
        self.facing = facing;
        tracing::debug!(%facing, "MockCamera facing updated in place");
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Frame, CameraError> {
        if self.config.is_none() {
            return Err(CameraError::NotInitialized);
        }
        let (width, height) = self.dims();
        let byte_len = (width as usize) * (height as usize) * 4;

        // A disabled track delivers black frames, like a paused stream.
        let pixels: Vec<u8> = if self.enabled {
            (0..byte_len)
                .map(|i| {
                    if i % 4 == 3 {
                        255
                    } else {
                        ((i as u64 ^ self.sequence) % 256) as u8
                    }
                })
                .collect()
        } else {
            let mut black = vec![0u8; byte_len];
            for px in black.chunks_exact_mut(4) {
                px[3] = 255;
            }
            black
        };

        self.sequence += 1;
        Ok(Frame::new(pixels, width, height, self.sequence))
    }

    fn settings(&self) -> Result<DeviceSettings, CameraError> {
        if self.config.is_none() {
            return Err(CameraError::NotInitialized);
        }
        let (width, height) = self.dims();
        let label = match self.facing {
            Facing::Front => "Mock Front Camera",
            Facing::Rear => "Mock Back Camera",
        };
        Ok(DeviceSettings {
            width,
            height,
            facing: self.report_facing.then_some(self.facing),
            label: label.to_string(),
        })
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_open(&self) -> bool {
        self.config.is_some()
    }

    fn close(&mut self) {
        if self.config.take().is_some() {
            tracing::info!("MockCamera closed");
        }
    }
}
