//! Real camera backend via nokhwa (feature `camera`).
//!
//! Desktop backends do not report a facing mode, so `settings()` leaves
//! it unset and downstream label heuristics decide mirroring. In-place
//! facing changes are unsupported here; the session manager falls back
//! to a full reopen.

use super::{CameraDevice, CameraError, CaptureConfig, DeviceSettings, Facing, Frame};
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution};

/// Camera device backed by nokhwa's native platform input.
pub struct NokhwaCamera {
    camera: Option<nokhwa::Camera>,
    enabled: bool,
    sequence: u64,
}

impl NokhwaCamera {
    pub fn new() -> Self {
        Self {
            camera: None,
            enabled: true,
            sequence: 0,
        }
    }

    /// Maps a platform error message onto the classified taxonomy.
    fn classify(err: nokhwa::NokhwaError) -> CameraError {
        let msg = err.to_string();
        let lower = msg.to_ascii_lowercase();
        if lower.contains("busy") || lower.contains("in use") {
            CameraError::DeviceBusy
        } else if lower.contains("permission") || lower.contains("denied") || lower.contains("access") {
            CameraError::PermissionDenied
        } else if lower.contains("not found") || lower.contains("no device") {
            CameraError::NoDevice
        } else if lower.contains("not implemented") || lower.contains("unsupported") {
            CameraError::Unsupported
        } else {
            CameraError::Other(msg)
        }
    }

    fn try_open(index: u32, format: RequestedFormat<'_>) -> Result<nokhwa::Camera, CameraError> {
        let mut camera =
            nokhwa::Camera::new(CameraIndex::Index(index), format).map_err(Self::classify)?;
        camera.open_stream().map_err(Self::classify)?;
        Ok(camera)
    }
}

impl Default for NokhwaCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraDevice for NokhwaCamera {
    fn open(&mut self, config: &CaptureConfig, facing: Facing) -> Result<(), CameraError> {
        config
            .validate()
            .map_err(|e| CameraError::Other(e.to_string()))?;

        let long = config.max_long_edge;
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
            CameraFormat::new(Resolution::new(long, long * 9 / 16), FrameFormat::MJPEG, config.fps),
        ));

        // Facing is an index heuristic on desktop: rear maps to a secondary
        // device when present. Some systems enumerate from 1, so try both.
        let preferred = match facing {
            Facing::Front => 0,
            Facing::Rear => 1,
        };
        let camera = Self::try_open(preferred, requested)
            .or_else(|_| Self::try_open(1 - preferred, requested))?;

        tracing::info!(%facing, name = %camera.info().human_name(), "camera opened");
        self.camera = Some(camera);
        self.enabled = true;
        self.sequence = 0;
        Ok(())
    }

    fn apply_facing(&mut self, _facing: Facing) -> Result<(), CameraError> {
        // Live stream reconfiguration is not available through nokhwa.
        Err(CameraError::Unsupported)
    }

    fn read_frame(&mut self) -> Result<Frame, CameraError> {
        let camera = self.camera.as_mut().ok_or(CameraError::NotInitialized)?;
        let res = camera.resolution();
        let (width, height) = (res.width(), res.height());
        self.sequence += 1;

        if !self.enabled {
            let mut black = vec![0u8; (width as usize) * (height as usize) * 4];
            for px in black.chunks_exact_mut(4) {
                px[3] = 255;
            }
            return Ok(Frame::new(black, width, height, self.sequence));
        }

        let buffer = camera.frame().map_err(Self::classify)?;
        let rgb = buffer.decode_image::<RgbFormat>().map_err(Self::classify)?;
        let (width, height) = rgb.dimensions();

        let mut pixels = Vec::with_capacity((width as usize) * (height as usize) * 4);
        for px in rgb.pixels() {
            pixels.extend_from_slice(&[px[0], px[1], px[2], 255]);
        }
        Ok(Frame::new(pixels, width, height, self.sequence))
    }

    fn settings(&self) -> Result<DeviceSettings, CameraError> {
        let camera = self.camera.as_ref().ok_or(CameraError::NotInitialized)?;
        let res = camera.resolution();
        Ok(DeviceSettings {
            width: res.width(),
            height: res.height(),
            facing: None,
            label: camera.info().human_name(),
        })
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_open(&self) -> bool {
        self.camera.is_some()
    }

    fn close(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            if let Err(e) = camera.stop_stream() {
                tracing::warn!(error = %e, "failed to stop camera stream");
            }
            tracing::info!("camera closed");
        }
    }
}
