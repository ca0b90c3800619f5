//! Camera acquisition and session lifecycle.
//!
//! This module provides a trait-based camera abstraction, the frame type
//! it produces, capture configuration, and the session manager that
//! serializes start/switch/teardown transitions.

mod camera;
mod config;
mod frame;
mod session;

#[cfg(feature = "camera")]
mod nokhwa;

pub use camera::{CameraDevice, CameraError, DeviceSettings, Facing, MockCamera};
pub use config::{CaptureConfig, ConfigError, ExportConfig, FileConfig, OverlayConfig};
pub use frame::Frame;
pub use session::{SessionManager, StartOutcome};

#[cfg(feature = "camera")]
pub use nokhwa::NokhwaCamera;
