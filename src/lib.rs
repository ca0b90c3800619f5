//! Snapbooth Library
//!
//! Camera capture with branded overlay compositing: a live camera stream
//! is composited with a fixed set of overlay images for preview, and on
//! snap the overlays are baked into a still image for download/share.
//!
//! # Architecture
//!
//! The system follows an explicit data flow:
//!
//! ```text
//! capture → policy → compose → export
//!              ↑        ↑
//!          signals   assets
//! ```
//!
//! # Design Principles
//!
//! - **Always interactive**: every failure path returns to a live or
//!   retryable state; nothing here is fatal
//! - **Degrade, don't abort**: missing overlay assets are skipped, never
//!   block rendering
//! - **Serialized transitions**: camera start/switch requests never
//!   interleave; duplicates are dropped (last applied state wins)
//! - **Scoped resources**: one live capture handle at a time, camera
//!   hardware released on every exit path
//!
//! # Example
//!
//! ```no_run
//! use std::time::Instant;
//! use snapbooth::{
//!     assets::{AssetVariant, OverlayCache},
//!     capture::{CaptureConfig, Facing, MockCamera, SessionManager},
//!     export::{Booth, FileSink, RetakePolicy},
//! };
//!
//! // Load overlays once; individual failures degrade silently.
//! let mut overlays = OverlayCache::new(AssetVariant::Vector);
//! overlays.load_all("assets".as_ref());
//!
//! // Assemble the booth aggregate.
//! let session = SessionManager::new(MockCamera::new(), CaptureConfig::default());
//! let mut booth = Booth::new(session, overlays, RetakePolicy::KeepWarm, 1);
//!
//! booth.start(Facing::Front, Instant::now()).unwrap();
//! booth.snap().unwrap();
//!
//! let mut sink = FileSink::new("captures", "snapbooth");
//! booth.export(&mut sink, "Snapbooth Capture").unwrap();
//! booth.retake(Instant::now()).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod assets;
pub mod capture;
pub mod compose;
pub mod export;
pub mod policy;
pub mod signals;

// Re-export commonly used types at crate root
pub use assets::{AssetVariant, OverlayCache, OverlayName};
pub use capture::{CameraDevice, CameraError, CaptureConfig, Facing, Frame, MockCamera, SessionManager};
pub use compose::{DrawMode, Surface};
pub use export::{Booth, BoothState, CaptureResult, FileSink, RetakePolicy};
pub use signals::DeviceSignal;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
