//! Capture, result handling, and export.
//!
//! The booth controller drives the user-facing flow (snap → composite →
//! present → download/share → retake); the result slot enforces the
//! single-live-handle invariant; sinks implement the share-then-save
//! fallback chain.

mod controller;
mod result;
mod sink;

pub use controller::{Booth, BoothError, BoothState, Notice};
pub use result::{CaptureResult, ResultSlot};
pub use sink::{export_via, ExportOutcome, ExportSink, FileSink, ShareOutcome};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What retake does with the hardware stream.
///
/// Keeping the session warm makes retakes fast; restarting trades that
/// latency for a fully fresh acquisition. Both are valid; this is an
/// explicit configuration choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetakePolicy {
    /// Keep the stream open across retakes.
    KeepWarm,
    /// Tear down and reacquire on every retake.
    Restart,
}

/// Transient export-path errors. Reported as short-lived notices; the
/// operation is abandoned, never queued for retry.
#[derive(Debug, Clone, Error)]
pub enum ExportError {
    #[error("failed to encode capture: {0}")]
    Encode(String),
    #[error("failed to save capture: {0}")]
    Save(String),
    #[error("share failed: {0}")]
    Share(String),
    #[error("no capture available")]
    NoResult,
}
