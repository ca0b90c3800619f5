//! Export destinations: share sheet, direct save, or a manual-save hint.
//!
//! The ordered fallback is fixed: try a native share-with-file first; on
//! unsupported or cancelled share fall back to a direct save; when the
//! platform offers neither, tell the user to save the image manually.

use super::{CaptureResult, ExportError};
use std::path::{Path, PathBuf};

/// Result of a share attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The share sheet completed.
    Shared,
    /// No share-with-file support on this platform.
    Unsupported,
    /// The user dismissed the share sheet.
    Cancelled,
}

/// How the export finally resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Delivered through the share sheet.
    Shared,
    /// Written to the given path.
    Saved(PathBuf),
    /// Neither share nor save is reliable here; the user must save the
    /// displayed image manually.
    ManualSaveHint,
}

/// A destination for captured images.
pub trait ExportSink {
    /// Attempts a native share with a titled file.
    fn share(&mut self, result: &CaptureResult, title: &str) -> Result<ShareOutcome, ExportError>;

    /// Whether a direct file save is available.
    fn supports_save(&self) -> bool;

    /// Saves the capture, returning the written path.
    fn save(&mut self, result: &CaptureResult) -> Result<PathBuf, ExportError>;
}

/// Runs the share-then-save fallback chain against `sink`.
pub fn export_via(
    sink: &mut dyn ExportSink,
    result: &CaptureResult,
    title: &str,
) -> Result<ExportOutcome, ExportError> {
    if result.is_revoked() || result.bytes().is_empty() {
        return Err(ExportError::NoResult);
    }

    match sink.share(result, title)? {
        ShareOutcome::Shared => Ok(ExportOutcome::Shared),
        outcome @ (ShareOutcome::Unsupported | ShareOutcome::Cancelled) => {
            tracing::debug!(?outcome, "share unavailable, falling back");
            if sink.supports_save() {
                Ok(ExportOutcome::Saved(sink.save(result)?))
            } else {
                Ok(ExportOutcome::ManualSaveHint)
            }
        }
    }
}

/// Filesystem sink: no share sheet, saves PNGs with timestamped names.
pub struct FileSink {
    dir: PathBuf,
    prefix: String,
}

impl FileSink {
    /// Creates a sink writing into `dir` with the given filename prefix.
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportSink for FileSink {
    fn share(&mut self, _result: &CaptureResult, _title: &str) -> Result<ShareOutcome, ExportError> {
        Ok(ShareOutcome::Unsupported)
    }

    fn supports_save(&self) -> bool {
        true
    }

    fn save(&mut self, result: &CaptureResult) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| ExportError::Save(e.to_string()))?;
        let stamp = result.created().format("%Y%m%d-%H%M%S%.3f");
        let path = self.dir.join(format!("{}-{}.png", self.prefix, stamp));
        std::fs::write(&path, result.bytes()).map_err(|e| ExportError::Save(e.to_string()))?;
        tracing::info!(path = %path.display(), bytes = result.bytes().len(), "capture saved");
        Ok(path)
    }
}
