//! Device signals consumed by the booth.
//!
//! Orientation, visibility, and display size are inputs owned by the
//! platform; the booth subscribes to them for as long as it lives and
//! its teardown drops the wiring.

/// An external device event fed into [`crate::export::Booth::handle_signal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceSignal {
    /// Device orientation angle changed, in degrees.
    OrientationChanged {
        /// New orientation angle.
        angle: i32,
    },
    /// The hosting surface became visible or hidden.
    VisibilityChanged {
        /// True when visible again.
        visible: bool,
    },
    /// The display surface was resized.
    Resized {
        /// New display width in pixels.
        width: u32,
        /// New display height in pixels.
        height: u32,
    },
}
