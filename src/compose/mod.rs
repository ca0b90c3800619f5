//! Frame and overlay compositing.
//!
//! A CPU raster surface plus fixed-ratio placement arithmetic. The same
//! render path serves the continuous preview and the one-shot capture;
//! only the target dimensions differ.

pub mod layout;
mod renderer;
mod surface;

pub use layout::Placement;
pub use renderer::{render, DrawMode};
pub use surface::Surface;
