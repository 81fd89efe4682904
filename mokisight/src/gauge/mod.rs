//! Churn-rate gauge: geometry, animation and scene output.
//!
//! The gauge maps a percentage onto a 270 degree arc split into green,
//! amber and red bands, with a triangular pointer and a numeric readout.
//! Nothing in this module depends on the GUI toolkit; the iced widget lives
//! in [`crate::view::components::gauge`].

pub mod animation;
pub mod geometry;
pub mod scene;

pub use animation::{FrameOutcome, GaugeAnimation, RunHandle};
pub use geometry::{clamp_percent, rotation};
pub use scene::GaugeScene;
