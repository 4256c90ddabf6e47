//! Hardware abstraction traits
//!
//! These traits define the interface between the application and the
//! camera driver implementations.

pub mod camera;

pub use camera::{CaptureError, CaptureReport, FrameGrabber};
