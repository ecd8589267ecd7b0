//! Platform layer
//!
//! Handles the native window and event loop:
//! - Window creation and GPU surface setup
//! - Keyboard events, resize, close requests
//! - Frame timing and fixed simulation steps

pub mod clock;
pub mod runtime;

pub use clock::{FixedStep, FrameClock, FrameTime};
pub use runtime::{App, AppControl, RuntimeConfig, run};
