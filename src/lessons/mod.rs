//! Runnable programs
//!
//! Each lesson implements `platform::App` and exposes a `run(&Settings)`
//! entry point used by its binary.

pub mod blocks;
pub mod camera;
pub mod text;
pub mod textured_quad;
pub mod triangle;
