//! Shared utilities for the rendering engine.
//!
//! Helpers for frame timing, FPS measurement, and uniform random draws.

pub mod frame_timing;
pub mod rng;
