//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, face-geometry buffers,
//! compute dispatch with readback, texture upload, and shader composition.

/// Compute pipeline dispatch with input/output storage and readback.
pub mod compute;
/// Face-quad vertex staging and growable GPU buffers.
pub mod face_buffer;
/// Shared wgpu boilerplate helpers for render and compute pipelines.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
/// Tile atlas and depth texture management.
pub mod texture;
