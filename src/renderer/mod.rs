//! Rendering subsystems for the voxel engine.
//!
//! Contains the chunk face-mesh pass, the first-person camera, and the
//! GPU visibility culler.

/// First-person camera and its GPU uniform.
pub mod camera;
/// Chunk face-mesh draw pass.
pub mod chunk;
/// GPU visibility culling over the chunk grid.
pub mod visibility;
