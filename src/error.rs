//! Crate-level error types.

use std::fmt;
use std::path::PathBuf;

use crate::gpu::render_context::RenderContextError;

/// Errors produced by the voxen crate.
#[derive(Debug)]
pub enum VoxenError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// Failed to read an asset from disk.
    Asset {
        /// Path that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// Failed to decode or upload a texture.
    Texture(String),
    /// WGSL composition or validation failure.
    ShaderCompose(String),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// GPU buffer readback failure.
    Readback(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for VoxenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Asset { path, source } => {
                write!(f, "failed to load {}: {source}", path.display())
            }
            Self::Texture(msg) => write!(f, "texture error: {msg}"),
            Self::ShaderCompose(msg) => {
                write!(f, "shader compose error: {msg}")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Readback(msg) => write!(f, "readback error: {msg}"),
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for VoxenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Asset { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<RenderContextError> for VoxenError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}
