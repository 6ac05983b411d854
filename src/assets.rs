//! Asset path resolution and disk loading.
//!
//! Shaders and textures live under `assets/` relative to the working
//! directory. Set `VOXEN_ASSETS` to point somewhere else (useful for
//! installed binaries and test harnesses).

use std::path::{Path, PathBuf};

use crate::error::VoxenError;

/// Environment variable overriding the asset root directory.
pub const ASSETS_ENV: &str = "VOXEN_ASSETS";

/// Resolve the asset root: `$VOXEN_ASSETS` if set, `./assets` otherwise.
#[must_use]
pub fn root() -> PathBuf {
    std::env::var_os(ASSETS_ENV)
        .map_or_else(|| PathBuf::from("assets"), PathBuf::from)
}

/// Path of a WGSL shader under the asset root.
#[must_use]
pub fn shader_path(name: &str) -> PathBuf {
    root().join("shaders").join(name)
}

/// Path of a texture under the asset root.
#[must_use]
pub fn texture_path(name: &str) -> PathBuf {
    root().join("textures").join(name)
}

/// Read a UTF-8 text asset into a string.
///
/// The returned error carries the path, so callers can surface *which*
/// file was missing without re-wrapping.
pub fn load_string(path: &Path) -> Result<String, VoxenError> {
    std::fs::read_to_string(path).map_err(|source| {
        log::error!("failed to read {}: {source}", path.display());
        VoxenError::Asset { path: path.to_path_buf(), source }
    })
}

/// Read a binary asset into a byte vector.
pub fn load_bytes(path: &Path) -> Result<Vec<u8>, VoxenError> {
    std::fs::read(path).map_err(|source| {
        log::error!("failed to read {}: {source}", path.display());
        VoxenError::Asset { path: path.to_path_buf(), source }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_path_joins_under_root() {
        let path = shader_path("chunk.wgsl");
        assert!(path.ends_with("shaders/chunk.wgsl"));
    }

    #[test]
    fn texture_path_joins_under_root() {
        let path = texture_path("atlas.png");
        assert!(path.ends_with("textures/atlas.png"));
    }

    #[test]
    fn missing_file_reports_path() {
        let path = Path::new("definitely/not/here.wgsl");
        let err = load_string(path).unwrap_err();
        match err {
            VoxenError::Asset { path: p, .. } => {
                assert_eq!(p, path);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
