//! Engine configuration with TOML file support.
//!
//! Window, world, and atlas settings are consolidated here. Options
//! serialize to/from TOML so an installation keeps its settings next to
//! its assets.

mod atlas;
mod display;
mod world;

use std::path::Path;

pub use atlas::AtlasOptions;
pub use display::DisplayOptions;
use serde::{Deserialize, Serialize};
pub use world::WorldOptions;

use crate::error::VoxenError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[world]`) work correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Window size and presentation settings.
    pub display: DisplayOptions,
    /// Chunk grid dimensions.
    pub world: WorldOptions,
    /// Block texture atlas source.
    pub atlas: AtlasOptions,
}

impl Options {
    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns `VoxenError::Asset` if the file cannot be read and
    /// `VoxenError::OptionsParse` if it is not valid TOML.
    pub fn load(path: &Path) -> Result<Self, VoxenError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| VoxenError::Asset {
                path: path.to_path_buf(),
                source: e,
            })?;
        toml::from_str(&content)
            .map_err(|e| VoxenError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns `VoxenError::Asset` if the file cannot be written and
    /// `VoxenError::OptionsParse` if serialization fails.
    pub fn save(&self, path: &Path) -> Result<(), VoxenError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| VoxenError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| VoxenError::Asset {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| VoxenError::Asset {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[world]
chunk_radius = 4
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.world.chunk_radius, 4);
        // Everything else should be default
        assert_eq!(opts.world.chunk_size, 32);
        assert_eq!(opts.display.width, 1024);
        assert!(opts.display.vsync);
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = Options::load(Path::new("/nonexistent/voxen.toml"))
            .unwrap_err();
        assert!(err.to_string().contains("voxen.toml"));
    }
}
