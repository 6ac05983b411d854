use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Block texture atlas source.
pub struct AtlasOptions {
    /// Atlas file name, resolved under the texture asset root.
    pub path: String,
    /// Tile edge length in pixels.
    pub tile_size: u32,
}

impl Default for AtlasOptions {
    fn default() -> Self {
        Self {
            path: "texture.png".to_owned(),
            tile_size: 16,
        }
    }
}
