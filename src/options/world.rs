use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Chunk grid dimensions.
pub struct WorldOptions {
    /// Render radius in chunks around the eye.
    pub chunk_radius: u32,
    /// Chunk edge length in blocks.
    pub chunk_size: u32,
}

impl Default for WorldOptions {
    fn default() -> Self {
        Self {
            chunk_radius: 10,
            chunk_size: 32,
        }
    }
}
