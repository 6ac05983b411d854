use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Window size and presentation settings.
pub struct DisplayOptions {
    /// Initial window width in pixels.
    pub width: u32,
    /// Initial window height in pixels.
    pub height: u32,
    /// Whether presentation waits for vertical sync.
    pub vsync: bool,
    /// Frame-rate cap applied when vsync is off; zero disables the cap.
    pub fps_limit: u32,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            vsync: true,
            fps_limit: 0,
        }
    }
}
