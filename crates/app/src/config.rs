//! Viewer configuration file layout.

use serde::Deserialize;

use frameview_core::WindowConfig;
use frameview_scene::{CameraBehavior, CameraSettings, Color};

/// Top-level TOML document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub scene: SceneConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub behavior: CameraBehavior,
    #[serde(flatten)]
    pub settings: CameraSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// RGBA clear color.
    pub clear_color: [f32; 4],
    /// Seed for shape colors; random when absent.
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            clear_color: Color::WHITE.to_array(),
            seed: None,
        }
    }
}

impl SceneConfig {
    pub fn clear_color(&self) -> Color {
        let [r, g, b, a] = self.clear_color;
        Color::rgba(r, g, b, a)
    }
}
