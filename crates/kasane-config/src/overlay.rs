use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_canvas_width() -> u32 {
    800
}

fn default_canvas_height() -> u32 {
    600
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("kasane-output")
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct OverlayConfig {
    #[serde(default = "default_canvas_width")]
    pub canvas_width: u32,
    #[serde(default = "default_canvas_height")]
    pub canvas_height: u32,
    /// Where the latest overlay and text report are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            canvas_width: default_canvas_width(),
            canvas_height: default_canvas_height(),
            output_dir: default_output_dir(),
        }
    }
}
