use kasane_types::{CaptureMode, CaptureRegion};
use serde::{Deserialize, Serialize};

fn default_hotkey() -> String {
    "ctrl+alt+t".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct CaptureConfig {
    pub mode: CaptureMode,
    /// Screen rectangle used in region mode
    pub region: Option<CaptureRegion>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct HotkeyConfig {
    #[serde(default = "default_hotkey")]
    pub combination: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            combination: default_hotkey(),
        }
    }
}
