use std::env;
use std::path::PathBuf;

use kasane_types::{CaptureMode, CaptureRegion};
use serde::{Deserialize, Serialize};

use self::capture::{CaptureConfig, HotkeyConfig};
use self::ocr::OcrConfig;
use self::overlay::OverlayConfig;
use self::translator::TranslatorConfig;

pub mod capture;
pub mod ocr;
pub mod overlay;
pub mod store;
pub mod translator;

pub use store::{ConfigError, ConfigStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub ocr: OcrConfig,
    pub translator: TranslatorConfig,
    pub hotkey: HotkeyConfig,
    pub capture: CaptureConfig,
    pub overlay: OverlayConfig,
    pub log_format: LogFormat,
}

impl Config {
    /// Environment variables win over the stored file
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = env::var("KASANE_DEEPL_API_KEY") {
            if !key.trim().is_empty() {
                tracing::debug!("Using DeepL API key from environment");
                self.translator.api_key = key;
            }
        }

        if let Ok(path) = env::var("KASANE_TESSERACT_PATH") {
            if !path.trim().is_empty() {
                tracing::debug!("Using tesseract path from environment: {path}");
                self.ocr.engine_path = path;
            }
        }
    }

    /// Update a single setting addressed by its dotted key
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            reason: reason.to_string(),
        };

        match key {
            "ocr.engine_path" => self.ocr.engine_path = value.to_string(),
            "ocr.language" => {
                if value.trim().is_empty() {
                    return Err(invalid("language must not be empty"));
                }
                self.ocr.language = value.trim().to_string();
            }
            "translator.api_key" => self.translator.api_key = value.trim().to_string(),
            "translator.api_url" => self.translator.api_url = value.trim().to_string(),
            "translator.source_lang" => {
                let value = value.trim();
                self.translator.source_lang = if value.is_empty() || value == "auto" {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            "translator.target_lang" => {
                if value.trim().is_empty() {
                    return Err(invalid("target language must not be empty"));
                }
                self.translator.target_lang = value.trim().to_string();
            }
            // Needs parsing and OS registration checks, which live above this crate
            "hotkey.combination" => {
                return Err(invalid("change it with `kasane hotkey <combination>`"));
            }
            "capture.mode" => {
                self.capture.mode = match value.trim() {
                    "region" => CaptureMode::Region,
                    "full" => CaptureMode::Full,
                    _ => return Err(invalid("expected 'region' or 'full'")),
                }
            }
            "capture.region" => {
                self.capture.region = if value.trim() == "none" {
                    None
                } else {
                    Some(parse_region(value).ok_or_else(|| invalid("expected x,y,width,height"))?)
                };
            }
            "overlay.canvas_width" => {
                self.overlay.canvas_width =
                    value.trim().parse().map_err(|_| invalid("expected an integer"))?;
            }
            "overlay.canvas_height" => {
                self.overlay.canvas_height =
                    value.trim().parse().map_err(|_| invalid("expected an integer"))?;
            }
            "overlay.output_dir" => self.overlay.output_dir = PathBuf::from(value),
            "log_format" => {
                self.log_format = match value.trim() {
                    "pretty" => LogFormat::Pretty,
                    "json" => LogFormat::Json,
                    _ => return Err(invalid("expected 'pretty' or 'json'")),
                }
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }

        Ok(())
    }

    /// Copy safe to print, with the API key masked
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.translator.has_api_key() {
            let key = &config.translator.api_key;
            let tail: String = key.chars().skip(key.chars().count().saturating_sub(4)).collect();
            config.translator.api_key = format!("****{tail}");
        }
        config
    }
}

/// Parse "x,y,width,height"
pub fn parse_region(value: &str) -> Option<CaptureRegion> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return None;
    }

    Some(CaptureRegion {
        x: parts[0].parse().ok()?,
        y: parts[1].parse().ok()?,
        width: parts[2].parse().ok()?,
        height: parts[3].parse().ok()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_first_run_settings() {
        let config = Config::default();
        assert_eq!(config.ocr.language, "eng");
        assert_eq!(config.ocr.engine_command(), "tesseract");
        assert_eq!(config.translator.target_lang, "KO");
        assert_eq!(config.hotkey.combination, "ctrl+alt+t");
        assert_eq!(config.capture.mode, CaptureMode::Region);
        assert_eq!(config.overlay.canvas_width, 800);
        assert_eq!(config.overlay.canvas_height, 600);
        assert!(!config.translator.has_api_key());
    }

    #[test]
    fn set_updates_known_keys() {
        let mut config = Config::default();
        config.set("ocr.language", "jpn").unwrap();
        config.set("capture.mode", "full").unwrap();
        config.set("capture.region", "10, 20, 300, 400").unwrap();
        config.set("translator.source_lang", "auto").unwrap();

        assert_eq!(config.ocr.language, "jpn");
        assert_eq!(config.capture.mode, CaptureMode::Full);
        assert_eq!(
            config.capture.region,
            Some(CaptureRegion { x: 10, y: 20, width: 300, height: 400 })
        );
        assert_eq!(config.translator.source_lang, None);
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_values() {
        let mut config = Config::default();
        assert!(matches!(config.set("nope", "1"), Err(ConfigError::UnknownKey(_))));
        assert!(matches!(
            config.set("capture.mode", "window"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config.set("overlay.canvas_width", "wide"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config.set("hotkey.combination", "not a hotkey"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn redacted_masks_api_key() {
        let mut config = Config::default();
        config.translator.api_key = "abcdef123456:fx".to_string();
        let shown = config.redacted();
        assert_eq!(shown.translator.api_key, "****6:fx");
        assert_eq!(config.translator.api_key, "abcdef123456:fx");
    }
}
