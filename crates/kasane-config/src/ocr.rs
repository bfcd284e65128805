use serde::{Deserialize, Serialize};

fn default_language() -> String {
    "eng".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct OcrConfig {
    /// Path to the tesseract executable, empty means look it up on PATH
    #[serde(default)]
    pub engine_path: String,
    /// Tesseract language code(s), e.g. "eng", "kor", "jpn+eng"
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            engine_path: String::new(),
            language: default_language(),
        }
    }
}

impl OcrConfig {
    pub fn engine_command(&self) -> &str {
        let path = self.engine_path.trim();
        if path.is_empty() { "tesseract" } else { path }
    }
}
