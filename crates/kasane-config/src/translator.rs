use serde::{Deserialize, Serialize};

fn default_provider() -> String {
    "deepl".to_string()
}

fn default_to_lang() -> String {
    "KO".to_string()
}

fn default_api_url() -> String {
    "https://api-free.deepl.com/v2/translate".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TranslatorConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Left empty, the service detects the source language
    #[serde(default)]
    pub source_lang: Option<String>,
    #[serde(default = "default_to_lang")]
    pub target_lang: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            source_lang: None,
            target_lang: default_to_lang(),
            api_key: String::new(),
            api_url: default_api_url(),
        }
    }
}

impl TranslatorConfig {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}
