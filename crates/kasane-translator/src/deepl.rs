use async_trait::async_trait;
use reqwest::StatusCode;

use crate::{LanguageCode, ProviderMetadata, TranslateError, Translation, Translator};

/// DeepL answers 456 when the character quota is used up
const QUOTA_EXCEEDED: u16 = 456;

#[derive(Clone)]
pub struct DeeplTranslator {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
}

impl DeeplTranslator {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            api_url,
        }
    }
}

#[async_trait]
impl Translator for DeeplTranslator {
    async fn translate(
        &self,
        text: &str,
        from: Option<LanguageCode>,
        to: LanguageCode,
    ) -> Result<Translation, TranslateError> {
        if self.api_key.trim().is_empty() {
            return Err(TranslateError::MissingApiKey);
        }

        let target = to.to_uppercase();
        let mut params = vec![("text", text.to_string()), ("target_lang", target)];
        if let Some(source) = &from {
            params.push(("source_lang", source.to_uppercase()));
        }

        tracing::debug!(
            "DeepL request: {} chars, {:?} -> {}",
            text.len(),
            from,
            to
        );

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key.trim()))
            .form(&params)
            .send()
            .await?;

        if let Some(err) = status_error(response.status()) {
            return Err(err);
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            TranslateError::ApiError(format!("Failed to parse response: {}", e))
        })?;

        let translated_text = parse_translation(&json)?;

        Ok(Translation {
            text: translated_text,
            from,
            to,
            provider: "deepl".to_string(),
        })
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "DeepL".to_string(),
            requires_api_key: true,
            free_tier_available: true,
        }
    }
}

/// Map a non-success HTTP status to its error kind
fn status_error(status: StatusCode) -> Option<TranslateError> {
    if status.is_success() {
        return None;
    }

    Some(match status.as_u16() {
        401 | 403 => TranslateError::AuthenticationError,
        429 => TranslateError::RateLimitExceeded,
        QUOTA_EXCEEDED => TranslateError::QuotaExceeded,
        _ => TranslateError::ApiError(format!("HTTP {}", status)),
    })
}

fn parse_translation(json: &serde_json::Value) -> Result<String, TranslateError> {
    json["translations"]
        .get(0)
        .and_then(|t| t["text"].as_str())
        .map(str::to_string)
        .ok_or_else(|| TranslateError::ApiError("No translation in response".to_string()))
}
