mod deepl;

pub use deepl::DeeplTranslator;

pub type LanguageCode = String;

/// Translation provider interface
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// Translate text into `to`. With `from` unset the provider detects the source language
    async fn translate(
        &self,
        text: &str,
        from: Option<LanguageCode>,
        to: LanguageCode,
    ) -> Result<Translation, TranslateError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone)]
pub struct Translation {
    pub text: String,
    pub from: Option<LanguageCode>,
    pub to: LanguageCode,
    pub provider: String,
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub requires_api_key: bool,
    pub free_tier_available: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Translation quota exceeded")]
    QuotaExceeded,

    #[error("No API key configured")]
    MissingApiKey,

    #[error("Authentication error")]
    AuthenticationError,
}

impl TranslateError {
    /// Missing or rejected credentials, as opposed to a service-side problem
    pub fn is_credential(&self) -> bool {
        matches!(
            self,
            TranslateError::MissingApiKey | TranslateError::AuthenticationError
        )
    }
}
