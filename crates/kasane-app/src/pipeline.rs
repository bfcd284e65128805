use std::sync::Arc;

use kasane_config::Config;
use kasane_core::{full_text, group_lines};
use kasane_ocr::{OcrEngine, OcrError, TesseractEngine};
use kasane_translator::{DeeplTranslator, TranslateError, Translator};
use kasane_types::{CaptureMode, CaptureRequest, OverlayResult, RawImage};

/// Why a run ended without a result
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Credential error: {0}")]
    Credential(String),

    #[error("OCR engine error: {0}")]
    OcrEngine(#[from] OcrError),

    #[error("Translation service error: {0}")]
    TranslationService(TranslateError),

    #[error("Capture failed: {0:#}")]
    Capture(anyhow::Error),

    #[error("Worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl PipelineError {
    /// Short line for the status indicator
    pub fn status_message(&self) -> &'static str {
        match self {
            PipelineError::Credential(_) => "API key error, check translator.api_key",
            PipelineError::OcrEngine(OcrError::EngineNotFound(_)) => {
                "Tesseract not found, check ocr.engine_path"
            }
            PipelineError::OcrEngine(OcrError::LanguageUnavailable { .. }) => {
                "OCR language not installed"
            }
            PipelineError::OcrEngine(_) => "OCR failed",
            PipelineError::TranslationService(TranslateError::QuotaExceeded) => {
                "Translation quota exceeded"
            }
            PipelineError::TranslationService(TranslateError::RateLimitExceeded) => {
                "Rate limited, try again shortly"
            }
            PipelineError::TranslationService(_) => "Translation failed",
            PipelineError::Capture(_) => "Capture failed",
            PipelineError::Worker(_) => "Internal error",
        }
    }
}

impl From<TranslateError> for PipelineError {
    fn from(err: TranslateError) -> Self {
        if err.is_credential() {
            PipelineError::Credential(err.to_string())
        } else {
            PipelineError::TranslationService(err)
        }
    }
}

/// A failed run, with the capture when it got that far
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct RunFailure {
    pub error: PipelineError,
    pub image: Option<RawImage>,
}

impl RunFailure {
    fn with_image(error: impl Into<PipelineError>, image: RawImage) -> Self {
        Self {
            error: error.into(),
            image: Some(image),
        }
    }
}

impl From<PipelineError> for RunFailure {
    fn from(error: PipelineError) -> Self {
        Self { error, image: None }
    }
}

#[derive(Debug)]
pub enum PipelineOutcome {
    Translated(OverlayResult),
    /// OCR found nothing to translate
    NoText { image: RawImage, language: String },
}

/// OCR → group → translate for one captured image
pub struct Pipeline {
    ocr: Arc<dyn OcrEngine>,
    translator: Arc<dyn Translator>,
    ocr_language: String,
    source_lang: Option<String>,
    target_lang: String,
}

impl Pipeline {
    pub fn new(
        ocr: Arc<dyn OcrEngine>,
        translator: Arc<dyn Translator>,
        ocr_language: String,
        source_lang: Option<String>,
        target_lang: String,
    ) -> Self {
        Self {
            ocr,
            translator,
            ocr_language,
            source_lang,
            target_lang,
        }
    }

    /// Assemble the tesseract engine and DeepL client from settings
    pub fn from_config(config: &Config) -> Result<Self, PipelineError> {
        if !config.translator.has_api_key() {
            return Err(PipelineError::Credential(
                "No DeepL API key configured (set translator.api_key)".to_string(),
            ));
        }

        let ocr = TesseractEngine::new(config.ocr.engine_command())?;
        let translator = DeeplTranslator::new(
            config.translator.api_key.clone(),
            config.translator.api_url.clone(),
        );

        Ok(Self::new(
            Arc::new(ocr),
            Arc::new(translator),
            config.ocr.language.clone(),
            config.translator.source_lang.clone(),
            config.translator.target_lang.clone(),
        ))
    }

    /// OCR and translate `image`. A failure after OCR started carries the image back
    pub async fn run(&self, image: RawImage) -> Result<PipelineOutcome, RunFailure> {
        let ocr = Arc::clone(&self.ocr);
        let language = self.ocr_language.clone();
        let (image, words) = tokio::task::spawn_blocking(move || {
            let words = ocr.recognize(&image, &language);
            (image, words)
        })
        .await
        .map_err(PipelineError::from)?;
        let words = match words {
            Ok(words) => words,
            Err(e) => return Err(RunFailure::with_image(e, image)),
        };

        let lines = group_lines(&words);
        tracing::debug!("OCR: {} words in {} lines", words.len(), lines.len());

        if lines.is_empty() {
            return Ok(PipelineOutcome::NoText {
                image,
                language: self.ocr_language.clone(),
            });
        }

        let text = full_text(&lines);
        let translation = match self
            .translator
            .translate(&text, self.source_lang.clone(), self.target_lang.clone())
            .await
        {
            Ok(translation) => translation,
            Err(e) => return Err(RunFailure::with_image(e, image)),
        };

        tracing::info!(
            "Translated {} lines via {} into {}",
            lines.len(),
            translation.provider,
            translation.to
        );

        Ok(PipelineOutcome::Translated(OverlayResult {
            image,
            lines,
            translated_text: translation.text,
            target_lang: translation.to,
        }))
    }
}

/// Resolve a capture request into an image. `Ok(None)` means nothing to process
pub async fn capture(request: CaptureRequest, config: &Config) -> Result<Option<RawImage>, PipelineError> {
    let request = match request {
        CaptureRequest::Configured => match (config.capture.mode, config.capture.region) {
            (CaptureMode::Full, _) => CaptureRequest::FullScreen,
            (CaptureMode::Region, Some(region)) => CaptureRequest::Region(region),
            (CaptureMode::Region, None) => {
                tracing::warn!("Region capture selected but no region configured, capturing full screen");
                CaptureRequest::FullScreen
            }
        },
        other => other,
    };

    let image = tokio::task::spawn_blocking(move || match request {
        CaptureRequest::Region(region) => {
            if let Err(e) = kasane_ocr::validate_region(&region) {
                tracing::info!("{e}, ignoring capture");
                return Ok(None);
            }
            kasane_ocr::capture_screen_region(region).map(Some)
        }
        CaptureRequest::File(path) => kasane_ocr::load_image(&path).map(Some),
        CaptureRequest::FullScreen | CaptureRequest::Configured => {
            kasane_ocr::capture_primary_screen().map(Some)
        }
    })
    .await?
    .map_err(PipelineError::Capture)?;

    if let Some(image) = &image {
        tracing::debug!("Captured {}x{} image", image.width, image.height);
    }
    Ok(image)
}

/// One full run: capture, then OCR and translate
pub async fn run_once(config: &Config, request: CaptureRequest) -> Result<Option<PipelineOutcome>, RunFailure> {
    let pipeline = Pipeline::from_config(config)?;
    let Some(image) = capture(request, config).await? else {
        return Ok(None);
    };
    pipeline.run(image).await.map(Some)
}
