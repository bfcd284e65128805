#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("OCR engine not found at '{0}', check the tesseract path in settings")]
    EngineNotFound(String),

    #[error("OCR language '{language}' is not installed (available: {available})")]
    LanguageUnavailable { language: String, available: String },

    #[error("text recognition failed: {0}")]
    RecognitionFailed(String),

    #[error("failed to prepare image for OCR: {0}")]
    Image(String),

    #[error("I/O error while running OCR: {0}")]
    Io(#[from] std::io::Error),
}
