//! Pipeline, event flow, presenter and command tests with in-memory OCR and translation

use std::sync::Mutex;

use kasane_ocr::{OcrEngine, OcrError};
use kasane_translator::{LanguageCode, ProviderMetadata, TranslateError, Translation, Translator};
use kasane_types::{LineKey, OcrLine, OcrWord, RawImage};

mod pipeline_tests;

pub fn word(text: &str, left: i32, top: i32, line: u32) -> OcrWord {
    OcrWord {
        text: text.to_string(),
        left,
        top,
        width: 40,
        height: 20,
        confidence: 90.0,
        key: LineKey {
            page: 1,
            block: 1,
            paragraph: 1,
            line,
        },
    }
}

pub fn line(text: &str, left: i32, top: i32, width: i32, height: i32) -> OcrLine {
    OcrLine {
        text: text.to_string(),
        left,
        top,
        width,
        height,
    }
}

pub fn gray_image(width: u32, height: u32) -> RawImage {
    RawImage {
        data: vec![128; (width * height * 4) as usize],
        width,
        height,
    }
}

/// OCR engine with a canned answer
pub enum FakeOcr {
    Words(Vec<OcrWord>),
    MissingEngine,
    MissingLanguage,
}

impl OcrEngine for FakeOcr {
    fn recognize(&self, _image: &RawImage, language: &str) -> Result<Vec<OcrWord>, OcrError> {
        match self {
            FakeOcr::Words(words) => Ok(words.clone()),
            FakeOcr::MissingEngine => Err(OcrError::EngineNotFound("/missing/tesseract".to_string())),
            FakeOcr::MissingLanguage => Err(OcrError::LanguageUnavailable {
                language: language.to_string(),
                available: "eng".to_string(),
            }),
        }
    }
}

/// Translator that returns a fixed reply and remembers what it was asked
pub struct FakeTranslator {
    reply: Result<String, fn() -> TranslateError>,
    pub requests: Mutex<Vec<(String, Option<LanguageCode>, LanguageCode)>>,
}

impl FakeTranslator {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: fn() -> TranslateError) -> Self {
        Self {
            reply: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl Translator for FakeTranslator {
    async fn translate(
        &self,
        text: &str,
        from: Option<LanguageCode>,
        to: LanguageCode,
    ) -> Result<Translation, TranslateError> {
        self.requests
            .lock()
            .unwrap()
            .push((text.to_string(), from.clone(), to.clone()));

        match &self.reply {
            Ok(reply) => Ok(Translation {
                text: reply.clone(),
                from,
                to,
                provider: "fake".to_string(),
            }),
            Err(make) => Err(make()),
        }
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "fake".to_string(),
            requires_api_key: false,
            free_tier_available: true,
        }
    }
}
