use std::sync::Arc;

use kasane_config::Config;
use kasane_ocr::OcrError;
use kasane_translator::TranslateError;
use kasane_types::AppEvent;

use super::{FakeOcr, FakeTranslator, gray_image, word};
use crate::events::trigger_capture::outcome_events;
use crate::pipeline::{Pipeline, PipelineError, PipelineOutcome, RunFailure};

fn pipeline(ocr: FakeOcr, translator: Arc<FakeTranslator>) -> Pipeline {
    Pipeline::new(
        Arc::new(ocr),
        translator,
        "eng".to_string(),
        None,
        "KO".to_string(),
    )
}

fn two_lines() -> FakeOcr {
    FakeOcr::Words(vec![
        word("Hello", 10, 10, 1),
        word("World", 60, 12, 1),
        word("Foo", 10, 50, 2),
    ])
}

#[tokio::test]
async fn translates_grouped_lines_as_one_request() {
    let translator = Arc::new(FakeTranslator::replying("안녕 세계\n푸"));
    let pipeline = pipeline(two_lines(), translator.clone());

    let outcome = pipeline.run(gray_image(200, 100)).await.unwrap();

    let PipelineOutcome::Translated(result) = outcome else {
        panic!("expected a translation");
    };
    assert_eq!(result.lines.len(), 2);
    assert_eq!(result.lines[0].text, "Hello World");
    assert_eq!(result.lines[1].text, "Foo");
    assert_eq!(result.translated_text, "안녕 세계\n푸");
    assert_eq!(result.target_lang, "KO");
    assert_eq!(result.image.width, 200);

    let requests = translator.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0],
        ("Hello World\nFoo".to_string(), None, "KO".to_string())
    );
}

#[tokio::test]
async fn passes_configured_source_language() {
    let translator = Arc::new(FakeTranslator::replying("hallo"));
    let pipeline = Pipeline::new(
        Arc::new(FakeOcr::Words(vec![word("hello", 0, 0, 1)])),
        translator.clone(),
        "eng".to_string(),
        Some("EN".to_string()),
        "DE".to_string(),
    );

    pipeline.run(gray_image(50, 50)).await.unwrap();

    let requests = translator.requests.lock().unwrap();
    assert_eq!(requests[0].1.as_deref(), Some("EN"));
    assert_eq!(requests[0].2, "DE");
}

#[tokio::test]
async fn no_words_means_no_text_without_calling_translator() {
    let translator = Arc::new(FakeTranslator::replying("unused"));
    let pipeline = pipeline(FakeOcr::Words(Vec::new()), translator.clone());

    let outcome = pipeline.run(gray_image(40, 40)).await.unwrap();

    match outcome {
        PipelineOutcome::NoText { image, language } => {
            assert_eq!(language, "eng");
            assert_eq!(image.height, 40);
        }
        other => panic!("expected no text, got {other:?}"),
    }
    assert!(translator.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn whitespace_only_words_count_as_no_text() {
    let translator = Arc::new(FakeTranslator::replying("unused"));
    let pipeline = pipeline(FakeOcr::Words(vec![word("   ", 0, 0, 1)]), translator);

    let outcome = pipeline.run(gray_image(40, 40)).await.unwrap();
    assert!(matches!(outcome, PipelineOutcome::NoText { .. }));
}

#[tokio::test]
async fn rejected_key_is_a_credential_error() {
    let translator = Arc::new(FakeTranslator::failing(|| TranslateError::AuthenticationError));
    let pipeline = pipeline(two_lines(), translator);

    let failure = pipeline.run(gray_image(200, 100)).await.unwrap_err();
    assert!(matches!(failure.error, PipelineError::Credential(_)), "got {failure:?}");
    assert_eq!(failure.error.status_message(), "API key error, check translator.api_key");
}

#[tokio::test]
async fn quota_is_a_service_error() {
    let translator = Arc::new(FakeTranslator::failing(|| TranslateError::QuotaExceeded));
    let pipeline = pipeline(two_lines(), translator);

    let failure = pipeline.run(gray_image(200, 100)).await.unwrap_err();
    assert!(matches!(
        failure.error,
        PipelineError::TranslationService(TranslateError::QuotaExceeded)
    ));
    assert_eq!(failure.error.status_message(), "Translation quota exceeded");
    assert_eq!(failure.image.map(|image| image.width), Some(200));
}

#[tokio::test]
async fn ocr_failures_stop_before_translation() {
    let translator = Arc::new(FakeTranslator::replying("unused"));
    let pipeline = pipeline(FakeOcr::MissingEngine, translator.clone());

    let failure = pipeline.run(gray_image(20, 20)).await.unwrap_err();
    assert!(matches!(
        failure.error,
        PipelineError::OcrEngine(OcrError::EngineNotFound(_))
    ));
    assert!(failure.image.is_some());
    assert!(translator.requests.lock().unwrap().is_empty());

    let pipeline = Pipeline::new(
        Arc::new(FakeOcr::MissingLanguage),
        translator,
        "jpn".to_string(),
        None,
        "KO".to_string(),
    );
    let failure = pipeline.run(gray_image(20, 20)).await.unwrap_err();
    assert_eq!(failure.error.status_message(), "OCR language not installed");
    assert!(failure.to_string().contains("jpn"));
}

#[test]
fn pipeline_needs_an_api_key() {
    let config = Config::default();
    let err = Pipeline::from_config(&config).err().unwrap();
    assert!(matches!(err, PipelineError::Credential(_)));
}

#[tokio::test]
async fn translated_run_shows_overlay_then_goes_idle() {
    let translator = Arc::new(FakeTranslator::replying("안녕 세계\n푸"));
    let outcome = pipeline(two_lines(), translator)
        .run(gray_image(200, 100))
        .await;

    let events = outcome_events(outcome.map(Some));
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], AppEvent::ShowOverlay(result) if result.lines.len() == 2));
    assert!(matches!(
        &events[1],
        AppEvent::StatusUpdate { busy: false, status } if status == "Translation complete"
    ));
}

#[test]
fn every_outcome_ends_idle() {
    let cases = vec![
        Ok(None),
        Ok(Some(PipelineOutcome::NoText {
            image: gray_image(10, 10),
            language: "eng".to_string(),
        })),
        Err(PipelineError::Credential("no key".to_string()).into()),
        Err(PipelineError::Capture(anyhow::anyhow!("monitor gone")).into()),
    ];

    for case in cases {
        let events = outcome_events(case);
        assert!(matches!(
            events.last(),
            Some(AppEvent::StatusUpdate { busy: false, .. })
        ));
    }
}

#[test]
fn failures_are_reported_with_their_message() {
    let events = outcome_events(Err(PipelineError::Capture(anyhow::anyhow!("monitor gone")).into()));
    match &events[0] {
        AppEvent::ShowError { message, image } => {
            assert!(message.contains("monitor gone"));
            assert!(image.is_none());
        }
        other => panic!("expected an error event, got {other:?}"),
    }
}

#[tokio::test]
async fn failed_ocr_still_reports_the_capture() {
    let translator = Arc::new(FakeTranslator::replying("unused"));
    let result = pipeline(FakeOcr::MissingEngine, translator)
        .run(gray_image(60, 30))
        .await;

    let events = outcome_events(result.map(Some));
    match &events[0] {
        AppEvent::ShowError { message, image } => {
            assert!(message.contains("/missing/tesseract"));
            let image = image.as_ref().expect("capture kept with the error");
            assert_eq!((image.width, image.height), (60, 30));
        }
        other => panic!("expected an error event, got {other:?}"),
    }
}

#[test]
fn failure_without_capture_has_no_image() {
    let failure = RunFailure::from(PipelineError::Credential("no key".to_string()));
    assert!(failure.image.is_none());
    assert_eq!(failure.to_string(), "Credential error: no key");
}
