use std::sync::Arc;

use kanal::AsyncSender;
use kasane_core::state::AppState;
use kasane_types::{AppEvent, CaptureRequest};
use tokio::task::JoinSet;
use tracing::Instrument;

use crate::pipeline::{PipelineOutcome, RunFailure, run_once};

pub const BUSY_STATUS: &str = "Capturing and translating...";

/// Releases the in-flight flag when the run ends, including on panic
struct RunGuard(Arc<AppState>);

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.0.finish_run();
    }
}

/// Start a run on `runs` unless one is already in flight
pub fn handle_capture_trigger(
    state: Arc<AppState>,
    request: CaptureRequest,
    app_to_ui_tx: AsyncSender<AppEvent>,
    runs: &mut JoinSet<()>,
) -> bool {
    if !state.try_begin_run() {
        tracing::warn!("Capture already in progress, ignoring trigger");
        return false;
    }

    let run_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("run", %run_id);

    runs.spawn(
        async move {
            let _guard = RunGuard(state.clone());
            tracing::info!("Run started: {request:?}");

            let busy = AppEvent::StatusUpdate {
                status: BUSY_STATUS.to_string(),
                busy: true,
            };
            send(&app_to_ui_tx, busy).await;

            let config = state.config.read().await.clone();
            let result = run_once(&config, request).await;

            for event in outcome_events(result) {
                send(&app_to_ui_tx, event).await;
            }
            tracing::info!("Run finished");
        }
        .instrument(span),
    );

    true
}

/// What the presenter should show for a finished run. Always ends with an idle status
pub fn outcome_events(result: Result<Option<PipelineOutcome>, RunFailure>) -> Vec<AppEvent> {
    match result {
        Ok(Some(PipelineOutcome::Translated(result))) => vec![
            AppEvent::ShowOverlay(Box::new(result)),
            idle("Translation complete"),
        ],
        Ok(Some(PipelineOutcome::NoText { image, language })) => {
            tracing::info!("No text found (OCR language: {language})");
            vec![
                AppEvent::ShowNotice {
                    message: format!("No text found (OCR language: {language})"),
                    image,
                },
                idle("No text found"),
            ]
        }
        Ok(None) => vec![idle("Nothing captured")],
        Err(RunFailure { error, image }) => {
            tracing::error!("Run failed: {error}");
            vec![
                AppEvent::ShowError {
                    message: error.to_string(),
                    image,
                },
                idle(error.status_message()),
            ]
        }
    }
}

fn idle(status: &str) -> AppEvent {
    AppEvent::StatusUpdate {
        status: status.to_string(),
        busy: false,
    }
}

async fn send(tx: &AsyncSender<AppEvent>, event: AppEvent) {
    if let Err(e) = tx.send(event).await {
        tracing::debug!("Presenter channel closed: {e}");
    }
}
