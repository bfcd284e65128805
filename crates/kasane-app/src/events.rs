use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use kasane_core::state::AppState;
use kasane_types::AppEvent;
use tokio::task::JoinSet;

pub mod trigger_capture;

use trigger_capture::handle_capture_trigger;

/// App's main loop. On exit it waits for in-flight runs, then stops the presenter
pub async fn event_loop(
    state: Arc<AppState>,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    tracing::info!("Event loop started");
    let mut runs = JoinSet::new();

    while let Ok(event) = ui_to_app_rx.recv().await {
        match event {
            AppEvent::TriggerCapture(request) => {
                while runs.try_join_next().is_some() {}
                handle_capture_trigger(state.clone(), request, app_to_ui_tx.clone(), &mut runs);
            }
            AppEvent::ConfigChanged => {
                // Pipelines are built per run, so the next trigger picks this up
                tracing::info!("Configuration changed");
            }
            AppEvent::Shutdown => {
                tracing::info!("Event loop stopping");
                break;
            }
            // Presenter-bound events
            AppEvent::StatusUpdate { .. }
            | AppEvent::ShowOverlay(_)
            | AppEvent::ShowNotice { .. }
            | AppEvent::ShowError { .. } => {
                tracing::debug!("Ignoring presenter event in event loop");
            }
        }
    }

    if !runs.is_empty() {
        tracing::info!("Waiting for the current run to finish");
    }
    while let Some(result) = runs.join_next().await {
        if let Err(e) = result {
            tracing::error!("Run task failed: {e}");
        }
    }

    if app_to_ui_tx.send(AppEvent::Shutdown).await.is_err() {
        tracing::debug!("Presenter already stopped");
    }
    Ok(())
}
