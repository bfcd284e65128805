use std::sync::Arc;
use std::time::Duration;

use kanal::AsyncSender;
use kasane_core::hotkey::Hotkey;
use kasane_core::state::AppState;
use kasane_types::{AppEvent, CaptureRequest};
use tokio_util::sync::CancellationToken;

/// Watch the global hotkey and turn presses into capture triggers
pub async fn watcher_io(
    state: Arc<AppState>,
    delta_time: Duration,
    cancel: CancellationToken,
    event_tx: AsyncSender<AppEvent>,
    status_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let combination = {
        let config = state.config.read().await;
        Hotkey::parse(&config.hotkey.combination)?
    };

    let listening = format!("Listening for hotkey: {combination}");
    let (ready_tx, ready_rx) = tokio::sync::oneshot::channel();

    let listener = tokio::task::spawn_blocking(move || {
        // The manager must live on the thread that polls it
        let hotkey_manager = match kasane_ocr::HotkeyManager::register(&combination) {
            Ok(manager) => {
                let _ = ready_tx.send(Ok(()));
                manager
            }
            Err(e) => {
                let _ = ready_tx.send(Err(e));
                return;
            }
        };

        while !cancel.is_cancelled() {
            if hotkey_manager.poll() {
                tracing::info!("Hotkey {} pressed", hotkey_manager.combination());
                match event_tx.try_send(AppEvent::TriggerCapture(CaptureRequest::Configured)) {
                    Ok(true) => {}
                    Ok(false) => tracing::warn!("Event queue full, dropping capture trigger"),
                    Err(e) => {
                        tracing::error!("Failed to send capture trigger: {e}");
                        break;
                    }
                }
            }

            // Sleep briefly to avoid busy loop
            std::thread::sleep(delta_time);
        }

        tracing::info!("Hotkey listener stopping");
    });

    match ready_rx.await {
        Ok(Ok(())) => {
            let _ = status_tx
                .send(AppEvent::StatusUpdate {
                    status: listening,
                    busy: false,
                })
                .await;
        }
        Ok(Err(e)) => return Err(e),
        Err(_) => anyhow::bail!("Hotkey listener exited before registering"),
    }

    listener.await?;
    Ok(())
}
