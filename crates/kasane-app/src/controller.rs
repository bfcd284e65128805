use std::sync::Arc;
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use kasane_core::state::AppState;
use kasane_types::AppEvent;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::event_loop;
use crate::io::watcher_io;
use crate::present::{Presenter, presenter_loop};
use crate::status::AppStatus;

const HOTKEY_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Centralized channel management
pub struct ChannelSet {
    pub app_to_ui: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub ui_to_app: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            app_to_ui: kanal::bounded_async(64),
            ui_to_app: kanal::bounded_async(16),
        }
    }
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    status: Arc<AppStatus>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            channels: ChannelSet::new(),
            state,
            status: Arc::new(AppStatus::new()),
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn status(&self) -> Arc<AppStatus> {
        self.status.clone()
    }

    pub async fn spawn_tasks(&self) -> JoinSet<anyhow::Result<()>> {
        let presenter = {
            let config = self.state.config.read().await;
            Presenter::new(&config.overlay)
        };
        tracing::info!("Results go to {}", presenter.output_dir().display());

        let mut tasks = JoinSet::new();

        // Event loop
        tasks.spawn(event_loop(
            self.state.clone(),
            self.channels.ui_to_app.1.clone(),
            self.channels.app_to_ui.0.clone(),
        ));

        // Presenter
        tasks.spawn(presenter_loop(
            self.channels.app_to_ui.1.clone(),
            presenter,
            self.status.clone(),
        ));

        // Hotkey watcher
        tasks.spawn(watcher_io(
            self.state.clone(),
            HOTKEY_POLL_INTERVAL,
            self.cancel_token.child_token(),
            self.channels.ui_to_app.0.clone(),
            self.channels.app_to_ui.0.clone(),
        ));

        tasks
    }

    /// Stop the watcher and the event loop. The event loop stops the
    /// presenter once the current run has delivered its result
    pub async fn shutdown(&self) {
        self.cancel_token.cancel();
        let _ = self.channels.ui_to_app.0.send(AppEvent::Shutdown).await;
    }
}
