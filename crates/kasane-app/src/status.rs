use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::RwLock;

/// Pipeline status indicator
#[derive(Clone, Debug, Default)]
pub struct RunStatus {
    pub busy: bool,
    pub last_run_time: Option<SystemTime>,
    pub run_count: u64,
    pub error_count: u64,
    pub current_message: String,
}

/// Application status
pub struct AppStatus {
    pub run: Arc<RwLock<RunStatus>>,
}

impl AppStatus {
    pub fn new() -> Self {
        Self {
            run: Arc::new(RwLock::new(RunStatus::default())),
        }
    }

    pub async fn set_message(&self, message: &str, busy: bool) {
        let mut status = self.run.write().await;
        if status.busy && !busy {
            status.run_count += 1;
            status.last_run_time = Some(SystemTime::now());
        }
        status.busy = busy;
        status.current_message = message.to_string();
    }

    pub async fn record_error(&self) {
        self.run.write().await.error_count += 1;
    }

    pub async fn snapshot(&self) -> RunStatus {
        self.run.read().await.clone()
    }
}

impl Default for AppStatus {
    fn default() -> Self {
        Self::new()
    }
}
