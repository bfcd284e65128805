use std::sync::atomic::{AtomicBool, Ordering};

use kasane_config::Config;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct AppState {
    pub config: RwLock<Config>,
    pipeline_running: AtomicBool,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: RwLock::new(config),
            pipeline_running: AtomicBool::new(false),
        }
    }

    /// Claim the single pipeline slot. Returns false if a run is already in flight
    pub fn try_begin_run(&self) -> bool {
        self.pipeline_running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn finish_run(&self) {
        self.pipeline_running.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.pipeline_running.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_run_at_a_time() {
        let state = AppState::default();
        assert!(state.try_begin_run());
        assert!(!state.try_begin_run());
        assert!(state.is_running());

        state.finish_run();
        assert!(!state.is_running());
        assert!(state.try_begin_run());
    }
}
