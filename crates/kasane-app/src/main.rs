use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use kasane_config::{Config, ConfigStore};
use kasane_core::state::AppState;
use kasane_types::{AppEvent, CaptureRegion, CaptureRequest};
use tokio::signal;

mod controller;
mod events;
mod io;
mod logging;
mod pipeline;
mod present;
mod rebind;
mod status;

#[cfg(test)]
mod tests;

use controller::AppController;
use events::trigger_capture::outcome_events;
use present::{Presenter, REPORT_FILE, presenter_loop};
use rebind::{Rebind, rebind};
use status::AppStatus;

/// Time for an in-flight run to deliver its result after ctrl+c
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[derive(Parser)]
#[command(name = "kasane", version, about = "Screen OCR with a translated overlay")]
struct Cli {
    /// Settings file (defaults to KASANE_CONFIG or the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Listen for the global hotkey and translate on every press (default)
    Run,
    /// Capture once, translate and exit
    Once {
        /// Capture the whole primary monitor
        #[arg(long, conflicts_with = "region")]
        full: bool,
        /// Capture `x,y,width,height` instead of the configured region
        #[arg(long, value_parser = parse_region_arg)]
        region: Option<CaptureRegion>,
    },
    /// Translate an image file instead of the screen
    Image { path: PathBuf },
    /// Bind a new capture hotkey, e.g. `ctrl+shift+s` (`escape` keeps the current one)
    Hotkey { combination: String },
    /// Inspect or change settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective settings (API key masked)
    Show,
    /// Print the settings file location
    Path,
    /// Set one key, e.g. `translator.target_lang EN-US`
    Set { key: String, value: String },
}

fn parse_region_arg(value: &str) -> Result<CaptureRegion, String> {
    kasane_config::parse_region(value).ok_or_else(|| format!("expected x,y,width,height, got '{value}'"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let store = match cli.config {
        Some(path) => ConfigStore::new(path),
        None => ConfigStore::default_location(),
    };

    // Logging needs the configured format before the load can report problems
    let loaded = store.try_load();
    logging::init(loaded.as_ref().map(|c| c.log_format).unwrap_or_default());
    let stored = match loaded {
        Ok(config) => config,
        Err(_) => store.load(),
    };

    let mut config = stored.clone();
    config.apply_env_overrides();

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => run(store, stored, config).await,
        Command::Once { full, region } => {
            let request = match (full, region) {
                (true, _) => CaptureRequest::FullScreen,
                (false, Some(region)) => CaptureRequest::Region(region),
                (false, None) => CaptureRequest::Configured,
            };
            once(config, request).await
        }
        Command::Image { path } => once(config, CaptureRequest::File(path)).await,
        Command::Hotkey { combination } => hotkey_command(&store, stored, &combination),
        Command::Config { action } => config_command(&store, stored, &config, action),
    }
}

async fn run(store: ConfigStore, stored: Config, config: Config) -> anyhow::Result<()> {
    if !config.translator.has_api_key() {
        anyhow::bail!(
            "No DeepL API key configured. Set one with `kasane config set translator.api_key <key>` or KASANE_DEEPL_API_KEY"
        );
    }

    tracing::info!("kasane v{} starting", env!("CARGO_PKG_VERSION"));

    let state = Arc::new(AppState::new(config));
    let controller = AppController::new(state.clone());
    let mut tasks = controller.spawn_tasks().await;

    tokio::select! {
        result = signal::ctrl_c() => {
            result.context("Failed to listen for ctrl+c")?;
            tracing::info!("Shutdown requested");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::warn!("Task exited"),
                Ok(Err(e)) => tracing::error!("Task failed: {e:#}"),
                Err(e) => tracing::error!("Task panicked: {e}"),
            }
        }
    }

    controller.shutdown().await;
    let drained = tokio::time::timeout(SHUTDOWN_GRACE, async {
        while let Some(result) = tasks.join_next().await {
            if let Ok(Err(e)) = result {
                tracing::warn!("Task ended with error during shutdown: {e:#}");
            }
        }
    })
    .await;
    if drained.is_err() {
        tracing::warn!("Tasks still running after {SHUTDOWN_GRACE:?}, aborting");
        tasks.abort_all();
    }

    let summary = controller.status().snapshot().await;
    tracing::info!(
        "Completed {} runs ({} errors)",
        summary.run_count,
        summary.error_count
    );

    store.save(&stored)?;
    tracing::info!("Settings saved to {}", store.path().display());
    Ok(())
}

async fn once(config: Config, request: CaptureRequest) -> anyhow::Result<()> {
    let presenter = Presenter::new(&config.overlay);
    let report_path = presenter.output_dir().join(REPORT_FILE);

    let result = pipeline::run_once(&config, request).await;
    let failure = result.as_ref().err().map(ToString::to_string);

    let (tx, rx) = kanal::unbounded_async();
    for event in outcome_events(result) {
        tx.send(event).await?;
    }
    tx.send(AppEvent::Shutdown).await?;
    presenter_loop(rx, presenter, Arc::new(AppStatus::new())).await?;

    if let Ok(report) = std::fs::read_to_string(&report_path) {
        print!("{report}");
    }

    match failure {
        Some(message) => Err(anyhow::anyhow!(message)),
        None => Ok(()),
    }
}

fn hotkey_command(store: &ConfigStore, mut stored: Config, pressed: &str) -> anyhow::Result<()> {
    match rebind(&stored.hotkey.combination, pressed)? {
        Rebind::Changed(hotkey) => {
            stored.hotkey.combination = hotkey.to_string();
            store.save(&stored)?;
            println!("Hotkey set to {hotkey}");
        }
        Rebind::Kept(Some(hotkey)) => println!("Hotkey unchanged: {hotkey}"),
        Rebind::Kept(None) => println!("No hotkey bound"),
    }
    Ok(())
}

fn config_command(
    store: &ConfigStore,
    mut stored: Config,
    effective: &Config,
    action: ConfigAction,
) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", serde_json::to_string_pretty(&effective.redacted())?);
        }
        ConfigAction::Path => {
            println!("{}", store.path().display());
        }
        ConfigAction::Set { key, value } => {
            stored.set(&key, &value)?;
            store.save(&stored)?;
            tracing::info!("Set {key} in {}", store.path().display());
        }
    }
    Ok(())
}
