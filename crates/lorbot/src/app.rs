//! Wiring of configuration, logging and the dry-run providers.

use anyhow::Context;
use lorbot_capture::{
    DirectoryReplay, LoopbackTelemetry, RecordingTelemetry, ReplayTelemetry, TelemetryFeed,
};
use lorbot_core::BotConfig;
use lorbot_inference::{LocalCardCatalog, ManaTemplates};
use lorbot_orchestrator::{GameObserver, GenericStrategy, RecordingActuator, TurnOrchestrator};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

/// Load the configuration file (or defaults), apply CLI overrides and
/// validate the result.
pub fn load_config(cli: &Cli) -> anyhow::Result<BotConfig> {
    let mut config = match &cli.config {
        Some(path) => BotConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => BotConfig::default(),
    };
    cli.apply(&mut config);
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// JSON schema of the configuration file.
pub fn config_schema() -> anyhow::Result<String> {
    let schema = schemars::schema_for!(BotConfig);
    Ok(serde_json::to_string_pretty(&schema)?)
}

/// Initialize logging. `RUST_LOG` wins over `default_level`.
pub fn init_logging(default_level: &str) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))
}

/// How often the pause file is checked.
pub const PAUSE_POLL: Duration = Duration::from_millis(500);

/// Set `flag` to whether `path` exists. Returns the new state.
pub fn sync_pause(path: &Path, flag: &AtomicBool) -> bool {
    let paused = path.exists();
    if flag.swap(paused, Ordering::SeqCst) != paused {
        info!(path = %path.display(), paused, "Pause toggled");
    }
    paused
}

/// Mirror the existence of `path` into `flag` forever.
pub async fn watch_pause_file(path: PathBuf, flag: Arc<AtomicBool>) {
    let mut interval = tokio::time::interval(PAUSE_POLL);
    loop {
        interval.tick().await;
        sync_pause(&path, &flag);
    }
}

fn telemetry(cli: &Cli, config: &BotConfig) -> anyhow::Result<Arc<dyn TelemetryFeed>> {
    let feed: Arc<dyn TelemetryFeed> = match (&cli.replay_telemetry, &cli.record) {
        (Some(replay), record) => {
            let source = ReplayTelemetry::load_from_file(replay)
                .with_context(|| format!("failed to load telemetry {}", replay.display()))?;
            info!(path = %replay.display(), "Replaying telemetry");
            match record {
                Some(path) => Arc::new(RecordingTelemetry::create(source, path)?),
                None => Arc::new(source),
            }
        }
        (None, record) => {
            let client = LoopbackTelemetry::from_settings(&config.client);
            info!(
                host = %config.client.telemetry_host,
                port = config.client.telemetry_port,
                "Polling client API"
            );
            match record {
                Some(path) => Arc::new(RecordingTelemetry::create(client, path)?),
                None => Arc::new(client),
            }
        }
    };
    Ok(feed)
}

/// Build an orchestrator over replayed frames, the configured telemetry,
/// the local catalog and a recording actuator.
pub fn build_orchestrator(
    cli: &Cli,
    config: &BotConfig,
) -> anyhow::Result<(TurnOrchestrator, RecordingActuator)> {
    let frames = cli
        .frames
        .as_ref()
        .context("a frame directory is required")?;
    let capture = DirectoryReplay::open(frames)
        .with_context(|| format!("failed to load frames from {}", frames.display()))?;
    info!(frames = capture.len(), "Replaying frames");

    let catalog = LocalCardCatalog::open(&config.client.catalog_dir).with_context(|| {
        format!(
            "failed to open card catalog {}",
            config.client.catalog_dir.display()
        )
    })?;

    let mut observer = GameObserver::new(
        config,
        Arc::new(capture),
        telemetry(cli, config)?,
        Arc::new(catalog),
    );
    if let Some(path) = &config.client.mana_templates {
        let templates = ManaTemplates::load(path)
            .with_context(|| format!("failed to load mana templates {}", path.display()))?;
        info!(templates = templates.len(), "Mana templates loaded");
        observer = observer.with_mana_templates(templates);
    }

    let actuator = RecordingActuator::new();
    let orchestrator = TurnOrchestrator::new(
        config,
        observer,
        Arc::new(GenericStrategy),
        Arc::new(actuator.clone()),
    );
    Ok((orchestrator, actuator))
}
