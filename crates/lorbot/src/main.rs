//! # lorbot
//!
//! Dry-run harness: replays captured frames and telemetry through the turn
//! orchestrator and logs every action it would take. With `--pause-file` the
//! bot holds while that file exists.

use clap::Parser;
use lorbot::{
    build_orchestrator, config_schema, init_logging, load_config, watch_pause_file, Cli,
};
use std::sync::atomic::Ordering;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.print_config_schema {
        println!("{}", config_schema()?);
        return Ok(());
    }

    let config = load_config(&cli)?;
    init_logging(&config.bot.log_level)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        pvp = config.bot.pvp,
        "lorbot starting in dry-run mode..."
    );

    let (mut orchestrator, actuator) = build_orchestrator(&cli, &config)?;

    // Stop between ticks on Ctrl-C
    let cancel = orchestrator.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, stopping after this tick");
            cancel.store(true, Ordering::SeqCst);
        }
    });

    if let Some(path) = cli.pause_file.clone() {
        tracing::info!(path = %path.display(), "Watching pause file");
        tokio::spawn(watch_pause_file(path, orchestrator.pause_flag()));
    }

    let result = orchestrator.run().await;

    tracing::info!(
        actions = actuator.effective_actions().len(),
        commits = actuator.commits(),
        "lorbot shutting down"
    );

    result.map_err(|e| {
        tracing::error!("Run failed: {}", e);
        e.into()
    })
}
