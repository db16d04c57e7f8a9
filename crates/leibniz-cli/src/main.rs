#![doc = include_str!("../README.md")]

mod app;

use app::config::{CliArgs, RunConfig, Strategy};
use app::run::run;
use app::telemetry::{init_telemetry, shutdown_telemetry};
use clap::Parser;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = RunConfig::try_from(args)?;

    let providers = init_telemetry()?;
    log_startup_info(&config);

    let res = run(&config).await;
    if let Err(e) = &res {
        tracing::error!("{e:#}");
    }

    shutdown_telemetry(providers);
    res.map(|_| ())
}

fn log_startup_info(config: &RunConfig) {
    if cfg!(debug_assertions) {
        tracing::info!("Starting leibniz with full config: {:#?}", config);
        return;
    }

    let target = config
        .destination
        .as_ref()
        .map_or_else(|| "log only".to_string(), ToString::to_string);
    match config.strategy {
        Strategy::TimeBounded { calc_time } => {
            tracing::info!("Summing terms for {:?} ({})", calc_time, target);
        }
        Strategy::FixedCount { terms, workers } => {
            tracing::info!(
                "Summing terms 0..={} on {} ({})",
                terms,
                workers.map_or_else(|| "one task per term".to_string(), |w| format!("{w} workers")),
                target
            );
        }
    }
}
