use super::{
    config::{RunConfig, Strategy},
    duration::format_duration,
    telemetry,
};
use anyhow::Context;
use leibniz::Estimate;
use leibniz_sink::{AnySink, BlobSink, Destination, object_key_now};
use std::time::Instant;

/// Computes an estimate with the configured strategy.
///
/// The time-bounded loop never yields, so it runs on the blocking pool to keep
/// the async workers free.
#[tracing::instrument(skip_all)]
pub async fn compute(strategy: Strategy) -> anyhow::Result<Estimate> {
    let estimate = match strategy {
        Strategy::TimeBounded { calc_time } => {
            tokio::task::spawn_blocking(move || leibniz::pi_for(calc_time))
                .await
                .context("time-bounded computation panicked")?
        }
        Strategy::FixedCount {
            terms,
            workers: None,
        } => leibniz::tokio::sum_terms(terms).await?,
        Strategy::FixedCount {
            terms,
            workers: Some(workers),
        } => leibniz::tokio::sum_terms_pooled(terms, workers.get()).await?,
    };
    Ok(estimate)
}

/// Writes `contents` as `key` to `destination` through `sink` and returns the
/// written object's location.
#[tracing::instrument(skip(sink, destination, contents), fields(destination = %destination))]
pub async fn upload<S: BlobSink>(
    sink: &S,
    destination: &Destination,
    key: &str,
    contents: &str,
) -> anyhow::Result<String> {
    let res = sink.put(destination.bucket(), key, contents).await;
    telemetry::record_upload(res.is_ok());
    res.with_context(|| format!("failed to write {}", destination.location(key)))?;
    Ok(destination.location(key))
}

/// Runs one computation and, if a destination is configured, uploads the
/// decimal rendering of the result. Any failure aborts the run.
#[tracing::instrument(skip_all)]
pub async fn run(config: &RunConfig) -> anyhow::Result<Estimate> {
    let started = Instant::now();
    let estimate = compute(config.strategy).await?;
    let elapsed = started.elapsed();

    telemetry::record_run(estimate.terms(), elapsed);

    tracing::info!("Calculated Pi for {}: {}", describe(config.strategy), estimate);
    tracing::debug!(terms = estimate.terms(), ?elapsed, "Computation finished");

    if let Some(destination) = &config.destination {
        let sink = AnySink::for_destination(destination);
        let location = upload(&sink, destination, &object_key_now(), &estimate.to_string()).await?;
        tracing::info!("Wrote {location}");
    }

    Ok(estimate)
}

fn describe(strategy: Strategy) -> String {
    match strategy {
        Strategy::TimeBounded { calc_time } => format_duration(calc_time),
        Strategy::FixedCount { terms, .. } => format!("{} terms", u128::from(terms) + 1),
    }
}
