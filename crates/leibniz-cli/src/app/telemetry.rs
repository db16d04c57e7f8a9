//! Logging and optional OpenTelemetry export.
//!
//! The console subscriber is always installed and filtered by `RUST_LOG`
//! (default `info`). Cargo features add exporters on top:
//!
//! - `tracing`: spans for the run, the computation and the upload.
//! - `metrics`: run and upload counters plus a run duration histogram.
//! - `stdout`: prints whatever of the above is enabled to stdout.
//!
//! ```bash
//! cargo run --bin leibniz --features tracing,metrics,stdout -- --mode count
//! ```

#[cfg(all(feature = "stdout", not(any(feature = "tracing", feature = "metrics"))))]
compile_error!("`stdout` needs `tracing` or `metrics` to have anything to export.");

use core::time::Duration;
use tracing::Subscriber;
use tracing_subscriber::{
    EnvFilter, Layer, fmt::time::ChronoLocal, layer::SubscriberExt, registry::LookupSpan,
    util::SubscriberInitExt,
};

#[cfg(any(feature = "metrics", feature = "tracing"))]
use opentelemetry::{InstrumentationScope, KeyValue};
#[cfg(any(feature = "metrics", feature = "tracing"))]
use opentelemetry_sdk::Resource;
#[cfg(any(feature = "metrics", feature = "tracing"))]
use opentelemetry_semantic_conventions as semconv;

#[cfg(feature = "metrics")]
use opentelemetry::metrics::{Counter, Histogram, Meter};
#[cfg(feature = "metrics")]
use opentelemetry_sdk::metrics::SdkMeterProvider;
#[cfg(feature = "metrics")]
use std::sync::OnceLock;

#[cfg(feature = "tracing")]
use opentelemetry::trace::TracerProvider as _;
#[cfg(feature = "tracing")]
use opentelemetry_sdk::trace::SdkTracerProvider;

const SERVICE_NAME: &str = "leibniz";
#[cfg(feature = "stdout")]
const EXPORT_INTERVAL: Duration = Duration::from_secs(5);

/// Exporter handles that must outlive the run and be flushed at exit.
#[derive(Default)]
pub struct TelemetryProviders {
    #[cfg(feature = "tracing")]
    tracer: Option<SdkTracerProvider>,
    #[cfg(feature = "metrics")]
    meter: Option<SdkMeterProvider>,
}

/// Installs the global subscriber and, when enabled, the OpenTelemetry
/// providers.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_telemetry() -> anyhow::Result<TelemetryProviders> {
    #[cfg(any(feature = "metrics", feature = "tracing"))]
    let scope = InstrumentationScope::builder(SERVICE_NAME)
        .with_version(env!("CARGO_PKG_VERSION"))
        .with_schema_url(semconv::SCHEMA_URL)
        .build();

    let registry = tracing_subscriber::registry().with(console_layer());

    #[cfg(feature = "tracing")]
    let (registry, tracer) = {
        let provider = tracer_provider();
        opentelemetry::global::set_text_map_propagator(
            opentelemetry_sdk::propagation::TraceContextPropagator::new(),
        );
        opentelemetry::global::set_tracer_provider(provider.clone());
        let layer = tracing_opentelemetry::layer()
            .with_tracer(provider.tracer_with_scope(scope.clone()))
            .with_error_records_to_exceptions(true);
        (registry.with(layer), provider)
    };

    #[cfg(feature = "metrics")]
    let (registry, meter) = {
        let provider = meter_provider();
        opentelemetry::global::set_meter_provider(provider.clone());
        let _ = METRICS.set(RunMetrics::new(&opentelemetry::global::meter_with_scope(
            scope,
        )));
        let layer = tracing_opentelemetry::MetricsLayer::new(provider.clone());
        (registry.with(layer), provider)
    };

    registry.try_init()?;

    Ok(TelemetryProviders {
        #[cfg(feature = "tracing")]
        tracer: Some(tracer),
        #[cfg(feature = "metrics")]
        meter: Some(meter),
    })
}

/// Flushes pending spans and metrics, then shuts the providers down.
///
/// Failures go to stderr; the subscriber may no longer deliver them.
pub fn shutdown_telemetry(providers: TelemetryProviders) {
    #[cfg(feature = "tracing")]
    if let Some(tracer) = providers.tracer {
        if let Err(e) = tracer.force_flush().and_then(|()| tracer.shutdown()) {
            eprintln!("Failed to shut down tracer provider: {e:#?}");
        }
    }

    #[cfg(feature = "metrics")]
    if let Some(meter) = providers.meter {
        if let Err(e) = meter.force_flush().and_then(|()| meter.shutdown()) {
            eprintln!("Failed to shut down meter provider: {e:#?}");
        }
    }

    #[cfg(not(any(feature = "tracing", feature = "metrics")))]
    drop(providers);
}

/// Human-readable log lines with local RFC 3339 timestamps.
fn console_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt::layer()
        .with_timer(ChronoLocal::rfc_3339())
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(filter)
}

#[cfg(any(feature = "metrics", feature = "tracing"))]
fn resource() -> Resource {
    Resource::builder()
        .with_service_name(SERVICE_NAME)
        .with_schema_url(
            [KeyValue::new(
                semconv::resource::SERVICE_VERSION,
                env!("CARGO_PKG_VERSION"),
            )],
            semconv::SCHEMA_URL,
        )
        .build()
}

#[cfg(feature = "tracing")]
fn tracer_provider() -> SdkTracerProvider {
    let builder = SdkTracerProvider::builder().with_resource(resource());

    // A single run emits a handful of spans; a simple processor exports them
    // as they close.
    #[cfg(feature = "stdout")]
    let builder = builder.with_simple_exporter(opentelemetry_stdout::SpanExporter::default());

    builder.build()
}

#[cfg(feature = "metrics")]
fn meter_provider() -> SdkMeterProvider {
    let builder = SdkMeterProvider::builder().with_resource(resource());

    #[cfg(feature = "stdout")]
    let builder = builder.with_reader(
        opentelemetry_sdk::metrics::PeriodicReader::builder(
            opentelemetry_stdout::MetricExporter::default(),
        )
        .with_interval(EXPORT_INTERVAL)
        .build(),
    );

    builder.build()
}

#[cfg(feature = "metrics")]
static METRICS: OnceLock<RunMetrics> = OnceLock::new();

#[cfg(feature = "metrics")]
struct RunMetrics {
    runs: Counter<u64>,
    terms_summed: Counter<u64>,
    run_duration: Histogram<f64>,
    uploads: Counter<u64>,
    upload_errors: Counter<u64>,
}

#[cfg(feature = "metrics")]
impl RunMetrics {
    fn new(meter: &Meter) -> Self {
        Self {
            runs: meter
                .u64_counter("leibniz.runs")
                .with_description("Completed approximation runs")
                .build(),
            terms_summed: meter
                .u64_counter("leibniz.terms_summed")
                .with_description("Series terms folded into an estimate")
                .build(),
            run_duration: meter
                .f64_histogram("leibniz.run_duration")
                .with_unit("ms")
                .with_description("Wall-clock time spent computing an estimate")
                .build(),
            uploads: meter
                .u64_counter("leibniz.uploads")
                .with_description("Estimates written to a blob sink")
                .build(),
            upload_errors: meter
                .u64_counter("leibniz.upload_errors")
                .with_description("Blob sink writes that failed")
                .build(),
        }
    }
}

/// Records a finished computation. No-op without the `metrics` feature.
pub fn record_run(terms: u64, elapsed: Duration) {
    #[cfg(feature = "metrics")]
    if let Some(metrics) = METRICS.get() {
        metrics.runs.add(1, &[]);
        metrics.terms_summed.add(terms, &[]);
        metrics
            .run_duration
            .record(elapsed.as_secs_f64() * 1_000.0, &[]);
    }
    #[cfg(not(feature = "metrics"))]
    let _ = (terms, elapsed);
}

/// Records the outcome of one upload. No-op without the `metrics` feature.
pub fn record_upload(succeeded: bool) {
    #[cfg(feature = "metrics")]
    if let Some(metrics) = METRICS.get() {
        let counter = if succeeded {
            &metrics.uploads
        } else {
            &metrics.upload_errors
        };
        counter.add(1, &[]);
    }
    #[cfg(not(feature = "metrics"))]
    let _ = succeeded;
}
