//! Tracing and OpenTelemetry setup.
//!
//! With the `telemetry` feature enabled this installs a `tracing-subscriber`
//! registry with an env filter, a console layer (plain or JSON), and an
//! OpenTelemetry layer exporting spans over OTLP when tracing is enabled.

#[cfg(feature = "telemetry")]
use opentelemetry::trace::TracerProvider;
#[cfg(feature = "telemetry")]
use opentelemetry::KeyValue;
#[cfg(feature = "telemetry")]
use opentelemetry_otlp::WithExportConfig;
#[cfg(feature = "telemetry")]
use opentelemetry_sdk::{
    runtime,
    trace::{RandomIdGenerator, Sampler},
    Resource,
};
#[cfg(feature = "telemetry")]
use opentelemetry_semantic_conventions::resource::SERVICE_NAME;
#[cfg(feature = "telemetry")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::UserbaseResult;
use serde::{Deserialize, Serialize};

const DEFAULT_FILTER: &str = "info,userbase=debug,tower_http=debug";

/// Telemetry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Whether OpenTelemetry export is enabled.
    #[serde(default)]
    pub enabled: bool,

    /// Service name reported on spans.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// OTLP endpoint URL (e.g., "http://localhost:4317").
    #[serde(default)]
    pub otlp_endpoint: Option<String>,

    /// Sampling ratio (0.0 to 1.0).
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,

    /// Whether to log to stdout.
    #[serde(default = "default_console_output")]
    pub console_output: bool,

    /// Emit console logs as JSON lines.
    #[serde(default)]
    pub json: bool,

    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_service_name() -> String {
    "userbase".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

fn default_console_output() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            service_name: default_service_name(),
            otlp_endpoint: None,
            sampling_ratio: default_sampling_ratio(),
            console_output: default_console_output(),
            json: false,
            log_level: default_log_level(),
        }
    }
}

impl TelemetryConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    #[must_use]
    pub fn filter_directive(&self) -> String {
        if self.log_level.eq_ignore_ascii_case("info") {
            DEFAULT_FILTER.to_string()
        } else {
            format!("{},tower_http={}", self.log_level, self.log_level)
        }
    }
}

#[cfg(feature = "telemetry")]
fn env_filter(config: &TelemetryConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.filter_directive()))
}

/// Initialize telemetry with the given configuration.
///
/// This sets up:
/// - OpenTelemetry tracer with OTLP exporter (if enabled and an endpoint is configured)
/// - tracing subscriber with the OpenTelemetry layer
/// - Console output layer (if enabled), plain or JSON
#[cfg(feature = "telemetry")]
pub fn init_telemetry(config: &TelemetryConfig) -> UserbaseResult<()> {
    if !config.enabled {
        init_basic_tracing(config);
        return Ok(());
    }

    let sampler = if config.sampling_ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if config.sampling_ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(config.sampling_ratio)
    };

    let resource = Resource::new(vec![KeyValue::new(SERVICE_NAME, config.service_name.clone())]);

    let builder = opentelemetry_sdk::trace::TracerProvider::builder()
        .with_sampler(sampler)
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource);

    let tracer_provider = if let Some(endpoint) = &config.otlp_endpoint {
        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build()
            .map_err(|e| crate::UserbaseError::Internal(format!("Failed to create OTLP exporter: {}", e)))?;
        builder.with_batch_exporter(exporter, runtime::Tokio).build()
    } else {
        builder.build()
    };

    let tracer = tracer_provider.tracer(config.service_name.clone());
    opentelemetry::global::set_tracer_provider(tracer_provider);

    let otel = tracing_opentelemetry::layer().with_tracer(tracer);
    let registry = tracing_subscriber::registry().with(env_filter(config)).with(otel);

    match (config.console_output, config.json) {
        (true, true) => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        (true, false) => registry.with(tracing_subscriber::fmt::layer().with_target(true)).init(),
        (false, _) => registry.init(),
    }

    tracing::info!(
        service_name = %config.service_name,
        sampling_ratio = %config.sampling_ratio,
        otlp_endpoint = ?config.otlp_endpoint,
        "Telemetry initialized"
    );

    Ok(())
}

/// Initialize console tracing without OpenTelemetry.
#[cfg(feature = "telemetry")]
fn init_basic_tracing(config: &TelemetryConfig) {
    if !config.console_output {
        return;
    }

    let registry = tracing_subscriber::registry().with(env_filter(config));
    if config.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().with_target(true)).init();
    }
}

/// Shutdown telemetry, flushing any pending spans.
#[cfg(feature = "telemetry")]
pub fn shutdown_telemetry() {
    opentelemetry::global::shutdown_tracer_provider();
    tracing::info!("Telemetry shutdown complete");
}

/// No-op when the `telemetry` feature is disabled.
#[cfg(not(feature = "telemetry"))]
pub fn init_telemetry(_config: &TelemetryConfig) -> UserbaseResult<()> {
    Ok(())
}

/// No-op when the `telemetry` feature is disabled.
#[cfg(not(feature = "telemetry"))]
pub fn shutdown_telemetry() {}
